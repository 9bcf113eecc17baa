//! The booking correctness core: slot generation, conflict filtering,
//! admission, throttling, and the public multi-step workflow.
//!
//! Everything in here is request-scoped and synchronous apart from the
//! storage boundary in [`admission`]; no background tasks are spawned.

pub mod admission;
pub mod conflicts;
pub mod rate_limit;
pub mod slots;
#[allow(unused)]
pub mod workflow;
