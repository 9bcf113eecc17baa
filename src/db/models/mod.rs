mod availability_rule;
mod booking;
mod event_type;

pub use availability_rule::*;
pub use booking::*;
pub use event_type::*;
