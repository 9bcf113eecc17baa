mod auth;
mod client_ip;
pub mod tracing;

pub use auth::OwnerId;
pub use client_ip::ClientIp;
