pub mod events;
pub mod http;
pub mod observability;
pub mod runtime;
pub mod session;
