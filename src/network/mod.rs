//! Network layer - HTTP request execution
//!
//! The Network actor receives prediction commands and sends back typed responses.

pub mod actor;
pub mod client;

pub use actor::NetworkActor;
