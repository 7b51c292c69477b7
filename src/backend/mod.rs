// Backend module.
// Client and row types for the hosted REST tables.

pub mod client;
pub mod endpoints;
pub mod types;

pub use client::BackendClient;
pub use types::*;
