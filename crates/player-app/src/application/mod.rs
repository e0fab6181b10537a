//! Application layer - Use cases and orchestration

pub mod context;
pub mod error;
pub mod machines;
pub mod services;

// Re-export common types
pub use context::{PortSet, SessionContext};
pub use error::ClientError;

#[cfg(test)]
pub(crate) mod test_support;
