//! Player port definitions and shared cross-layer types.

pub mod config;
pub mod inbound;
pub mod outbound;

pub use config::{CameraConfig, ClientConfig, PacingConfig};
