//! Infrastructure layer - External adapters

pub mod camera;
pub mod connection_factory;
pub mod message_translator;
pub mod platform;
pub mod view;
pub mod websocket;

// Re-export ConnectionFactory for convenience
pub use connection_factory::ConnectionFactory;

// Re-export message translator for ServerMessage → PlayerEvent conversion
pub use message_translator::{decode_frame, translate as translate_server_message};

// Test-only infrastructure fakes (ports/adapters).
// Available for integration testing from other crates as well
#[cfg(not(target_arch = "wasm32"))]
pub mod testing;
