//! RPS Online Protocol - Wire types for client/server communication
//!
//! The game server speaks JSON text frames over a WebSocket. Every frame is an
//! object tagged by `"type"`, carrying the server's event name
//! (`join_lobby`, `room_full`, `game_results`, ...).
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and serde_json
//! 2. **No business logic** - Pure data types and serialization
//! 3. **WASM compatible** - Must compile for both native and wasm32 targets

pub mod messages;

pub use messages::{
    ClientMessage, CountdownValue, ParticipantEntry, RoomInfo, ServerMessage, GO_TOKEN,
};
