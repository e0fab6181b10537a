//! Inbound ports - Data types for server-to-application communication
//!
//! These types define the contract for how server events are represented
//! in the application layer. The adapters layer produces these types,
//! the application layer consumes them.

pub mod player_events;

pub use player_events::{CountdownTick, ParticipantResult, PlayerEvent, RoundResults};
