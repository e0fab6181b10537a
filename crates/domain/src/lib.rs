//! RPS Online Domain - Core vocabulary shared by every client layer.
//!
//! This crate holds the pure, platform-free parts of the game client:
//! - Gesture vocabulary and wire labels
//! - The single round decision function and its decision authority
//! - Validated value objects (display names, room summaries, captures)
//!
//! Nothing in here touches the network, the DOM, or the camera.

pub mod error;
pub mod rules;
pub mod value_objects;

pub use error::DomainError;
pub use rules::{decide, DecisionAuthority, RoomKind, RoundOutcome};
pub use value_objects::{
    Capture, DisplayName, Gesture, GestureLabel, RoomSummary, MAX_DISPLAY_NAME_CHARS,
    MIN_DISPLAY_NAME_CHARS,
};
