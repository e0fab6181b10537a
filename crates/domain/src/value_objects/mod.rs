//! Value objects - Immutable objects defined by their attributes

mod capture;
mod gesture;
mod names;
mod room;

pub use capture::Capture;
pub use gesture::{Gesture, GestureLabel};
pub use names::{DisplayName, MAX_DISPLAY_NAME_CHARS, MIN_DISPLAY_NAME_CHARS};
pub use room::RoomSummary;
