//! Test-only infrastructure fakes.
//!
//! These helpers implement outbound ports for unit tests of the lobby and
//! session machines, so tests run without a socket, a camera, a page or a
//! clock. Every fake records what it was asked to do.

mod fakes;
mod recording_connection;

pub use fakes::{FakeCamera, ManualScheduler, MemoryStorage, RecordingView, ScriptedRandom};
pub use recording_connection::{RecordingConnection, Sent};
