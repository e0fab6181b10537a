//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the state machines to drive the transport, camera, storage, timers
//! and view without depending on concrete implementations.

pub mod camera_port;
pub mod game_connection_port;
pub mod platform;
pub mod scheduler_port;
pub mod view_port;

pub use camera_port::{CameraError, CameraPermission, CameraPort};
pub use game_connection_port::{ConnectionState, GameConnectionPort};
pub use platform::{storage_keys, AutomatedRoomMarker, RandomProvider, StorageProvider};
pub use scheduler_port::{SchedulerPort, TimerHandle, TimerSink};
pub use view_port::{
    Notice, NoticeLevel, ParticipantView, ParticipantVisual, ResultsView, RoomCardView,
    RoomListView, Route, ViewPort, ViewUpdate,
};

#[cfg(any(test, feature = "testing"))]
pub use camera_port::MockCameraPort;
