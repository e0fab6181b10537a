//! Camera Port - Outbound port for device camera access
//!
//! The adapter owns the one live media stream; callers only ever see
//! encoded snapshots.

use async_trait::async_trait;
use rps_domain::Capture;

/// Errors surfaced by camera adapters
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CameraError {
    #[error("Camera access was denied")]
    PermissionDenied,
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Camera is not initialized")]
    NotInitialized,
}

/// Result of a permission query. Never an error: failures degrade to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CameraPermission {
    Granted,
    Denied,
    Prompt,
    Unknown,
}

impl CameraPermission {
    /// Map a Permissions API state string.
    pub fn from_state(state: &str) -> Self {
        match state {
            "granted" => CameraPermission::Granted,
            "denied" => CameraPermission::Denied,
            "prompt" => CameraPermission::Prompt,
            _ => CameraPermission::Unknown,
        }
    }
}

/// Capture adapter contract
///
/// Used from the single-threaded event loop only, so futures are not `Send`.
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait(?Send)]
pub trait CameraPort {
    /// Acquire the front-facing camera and bind it to the display surface.
    ///
    /// Resolves once the first frame's metadata is available. An already open
    /// stream is closed first.
    async fn open(&self) -> Result<(), CameraError>;

    /// Stop all tracks and unbind the display surface. Idempotent.
    fn close(&self);

    /// Encode the current frame.
    fn capture(&self) -> Result<Capture, CameraError>;

    /// True while a live stream is held
    fn is_active(&self) -> bool;

    /// Whether this environment offers camera access at all
    fn is_supported(&self) -> bool;

    async fn query_permission(&self) -> CameraPermission;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_states() {
        assert_eq!(CameraPermission::from_state("granted"), CameraPermission::Granted);
        assert_eq!(CameraPermission::from_state("denied"), CameraPermission::Denied);
        assert_eq!(CameraPermission::from_state("prompt"), CameraPermission::Prompt);
        assert_eq!(CameraPermission::from_state(""), CameraPermission::Unknown);
    }
}
