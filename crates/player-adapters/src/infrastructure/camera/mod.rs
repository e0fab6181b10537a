//! Camera adapters
//!
//! The browser build captures through getUserMedia and a canvas. Desktop
//! builds have no camera API and report themselves unsupported.

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::WebCamera;

use async_trait::async_trait;
use rps_domain::Capture;
use rps_player_ports::outbound::{CameraError, CameraPermission, CameraPort};

/// Camera for platforms without one.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedCamera;

#[async_trait(?Send)]
impl CameraPort for UnsupportedCamera {
    async fn open(&self) -> Result<(), CameraError> {
        Err(CameraError::DeviceUnavailable(
            "camera capture is not supported on this platform".to_string(),
        ))
    }

    fn close(&self) {}

    fn capture(&self) -> Result<Capture, CameraError> {
        Err(CameraError::NotInitialized)
    }

    fn is_active(&self) -> bool {
        false
    }

    fn is_supported(&self) -> bool {
        false
    }

    async fn query_permission(&self) -> CameraPermission {
        CameraPermission::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_unsupported_camera_never_opens() {
        let camera = UnsupportedCamera;
        assert!(!camera.is_supported());
        assert!(matches!(
            camera.open().await,
            Err(CameraError::DeviceUnavailable(_))
        ));
        assert_eq!(camera.capture(), Err(CameraError::NotInitialized));
        assert_eq!(camera.query_permission().await, CameraPermission::Unknown);
    }

    #[test]
    fn test_close_is_idempotent() {
        let camera = UnsupportedCamera;
        camera.close();
        camera.close();
        assert!(!camera.is_active());
    }
}
