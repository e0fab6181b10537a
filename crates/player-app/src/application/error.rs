//! Client error taxonomy
//!
//! Every variant is recoverable: the machines render it as a `Notice` and
//! stay in their current phase.

use rps_domain::DomainError;
use rps_player_ports::outbound::{CameraError, Notice};

/// Errors surfaced to the player
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClientError {
    #[error("Camera access was denied. Allow camera access and try again.")]
    PermissionDenied,
    #[error("Camera unavailable: {0}")]
    DeviceUnavailable(String),
    #[error("Camera is not ready")]
    NotInitialized,
    #[error("Not connected to the server")]
    TransportDisconnected,
    #[error("{0}")]
    ValidationFailed(String),
    #[error("Could not join the room: {0}")]
    JoinRejected(String),
}

impl From<CameraError> for ClientError {
    fn from(e: CameraError) -> Self {
        match e {
            CameraError::PermissionDenied => ClientError::PermissionDenied,
            CameraError::DeviceUnavailable(reason) => ClientError::DeviceUnavailable(reason),
            CameraError::NotInitialized => ClientError::NotInitialized,
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(e: DomainError) -> Self {
        match e {
            DomainError::Validation(msg) | DomainError::Parse(msg) => {
                ClientError::ValidationFailed(msg)
            }
        }
    }
}

impl ClientError {
    /// User-facing form of this error
    pub fn notice(&self) -> Notice {
        match self {
            ClientError::ValidationFailed(_) | ClientError::TransportDisconnected => {
                Notice::warning(self.to_string())
            }
            _ => Notice::error(self.to_string()),
        }
    }
}
