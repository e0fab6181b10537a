//! Still-image capture taken from the live camera feed.

use std::fmt;

const JPEG_DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// An encoded snapshot, stored as a data URL.
///
/// Captures are moved, not cloned, to whoever consumes them (the transport
/// for submission, or the view for display). `Debug` never prints the
/// payload.
#[derive(Clone, PartialEq, Eq)]
pub struct Capture(String);

impl Capture {
    /// Wrap an already-encoded data URL (e.g. from `canvas.toDataURL`).
    pub fn from_data_url(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    /// Wrap a bare base64 JPEG payload as returned in round results.
    ///
    /// Payloads that already carry a `data:` prefix are kept as-is.
    pub fn from_base64_jpeg(payload: &str) -> Self {
        if payload.starts_with("data:") {
            Self(payload.to_string())
        } else {
            Self(format!("{}{}", JPEG_DATA_URL_PREFIX, payload))
        }
    }

    pub fn as_data_url(&self) -> &str {
        &self.0
    }

    pub fn into_data_url(self) -> String {
        self.0
    }

    /// True when there is no image payload after the prefix.
    pub fn is_empty(&self) -> bool {
        match self.0.split_once(',') {
            Some((_, payload)) => payload.is_empty(),
            None => self.0.is_empty(),
        }
    }
}

impl fmt::Debug for Capture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Capture({} bytes)", self.0.len())
    }
}
