//! Display-name persistence
//!
//! The last name confirmed by the server is cached locally so both pages can
//! re-register the player after a reload or reconnect.

use std::rc::Rc;

use rps_domain::DisplayName;
use rps_player_ports::outbound::{storage_keys, StorageProvider};

/// Service for the locally cached player identity
#[derive(Clone)]
pub struct UserService {
    storage: Rc<dyn StorageProvider>,
}

impl UserService {
    /// Create a new UserService with the given storage provider
    pub fn new(storage: Rc<dyn StorageProvider>) -> Self {
        Self { storage }
    }

    /// Get the stored display name, if any.
    ///
    /// A stored value that no longer validates is removed.
    pub fn stored_display_name(&self) -> Option<DisplayName> {
        let raw = self.storage.load(storage_keys::USERNAME)?;
        match DisplayName::new(raw) {
            Ok(name) => Some(name),
            Err(e) => {
                tracing::warn!(error = %e, "Dropping invalid stored display name");
                self.storage.remove(storage_keys::USERNAME);
                None
            }
        }
    }

    /// Remember a display name confirmed by the server
    pub fn remember(&self, name: &str) {
        self.storage.save(storage_keys::USERNAME, name);
    }

    /// Clear the stored display name
    ///
    /// This "logs out" the player: the lobby shows the login form again.
    pub fn forget(&self) {
        self.storage.remove(storage_keys::USERNAME);
    }
}
