//! Platform abstraction ports: local persistence and randomness.

use serde::{Deserialize, Serialize};

/// Storage keys used in local persistence
pub mod storage_keys {
    /// Last confirmed display name
    pub const USERNAME: &str = "rps_username";
    /// JSON-encoded `AutomatedRoomMarker`
    pub const AUTOMATED_ROOM: &str = "ai_game_info";
}

/// Key-value storage abstraction (localStorage on web, a JSON file on desktop)
pub trait StorageProvider {
    fn save(&self, key: &str, value: &str);
    fn load(&self, key: &str) -> Option<String>;
    fn remove(&self, key: &str);
}

/// Uniform randomness source
pub trait RandomProvider {
    /// Sample in `[0, 1)`
    fn random_f64(&self) -> f64;
}

/// Record left by the lobby when the server confirms an automated room.
///
/// The session reads it on entry to decide the room kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AutomatedRoomMarker {
    pub room_id: String,
    #[serde(rename = "player_name")]
    pub display_name: String,
    #[serde(rename = "ai_name")]
    pub opponent_name: String,
    #[serde(rename = "is_ai_game", default = "default_true")]
    pub is_automated_room: bool,
}

fn default_true() -> bool {
    true
}

impl AutomatedRoomMarker {
    pub fn new(
        room_id: impl Into<String>,
        display_name: impl Into<String>,
        opponent_name: impl Into<String>,
    ) -> Self {
        Self {
            room_id: room_id.into(),
            display_name: display_name.into(),
            opponent_name: opponent_name.into(),
            is_automated_room: true,
        }
    }

    /// Load the marker; a corrupt record is discarded.
    pub fn load(storage: &dyn StorageProvider) -> Option<Self> {
        let raw = storage.load(storage_keys::AUTOMATED_ROOM)?;
        match serde_json::from_str::<Self>(&raw) {
            Ok(marker) => Some(marker),
            Err(e) => {
                tracing::warn!(error = %e, "Discarding unreadable automated room marker");
                storage.remove(storage_keys::AUTOMATED_ROOM);
                None
            }
        }
    }

    /// The marker only counts when it names this room.
    pub fn load_for_room(storage: &dyn StorageProvider, room_id: &str) -> Option<Self> {
        Self::load(storage).filter(|m| m.is_automated_room && m.room_id == room_id)
    }

    pub fn save(&self, storage: &dyn StorageProvider) {
        match serde_json::to_string(self) {
            Ok(json) => storage.save(storage_keys::AUTOMATED_ROOM, &json),
            Err(e) => tracing::error!(error = %e, "Failed to encode automated room marker"),
        }
    }

    pub fn clear(storage: &dyn StorageProvider) {
        storage.remove(storage_keys::AUTOMATED_ROOM);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::HashMap;

    #[derive(Default)]
    struct MockStorage {
        data: RefCell<HashMap<String, String>>,
    }

    impl StorageProvider for MockStorage {
        fn save(&self, key: &str, value: &str) {
            self.data
                .borrow_mut()
                .insert(key.to_string(), value.to_string());
        }

        fn load(&self, key: &str) -> Option<String> {
            self.data.borrow().get(key).cloned()
        }

        fn remove(&self, key: &str) {
            self.data.borrow_mut().remove(key);
        }
    }

    #[test]
    fn test_marker_wire_field_names() {
        let marker = AutomatedRoomMarker::new("room_7", "ana", "🤖 AI");
        let value = serde_json::to_value(&marker).expect("serialize");
        assert_eq!(
            value,
            serde_json::json!({
                "room_id": "room_7",
                "player_name": "ana",
                "ai_name": "🤖 AI",
                "is_ai_game": true
            })
        );
    }

    #[test]
    fn test_marker_only_matches_its_room() {
        let storage = MockStorage::default();
        AutomatedRoomMarker::new("room_7", "ana", "AI").save(&storage);

        assert!(AutomatedRoomMarker::load_for_room(&storage, "room_7").is_some());
        assert!(AutomatedRoomMarker::load_for_room(&storage, "room_8").is_none());

        AutomatedRoomMarker::clear(&storage);
        assert!(AutomatedRoomMarker::load(&storage).is_none());
    }

    #[test]
    fn test_corrupt_marker_is_discarded() {
        let storage = MockStorage::default();
        storage.save(storage_keys::AUTOMATED_ROOM, "{not json");

        assert!(AutomatedRoomMarker::load(&storage).is_none());
        assert!(storage.load(storage_keys::AUTOMATED_ROOM).is_none());
    }
}
