//! Read-only room projection received from the server.

use serde::{Deserialize, Serialize};

/// Summary of one open room in the lobby list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomSummary {
    pub id: String,
    pub current_player_count: u32,
    pub max_player_count: u32,
}

impl RoomSummary {
    pub fn new(id: impl Into<String>, current_player_count: u32, max_player_count: u32) -> Self {
        Self {
            id: id.into(),
            current_player_count,
            max_player_count,
        }
    }

    pub fn is_full(&self) -> bool {
        self.current_player_count >= self.max_player_count
    }

    /// Occupancy as shown on room cards, e.g. `1/2`.
    pub fn occupancy_label(&self) -> String {
        format!("{}/{}", self.current_player_count, self.max_player_count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_full() {
        assert!(!RoomSummary::new("room_1", 1, 2).is_full());
        assert!(RoomSummary::new("room_2", 2, 2).is_full());
        assert!(RoomSummary::new("room_3", 3, 2).is_full());
    }

    #[test]
    fn test_occupancy_label() {
        assert_eq!(RoomSummary::new("room_1", 1, 2).occupancy_label(), "1/2");
    }
}
