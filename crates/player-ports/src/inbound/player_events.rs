//! Player events - inbound port data types for server messages
//!
//! These types represent the application's view of server messages.
//! The adapters layer translates wire messages into `PlayerEvent`s; the
//! lobby and session machines consume them. Connection state changes are not
//! events here: they arrive through `GameConnectionPort::on_state_change`.

use rps_domain::{Capture, GestureLabel, RoomSummary};

/// One countdown step pushed by the server (or generated locally).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    Number(u32),
    /// Terminal tick; capture happens next
    Go,
}

impl CountdownTick {
    /// Text rendered in the countdown overlay.
    pub fn label(self) -> String {
        match self {
            CountdownTick::Number(n) => n.to_string(),
            CountdownTick::Go => "GO!".to_string(),
        }
    }
}

/// One participant's line on the results screen.
#[derive(Debug, Clone, PartialEq)]
pub struct ParticipantResult {
    pub display_name: String,
    /// `None` when the participant has no image (automated opponent)
    pub capture: Option<Capture>,
    pub gesture: GestureLabel,
}

/// Server-adjudicated results of a round.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundResults {
    /// Headline text, e.g. `"alice wins!"`
    pub summary: String,
    pub winner: Option<String>,
    /// Participants in the order the server listed them
    pub participants: Vec<ParticipantResult>,
}

/// Application-level events derived from server messages
#[derive(Debug, Clone, PartialEq)]
pub enum PlayerEvent {
    // Lobby
    LobbyJoined {
        participant_id: String,
        display_name: String,
        rooms: Vec<RoomSummary>,
    },
    RoomListUpdated {
        rooms: Vec<RoomSummary>,
    },
    RoomCreated {
        room_id: String,
    },
    RoomJoined {
        room_id: String,
    },
    AutomatedRoomCreated {
        room_id: String,
        display_name: String,
        opponent_name: String,
    },
    JoinFailed {
        reason: String,
    },

    // Room
    RoomFull {
        participants: Vec<String>,
    },
    AutomatedRoomReady {
        display_name: String,
        opponent_name: String,
    },
    OpponentLeft {
        display_name: String,
    },

    // Round
    CountdownTick(CountdownTick),
    CaptureNow,
    RoundResults(RoundResults),
    RoundReset {
        is_automated_room: bool,
    },
}

impl PlayerEvent {
    /// Short name for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            PlayerEvent::LobbyJoined { .. } => "lobby_joined",
            PlayerEvent::RoomListUpdated { .. } => "room_list_updated",
            PlayerEvent::RoomCreated { .. } => "room_created",
            PlayerEvent::RoomJoined { .. } => "room_joined",
            PlayerEvent::AutomatedRoomCreated { .. } => "automated_room_created",
            PlayerEvent::JoinFailed { .. } => "join_failed",
            PlayerEvent::RoomFull { .. } => "room_full",
            PlayerEvent::AutomatedRoomReady { .. } => "automated_room_ready",
            PlayerEvent::OpponentLeft { .. } => "opponent_left",
            PlayerEvent::CountdownTick(_) => "countdown_tick",
            PlayerEvent::CaptureNow => "capture_now",
            PlayerEvent::RoundResults(_) => "round_results",
            PlayerEvent::RoundReset { .. } => "round_reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_countdown_labels() {
        assert_eq!(CountdownTick::Number(2).label(), "2");
        assert_eq!(CountdownTick::Go.label(), "GO!");
    }
}
