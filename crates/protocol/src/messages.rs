//! WebSocket message types for client/server communication
//!
//! This module contains all message types exchanged over the WebSocket connection.
//! The server's event names are kept verbatim on the wire; Rust names describe
//! what the message means for the client.

use serde::{Deserialize, Serialize};

/// Terminal countdown token sent by the server.
pub const GO_TOKEN: &str = "GO!";

// =============================================================================
// Client Messages (Player → Server)
// =============================================================================

/// Messages from client (player) to server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Register in the lobby under a display name
    JoinLobby { username: String },
    /// Create a two-player room
    CreateRoom,
    /// Create a room against the automated opponent
    #[serde(rename = "create_ai_game")]
    CreateAutomatedRoom,
    /// Ask to join an existing room
    JoinRoomRequest { room_id: String },
    /// Ask for a fresh room list
    #[serde(rename = "get_rooms")]
    GetRoomList,
    /// Local player is ready for the countdown
    PlayerReady,
    /// Snapshot taken at capture time, as a JPEG data URL
    #[serde(rename = "gesture_capture")]
    SubmitCapture { image: String },
    /// Request another round
    PlayAgain,
}

// =============================================================================
// Server Messages (Server → Player)
// =============================================================================

/// Messages from server to client (player)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// Lobby registration confirmed
    LobbyJoined {
        player_id: String,
        username: String,
        #[serde(default)]
        available_rooms: Vec<RoomInfo>,
    },
    /// Full replacement of the open-room list
    RoomListUpdated {
        #[serde(default)]
        available_rooms: Vec<RoomInfo>,
    },
    /// A room was created for this client
    RoomCreated {
        room_id: String,
        #[serde(default)]
        redirect: bool,
    },
    /// This client was admitted to a room
    RoomJoined {
        room_id: String,
        #[serde(default)]
        redirect: bool,
    },
    /// A room against the automated opponent was created for this client
    #[serde(rename = "ai_game_created")]
    AutomatedRoomCreated {
        room_id: String,
        player_name: String,
        ai_name: String,
        #[serde(default)]
        is_ai_game: bool,
        #[serde(default)]
        redirect: bool,
    },
    /// Room join declined
    JoinFailed { reason: String },
    /// Room reached its required occupancy
    RoomFull { players: Vec<String> },
    /// Automated-opponent room is ready to play
    #[serde(rename = "ai_room_ready")]
    AutomatedRoomReady { player_name: String, ai_name: String },
    /// The other participant left
    PlayerLeft { username: String },
    /// One countdown tick: a number, or `"GO!"`
    Countdown { count: CountdownValue },
    /// Take the snapshot now
    CaptureGesture,
    /// Server-adjudicated round results
    GameResults {
        #[serde(default)]
        winner: Option<String>,
        result: String,
        #[serde(with = "ordered_players")]
        players: Vec<ParticipantEntry>,
    },
    /// A new round starts for everyone in the room
    RoundReset {
        #[serde(default)]
        is_ai_game: bool,
    },
    /// Any event this client does not know about
    #[serde(other)]
    Unknown,
}

/// Room entry as listed by the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: String,
    pub players: u32,
    pub max_players: u32,
}

/// Countdown payload: numeric tick or the terminal token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CountdownValue {
    Number(u32),
    Text(String),
}

impl CountdownValue {
    pub fn is_go(&self) -> bool {
        matches!(self, CountdownValue::Text(t) if t == GO_TOKEN)
    }
}

/// One participant's entry in `game_results`.
///
/// On the wire, `players` is an object keyed by participant id; the id is
/// lifted into the entry and document order is preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantEntry {
    pub id: String,
    pub username: String,
    pub gesture: String,
    /// Bare base64 JPEG payload; empty for the automated opponent
    pub capture: String,
}

mod ordered_players {
    use std::fmt;

    use serde::de::{MapAccess, Visitor};
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    use super::ParticipantEntry;

    fn unknown_gesture() -> String {
        "unknown".to_string()
    }

    #[derive(Serialize, Deserialize)]
    struct Body {
        username: String,
        #[serde(default = "unknown_gesture")]
        gesture: String,
        #[serde(default)]
        capture: String,
    }

    pub fn serialize<S>(players: &[ParticipantEntry], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(players.len()))?;
        for p in players {
            map.serialize_entry(
                &p.id,
                &Body {
                    username: p.username.clone(),
                    gesture: p.gesture.clone(),
                    capture: p.capture.clone(),
                },
            )?;
        }
        map.end()
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<ParticipantEntry>, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Vec<ParticipantEntry>;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("an object of participants keyed by id")
            }

            fn visit_map<A>(self, mut access: A) -> Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut out = Vec::with_capacity(access.size_hint().unwrap_or(2));
                while let Some((id, body)) = access.next_entry::<String, Body>()? {
                    out.push(ParticipantEntry {
                        id,
                        username: body.username,
                        gesture: body.gesture,
                        capture: body.capture,
                    });
                }
                Ok(out)
            }
        }

        deserializer.deserialize_map(OrderedVisitor)
    }
}
