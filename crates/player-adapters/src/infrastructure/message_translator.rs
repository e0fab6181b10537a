//! Translates ServerMessage from protocol to PlayerEvent for application layer
//!
//! The machines never see wire types. Every known `ServerMessage` variant maps
//! to exactly one `PlayerEvent`; `Unknown` and countdown payloads outside the
//! vocabulary are dropped here, so malformed input cannot reach a machine.

use rps_domain::{Capture, GestureLabel, RoomSummary};
use rps_player_ports::inbound::{CountdownTick, ParticipantResult, PlayerEvent, RoundResults};
use rps_protocol::{CountdownValue, ParticipantEntry, RoomInfo, ServerMessage};

/// Parse one inbound text frame and translate it.
///
/// Frames that are not valid JSON for a known shape are logged and dropped.
pub fn decode_frame(text: &str) -> Option<PlayerEvent> {
    match serde_json::from_str::<ServerMessage>(text) {
        Ok(msg) => translate(msg),
        Err(e) => {
            tracing::warn!(error = %e, "Dropping malformed server frame");
            None
        }
    }
}

/// Translate a ServerMessage into a PlayerEvent
pub fn translate(msg: ServerMessage) -> Option<PlayerEvent> {
    let event = match msg {
        // =====================================================================
        // Lobby
        // =====================================================================
        ServerMessage::LobbyJoined {
            player_id,
            username,
            available_rooms,
        } => PlayerEvent::LobbyJoined {
            participant_id: player_id,
            display_name: username,
            rooms: translate_rooms(available_rooms),
        },

        ServerMessage::RoomListUpdated { available_rooms } => PlayerEvent::RoomListUpdated {
            rooms: translate_rooms(available_rooms),
        },

        ServerMessage::RoomCreated { room_id, .. } => PlayerEvent::RoomCreated { room_id },

        ServerMessage::RoomJoined { room_id, .. } => PlayerEvent::RoomJoined { room_id },

        ServerMessage::AutomatedRoomCreated {
            room_id,
            player_name,
            ai_name,
            ..
        } => PlayerEvent::AutomatedRoomCreated {
            room_id,
            display_name: player_name,
            opponent_name: ai_name,
        },

        ServerMessage::JoinFailed { reason } => PlayerEvent::JoinFailed { reason },

        // =====================================================================
        // Room
        // =====================================================================
        ServerMessage::RoomFull { players } => PlayerEvent::RoomFull {
            participants: players,
        },

        ServerMessage::AutomatedRoomReady {
            player_name,
            ai_name,
        } => PlayerEvent::AutomatedRoomReady {
            display_name: player_name,
            opponent_name: ai_name,
        },

        ServerMessage::PlayerLeft { username } => PlayerEvent::OpponentLeft {
            display_name: username,
        },

        // =====================================================================
        // Round
        // =====================================================================
        ServerMessage::Countdown { count } => PlayerEvent::CountdownTick(translate_countdown(count)?),

        ServerMessage::CaptureGesture => PlayerEvent::CaptureNow,

        ServerMessage::GameResults {
            winner,
            result,
            players,
        } => PlayerEvent::RoundResults(RoundResults {
            summary: result,
            winner,
            participants: players.into_iter().map(translate_participant).collect(),
        }),

        ServerMessage::RoundReset { is_ai_game } => PlayerEvent::RoundReset {
            is_automated_room: is_ai_game,
        },

        ServerMessage::Unknown => {
            tracing::debug!("Ignoring server event of unknown type");
            return None;
        }
    };

    Some(event)
}

fn translate_rooms(rooms: Vec<RoomInfo>) -> Vec<RoomSummary> {
    rooms
        .into_iter()
        .map(|r| RoomSummary::new(r.id, r.players, r.max_players))
        .collect()
}

fn translate_countdown(count: CountdownValue) -> Option<CountdownTick> {
    if count.is_go() {
        return Some(CountdownTick::Go);
    }
    match count {
        CountdownValue::Number(n) => Some(CountdownTick::Number(n)),
        // Some servers stringify the number
        CountdownValue::Text(text) => match text.trim().parse::<u32>() {
            Ok(n) => Some(CountdownTick::Number(n)),
            Err(_) => {
                tracing::warn!(count = %text, "Dropping countdown with unknown token");
                None
            }
        },
    }
}

fn translate_participant(entry: ParticipantEntry) -> ParticipantResult {
    let capture = if entry.capture.is_empty() {
        None
    } else {
        Some(Capture::from_base64_jpeg(&entry.capture))
    };

    ParticipantResult {
        display_name: entry.username,
        capture,
        gesture: GestureLabel::parse(&entry.gesture),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rps_domain::Gesture;

    #[test]
    fn test_translate_lobby_joined() {
        let event = decode_frame(
            r#"{"type":"lobby_joined","player_id":"sid-9","username":"ana",
                "available_rooms":[{"id":"room_1","players":1,"max_players":2}]}"#,
        );
        match event {
            Some(PlayerEvent::LobbyJoined {
                participant_id,
                display_name,
                rooms,
            }) => {
                assert_eq!(participant_id, "sid-9");
                assert_eq!(display_name, "ana");
                assert_eq!(rooms, vec![RoomSummary::new("room_1", 1, 2)]);
            }
            other => panic!("Expected LobbyJoined, got {:?}", other),
        }
    }

    #[test]
    fn test_translate_room_events() {
        assert_eq!(
            decode_frame(r#"{"type":"room_created","room_id":"room_4","redirect":true}"#),
            Some(PlayerEvent::RoomCreated {
                room_id: "room_4".into()
            })
        );
        assert_eq!(
            decode_frame(r#"{"type":"room_joined","room_id":"room_2"}"#),
            Some(PlayerEvent::RoomJoined {
                room_id: "room_2".into()
            })
        );
        assert_eq!(
            decode_frame(r#"{"type":"join_failed","reason":"Room is full"}"#),
            Some(PlayerEvent::JoinFailed {
                reason: "Room is full".into()
            })
        );
        assert_eq!(
            decode_frame(r#"{"type":"player_left","username":"bob"}"#),
            Some(PlayerEvent::OpponentLeft {
                display_name: "bob".into()
            })
        );
    }

    #[test]
    fn test_translate_automated_room_created() {
        let event = translate(ServerMessage::AutomatedRoomCreated {
            room_id: "ai_room_1".into(),
            player_name: "ana".into(),
            ai_name: "🤖 AI".into(),
            is_ai_game: true,
            redirect: true,
        });
        assert_eq!(
            event,
            Some(PlayerEvent::AutomatedRoomCreated {
                room_id: "ai_room_1".into(),
                display_name: "ana".into(),
                opponent_name: "🤖 AI".into(),
            })
        );
    }

    #[test]
    fn test_translate_countdown_ticks() {
        assert_eq!(
            translate(ServerMessage::Countdown {
                count: CountdownValue::Number(2)
            }),
            Some(PlayerEvent::CountdownTick(CountdownTick::Number(2)))
        );
        assert_eq!(
            translate(ServerMessage::Countdown {
                count: CountdownValue::Text("GO!".into())
            }),
            Some(PlayerEvent::CountdownTick(CountdownTick::Go))
        );
        assert_eq!(
            translate(ServerMessage::Countdown {
                count: CountdownValue::Text("1".into())
            }),
            Some(PlayerEvent::CountdownTick(CountdownTick::Number(1)))
        );
        assert_eq!(
            translate(ServerMessage::Countdown {
                count: CountdownValue::Text("soon".into())
            }),
            None
        );
    }

    #[test]
    fn test_translate_results_keep_document_order() {
        let event = decode_frame(
            r#"{"type":"game_results","winner":"zoe","result":"zoe wins!","players":{
                "z-id":{"username":"zoe","gesture":"rock","capture":"QUJD"},
                "ai":{"username":"AI","gesture":"Lizard","capture":""}}}"#,
        );
        let results = match event {
            Some(PlayerEvent::RoundResults(results)) => results,
            other => panic!("Expected RoundResults, got {:?}", other),
        };

        assert_eq!(results.summary, "zoe wins!");
        assert_eq!(results.winner.as_deref(), Some("zoe"));
        assert_eq!(results.participants.len(), 2);

        let first = &results.participants[0];
        assert_eq!(first.display_name, "zoe");
        assert_eq!(first.gesture, GestureLabel::Detected(Gesture::Rock));
        assert_eq!(
            first.capture.as_ref().map(|c| c.as_data_url()),
            Some("data:image/jpeg;base64,QUJD")
        );

        let second = &results.participants[1];
        assert_eq!(second.display_name, "AI");
        assert_eq!(second.gesture, GestureLabel::Unknown);
        assert!(second.capture.is_none());
    }

    #[test]
    fn test_translate_round_reset_and_capture() {
        assert_eq!(
            decode_frame(r#"{"type":"capture_gesture"}"#),
            Some(PlayerEvent::CaptureNow)
        );
        assert_eq!(
            decode_frame(r#"{"type":"round_reset","is_ai_game":true}"#),
            Some(PlayerEvent::RoundReset {
                is_automated_room: true
            })
        );
    }

    #[test]
    fn test_unknown_and_malformed_frames_are_dropped() {
        assert_eq!(decode_frame(r#"{"type":"server_banner","text":"hi"}"#), None);
        assert_eq!(decode_frame(r#"{"type":"room_full"}"#), None);
        assert_eq!(decode_frame("not json"), None);
    }
}
