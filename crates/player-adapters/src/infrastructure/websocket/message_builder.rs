//! Builds outbound `ClientMessage`s from port calls.

use rps_domain::Capture;
use rps_protocol::ClientMessage;

pub struct ClientMessageBuilder;

impl ClientMessageBuilder {
    pub fn join_lobby(display_name: &str) -> ClientMessage {
        ClientMessage::JoinLobby {
            username: display_name.to_string(),
        }
    }

    pub fn create_room() -> ClientMessage {
        ClientMessage::CreateRoom
    }

    pub fn create_automated_room() -> ClientMessage {
        ClientMessage::CreateAutomatedRoom
    }

    pub fn join_room(room_id: &str) -> ClientMessage {
        ClientMessage::JoinRoomRequest {
            room_id: room_id.to_string(),
        }
    }

    pub fn room_list() -> ClientMessage {
        ClientMessage::GetRoomList
    }

    pub fn player_ready() -> ClientMessage {
        ClientMessage::PlayerReady
    }

    /// Consumes the capture; the image is not kept after submission.
    pub fn submit_capture(capture: Capture) -> ClientMessage {
        ClientMessage::SubmitCapture {
            image: capture.into_data_url(),
        }
    }

    pub fn play_again() -> ClientMessage {
        ClientMessage::PlayAgain
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_is_sent_as_data_url() {
        let msg = ClientMessageBuilder::submit_capture(Capture::from_base64_jpeg("QUJD"));
        assert_eq!(
            msg,
            ClientMessage::SubmitCapture {
                image: "data:image/jpeg;base64,QUJD".into()
            }
        );
    }

    #[test]
    fn test_join_room_carries_id() {
        let value = serde_json::to_value(ClientMessageBuilder::join_room("room_7")).expect("json");
        assert_eq!(value["type"], "join_room_request");
        assert_eq!(value["room_id"], "room_7");
    }
}
