//! Declarative control tables
//!
//! One table per page maps DOM controls to machine actions. The web adapter
//! walks the table once and attaches a listener per row.

use crate::application::machines::lobby::LobbyAction;
use crate::application::machines::session::SessionAction;

/// Where a control's argument comes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSource {
    /// No argument
    None,
    /// Value of the input element with this id
    InputValue(&'static str),
    /// Attribute on the clicked descendant (delegated listener)
    DataAttribute(&'static str),
}

/// One row of a binding table
#[derive(Debug, Clone, Copy)]
pub struct ControlBinding<A: 'static> {
    pub element_id: &'static str,
    pub event: &'static str,
    pub source: ValueSource,
    /// Builds the action from the extracted value; `None` drops the event
    pub action: fn(Option<String>) -> Option<A>,
}

impl<A: 'static> ControlBinding<A> {
    /// Whether the DOM default action must be suppressed (form submits)
    pub fn prevents_default(&self) -> bool {
        self.event == "submit"
    }
}

pub const LOBBY_BINDINGS: &[ControlBinding<LobbyAction>] = &[
    ControlBinding {
        element_id: "loginForm",
        event: "submit",
        source: ValueSource::InputValue("username"),
        action: |value| Some(LobbyAction::SubmitLogin(value.unwrap_or_default())),
    },
    ControlBinding {
        element_id: "createRoomBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(LobbyAction::CreateRoom),
    },
    ControlBinding {
        element_id: "playAiBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(LobbyAction::CreateAutomatedRoom),
    },
    ControlBinding {
        element_id: "refreshBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(LobbyAction::RefreshRooms),
    },
    ControlBinding {
        element_id: "logoutBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(LobbyAction::Logout),
    },
    ControlBinding {
        element_id: "roomsList",
        event: "click",
        source: ValueSource::DataAttribute("data-room-id"),
        action: |value| value.map(LobbyAction::JoinRoom),
    },
];

pub const SESSION_BINDINGS: &[ControlBinding<SessionAction>] = &[
    ControlBinding {
        element_id: "readyBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(SessionAction::Ready),
    },
    ControlBinding {
        element_id: "leaveRoomBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(SessionAction::Leave),
    },
    ControlBinding {
        element_id: "playAgainBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(SessionAction::PlayAgain),
    },
    ControlBinding {
        element_id: "backToLobbyBtn",
        event: "click",
        source: ValueSource::None,
        action: |_| Some(SessionAction::Leave),
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    fn lobby_row(id: &str) -> &'static ControlBinding<LobbyAction> {
        LOBBY_BINDINGS
            .iter()
            .find(|b| b.element_id == id)
            .expect("binding present")
    }

    #[test]
    fn test_login_form_reads_input() {
        let row = lobby_row("loginForm");
        assert!(row.prevents_default());
        assert_eq!(
            (row.action)(Some("ana".into())),
            Some(LobbyAction::SubmitLogin("ana".into()))
        );
    }

    #[test]
    fn test_join_needs_room_id() {
        let row = lobby_row("roomsList");
        assert_eq!((row.action)(None), None);
        assert_eq!(
            (row.action)(Some("room_3".into())),
            Some(LobbyAction::JoinRoom("room_3".into()))
        );
    }

    #[test]
    fn test_element_ids_are_unique() {
        let mut ids: Vec<_> = LOBBY_BINDINGS.iter().map(|b| b.element_id).collect();
        ids.extend(SESSION_BINDINGS.iter().map(|b| b.element_id));
        let total = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), total);
    }

    #[test]
    fn test_both_exit_buttons_leave() {
        let leaves = SESSION_BINDINGS
            .iter()
            .filter(|b| (b.action)(None) == Some(SessionAction::Leave))
            .count();
        assert_eq!(leaves, 2);
    }
}
