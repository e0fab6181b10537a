//! Lobby View-State Machine
//!
//! Two states: logged out (login form) and logged in (room list). Server
//! confirmations drive the state; user actions are forwarded to the server
//! once the display name validates and the link is up.

use async_trait::async_trait;

use rps_domain::{DisplayName, RoomSummary};
use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::{
    AutomatedRoomMarker, ConnectionState, GameConnectionPort, Notice, RoomListView, Route,
    ViewUpdate,
};

use crate::application::context::{LinkChange, SessionContext};
use crate::application::error::ClientError;
use crate::application::services::{AppEvent, PageMachine};

/// User actions available on the lobby page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyAction {
    SubmitLogin(String),
    CreateRoom,
    CreateAutomatedRoom,
    JoinRoom(String),
    RefreshRooms,
    Logout,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LobbyState {
    LoggedOut,
    LoggedIn {
        participant_id: String,
        display_name: DisplayName,
        rooms: Vec<RoomSummary>,
    },
}

pub struct LobbyMachine {
    ctx: SessionContext,
    state: LobbyState,
}

impl LobbyMachine {
    pub fn new(ctx: SessionContext) -> Self {
        Self {
            ctx,
            state: LobbyState::LoggedOut,
        }
    }

    pub fn state(&self) -> &LobbyState {
        &self.state
    }

    pub fn context(&self) -> &SessionContext {
        &self.ctx
    }

    fn on_connection(&mut self, state: ConnectionState) {
        match self.ctx.observe_connection(state) {
            LinkChange::Established | LinkChange::Restored => {
                if self.ctx.identity().is_some() {
                    return;
                }
                if let Some(name) = self.ctx.users.stored_display_name() {
                    tracing::info!(name = %name, "Re-registering stored display name");
                    if let Err(e) = self.ctx.connection.join_lobby(name.as_str()) {
                        tracing::error!(error = %e, "Failed to send join_lobby");
                    }
                }
            }
            LinkChange::Lost => {
                self.ctx.render(ViewUpdate::Notice(Notice::warning(
                    "Connection lost, reconnecting...",
                )));
            }
            LinkChange::Unchanged => {}
        }
    }

    fn on_server(&mut self, event: PlayerEvent) {
        match event {
            PlayerEvent::LobbyJoined {
                participant_id,
                display_name,
                rooms,
            } => {
                let name = match DisplayName::new(display_name.as_str()) {
                    Ok(name) => name,
                    Err(e) => {
                        tracing::warn!(
                            error = %e,
                            name = %display_name,
                            "Server confirmed an invalid display name"
                        );
                        return;
                    }
                };
                tracing::info!(participant_id = %participant_id, name = %name, "Joined lobby");
                self.ctx.confirm_identity(name.clone());
                self.ctx.render(ViewUpdate::ShowLobby {
                    display_name: name.to_string(),
                });
                self.ctx
                    .render(ViewUpdate::RoomList(RoomListView::from_rooms(&rooms)));
                self.state = LobbyState::LoggedIn {
                    participant_id,
                    display_name: name,
                    rooms,
                };
            }

            PlayerEvent::RoomListUpdated { rooms: fresh } => match &mut self.state {
                LobbyState::LoggedIn { rooms, .. } => {
                    tracing::debug!(count = fresh.len(), "Room list updated");
                    *rooms = fresh;
                    self.ctx
                        .render(ViewUpdate::RoomList(RoomListView::from_rooms(rooms)));
                }
                LobbyState::LoggedOut => {
                    tracing::debug!("Ignoring room list while logged out");
                }
            },

            PlayerEvent::RoomCreated { room_id } | PlayerEvent::RoomJoined { room_id } => {
                tracing::info!(room_id = %room_id, "Entering room");
                self.ctx.render(ViewUpdate::Navigate(Route::Game(room_id)));
            }

            PlayerEvent::AutomatedRoomCreated {
                room_id,
                display_name,
                opponent_name,
            } => {
                tracing::info!(room_id = %room_id, "Entering automated room");
                AutomatedRoomMarker::new(room_id.as_str(), display_name, opponent_name)
                    .save(self.ctx.storage.as_ref());
                self.ctx.render(ViewUpdate::Navigate(Route::Game(room_id)));
            }

            PlayerEvent::JoinFailed { reason } => {
                self.ctx.report(&ClientError::JoinRejected(reason));
            }

            other => {
                tracing::debug!(event = other.kind(), "Lobby ignoring event");
            }
        }
    }

    fn on_action(&mut self, action: LobbyAction) {
        if let Err(e) = self.try_action(action) {
            self.ctx.report(&e);
        }
    }

    fn try_action(&mut self, action: LobbyAction) -> Result<(), ClientError> {
        match action {
            LobbyAction::SubmitLogin(raw) => {
                let name = DisplayName::new(raw)?;
                self.ctx.require_connection()?;
                self.send(|c| c.join_lobby(name.as_str()))
            }
            LobbyAction::CreateRoom => {
                self.ctx.require_connection()?;
                self.send(|c| c.create_room())
            }
            LobbyAction::CreateAutomatedRoom => {
                self.ctx.require_connection()?;
                self.send(|c| c.create_automated_room())
            }
            LobbyAction::JoinRoom(room_id) => {
                self.ctx.require_connection()?;
                self.send(|c| c.request_join_room(&room_id))
            }
            LobbyAction::RefreshRooms => {
                self.ctx.require_connection()?;
                self.send(|c| c.request_room_list())
            }
            LobbyAction::Logout => {
                tracing::info!("Logging out");
                self.ctx.clear_identity();
                self.state = LobbyState::LoggedOut;
                self.ctx.render(ViewUpdate::ShowLogin);
                Ok(())
            }
        }
    }

    fn send(
        &self,
        op: impl FnOnce(&dyn GameConnectionPort) -> anyhow::Result<()>,
    ) -> Result<(), ClientError> {
        op(self.ctx.connection.as_ref()).map_err(|e| {
            tracing::warn!(error = %e, "Send failed");
            ClientError::TransportDisconnected
        })
    }
}

#[async_trait(?Send)]
impl PageMachine for LobbyMachine {
    type Action = LobbyAction;

    fn start(&mut self) {
        self.ctx.render(ViewUpdate::ShowLogin);
    }

    async fn handle(&mut self, event: AppEvent<LobbyAction>) {
        match event {
            AppEvent::Connection(state) => self.on_connection(state),
            AppEvent::Server(event) => self.on_server(event),
            AppEvent::User(action) => self.on_action(action),
            AppEvent::TimerFired(handle) => {
                tracing::debug!(?handle, "Lobby has no timers, ignoring");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::TestHarness;
    use rps_player_adapters::infrastructure::testing::Sent;
    use rps_player_ports::outbound::storage_keys;

    fn lobby() -> (LobbyMachine, TestHarness) {
        let harness = TestHarness::new();
        let machine = LobbyMachine::new(harness.context());
        (machine, harness)
    }

    async fn connected_lobby() -> (LobbyMachine, TestHarness) {
        let (mut machine, harness) = lobby();
        machine.start();
        machine
            .handle(AppEvent::Connection(ConnectionState::Connected))
            .await;
        (machine, harness)
    }

    fn joined(name: &str, rooms: Vec<RoomSummary>) -> AppEvent<LobbyAction> {
        AppEvent::Server(PlayerEvent::LobbyJoined {
            participant_id: "sid-1".into(),
            display_name: name.into(),
            rooms,
        })
    }

    #[tokio::test]
    async fn test_short_name_rejected_before_transport() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::User(LobbyAction::SubmitLogin("A".into())))
            .await;

        assert!(harness.connection.sent().is_empty());
        assert_eq!(
            harness.view.last_notice().map(|n| n.message),
            Some("Name must have at least 2 characters".to_string())
        );
        assert_eq!(machine.state(), &LobbyState::LoggedOut);
    }

    #[tokio::test]
    async fn test_long_name_rejected() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::User(LobbyAction::SubmitLogin("x".repeat(21))))
            .await;

        assert!(harness.connection.sent().is_empty());
        assert!(harness.view.last_notice().is_some());
    }

    #[tokio::test]
    async fn test_valid_names_are_forwarded_trimmed() {
        let (mut machine, harness) = connected_lobby().await;

        for raw in ["Al", "  bob  ", &"z".repeat(20)] {
            machine
                .handle(AppEvent::User(LobbyAction::SubmitLogin(raw.to_string())))
                .await;
        }

        assert_eq!(
            harness.connection.sent(),
            vec![
                Sent::JoinLobby("Al".into()),
                Sent::JoinLobby("bob".into()),
                Sent::JoinLobby("z".repeat(20)),
            ]
        );
    }

    #[tokio::test]
    async fn test_actions_need_a_connection() {
        let (mut machine, harness) = lobby();
        machine.start();

        machine.handle(AppEvent::User(LobbyAction::CreateRoom)).await;

        assert!(harness.connection.sent().is_empty());
        assert_eq!(
            harness.view.last_notice().map(|n| n.message),
            Some("Not connected to the server".to_string())
        );
    }

    #[tokio::test]
    async fn test_stored_name_rejoins_on_connect() {
        let (mut machine, harness) = lobby();
        harness.storage.seed(storage_keys::USERNAME, "carol");
        machine.start();

        machine
            .handle(AppEvent::Connection(ConnectionState::Connected))
            .await;

        assert_eq!(
            harness.connection.sent(),
            vec![Sent::JoinLobby("carol".into())]
        );
    }

    #[tokio::test]
    async fn test_lobby_joined_stores_name_and_renders_rooms() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(joined("dave", vec![RoomSummary::new("room_1", 1, 2)]))
            .await;

        assert_eq!(
            harness.storage.value(storage_keys::USERNAME).as_deref(),
            Some("dave")
        );
        assert!(matches!(machine.state(), LobbyState::LoggedIn { .. }));
        assert!(harness.view.contains(&ViewUpdate::ShowLobby {
            display_name: "dave".into()
        }));
        let list = harness.view.last_room_list().expect("room list rendered");
        assert_eq!(list.count_label, "1 room");
    }

    #[tokio::test]
    async fn test_room_list_replaced_wholesale() {
        let (mut machine, harness) = connected_lobby().await;
        machine
            .handle(joined(
                "erin",
                vec![
                    RoomSummary::new("room_1", 1, 2),
                    RoomSummary::new("room_2", 1, 2),
                ],
            ))
            .await;

        machine
            .handle(AppEvent::Server(PlayerEvent::RoomListUpdated { rooms: vec![] }))
            .await;

        match machine.state() {
            LobbyState::LoggedIn { rooms, .. } => assert!(rooms.is_empty()),
            other => panic!("Expected LoggedIn, got {:?}", other),
        }
        let list = harness.view.last_room_list().expect("room list rendered");
        assert_eq!(list.count_label, "0 rooms");
        assert!(list.placeholder.is_some());
    }

    #[tokio::test]
    async fn test_room_list_ignored_while_logged_out() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::Server(PlayerEvent::RoomListUpdated {
                rooms: vec![RoomSummary::new("room_1", 1, 2)],
            }))
            .await;

        assert_eq!(machine.state(), &LobbyState::LoggedOut);
        assert!(harness.view.last_room_list().is_none());
    }

    #[tokio::test]
    async fn test_room_created_navigates() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::Server(PlayerEvent::RoomCreated {
                room_id: "room_9".into(),
            }))
            .await;

        assert!(harness
            .view
            .contains(&ViewUpdate::Navigate(Route::Game("room_9".into()))));
    }

    #[tokio::test]
    async fn test_automated_room_created_stores_marker() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::Server(PlayerEvent::AutomatedRoomCreated {
                room_id: "ai_room_1".into(),
                display_name: "fay".into(),
                opponent_name: "🤖 AI".into(),
            }))
            .await;

        let marker = AutomatedRoomMarker::load(harness.storage.as_ref()).expect("marker saved");
        assert_eq!(marker.room_id, "ai_room_1");
        assert_eq!(marker.opponent_name, "🤖 AI");
        assert!(harness
            .view
            .contains(&ViewUpdate::Navigate(Route::Game("ai_room_1".into()))));
    }

    #[tokio::test]
    async fn test_join_failed_surfaces_reason() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::Server(PlayerEvent::JoinFailed {
                reason: "Room is full".into(),
            }))
            .await;

        assert_eq!(
            harness.view.last_notice().map(|n| n.message),
            Some("Could not join the room: Room is full".to_string())
        );
    }

    #[tokio::test]
    async fn test_logout_clears_identity() {
        let (mut machine, harness) = connected_lobby().await;
        machine.handle(joined("gus", vec![])).await;

        machine.handle(AppEvent::User(LobbyAction::Logout)).await;

        assert_eq!(machine.state(), &LobbyState::LoggedOut);
        assert!(harness.storage.value(storage_keys::USERNAME).is_none());
        assert_eq!(harness.view.last(), Some(ViewUpdate::ShowLogin));
    }

    #[tokio::test]
    async fn test_forwarded_actions() {
        let (mut machine, harness) = connected_lobby().await;

        for action in [
            LobbyAction::CreateRoom,
            LobbyAction::CreateAutomatedRoom,
            LobbyAction::JoinRoom("room_2".into()),
            LobbyAction::RefreshRooms,
        ] {
            machine.handle(AppEvent::User(action)).await;
        }

        assert_eq!(
            harness.connection.sent(),
            vec![
                Sent::CreateRoom,
                Sent::CreateAutomatedRoom,
                Sent::JoinRoom("room_2".into()),
                Sent::RoomList,
            ]
        );
    }

    #[tokio::test]
    async fn test_disconnect_shows_notice() {
        let (mut machine, harness) = connected_lobby().await;

        machine
            .handle(AppEvent::Connection(ConnectionState::Reconnecting))
            .await;

        assert_eq!(
            harness.view.last_notice().map(|n| n.message),
            Some("Connection lost, reconnecting...".to_string())
        );
    }
}
