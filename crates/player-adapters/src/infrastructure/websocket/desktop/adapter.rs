//! Desktop GameConnectionPort adapter

use anyhow::Result;

use rps_domain::Capture;
use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::{ConnectionState, GameConnectionPort};

use super::client::GameServerClient;
use crate::infrastructure::websocket::ClientMessageBuilder;

/// Desktop game connection adapter
///
/// `connect()` spawns the socket task on the ambient tokio runtime; sends go
/// through an unbounded channel and never block.
#[derive(Clone)]
pub struct DesktopGameConnection {
    client: GameServerClient,
}

impl DesktopGameConnection {
    pub fn new(client: GameServerClient) -> Self {
        Self { client }
    }
}

impl GameConnectionPort for DesktopGameConnection {
    fn state(&self) -> ConnectionState {
        self.client.state()
    }

    fn url(&self) -> &str {
        self.client.url()
    }

    fn connect(&self) -> Result<()> {
        match self.client.state() {
            ConnectionState::Connected
            | ConnectionState::Connecting
            | ConnectionState::Reconnecting => {
                tracing::debug!("Connect requested while already connecting");
                return Ok(());
            }
            ConnectionState::Disconnected | ConnectionState::Failed => {}
        }

        let client = self.client.clone();
        tokio::spawn(async move {
            if let Err(e) = client.run().await {
                tracing::error!(error = %e, "Game server connection ended");
            }
        });
        Ok(())
    }

    fn disconnect(&self) {
        self.client.disconnect();
    }

    fn join_lobby(&self, display_name: &str) -> Result<()> {
        self.client.send(ClientMessageBuilder::join_lobby(display_name))
    }

    fn create_room(&self) -> Result<()> {
        self.client.send(ClientMessageBuilder::create_room())
    }

    fn create_automated_room(&self) -> Result<()> {
        self.client.send(ClientMessageBuilder::create_automated_room())
    }

    fn request_join_room(&self, room_id: &str) -> Result<()> {
        self.client.send(ClientMessageBuilder::join_room(room_id))
    }

    fn request_room_list(&self) -> Result<()> {
        self.client.send(ClientMessageBuilder::room_list())
    }

    fn player_ready(&self) -> Result<()> {
        self.client.send(ClientMessageBuilder::player_ready())
    }

    fn submit_capture(&self, capture: Capture) -> Result<()> {
        self.client.send(ClientMessageBuilder::submit_capture(capture))
    }

    fn play_again(&self) -> Result<()> {
        self.client.send(ClientMessageBuilder::play_again())
    }

    fn on_state_change(&self, callback: Box<dyn FnMut(ConnectionState) + Send + 'static>) {
        self.client.set_on_state_change(callback);
    }

    fn on_event(&self, callback: Box<dyn FnMut(PlayerEvent) + Send + 'static>) {
        self.client.set_on_event(callback);
    }
}
