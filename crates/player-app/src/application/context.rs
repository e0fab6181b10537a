//! Per-page context shared by the lobby and session machines
//!
//! Built once by the composition root and moved into whichever machine owns
//! the page. Holds the outbound ports plus the little connection state the
//! machines need to agree on.

use std::rc::Rc;

use rps_domain::DisplayName;
use rps_player_ports::outbound::{
    CameraPort, ConnectionState, GameConnectionPort, RandomProvider, SchedulerPort,
    StorageProvider, ViewPort, ViewUpdate,
};
use rps_player_ports::ClientConfig;

use crate::application::error::ClientError;
use crate::application::services::UserService;

/// What a connection state change meant for the page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkChange {
    /// Connected, for the first time on this page
    Established,
    /// Connected again after a drop
    Restored,
    /// Was connected, is not any more
    Lost,
    /// Nothing the machines care about
    Unchanged,
}

/// Outbound ports bundled for injection
pub struct PortSet {
    pub connection: Rc<dyn GameConnectionPort>,
    pub camera: Rc<dyn CameraPort>,
    pub storage: Rc<dyn StorageProvider>,
    pub scheduler: Rc<dyn SchedulerPort>,
    pub random: Rc<dyn RandomProvider>,
    pub view: Rc<dyn ViewPort>,
}

pub struct SessionContext {
    pub connection: Rc<dyn GameConnectionPort>,
    pub camera: Rc<dyn CameraPort>,
    pub storage: Rc<dyn StorageProvider>,
    pub scheduler: Rc<dyn SchedulerPort>,
    pub random: Rc<dyn RandomProvider>,
    pub view: Rc<dyn ViewPort>,
    pub users: UserService,
    pub config: ClientConfig,
    connected: bool,
    ever_connected: bool,
    identity: Option<DisplayName>,
}

impl SessionContext {
    pub fn new(ports: PortSet, config: ClientConfig) -> Self {
        let users = UserService::new(Rc::clone(&ports.storage));
        Self {
            connection: ports.connection,
            camera: ports.camera,
            storage: ports.storage,
            scheduler: ports.scheduler,
            random: ports.random,
            view: ports.view,
            users,
            config,
            connected: false,
            ever_connected: false,
            identity: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    /// Record a connection state change.
    pub fn observe_connection(&mut self, state: ConnectionState) -> LinkChange {
        let now = state.is_connected();
        let was = self.connected;
        self.connected = now;

        match (was, now) {
            (false, true) if !self.ever_connected => {
                self.ever_connected = true;
                LinkChange::Established
            }
            (false, true) => LinkChange::Restored,
            (true, false) => {
                // The server forgets who we are when the socket drops.
                self.identity = None;
                LinkChange::Lost
            }
            _ => LinkChange::Unchanged,
        }
    }

    /// Fail with `TransportDisconnected` unless the link is up
    pub fn require_connection(&self) -> Result<(), ClientError> {
        if self.connected {
            Ok(())
        } else {
            Err(ClientError::TransportDisconnected)
        }
    }

    /// Identity confirmed by the server on this connection
    pub fn identity(&self) -> Option<&DisplayName> {
        self.identity.as_ref()
    }

    pub fn confirm_identity(&mut self, name: DisplayName) {
        self.users.remember(name.as_str());
        self.identity = Some(name);
    }

    pub fn clear_identity(&mut self) {
        self.users.forget();
        self.identity = None;
    }

    pub fn render(&self, update: ViewUpdate) {
        self.view.render(update);
    }

    /// Render an error as a notice
    pub fn report(&self, error: &ClientError) {
        tracing::warn!(error = %error, "Client error");
        self.view.render(ViewUpdate::Notice(error.notice()));
    }

    /// Release the camera and the server link
    pub fn teardown(&self) {
        self.camera.close();
        self.connection.disconnect();
    }
}
