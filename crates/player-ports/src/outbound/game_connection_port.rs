//! Game Connection Port - Outbound port for game server WebSocket operations
//!
//! This port abstracts WebSocket communication with the game server, allowing
//! the lobby and session machines to send actions and receive events without
//! depending on concrete WebSocket client implementations.

use rps_domain::Capture;

use crate::inbound::PlayerEvent;

/// Connection state for the game server link
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionState {
    /// Not connected to the server
    Disconnected,
    /// Attempting to establish connection
    Connecting,
    /// Successfully connected
    Connected,
    /// Connection lost, attempting to reconnect
    Reconnecting,
    /// Connection failed
    Failed,
}

impl ConnectionState {
    pub fn is_connected(self) -> bool {
        matches!(self, ConnectionState::Connected)
    }
}

/// Game Connection Port trait for game server WebSocket operations
///
/// Action methods are fire-and-forget: an `Err` means the message could not
/// be handed to the socket, never that the server rejected it. Rejections
/// arrive later as `PlayerEvent`s.
///
/// # Platform Differences
///
/// - **Desktop (tokio)**: callbacks run on the socket task, so they must be `Send`
/// - **WASM**: callbacks run on the page's single thread
#[cfg(not(target_arch = "wasm32"))]
pub trait GameConnectionPort: Send + Sync {
    /// Get the current connection state
    fn state(&self) -> ConnectionState;

    /// Get the server URL
    fn url(&self) -> &str;

    /// Connect to the server
    fn connect(&self) -> anyhow::Result<()>;

    /// Disconnect from the server
    fn disconnect(&self);

    /// Register (or re-register) in the lobby under a display name
    fn join_lobby(&self, display_name: &str) -> anyhow::Result<()>;

    /// Create a two-player room
    fn create_room(&self) -> anyhow::Result<()>;

    /// Create a room against the automated opponent
    fn create_automated_room(&self) -> anyhow::Result<()>;

    /// Ask to join an existing room
    fn request_join_room(&self, room_id: &str) -> anyhow::Result<()>;

    /// Ask for a fresh room list
    fn request_room_list(&self) -> anyhow::Result<()>;

    /// Signal readiness for the countdown
    fn player_ready(&self) -> anyhow::Result<()>;

    /// Submit the snapshot taken at capture time
    fn submit_capture(&self, capture: Capture) -> anyhow::Result<()>;

    /// Request another round
    fn play_again(&self) -> anyhow::Result<()>;

    /// Register a callback for state changes
    fn on_state_change(&self, callback: Box<dyn FnMut(ConnectionState) + Send + 'static>);

    /// Register a callback for translated server events
    fn on_event(&self, callback: Box<dyn FnMut(PlayerEvent) + Send + 'static>);
}

#[cfg(target_arch = "wasm32")]
pub trait GameConnectionPort {
    /// Get the current connection state
    fn state(&self) -> ConnectionState;

    /// Get the URL this client is configured for
    fn url(&self) -> &str;

    /// Connect to the game server
    ///
    /// # Errors
    /// Returns an error if the socket cannot be created.
    fn connect(&self) -> anyhow::Result<()>;

    /// Disconnect from the game server
    fn disconnect(&self);

    /// Register (or re-register) in the lobby under a display name
    fn join_lobby(&self, display_name: &str) -> anyhow::Result<()>;

    /// Create a two-player room
    fn create_room(&self) -> anyhow::Result<()>;

    /// Create a room against the automated opponent
    fn create_automated_room(&self) -> anyhow::Result<()>;

    /// Ask to join an existing room
    fn request_join_room(&self, room_id: &str) -> anyhow::Result<()>;

    /// Ask for a fresh room list
    fn request_room_list(&self) -> anyhow::Result<()>;

    /// Signal readiness for the countdown
    fn player_ready(&self) -> anyhow::Result<()>;

    /// Submit the snapshot taken at capture time
    fn submit_capture(&self, capture: Capture) -> anyhow::Result<()>;

    /// Request another round
    fn play_again(&self) -> anyhow::Result<()>;

    /// Register a callback for state changes
    ///
    /// The callback will be invoked whenever the connection state changes.
    fn on_state_change(&self, callback: Box<dyn FnMut(ConnectionState) + 'static>);

    /// Register a callback for translated server events
    fn on_event(&self, callback: Box<dyn FnMut(PlayerEvent) + 'static>);
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;
    use std::sync::Mutex;

    type StateCallback = Box<dyn FnMut(ConnectionState) + Send + 'static>;
    type EventCallback = Box<dyn FnMut(PlayerEvent) + Send + 'static>;

    #[derive(Default)]
    struct LoopbackConnection {
        on_state: Mutex<Option<StateCallback>>,
        on_event: Mutex<Option<EventCallback>>,
    }

    impl GameConnectionPort for LoopbackConnection {
        fn state(&self) -> ConnectionState {
            ConnectionState::Connected
        }

        fn url(&self) -> &str {
            "ws://loopback/ws"
        }

        fn connect(&self) -> anyhow::Result<()> {
            if let Ok(mut cb) = self.on_state.lock() {
                if let Some(cb) = cb.as_mut() {
                    cb(ConnectionState::Connected);
                }
            }
            Ok(())
        }

        fn disconnect(&self) {}

        fn join_lobby(&self, _display_name: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn create_room(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn create_automated_room(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn request_join_room(&self, _room_id: &str) -> anyhow::Result<()> {
            Ok(())
        }

        fn request_room_list(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn player_ready(&self) -> anyhow::Result<()> {
            if let Ok(mut cb) = self.on_event.lock() {
                if let Some(cb) = cb.as_mut() {
                    cb(PlayerEvent::CaptureNow);
                }
            }
            Ok(())
        }

        fn submit_capture(&self, _capture: Capture) -> anyhow::Result<()> {
            Ok(())
        }

        fn play_again(&self) -> anyhow::Result<()> {
            Ok(())
        }

        fn on_state_change(&self, callback: StateCallback) {
            if let Ok(mut slot) = self.on_state.lock() {
                *slot = Some(callback);
            }
        }

        fn on_event(&self, callback: EventCallback) {
            if let Ok(mut slot) = self.on_event.lock() {
                *slot = Some(callback);
            }
        }
    }

    #[test]
    fn test_boxed_callbacks_are_invoked_through_trait_object() {
        let connection: Box<dyn GameConnectionPort> = Box::new(LoopbackConnection::default());
        let states = std::sync::Arc::new(Mutex::new(Vec::new()));
        let events = std::sync::Arc::new(Mutex::new(0usize));

        let sink = std::sync::Arc::clone(&states);
        connection.on_state_change(Box::new(move |s| {
            if let Ok(mut seen) = sink.lock() {
                seen.push(s);
            }
        }));
        let counter = std::sync::Arc::clone(&events);
        connection.on_event(Box::new(move |_| {
            if let Ok(mut n) = counter.lock() {
                *n += 1;
            }
        }));

        connection.connect().expect("connect");
        connection.player_ready().expect("ready");
        connection.player_ready().expect("ready");

        assert_eq!(*states.lock().expect("lock"), vec![ConnectionState::Connected]);
        assert_eq!(*events.lock().expect("lock"), 2);
        assert!(connection.state().is_connected());
    }
}
