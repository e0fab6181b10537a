//! Recording implementation of GameConnectionPort for testing

use std::sync::{Arc, Mutex, MutexGuard};

use rps_domain::Capture;
use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::{ConnectionState, GameConnectionPort};

/// One outbound message, as the machine asked for it
#[derive(Debug, Clone, PartialEq)]
pub enum Sent {
    JoinLobby(String),
    CreateRoom,
    CreateAutomatedRoom,
    JoinRoom(String),
    RoomList,
    PlayerReady,
    Capture(Capture),
    PlayAgain,
}

type StateCallback = Box<dyn FnMut(ConnectionState) + Send + 'static>;
type EventCallback = Box<dyn FnMut(PlayerEvent) + Send + 'static>;

struct State {
    conn_state: ConnectionState,
    sent: Vec<Sent>,
    connects: usize,
    disconnects: usize,
    fail_sends: bool,
    on_state_change: Option<StateCallback>,
    on_event: Option<EventCallback>,
}

impl Default for State {
    fn default() -> Self {
        Self {
            conn_state: ConnectionState::Disconnected,
            sent: Vec::new(),
            connects: 0,
            disconnects: 0,
            fail_sends: false,
            on_state_change: None,
            on_event: None,
        }
    }
}

/// Connection that records outbound messages instead of sending them
#[derive(Clone)]
pub struct RecordingConnection {
    url: String,
    state: Arc<Mutex<State>>,
}

impl RecordingConnection {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Everything sent so far, oldest first
    pub fn sent(&self) -> Vec<Sent> {
        self.lock().sent.clone()
    }

    pub fn clear_sent(&self) {
        self.lock().sent.clear();
    }

    pub fn connects(&self) -> usize {
        self.lock().connects
    }

    pub fn disconnects(&self) -> usize {
        self.lock().disconnects
    }

    /// Make every action fail as if the socket were closed
    pub fn fail_sends(&self, fail: bool) {
        self.lock().fail_sends = fail;
    }

    /// Change state and notify the registered callback
    pub fn set_state(&self, new_state: ConnectionState) {
        let callback = {
            let mut state = self.lock();
            state.conn_state = new_state;
            state.on_state_change.take()
        };
        if let Some(mut cb) = callback {
            cb(new_state);
            let mut state = self.lock();
            if state.on_state_change.is_none() {
                state.on_state_change = Some(cb);
            }
        }
    }

    /// Deliver a server event to the registered callback
    pub fn emit(&self, event: PlayerEvent) {
        let callback = self.lock().on_event.take();
        if let Some(mut cb) = callback {
            cb(event);
            let mut state = self.lock();
            if state.on_event.is_none() {
                state.on_event = Some(cb);
            }
        }
    }

    fn record(&self, sent: Sent) -> anyhow::Result<()> {
        let mut state = self.lock();
        if state.fail_sends {
            return Err(anyhow::anyhow!("Not connected"));
        }
        state.sent.push(sent);
        Ok(())
    }
}

impl GameConnectionPort for RecordingConnection {
    fn state(&self) -> ConnectionState {
        self.lock().conn_state
    }

    fn url(&self) -> &str {
        &self.url
    }

    fn connect(&self) -> anyhow::Result<()> {
        self.lock().connects += 1;
        Ok(())
    }

    fn disconnect(&self) {
        let mut state = self.lock();
        state.disconnects += 1;
        state.conn_state = ConnectionState::Disconnected;
    }

    fn join_lobby(&self, display_name: &str) -> anyhow::Result<()> {
        self.record(Sent::JoinLobby(display_name.to_string()))
    }

    fn create_room(&self) -> anyhow::Result<()> {
        self.record(Sent::CreateRoom)
    }

    fn create_automated_room(&self) -> anyhow::Result<()> {
        self.record(Sent::CreateAutomatedRoom)
    }

    fn request_join_room(&self, room_id: &str) -> anyhow::Result<()> {
        self.record(Sent::JoinRoom(room_id.to_string()))
    }

    fn request_room_list(&self) -> anyhow::Result<()> {
        self.record(Sent::RoomList)
    }

    fn player_ready(&self) -> anyhow::Result<()> {
        self.record(Sent::PlayerReady)
    }

    fn submit_capture(&self, capture: Capture) -> anyhow::Result<()> {
        self.record(Sent::Capture(capture))
    }

    fn play_again(&self) -> anyhow::Result<()> {
        self.record(Sent::PlayAgain)
    }

    fn on_state_change(&self, callback: StateCallback) {
        self.lock().on_state_change = Some(callback);
    }

    fn on_event(&self, callback: EventCallback) {
        self.lock().on_event = Some(callback);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_callbacks_receive_emitted_events() {
        let connection = RecordingConnection::new("ws://test/ws");
        let seen = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&seen);
        connection.on_event(Box::new(move |e| {
            if let Ok(mut s) = sink.lock() {
                s.push(e);
            }
        }));

        connection.emit(PlayerEvent::CaptureNow);
        connection.emit(PlayerEvent::CaptureNow);

        assert_eq!(seen.lock().expect("lock").len(), 2);
    }

    #[test]
    fn test_failed_sends_are_not_recorded() {
        let connection = RecordingConnection::new("ws://test/ws");
        connection.fail_sends(true);
        assert!(connection.create_room().is_err());
        connection.fail_sends(false);
        assert!(connection.play_again().is_ok());
        assert_eq!(connection.sent(), vec![Sent::PlayAgain]);
    }
}
