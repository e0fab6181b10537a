//! Desktop WebSocket client using tokio-tungstenite

use std::sync::atomic::{AtomicBool, AtomicU8, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::ConnectionState;
use rps_protocol::ClientMessage;

use crate::infrastructure::message_translator::decode_frame;
use crate::infrastructure::websocket::{state_to_u8, u8_to_state, ReconnectPolicy};

type EventCallback = Box<dyn FnMut(PlayerEvent) + Send + 'static>;
type StateCallback = Box<dyn FnMut(ConnectionState) + Send + 'static>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// WebSocket client for communicating with the game server (Desktop)
#[derive(Clone)]
pub struct GameServerClient {
    url: String,
    policy: ReconnectPolicy,
    state: Arc<AtomicU8>,
    /// Set by `disconnect()`; suppresses reconnection
    closing: Arc<AtomicBool>,
    tx: Arc<Mutex<Option<mpsc::UnboundedSender<ClientMessage>>>>,
    on_event: Arc<Mutex<Option<EventCallback>>>,
    on_state_change: Arc<Mutex<Option<StateCallback>>>,
}

impl GameServerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_policy(url, ReconnectPolicy::default())
    }

    pub fn with_policy(url: impl Into<String>, policy: ReconnectPolicy) -> Self {
        Self {
            url: url.into(),
            policy,
            state: Arc::new(AtomicU8::new(state_to_u8(ConnectionState::Disconnected))),
            closing: Arc::new(AtomicBool::new(false)),
            tx: Arc::new(Mutex::new(None)),
            on_event: Arc::new(Mutex::new(None)),
            on_state_change: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the URL this client is configured for
    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        u8_to_state(self.state.load(Ordering::SeqCst))
    }

    pub fn set_on_event(&self, callback: EventCallback) {
        *lock(&self.on_event) = Some(callback);
    }

    pub fn set_on_state_change(&self, callback: StateCallback) {
        *lock(&self.on_state_change) = Some(callback);
    }

    fn set_state(&self, new_state: ConnectionState) {
        let previous = self.state.swap(state_to_u8(new_state), Ordering::SeqCst);
        if u8_to_state(previous) == new_state {
            return;
        }

        tracing::debug!(state = ?new_state, "Game server connection state changed");
        if let Some(cb) = lock(&self.on_state_change).as_mut() {
            cb(new_state);
        }
    }

    fn dispatch(&self, text: &str) {
        let Some(event) = decode_frame(text) else {
            return;
        };
        tracing::debug!(kind = event.kind(), "Server event");
        if let Some(cb) = lock(&self.on_event).as_mut() {
            cb(event);
        }
    }

    /// Connect and keep the connection alive until `disconnect()`.
    ///
    /// Resolves when the client is disconnected on purpose, or with an error
    /// when the first connect fails or reconnection gives up.
    pub async fn run(&self) -> Result<()> {
        self.closing.store(false, Ordering::SeqCst);
        self.set_state(ConnectionState::Connecting);

        let mut ever_connected = false;
        let mut attempt = 0u32;

        loop {
            match connect_async(self.url.as_str()).await {
                Ok((ws_stream, _)) => {
                    tracing::info!(url = %self.url, "Connected to game server");
                    ever_connected = true;
                    attempt = 0;
                    self.set_state(ConnectionState::Connected);
                    self.pump(ws_stream).await;
                }
                Err(e) => {
                    tracing::error!(url = %self.url, error = %e, "Failed to connect to game server");
                    if !ever_connected {
                        self.set_state(ConnectionState::Failed);
                        return Err(e.into());
                    }
                }
            }

            if self.closing.load(Ordering::SeqCst) {
                self.set_state(ConnectionState::Disconnected);
                return Ok(());
            }

            attempt += 1;
            if !self.policy.allows(attempt) {
                self.set_state(ConnectionState::Failed);
                return Err(anyhow::anyhow!(
                    "Gave up reconnecting after {} attempts",
                    self.policy.max_attempts
                ));
            }

            self.set_state(ConnectionState::Reconnecting);
            tracing::info!(attempt, delay_ms = self.policy.delay_ms, "Reconnecting to game server");
            tokio::time::sleep(Duration::from_millis(u64::from(self.policy.delay_ms))).await;

            if self.closing.load(Ordering::SeqCst) {
                self.set_state(ConnectionState::Disconnected);
                return Ok(());
            }
        }
    }

    /// Move frames in both directions until the socket closes.
    async fn pump(&self, ws_stream: WebSocketStream<MaybeTlsStream<TcpStream>>) {
        let (mut write, mut read) = ws_stream.split();
        let (tx, mut rx) = mpsc::unbounded_channel::<ClientMessage>();
        *lock(&self.tx) = Some(tx);

        loop {
            tokio::select! {
                frame = read.next() => match frame {
                    Some(Ok(Message::Text(text))) => self.dispatch(&text),
                    Some(Ok(Message::Close(_))) | None => {
                        tracing::info!("Server closed connection");
                        break;
                    }
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::error!(error = %e, "WebSocket error");
                        break;
                    }
                },
                outbound = rx.recv() => match outbound {
                    Some(msg) => {
                        let json = match serde_json::to_string(&msg) {
                            Ok(j) => j,
                            Err(e) => {
                                tracing::error!(error = %e, "Failed to serialize WebSocket message");
                                continue;
                            }
                        };
                        if let Err(e) = write.send(Message::Text(json)).await {
                            tracing::error!(error = %e, "Failed to send message");
                            break;
                        }
                    }
                    // Sender dropped by disconnect()
                    None => {
                        let _ = write.close().await;
                        break;
                    }
                },
            }
        }

        *lock(&self.tx) = None;
    }

    pub fn send(&self, message: ClientMessage) -> Result<()> {
        match lock(&self.tx).as_ref() {
            Some(tx) => tx
                .send(message)
                .map_err(|_| anyhow::anyhow!("Connection closed")),
            None => Err(anyhow::anyhow!("Not connected")),
        }
    }

    pub fn disconnect(&self) {
        self.closing.store(true, Ordering::SeqCst);
        // Dropping the sender ends the pump
        let had_socket = lock(&self.tx).take().is_some();
        if !had_socket {
            self.set_state(ConnectionState::Disconnected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_without_socket_fails() {
        let client = GameServerClient::new("ws://127.0.0.1:9/ws");
        assert!(client.send(ClientMessage::GetRoomList).is_err());
        assert_eq!(client.state(), ConnectionState::Disconnected);
    }

    #[test]
    fn test_state_callback_fires_once_per_change() {
        let client = GameServerClient::new("ws://127.0.0.1:9/ws");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        client.set_on_state_change(Box::new(move |s| lock(&sink).push(s)));

        client.set_state(ConnectionState::Connecting);
        client.set_state(ConnectionState::Connecting);
        client.set_state(ConnectionState::Failed);

        assert_eq!(
            *lock(&seen),
            vec![ConnectionState::Connecting, ConnectionState::Failed]
        );
    }

    #[test]
    fn test_frames_reach_event_callback() {
        let client = GameServerClient::new("ws://127.0.0.1:9/ws");
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        client.set_on_event(Box::new(move |e| lock(&sink).push(e)));

        client.dispatch(r#"{"type":"capture_gesture"}"#);
        client.dispatch("garbage");

        assert_eq!(*lock(&seen), vec![PlayerEvent::CaptureNow]);
    }

    #[tokio::test]
    async fn test_first_connect_failure_reports_failed() {
        // Port 9 (discard) is closed on test hosts
        let client = GameServerClient::new("ws://127.0.0.1:9/ws");
        assert!(client.run().await.is_err());
        assert_eq!(client.state(), ConnectionState::Failed);
    }
}
