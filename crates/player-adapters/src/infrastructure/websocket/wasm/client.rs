//! Browser WebSocket client for the game server, on web-sys

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use anyhow::Result;
use gloo_timers::callback::Timeout;
use wasm_bindgen::prelude::*;
use web_sys::{MessageEvent, WebSocket};

use rps_player_ports::inbound::PlayerEvent;
use rps_player_ports::outbound::ConnectionState;
use rps_protocol::ClientMessage;

use crate::infrastructure::message_translator::decode_frame;
use crate::infrastructure::websocket::ReconnectPolicy;

/// Handlers attached to the live socket; replaced on every (re)open
struct WasmClosures {
    #[allow(dead_code)]
    onmessage: Closure<dyn FnMut(MessageEvent)>,
    #[allow(dead_code)]
    onopen: Closure<dyn FnMut()>,
    #[allow(dead_code)]
    onclose: Closure<dyn FnMut()>,
    #[allow(dead_code)]
    onerror: Closure<dyn FnMut()>,
}

/// WebSocket client for communicating with the game server (WASM)
#[derive(Clone)]
pub struct GameServerClient {
    url: String,
    policy: ReconnectPolicy,
    state: Rc<Cell<ConnectionState>>,
    ws: Rc<RefCell<Option<WebSocket>>>,
    on_event: Rc<RefCell<Option<Box<dyn FnMut(PlayerEvent)>>>>,
    on_state_change: Rc<RefCell<Option<Box<dyn FnMut(ConnectionState)>>>>,
    /// Handlers of the current socket
    closures: Rc<RefCell<Option<WasmClosures>>>,
    closing: Rc<Cell<bool>>,
    ever_connected: Rc<Cell<bool>>,
    attempts: Rc<Cell<u32>>,
    reconnect_timer: Rc<RefCell<Option<Timeout>>>,
}

impl GameServerClient {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            policy: ReconnectPolicy::default(),
            state: Rc::new(Cell::new(ConnectionState::Disconnected)),
            ws: Rc::new(RefCell::new(None)),
            on_event: Rc::new(RefCell::new(None)),
            on_state_change: Rc::new(RefCell::new(None)),
            closures: Rc::new(RefCell::new(None)),
            closing: Rc::new(Cell::new(false)),
            ever_connected: Rc::new(Cell::new(false)),
            attempts: Rc::new(Cell::new(0)),
            reconnect_timer: Rc::new(RefCell::new(None)),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn state(&self) -> ConnectionState {
        self.state.get()
    }

    pub fn set_on_event<F>(&self, callback: F)
    where
        F: FnMut(PlayerEvent) + 'static,
    {
        *self.on_event.borrow_mut() = Some(Box::new(callback));
    }

    pub fn set_on_state_change<F>(&self, callback: F)
    where
        F: FnMut(ConnectionState) + 'static,
    {
        *self.on_state_change.borrow_mut() = Some(Box::new(callback));
    }

    fn set_state(&self, new_state: ConnectionState) {
        if self.state.replace(new_state) == new_state {
            return;
        }

        tracing::debug!(state = ?new_state, "Game server connection state changed");
        if let Some(ref mut cb) = *self.on_state_change.borrow_mut() {
            cb(new_state);
        }
    }

    pub fn connect(&self) -> Result<()> {
        self.closing.set(false);
        self.attempts.set(0);
        self.set_state(ConnectionState::Connecting);
        self.open_socket()
    }

    fn open_socket(&self) -> Result<()> {
        self.detach();

        let ws = WebSocket::new(&self.url)
            .map_err(|e| anyhow::anyhow!("Failed to create WebSocket: {:?}", e))?;

        ws.set_binary_type(web_sys::BinaryType::Arraybuffer);

        let on_event = Rc::clone(&self.on_event);
        let onmessage_callback = Closure::<dyn FnMut(_)>::new(move |e: MessageEvent| {
            let Ok(txt) = e.data().dyn_into::<js_sys::JsString>() else {
                tracing::warn!("Ignoring non-text WebSocket frame");
                return;
            };
            let text: String = txt.into();
            if let Some(event) = decode_frame(&text) {
                tracing::debug!(kind = event.kind(), "Server event");
                if let Some(ref mut cb) = *on_event.borrow_mut() {
                    cb(event);
                }
            }
        });
        ws.set_onmessage(Some(onmessage_callback.as_ref().unchecked_ref()));

        let client = self.clone();
        let onopen_callback = Closure::<dyn FnMut()>::new(move || {
            client.attempts.set(0);
            client.ever_connected.set(true);
            client.set_state(ConnectionState::Connected);
            tracing::info!(url = %client.url, "Connected to game server");
        });
        ws.set_onopen(Some(onopen_callback.as_ref().unchecked_ref()));

        let client = self.clone();
        let onclose_callback = Closure::<dyn FnMut()>::new(move || {
            client.handle_close();
        });
        ws.set_onclose(Some(onclose_callback.as_ref().unchecked_ref()));

        // Errors are always followed by a close event
        let onerror_callback = Closure::<dyn FnMut()>::new(move || {
            tracing::error!("WebSocket error");
        });
        ws.set_onerror(Some(onerror_callback.as_ref().unchecked_ref()));

        *self.closures.borrow_mut() = Some(WasmClosures {
            onmessage: onmessage_callback,
            onopen: onopen_callback,
            onclose: onclose_callback,
            onerror: onerror_callback,
        });

        *self.ws.borrow_mut() = Some(ws);

        Ok(())
    }

    fn handle_close(&self) {
        *self.ws.borrow_mut() = None;

        if self.closing.get() {
            self.set_state(ConnectionState::Disconnected);
            return;
        }
        if !self.ever_connected.get() {
            tracing::error!(url = %self.url, "Could not reach game server");
            self.set_state(ConnectionState::Failed);
            return;
        }

        let attempt = self.attempts.get() + 1;
        if !self.policy.allows(attempt) {
            tracing::error!(attempts = self.policy.max_attempts, "Gave up reconnecting");
            self.set_state(ConnectionState::Failed);
            return;
        }
        self.attempts.set(attempt);
        self.set_state(ConnectionState::Reconnecting);
        tracing::info!(attempt, delay_ms = self.policy.delay_ms, "Reconnecting to game server");

        let client = self.clone();
        let timer = Timeout::new(self.policy.delay_ms, move || {
            if client.closing.get() {
                return;
            }
            if let Err(e) = client.open_socket() {
                tracing::error!(error = %e, "Reconnect failed");
                client.set_state(ConnectionState::Failed);
            }
        });
        *self.reconnect_timer.borrow_mut() = Some(timer);
    }

    /// Unhook and drop the current socket's handlers.
    fn detach(&self) {
        if let Some(ref ws) = *self.ws.borrow() {
            ws.set_onmessage(None);
            ws.set_onopen(None);
            ws.set_onclose(None);
            ws.set_onerror(None);
        }
        *self.closures.borrow_mut() = None;
    }

    pub fn send(&self, message: ClientMessage) -> Result<()> {
        if let Some(ref ws) = *self.ws.borrow() {
            if ws.ready_state() != WebSocket::OPEN {
                return Err(anyhow::anyhow!("Socket is not open"));
            }
            let json = serde_json::to_string(&message)?;
            ws.send_with_str(&json)
                .map_err(|e| anyhow::anyhow!("WebSocket send failed: {:?}", e))?;
            Ok(())
        } else {
            Err(anyhow::anyhow!("Not connected"))
        }
    }

    pub fn disconnect(&self) {
        self.closing.set(true);
        // Dropping a pending Timeout clears it
        self.reconnect_timer.borrow_mut().take();

        self.detach();
        if let Some(ws) = self.ws.borrow_mut().take() {
            let _ = ws.close();
        }
        self.set_state(ConnectionState::Disconnected);
    }
}
