//! Connection factory - builds the platform's `GameConnectionPort`

use std::rc::Rc;

use rps_player_ports::outbound::GameConnectionPort;

/// Factory for creating game connections
pub struct ConnectionFactory;

impl ConnectionFactory {
    /// Create a connection to the game server at `server_url`.
    ///
    /// The connection starts `Disconnected`; callers register callbacks and
    /// then call `connect()`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn create_game_connection(server_url: &str) -> Rc<dyn GameConnectionPort> {
        use crate::infrastructure::websocket::desktop::{DesktopGameConnection, GameServerClient};

        let client = GameServerClient::new(server_url);
        Rc::new(DesktopGameConnection::new(client))
    }

    /// Create a connection to the game server at `server_url`.
    #[cfg(target_arch = "wasm32")]
    pub fn create_game_connection(server_url: &str) -> Rc<dyn GameConnectionPort> {
        use crate::infrastructure::websocket::wasm::{GameServerClient, WasmGameConnection};

        let client = GameServerClient::new(server_url);
        Rc::new(WasmGameConnection::new(client))
    }

    /// Derive the game server endpoint from the page location.
    ///
    /// `http` pages use `ws`, `https` pages use `wss`; the path is always `/ws`.
    pub fn server_url_for_page(page_url: &str) -> Option<String> {
        let parsed = url::Url::parse(page_url).ok()?;
        let scheme = match parsed.scheme() {
            "https" => "wss",
            "http" => "ws",
            other => {
                tracing::warn!(scheme = other, "Page is not served over http(s)");
                return None;
            }
        };
        let host = parsed.host_str()?;
        match parsed.port() {
            Some(port) => Some(format!("{}://{}:{}/ws", scheme, host, port)),
            None => Some(format!("{}://{}/ws", scheme, host)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_url_follows_page_scheme() {
        assert_eq!(
            ConnectionFactory::server_url_for_page("http://localhost:5000/game/room_1").as_deref(),
            Some("ws://localhost:5000/ws")
        );
        assert_eq!(
            ConnectionFactory::server_url_for_page("https://rps.example/").as_deref(),
            Some("wss://rps.example/ws")
        );
        assert_eq!(ConnectionFactory::server_url_for_page("file:///index.html"), None);
    }

    #[test]
    fn test_new_connection_starts_disconnected() {
        let connection = ConnectionFactory::create_game_connection("ws://127.0.0.1:9/ws");
        assert_eq!(connection.url(), "ws://127.0.0.1:9/ws");
        assert!(!connection.state().is_connected());
    }
}
