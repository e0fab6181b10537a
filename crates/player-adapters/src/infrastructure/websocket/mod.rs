//! WebSocket transport to the game server
//!
//! Platform-specific implementations for desktop (tokio) and WASM (web-sys).
//! Both share the outbound message builder, the reconnect policy and the
//! state encoding used for lock-free state reads.

pub mod message_builder;

#[cfg(not(target_arch = "wasm32"))]
pub mod desktop;

#[cfg(target_arch = "wasm32")]
pub mod wasm;

pub use message_builder::ClientMessageBuilder;

use rps_player_ports::outbound::ConnectionState;

/// Automatic reconnection after the server drops the socket.
///
/// A user-initiated `disconnect()` never reconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReconnectPolicy {
    pub max_attempts: u32,
    pub delay_ms: u32,
}

impl Default for ReconnectPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 5,
            delay_ms: 2000,
        }
    }
}

impl ReconnectPolicy {
    /// Whether attempt number `attempt` (1-based) may still run.
    pub fn allows(&self, attempt: u32) -> bool {
        attempt <= self.max_attempts
    }
}

pub(crate) fn state_to_u8(state: ConnectionState) -> u8 {
    match state {
        ConnectionState::Disconnected => 0,
        ConnectionState::Connecting => 1,
        ConnectionState::Connected => 2,
        ConnectionState::Reconnecting => 3,
        ConnectionState::Failed => 4,
    }
}

pub(crate) fn u8_to_state(value: u8) -> ConnectionState {
    match value {
        1 => ConnectionState::Connecting,
        2 => ConnectionState::Connected,
        3 => ConnectionState::Reconnecting,
        4 => ConnectionState::Failed,
        _ => ConnectionState::Disconnected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_encoding_round_trips() {
        for state in [
            ConnectionState::Disconnected,
            ConnectionState::Connecting,
            ConnectionState::Connected,
            ConnectionState::Reconnecting,
            ConnectionState::Failed,
        ] {
            assert_eq!(u8_to_state(state_to_u8(state)), state);
        }
        assert_eq!(u8_to_state(200), ConnectionState::Disconnected);
    }

    #[test]
    fn test_reconnect_policy_limits_attempts() {
        let policy = ReconnectPolicy::default();
        assert!(policy.allows(1));
        assert!(policy.allows(5));
        assert!(!policy.allows(6));
    }
}
