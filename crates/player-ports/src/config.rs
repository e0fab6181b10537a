//! Client configuration shared by the runner and the state machines.
//!
//! The runner builds a `ClientConfig` (from the environment on desktop, from
//! the page location on the web) and hands it to the application layer.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_WS_URL: &str = "ws://localhost:5000/ws";

/// Environment variable names read on desktop.
pub mod env_keys {
    pub const SERVER_WS_URL: &str = "RPS_SERVER_WS_URL";
    pub const ENTRY_DELAY_MS: &str = "RPS_ENTRY_DELAY_MS";
    pub const TICK_INTERVAL_MS: &str = "RPS_TICK_INTERVAL_MS";
}

/// Top-level client configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// WebSocket endpoint of the game server
    pub server_url: String,
    pub pacing: PacingConfig,
    pub camera: CameraConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_WS_URL.to_string(),
            pacing: PacingConfig::default(),
            camera: CameraConfig::default(),
        }
    }
}

impl ClientConfig {
    pub fn new(server_url: impl Into<String>) -> Self {
        Self {
            server_url: server_url.into(),
            ..Self::default()
        }
    }

    /// Build a configuration from process environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup.
    ///
    /// Unparseable or zero pacing overrides are ignored with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(url) = lookup(env_keys::SERVER_WS_URL).filter(|u| !u.trim().is_empty()) {
            config.server_url = url;
        }

        if let Some(ms) = parse_millis(env_keys::ENTRY_DELAY_MS, lookup(env_keys::ENTRY_DELAY_MS))
        {
            config.pacing.entry_delay_ms = ms;
        }

        if let Some(ms) =
            parse_millis(env_keys::TICK_INTERVAL_MS, lookup(env_keys::TICK_INTERVAL_MS))
        {
            config.pacing.tick_interval_ms = ms;
        }

        config
    }
}

fn parse_millis(key: &str, raw: Option<String>) -> Option<u32> {
    let val = raw?;
    match val.trim().parse::<u32>() {
        Ok(0) => {
            tracing::warn!(key, "Pacing override must be positive, ignoring");
            None
        }
        Ok(ms) => {
            tracing::info!(key, ms, "Applied pacing override");
            Some(ms)
        }
        Err(_) => {
            tracing::warn!(key, val = %val, "Pacing override is not a valid u32, ignoring");
            None
        }
    }
}

/// Delays that pace a round. All values are milliseconds unless named otherwise.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PacingConfig {
    /// Delay between connecting and entering the room
    pub entry_delay_ms: u32,
    /// Delay between the camera opening and the first local countdown tick
    pub countdown_start_delay_ms: u32,
    pub tick_interval_ms: u32,
    /// First number of a local countdown
    pub countdown_from: u32,
    /// How long "GO!" stays on screen
    pub go_hold_ms: u32,
    /// Length of the local capture window, in seconds
    pub capture_window_secs: u32,
}

impl Default for PacingConfig {
    fn default() -> Self {
        Self {
            entry_delay_ms: 500,
            countdown_start_delay_ms: 1500,
            tick_interval_ms: 1000,
            countdown_from: 3,
            go_hold_ms: 1000,
            capture_window_secs: 3,
        }
    }
}

/// Camera capture settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub width: u32,
    pub height: u32,
    /// JPEG encoder quality in `[0, 1]`
    pub jpeg_quality: f64,
    pub video_element_id: String,
    pub canvas_element_id: String,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            jpeg_quality: 0.8,
            video_element_id: "videoElement".to_string(),
            canvas_element_id: "captureCanvas".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_without_environment() {
        let config = ClientConfig::from_lookup(lookup(&[]));
        assert_eq!(config.server_url, DEFAULT_SERVER_WS_URL);
        assert_eq!(config.pacing, PacingConfig::default());
        assert_eq!(config.camera.width, 640);
    }

    #[test]
    fn test_environment_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            (env_keys::SERVER_WS_URL, "wss://rps.example/ws"),
            (env_keys::ENTRY_DELAY_MS, "20"),
            (env_keys::TICK_INTERVAL_MS, "5"),
        ]));
        assert_eq!(config.server_url, "wss://rps.example/ws");
        assert_eq!(config.pacing.entry_delay_ms, 20);
        assert_eq!(config.pacing.tick_interval_ms, 5);
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = ClientConfig::from_lookup(lookup(&[
            (env_keys::ENTRY_DELAY_MS, "soon"),
            (env_keys::TICK_INTERVAL_MS, "0"),
        ]));
        assert_eq!(config.pacing, PacingConfig::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: ClientConfig =
            serde_json::from_str(r#"{"pacing":{"go_hold_ms":10}}"#).expect("parse");
        assert_eq!(config.pacing.go_hold_ms, 10);
        assert_eq!(config.pacing.countdown_from, 3);
        assert_eq!(config.server_url, DEFAULT_SERVER_WS_URL);
    }
}
