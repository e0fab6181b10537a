//! RPS Online Player Adapters - concrete implementations of the player ports.
//!
//! Desktop builds get the tokio-tungstenite transport, a JSON file store and
//! tokio timers. Browser builds get the web-sys transport, `localStorage`,
//! gloo timers, the getUserMedia camera and the DOM view.

pub mod infrastructure;
