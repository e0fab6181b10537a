//! Page controllers
//!
//! Each page runs exactly one machine: the lobby page a `LobbyMachine`, the
//! game page a `SessionMachine`.

pub mod bindings;
pub mod lobby;
pub mod session;

pub use bindings::{ControlBinding, ValueSource, LOBBY_BINDINGS, SESSION_BINDINGS};
pub use lobby::{LobbyAction, LobbyMachine, LobbyState};
pub use session::{Players, SessionAction, SessionMachine, SessionPhase};
