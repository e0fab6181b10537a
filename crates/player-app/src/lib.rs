//! RPS Online player application layer
//!
//! Holds the two page controllers (lobby and session), the shared
//! `SessionContext` they run against, and the event loop that feeds them.

pub mod application;
