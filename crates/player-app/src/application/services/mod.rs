//! Application services

pub mod event_loop;
pub mod user_service;

pub use event_loop::{channel, run_page, AppEvent, EventSender, PageMachine};
pub use user_service::UserService;
