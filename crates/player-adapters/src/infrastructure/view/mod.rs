//! View adapters
//!
//! The browser build applies `ViewUpdate`s to the page and binds the page's
//! controls to its machine. The desktop probe has no page, so it logs them.

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod dom_binder;
mod log_view;

#[cfg(target_arch = "wasm32")]
pub use dom::DomView;
#[cfg(target_arch = "wasm32")]
pub use dom_binder::{bind_controls, BoundControls};
pub use log_view::LogView;
