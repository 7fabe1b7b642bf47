/// Development server with hot reload
///
/// This module provides:
/// - `GET /` rendering the entry point on every request
/// - `GET /ws` WebSocket that receives `reload` when watched files change
/// - Error pages that keep the reload script alive
pub mod dev;
pub mod handlers;
pub mod reload;

pub use dev::{DevServer, WatchSpec};
pub use handlers::DevState;
pub use reload::{inject_reload_script, LiveReload, ReloadEvent, AUTORELOAD_SCRIPT, RELOAD_MESSAGE};
