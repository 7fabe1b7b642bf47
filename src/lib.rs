pub mod app;
pub mod build;
pub mod cli;
pub mod components;
pub mod config;
pub mod error;

#[cfg(feature = "dev-server")]
pub mod server;

#[cfg(feature = "dev-server")]
pub mod watch;

pub use app::{AppFile, EntryPoint};
pub use components::{div, heading, text, Node, RenderOptions};
pub use error::{AppError, NodeError};
