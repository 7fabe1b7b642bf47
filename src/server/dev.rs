/// Dev server: page rendering on `/`, reload socket on `/ws`
use crate::app::EntryPoint;
use crate::components::RenderOptions;
use crate::config::ServerConfig;
use crate::server::handlers::{homepage, websocket, DevState};
use crate::server::reload::LiveReload;
use crate::watch::{forward_changes, FileWatcher, WatchFilter};
use anyhow::{Context, Result};
use axum::{routing::get, Router};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

/// What to watch for reload-triggering changes
#[derive(Debug, Clone)]
pub struct WatchSpec {
    /// Directory watched recursively
    pub root: PathBuf,
    /// Which paths count as changes
    pub filter: WatchFilter,
    /// Window for coalescing event bursts
    pub debounce: Duration,
}

/// Dev server
pub struct DevServer {
    config: ServerConfig,
    state: DevState,
    watch: Option<WatchSpec>,
}

impl DevServer {
    /// Create a new dev server
    pub fn new(config: ServerConfig, entry: Arc<dyn EntryPoint>, render: RenderOptions) -> Self {
        Self {
            config,
            state: DevState::new(entry, render),
            watch: None,
        }
    }

    /// Broadcast reloads whenever files matching `spec` change
    pub fn with_watch(mut self, spec: WatchSpec) -> Self {
        self.watch = Some(spec);
        self
    }

    /// Reload hub, for triggering reloads from outside the watcher
    pub fn live_reload(&self) -> &LiveReload {
        &self.state.reload
    }

    /// Build the router with all routes
    pub fn router(&self) -> Router {
        Router::new()
            .route("/", get(homepage))
            .route("/ws", get(websocket))
            .with_state(self.state.clone())
            .layer(TraceLayer::new_for_http())
    }

    fn start_watcher(&self) -> Result<()> {
        let Some(spec) = &self.watch else {
            return Ok(());
        };

        let watcher = FileWatcher::new(&spec.root)
            .with_context(|| format!("Failed to watch {}", spec.root.display()))?;
        tokio::spawn(forward_changes(
            watcher,
            spec.filter.clone(),
            spec.debounce,
            self.state.reload.clone(),
        ));
        info!("Watching {} for changes", spec.root.display());
        Ok(())
    }

    /// Run the server
    pub async fn run(self) -> Result<()> {
        self.run_with_shutdown(std::future::pending()).await
    }

    /// Bind the configured address and serve until `shutdown_signal` resolves
    pub async fn run_with_shutdown(
        self,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let bind_addr = self.config.bind_address();
        let listener = tokio::net::TcpListener::bind(&bind_addr)
            .await
            .with_context(|| format!("Failed to bind {}", bind_addr))?;

        self.serve(listener, shutdown_signal).await
    }

    /// Serve on an already bound listener with graceful shutdown.
    ///
    /// Open reload sockets are closed once `shutdown_signal` resolves so the
    /// server can drain.
    pub async fn serve(
        self,
        listener: tokio::net::TcpListener,
        shutdown_signal: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<()> {
        let app = self.router();
        self.start_watcher()?;

        let local_addr = listener
            .local_addr()
            .context("Failed to read listener address")?;
        info!("Live server on http://{}", local_addr);
        info!("Serving {}", self.state.entry.describe());

        let reload = self.state.reload.clone();
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown_signal.await;
                reload.shutdown();
            })
            .await
            .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

        Ok(())
    }
}
