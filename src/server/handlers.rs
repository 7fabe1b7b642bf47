/// Dev server request handlers
use crate::app::EntryPoint;
use crate::components::RenderOptions;
use crate::error::AppError;
use crate::server::reload::{inject_reload_script, LiveReload, ReloadEvent, RELOAD_MESSAGE};
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use futures::{SinkExt, StreamExt};
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, error, warn};

/// Shared dev server state
#[derive(Clone)]
pub struct DevState {
    pub entry: Arc<dyn EntryPoint>,
    pub reload: LiveReload,
    pub render: RenderOptions,
}

impl DevState {
    pub fn new(entry: Arc<dyn EntryPoint>, render: RenderOptions) -> Self {
        Self {
            entry,
            reload: LiveReload::new(),
            render,
        }
    }
}

/// Error page for a failed render, keeping the reload script so a fix
/// refreshes the browser
pub fn error_page(message: &str) -> String {
    inject_reload_script(&format!(
        "<div style='color:red'><pre>{}</pre></div>",
        html_escape::encode_text(message)
    ))
}

fn error_chain(err: &AppError) -> String {
    let mut message = err.to_string();
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        message.push_str("\n\nCaused by: ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

/// `GET /`: render the entry point fresh on every request
pub async fn homepage(State(state): State<DevState>) -> Response {
    let entry = state.entry.clone();
    let options = state.render;

    // Page files are read from disk synchronously
    let rendered = tokio::task::spawn_blocking(move || {
        entry.index().map(|root| root.render_with(&options))
    })
    .await;

    match rendered {
        Ok(Ok(html)) => {
            debug!("Rendered {} bytes from {}", html.len(), state.entry.describe());
            Html(inject_reload_script(&html)).into_response()
        }
        Ok(Err(err)) if err.is_missing_entry_point() => {
            warn!("{}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(inject_reload_script("Error: No index() entry point")),
            )
                .into_response()
        }
        Ok(Err(err)) => {
            error!("Render failed: {}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(error_page(&error_chain(&err))),
            )
                .into_response()
        }
        Err(join_error) => {
            error!("Render task failed: {}", join_error);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Html(error_page(&format!("Render task failed: {}", join_error))),
            )
                .into_response()
        }
    }
}

/// `GET /ws`: reload socket
pub async fn websocket(ws: WebSocketUpgrade, State(state): State<DevState>) -> Response {
    ws.on_upgrade(move |socket| handle_socket(socket, state.reload))
}

async fn handle_socket(socket: WebSocket, reload: LiveReload) {
    let mut events = reload.subscribe();
    reload.add_client().await;
    debug!("Reload client connected ({} open)", reload.client_count().await);

    let (mut sender, mut receiver) = socket.split();

    loop {
        tokio::select! {
            event = events.recv() => match event {
                Ok(ReloadEvent::Reload(_)) | Err(RecvError::Lagged(_)) => {
                    if sender.send(Message::Text(RELOAD_MESSAGE.to_string())).await.is_err() {
                        break;
                    }
                }
                Ok(ReloadEvent::Shutdown) | Err(RecvError::Closed) => {
                    let _ = sender.send(Message::Close(None)).await;
                    break;
                }
            },
            incoming = receiver.next() => match incoming {
                // Clients never need to send anything; drain until they leave
                Some(Ok(Message::Close(_))) | Some(Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    reload.remove_client().await;
    debug!("Reload client disconnected ({} open)", reload.client_count().await);
}
