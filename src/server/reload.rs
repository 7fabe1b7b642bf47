//! Live reload: client script and the broadcast hub behind `/ws`

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::{broadcast, RwLock};

/// Text frame telling the browser to reload
pub const RELOAD_MESSAGE: &str = "reload";

/// Delay before the client reloads after losing its socket
pub const RECONNECT_DELAY_MS: u64 = 2000;

/// Client script injected into every page served by the dev server
pub const AUTORELOAD_SCRIPT: &str = r#"
<script>
    (function() {
        var ws = new WebSocket("ws://" + window.location.host + "/ws");
        ws.onmessage = function(event) {
            if (event.data === "reload") {
                console.log("File changed. Reloading website.");
                window.location.reload();
            }
        };
        ws.onclose = function() {
            console.log("Connection lost. Trying to reconnect after 2s...");
            setTimeout(function() { window.location.reload(); }, 2000);
        };
    })();
</script>
"#;

/// Insert the reload script before the last `</body>`, or append it
pub fn inject_reload_script(html: &str) -> String {
    let mut output = String::with_capacity(html.len() + AUTORELOAD_SCRIPT.len());
    match html.rfind("</body>") {
        Some(index) => {
            output.push_str(&html[..index]);
            output.push_str(AUTORELOAD_SCRIPT);
            output.push_str(&html[index..]);
        }
        None => {
            output.push_str(html);
            output.push_str(AUTORELOAD_SCRIPT);
        }
    }
    output
}

/// Events delivered to every connected socket
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReloadEvent {
    /// Reload the page; carries the paths that changed
    Reload(Vec<PathBuf>),
    /// The server is going away; close the socket
    Shutdown,
}

/// Broadcast hub shared by the socket tasks and the file watcher.
///
/// Each open socket holds a receiver; the client count is tracked separately
/// so it reflects sockets that finished their handshake.
#[derive(Clone)]
pub struct LiveReload {
    tx: broadcast::Sender<ReloadEvent>,
    clients: Arc<RwLock<usize>>,
}

impl LiveReload {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(100);
        Self {
            tx,
            clients: Arc::new(RwLock::new(0)),
        }
    }

    /// Tell every connected client to reload.
    ///
    /// Returns the number of subscribers the event reached.
    pub fn trigger_reload(&self, changed: Vec<PathBuf>) -> usize {
        self.tx.send(ReloadEvent::Reload(changed)).unwrap_or(0)
    }

    /// Ask every socket task to close its connection
    pub fn shutdown(&self) {
        let _ = self.tx.send(ReloadEvent::Shutdown);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ReloadEvent> {
        self.tx.subscribe()
    }

    pub async fn client_count(&self) -> usize {
        *self.clients.read().await
    }

    pub async fn add_client(&self) {
        let mut count = self.clients.write().await;
        *count += 1;
    }

    pub async fn remove_client(&self) {
        let mut count = self.clients.write().await;
        if *count > 0 {
            *count -= 1;
        }
    }
}

impl Default for LiveReload {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_before_body_close() {
        let html = "<html><body><p>x</p></body></html>";
        let injected = inject_reload_script(html);
        assert!(injected.starts_with("<html><body><p>x</p>\n<script>"));
        assert!(injected.ends_with("</script>\n</body></html>"));
    }

    #[test]
    fn test_inject_appends_without_body() {
        let injected = inject_reload_script("<div></div>");
        assert!(injected.starts_with("<div></div>"));
        assert!(injected.ends_with(AUTORELOAD_SCRIPT));
    }

    #[test]
    fn test_script_contract() {
        assert!(AUTORELOAD_SCRIPT.contains("\"/ws\""));
        assert!(AUTORELOAD_SCRIPT.contains(&format!("event.data === \"{}\"", RELOAD_MESSAGE)));
        assert!(AUTORELOAD_SCRIPT.contains(&RECONNECT_DELAY_MS.to_string()));
    }

    #[test]
    fn test_trigger_without_subscribers() {
        let reload = LiveReload::new();
        assert_eq!(reload.trigger_reload(vec![]), 0);
    }

    #[test]
    fn test_multiple_subscribers() {
        let reload = LiveReload::new();
        let mut rx1 = reload.subscribe();
        let mut rx2 = reload.subscribe();

        let reached = reload.trigger_reload(vec![PathBuf::from("app.toml")]);
        assert_eq!(reached, 2);

        let expected = ReloadEvent::Reload(vec![PathBuf::from("app.toml")]);
        assert_eq!(rx1.try_recv().unwrap(), expected);
        assert_eq!(rx2.try_recv().unwrap(), expected);
    }

    #[test]
    fn test_shutdown_event() {
        let reload = LiveReload::new();
        let mut rx = reload.subscribe();
        reload.shutdown();
        assert_eq!(rx.try_recv().unwrap(), ReloadEvent::Shutdown);
    }

    #[tokio::test]
    async fn test_client_count() {
        let reload = LiveReload::new();
        assert_eq!(reload.client_count().await, 0);

        reload.add_client().await;
        reload.add_client().await;
        assert_eq!(reload.client_count().await, 2);

        reload.remove_client().await;
        reload.remove_client().await;
        reload.remove_client().await;
        assert_eq!(reload.client_count().await, 0);
    }
}
