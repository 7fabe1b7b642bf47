#![cfg(feature = "dev-server")]

use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use futures::StreamExt;
use ihjs::app::AppFile;
use ihjs::components::{div, text, RenderOptions};
use ihjs::config::ServerConfig;
use ihjs::server::{DevServer, LiveReload, ReloadEvent, AUTORELOAD_SCRIPT};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tower::ServiceExt;

async fn get(server: &DevServer, uri: &str) -> (StatusCode, String) {
    let response = server
        .router()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

fn page_server(dir: &TempDir, source: &str) -> (DevServer, PathBuf) {
    let path = dir.path().join("app.toml");
    fs::write(&path, source).unwrap();
    let app = AppFile::open(&path).unwrap();
    let server = DevServer::new(ServerConfig::default(), Arc::new(app), RenderOptions::default());
    (server, path)
}

#[tokio::test]
async fn test_homepage_renders_with_reload_script() {
    let entry = || div().class_name("a").child(text("hello"));
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(entry),
        RenderOptions::default(),
    );

    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with(r#"<div class="a"><span>hello</span></div>"#));
    assert!(body.ends_with(AUTORELOAD_SCRIPT));
}

#[tokio::test]
async fn test_script_injected_before_body_close() {
    let dir = TempDir::new().unwrap();
    let (server, _) = page_server(
        &dir,
        "[index]\ntag = \"html\"\n\n[[index.children]]\ntag = \"body\"\n",
    );

    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("<html>"));
    assert!(body.ends_with("</script>\n</body></html>"));
}

#[tokio::test]
async fn test_homepage_reflects_edits_without_restart() {
    let dir = TempDir::new().unwrap();
    let (server, path) = page_server(&dir, "[index]\ntag = \"main\"\n");

    let (_, before) = get(&server, "/").await;
    assert!(before.starts_with("<main></main>"));

    fs::write(&path, "[index]\ntag = \"article\"\n").unwrap();
    let (_, after) = get(&server, "/").await;
    assert!(after.starts_with("<article></article>"));
}

#[tokio::test]
async fn test_missing_entry_point_is_500() {
    let dir = TempDir::new().unwrap();
    let (server, _) = page_server(&dir, "[home]\ntag = \"div\"\n");

    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("Error: No index() entry point"));
}

#[tokio::test]
async fn test_construction_error_page() {
    let dir = TempDir::new().unwrap();
    let (server, _) = page_server(&dir, "[index]\nkind = \"heading\"\ncontent = \"x\"\nlevel = 9\n");

    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.starts_with("<div style='color:red'><pre>"));
    assert!(body.contains("Heading level must be between 1 and 6, got 9"));
    assert!(body.contains("<script>"));
}

#[tokio::test]
async fn test_parse_error_page() {
    let dir = TempDir::new().unwrap();
    let (server, _) = page_server(&dir, "[index\n");

    let (status, body) = get(&server, "/").await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body.contains("Failed to parse"));
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(|| div()),
        RenderOptions::default(),
    );
    let (status, _) = get(&server, "/missing").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_ws_requires_upgrade() {
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(|| div()),
        RenderOptions::default(),
    );
    let (status, _) = get(&server, "/ws").await;
    assert!(status.is_client_error());
}

#[tokio::test]
async fn test_live_reload_broadcast_reaches_subscribers() {
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(|| div()),
        RenderOptions::default(),
    );
    let mut rx = server.live_reload().subscribe();

    let reached = server
        .live_reload()
        .trigger_reload(vec![PathBuf::from("app.toml")]);

    assert_eq!(reached, 1);
    assert_eq!(
        rx.recv().await.unwrap(),
        ReloadEvent::Reload(vec![PathBuf::from("app.toml")])
    );
}

/// Serve `server` on a free local port; returns the address, the reload hub,
/// a shutdown trigger and the server task
async fn spawn_server(
    server: DevServer,
) -> (
    std::net::SocketAddr,
    LiveReload,
    oneshot::Sender<()>,
    JoinHandle<anyhow::Result<()>>,
) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let reload = server.live_reload().clone();
    let (stop_tx, stop_rx) = oneshot::channel::<()>();
    let handle = tokio::spawn(server.serve(listener, async move {
        let _ = stop_rx.await;
    }));
    (addr, reload, stop_tx, handle)
}

async fn wait_for_clients(reload: &LiveReload, expected: usize) {
    tokio::time::timeout(Duration::from_secs(5), async {
        while reload.client_count().await != expected {
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .unwrap_or_else(|_| panic!("client count never reached {expected}"));
}

#[tokio::test]
async fn test_reload_message_reaches_open_socket() {
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(|| div()),
        RenderOptions::default(),
    );
    let (addr, reload, stop, handle) = spawn_server(server).await;

    let (mut socket, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .unwrap();
    wait_for_clients(&reload, 1).await;

    assert_eq!(reload.trigger_reload(vec![PathBuf::from("app.toml")]), 1);
    let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
        .await
        .expect("no message within 5s")
        .expect("socket closed")
        .unwrap();
    assert_eq!(message, Message::Text("reload".into()));

    socket.close(None).await.unwrap();
    wait_for_clients(&reload, 0).await;

    stop.send(()).unwrap();
    handle.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_every_open_socket_gets_reload() {
    let server = DevServer::new(
        ServerConfig::default(),
        Arc::new(|| div()),
        RenderOptions::default(),
    );
    let (addr, reload, stop, handle) = spawn_server(server).await;

    let url = format!("ws://{addr}/ws");
    let (mut first, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let (mut second, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    wait_for_clients(&reload, 2).await;

    reload.trigger_reload(Vec::new());
    for socket in [&mut first, &mut second] {
        let message = tokio::time::timeout(Duration::from_secs(5), socket.next())
            .await
            .unwrap()
            .unwrap()
            .unwrap();
        assert_eq!(message, Message::Text("reload".into()));
    }

    drop(first);
    wait_for_clients(&reload, 1).await;

    // Shutdown closes the remaining socket so the server can drain
    stop.send(()).unwrap();
    let closing = tokio::time::timeout(Duration::from_secs(5), second.next())
        .await
        .unwrap();
    assert!(matches!(closing, Some(Ok(Message::Close(_))) | None));
    handle.await.unwrap().unwrap();
}
