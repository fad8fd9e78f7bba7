//! Tests for the print server's routes and its start-once lifecycle
mod common;

use std::net::TcpListener as StdTcpListener;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::thread::{self, ThreadId};

use axum::Router;
use axum::body::{self, Body};
use axum::http::{Method, Request, StatusCode, header};
use common::{StaticHost, document, embedded_literal};
use printcode::{
    AssetRoot, DocumentSnapshot, DocumentUri, EditorHost, ModeRegistry, PrintConfiguration,
    PrintServer, escape_for_embedding,
};
use tempfile::TempDir;
use tower::ServiceExt;

fn server_with(host: StaticHost, assets: AssetRoot) -> PrintServer {
    PrintServer::new(Arc::new(host), Arc::new(ModeRegistry::builtin()), assets)
}

fn asset_dir() -> TempDir {
    let dir = TempDir::new().expect("create temp dir");
    let lib = dir.path().join("assets").join("codemirror").join("lib");
    std::fs::create_dir_all(&lib).expect("create asset tree");
    std::fs::write(lib.join("codemirror.css"), ".CodeMirror {}").expect("write asset");
    std::fs::write(dir.path().join("private.txt"), "private").expect("write private file");
    dir
}

async fn get(router: Router, uri: &str) -> (StatusCode, Option<String>, String) {
    send(router, Method::GET, uri).await
}

async fn send(router: Router, method: Method, uri: &str) -> (StatusCode, Option<String>, String) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = router
        .oneshot(request)
        .await
        .unwrap();
    let status = response.status();
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .map(|value| value.to_str().unwrap().to_string());
    let bytes = body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, content_type, String::from_utf8(bytes.to_vec()).unwrap())
}

#[tokio::test]
async fn test_root_serves_active_document() {
    let host = StaticHost::new(Some(document("a<b", "javascript", "/w/a.js")));
    let server = server_with(host, AssetRoot::new("/nonexistent"));

    let (status, content_type, page) = get(server.router(), "/?mode=javascript").await;

    assert_eq!(status, StatusCode::OK);
    assert!(content_type.unwrap().starts_with("text/html"));
    assert!(page.contains("/_node_modules/codemirror/mode/javascript/javascript.js"));
    assert_eq!(embedded_literal(&page), escape_for_embedding("a<b"));
}

#[tokio::test]
async fn test_mode_query_is_advisory() {
    let host = StaticHost::new(Some(document("x", "rust", "/w/a.rs")));
    let server = server_with(host, AssetRoot::new("/nonexistent"));

    let (_, _, page) = get(server.router(), "/?mode=python").await;
    assert!(page.contains("/mode/rust/rust.js"));
    assert!(!page.contains("/mode/python/python.js"));
}

#[tokio::test]
async fn test_root_without_document_has_no_body() {
    let server = server_with(StaticHost::new(None), AssetRoot::new("/nonexistent"));

    let (status, _, body) = get(server.router(), "/").await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_page_reflects_document_at_request_time() {
    let host = Arc::new(StaticHost::new(Some(document("old", "rust", "/w/a.rs"))));
    let server = PrintServer::new(
        host.clone(),
        Arc::new(ModeRegistry::builtin()),
        AssetRoot::new("/nonexistent"),
    );

    host.switch_to(Some(document("new", "python", "/w/b.py")));
    host.update_config(|config| config.tab_size = 7);

    let (_, _, page) = get(server.router(), "/").await;
    assert_eq!(embedded_literal(&page), "new");
    assert!(page.contains("/mode/python/python.js"));
    assert!(page.contains("tabSize: 7,"));
}

#[tokio::test]
async fn test_static_asset_is_served() {
    let dir = asset_dir();
    let server = server_with(StaticHost::new(None), AssetRoot::new(dir.path().join("assets")));

    let uri = "/_node_modules/codemirror/lib/codemirror.css";
    let (status, content_type, body) = get(server.router(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type.as_deref(), Some("text/css; charset=utf-8"));
    assert_eq!(body, ".CodeMirror {}");
}

#[tokio::test]
async fn test_missing_asset_reports_error_inline() {
    let dir = asset_dir();
    let server = server_with(StaticHost::new(None), AssetRoot::new(dir.path().join("assets")));

    let uri = "/_node_modules/codemirror/mode/zig/zig.js";
    let (status, _, body) = get(server.router(), uri).await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("ENOENT: "), "body was {:?}", body);
}

#[tokio::test]
async fn test_asset_route_cannot_escape_root() {
    let dir = asset_dir();
    let server = server_with(StaticHost::new(None), AssetRoot::new(dir.path().join("assets")));

    let (status, _, body) = get(server.router(), "/_node_modules/..%2Fprivate.txt").await;

    assert_eq!(status, StatusCode::OK);
    assert!(body.starts_with("EACCES: "), "body was {:?}", body);
    assert_ne!(body, "private");
}

#[tokio::test]
async fn test_other_paths_are_empty() {
    let server = server_with(StaticHost::new(None), AssetRoot::new("/nonexistent"));

    for uri in ["/favicon.ico", "/print", "/_node_modulesx/a.js"] {
        let (status, _, body) = get(server.router(), uri).await;
        assert_eq!(status, StatusCode::OK, "{}", uri);
        assert!(body.is_empty(), "{}", uri);
    }
}

#[tokio::test]
async fn test_routes_ignore_the_method() {
    let dir = asset_dir();
    let host = StaticHost::new(Some(document("a<b", "javascript", "/w/a.js")));
    let server = server_with(host, AssetRoot::new(dir.path().join("assets")));

    let (status, _, page) = send(server.router(), Method::POST, "/").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(embedded_literal(&page), escape_for_embedding("a<b"));

    let uri = "/_node_modules/codemirror/lib/codemirror.css";
    let (status, _, body) = send(server.router(), Method::POST, uri).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, ".CodeMirror {}");

    let (status, _, body) = send(server.router(), Method::DELETE, "/other").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_print_query_is_decoded_and_advisory() {
    let host = StaticHost::new(Some(document("x", "rust", "/w/a.rs")));
    let server = server_with(host, AssetRoot::new("/nonexistent"));

    let (status, _, page) = get(server.router(), "/?mode=text%2Fx-c%2B%2Bsrc&mode=x").await;
    assert_eq!(status, StatusCode::OK);
    assert!(page.contains("/mode/rust/rust.js"));
}

/// Remembers which thread the host was read on
struct ThreadRecordingHost {
    readers: Mutex<Vec<ThreadId>>,
}

impl EditorHost for ThreadRecordingHost {
    fn active_document(&self) -> Option<DocumentSnapshot> {
        self.readers.lock().unwrap().push(thread::current().id());
        Some(document("x", "rust", "/w/a.rs"))
    }

    fn workspace_folder(&self, _uri: &DocumentUri) -> Option<PathBuf> {
        None
    }

    fn configuration(&self) -> PrintConfiguration {
        self.readers.lock().unwrap().push(thread::current().id());
        PrintConfiguration::default()
    }
}

#[tokio::test]
async fn test_host_is_read_off_the_runtime_thread() {
    let host = Arc::new(ThreadRecordingHost {
        readers: Mutex::new(Vec::new()),
    });
    let server = PrintServer::new(
        host.clone(),
        Arc::new(ModeRegistry::builtin()),
        AssetRoot::new("/nonexistent"),
    );

    let (status, _, _) = get(server.router(), "/").await;
    assert_eq!(status, StatusCode::OK);

    let readers = host.readers.lock().unwrap();
    assert_eq!(readers.len(), 2);
    assert!(readers.iter().all(|reader| *reader != thread::current().id()));
}

#[tokio::test]
async fn test_ensure_started_binds_once() {
    let server = server_with(StaticHost::new(None), AssetRoot::new("/nonexistent"));
    assert!(server.local_addr().await.is_none());

    let first = server.ensure_started(0).await.expect("server starts");
    let second = server.ensure_started(0).await.expect("server still running");
    assert_eq!(first, second);

    // A different port is ignored while the first socket is alive
    let other_port = first.port().wrapping_add(1).max(1024);
    let third = server.ensure_started(other_port).await.expect("server still running");
    assert_eq!(third, first);
    assert_eq!(server.local_addr().await, Some(first));

    tokio::net::TcpStream::connect(first)
        .await
        .expect("server accepts connections");
}

#[tokio::test]
async fn test_bind_failure_is_retried() {
    let blocker = StdTcpListener::bind("127.0.0.1:0").expect("reserve port");
    let port = blocker.local_addr().unwrap().port();
    let server = server_with(StaticHost::new(None), AssetRoot::new("/nonexistent"));

    assert!(server.ensure_started(port).await.is_none());
    assert!(server.local_addr().await.is_none());

    drop(blocker);
    let addr = server.ensure_started(port).await.expect("port is free again");
    assert_eq!(addr.port(), port);
}
