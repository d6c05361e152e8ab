//! Shared utilities for gateway integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, Response},
};
use content_gateway::config::GatewayConfig;
use content_gateway::{HttpServer, MemoryStore, Shutdown};
use tokio::net::TcpListener;
use tokio::sync::mpsc;

pub const ROOT: &str = "/ipfs/bafyroot";

/// A small site with an index, a nested page and an optional rules file.
pub fn site(rules: Option<&str>) -> MemoryStore {
    let store = MemoryStore::new()
        .with_file("/ipfs/bafyroot/index.html", "<h1>home</h1>")
        .unwrap()
        .with_file("/ipfs/bafyroot/new", "new page")
        .unwrap()
        .with_file("/ipfs/bafyroot/docs/guide.html", "<p>guide</p>")
        .unwrap();
    match rules {
        Some(rules) => store
            .with_file("/ipfs/bafyroot/_redirects", rules.to_string())
            .unwrap(),
        None => store,
    }
}

pub fn server(config: GatewayConfig, store: MemoryStore) -> HttpServer {
    HttpServer::with_store(config, Arc::new(store))
}

/// GET on a host, optionally accepting HTML.
pub fn get(host: &str, uri: &str, html: bool) -> Request<Body> {
    let mut builder = Request::builder().uri(uri).header("Host", host);
    if html {
        builder = builder.header("Accept", "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8");
    }
    builder.body(Body::empty()).unwrap()
}

pub async fn body_string(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// A running gateway on an ephemeral port.
pub struct RunningGateway {
    pub addr: SocketAddr,
    pub shutdown: Shutdown,
    pub config_updates: mpsc::UnboundedSender<GatewayConfig>,
}

pub async fn spawn_gateway(server: HttpServer) -> RunningGateway {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let shutdown = Shutdown::new();
    let (config_updates, updates_rx) = mpsc::unbounded_channel();
    let server_shutdown = shutdown.subscribe();

    tokio::spawn(async move {
        let _ = server.run(listener, updates_rx, server_shutdown).await;
    });

    RunningGateway {
        addr,
        shutdown,
        config_updates,
    }
}
