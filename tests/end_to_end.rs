//! Gateway over a real socket and a filesystem store, including hot reload.

use std::path::Path;
use std::time::Duration;

use content_gateway::config::GatewayConfig;
use content_gateway::HttpServer;
use reqwest::StatusCode;

mod common;

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}

async fn get(addr: std::net::SocketAddr, host: &str, path: &str) -> reqwest::Response {
    client()
        .get(format!("http://{}{}", addr, path))
        .header("Host", host)
        .send()
        .await
        .expect("Gateway unreachable")
}

/// Poll until `check` holds; reloads are applied asynchronously.
async fn eventually<F, Fut>(mut check: F)
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = bool>,
{
    for _ in 0..50 {
        if check().await {
            return;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("condition not reached after reload");
}

#[tokio::test]
async fn test_gateway_serves_redirects_and_reloads() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "ipfs/bafyroot/index.html", "<h1>home</h1>");
    write(dir.path(), "ipfs/bafyroot/_redirects", "/old /index.html 308\n");

    let mut config = GatewayConfig::default();
    config.store.root = dir.path().display().to_string();

    let gateway = common::spawn_gateway(HttpServer::new(config.clone()).unwrap()).await;
    let host = "bafyroot.ipfs.localhost";

    let res = get(gateway.addr, host, "/").await;
    assert_eq!(res.status(), StatusCode::OK);
    assert!(res.headers().contains_key("x-request-id"));
    assert_eq!(res.text().await.unwrap(), "<h1>home</h1>");

    let res = get(gateway.addr, host, "/old").await;
    assert_eq!(res.status(), StatusCode::PERMANENT_REDIRECT);
    assert_eq!(res.headers()["location"], "/index.html");

    // Rules off
    let mut reloaded = config.clone();
    reloaded.redirects.enabled = false;
    gateway.config_updates.send(reloaded.clone()).unwrap();
    let addr = gateway.addr;
    eventually(move || async move { get(addr, host, "/old").await.status() == StatusCode::NOT_FOUND })
        .await;

    // Store root gone: the store is rebuilt and reports unavailable
    reloaded.store.root = dir.path().join("unmounted").display().to_string();
    gateway.config_updates.send(reloaded).unwrap();
    eventually(move || async move {
        get(addr, host, "/old").await.status() == StatusCode::SERVICE_UNAVAILABLE
    })
    .await;

    assert!(gateway.shutdown.trigger() > 0);
}
