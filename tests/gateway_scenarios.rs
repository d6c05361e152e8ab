//! Request-level behavior of the gateway router, served in-process.

use axum::http::{header, StatusCode};
use content_gateway::config::GatewayConfig;
use content_gateway::http::X_IPFS_PATH;
use content_gateway::MemoryStore;
use tower::ServiceExt;

mod common;

use common::{body_string, get, server, site};

const SUBDOMAIN: &str = "bafyroot.ipfs.localhost";

#[tokio::test]
async fn test_missing_path_without_rules_is_not_found() {
    let response = server(GatewayConfig::default(), site(None))
        .router()
        .oneshot(get("localhost", "/ipfs/bafyroot/missing", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_existing_path_is_served_directly() {
    let response = server(GatewayConfig::default(), site(Some("/* /index.html 200")))
        .router()
        .oneshot(get(SUBDOMAIN, "/docs/guide.html", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_IPFS_PATH], "/ipfs/bafyroot/docs/guide.html");
    assert_eq!(body_string(response).await, "<p>guide</p>");
}

#[tokio::test]
async fn test_redirect_on_isolated_origin() {
    let response = server(GatewayConfig::default(), site(Some("/old /new 301")))
        .router()
        .oneshot(get(SUBDOMAIN, "/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/new");
}

#[tokio::test]
async fn test_rules_ignored_on_shared_path_gateway() {
    let response = server(GatewayConfig::default(), site(Some("/old /new 301")))
        .router()
        .oneshot(get("localhost", "/ipfs/bafyroot/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_external_redirect_passes_through() {
    let rules = "/docs/* https://docs.example.com/:splat 302";
    let response = server(GatewayConfig::default(), site(Some(rules)))
        .router()
        .oneshot(get(SUBDOMAIN, "/docs/a/b", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(
        response.headers()[header::LOCATION],
        "https://docs.example.com/a/b"
    );
}

#[tokio::test]
async fn test_redirect_location_is_ascii_escaped() {
    let response = server(GatewayConfig::default(), site(Some("/old /caf\u{e9} 301")))
        .router()
        .oneshot(get(SUBDOMAIN, "/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/caf%C3%A9");
}

#[tokio::test]
async fn test_single_page_app_rewrite() {
    let response = server(GatewayConfig::default(), site(Some("/* /index.html 200")))
        .router()
        .oneshot(get(SUBDOMAIN, "/app/deep/route", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[X_IPFS_PATH], "/ipfs/bafyroot/index.html");
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "text/html; charset=utf-8"
    );
    assert_eq!(body_string(response).await, "<h1>home</h1>");
}

#[tokio::test]
async fn test_first_matching_rule_wins() {
    let rules = "/blog/* /new 302\n/blog/post /index.html 200\n";
    let response = server(GatewayConfig::default(), site(Some(rules)))
        .router()
        .oneshot(get(SUBDOMAIN, "/blog/post", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FOUND);
    assert_eq!(response.headers()[header::LOCATION], "/new");
}

#[tokio::test]
async fn test_broken_rewrite_is_internal_error() {
    let response = server(GatewayConfig::default(), site(Some("/* /missing.html 200")))
        .router()
        .oneshot(get(SUBDOMAIN, "/anything", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_custom_not_found_rule() {
    let store = site(Some("/* /404.html 404")).with_file("/ipfs/bafyroot/404.html", "gone").unwrap();
    let response = server(GatewayConfig::default(), store)
        .router()
        .oneshot(get(SUBDOMAIN, "/nope", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "gone");
}

#[tokio::test]
async fn test_broken_custom_not_found_is_internal_error() {
    let response = server(GatewayConfig::default(), site(Some("/* /404.html 404")))
        .router()
        .oneshot(get(SUBDOMAIN, "/nope", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("/ipfs/bafyroot/404.html"));
}

#[tokio::test]
async fn test_malformed_rules_file_names_its_path() {
    let response = server(GatewayConfig::default(), site(Some("/old /new 299")))
        .router()
        .oneshot(get(SUBDOMAIN, "/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_string(response).await.contains("/ipfs/bafyroot/_redirects"));
}

#[tokio::test]
async fn test_pretty_not_found_for_html_clients() {
    let store = site(None)
        .with_file("/ipfs/bafyroot/ipfs-404.html", "root 404")
        .unwrap()
        .with_file("/ipfs/bafyroot/docs/ipfs-404.html", "docs 404")
        .unwrap();
    let router = server(GatewayConfig::default(), store).router();

    let response = router
        .clone()
        .oneshot(get("localhost", "/ipfs/bafyroot/docs/missing", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/html");
    assert_eq!(body_string(response).await, "docs 404");

    let response = router
        .clone()
        .oneshot(get("localhost", "/ipfs/bafyroot/other/missing", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_string(response).await, "root 404");

    let response = router
        .oneshot(get("localhost", "/ipfs/bafyroot/docs/missing", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_ne!(body_string(response).await, "docs 404");
}

#[tokio::test]
async fn test_offline_name_is_unavailable() {
    let store = site(None).offline();
    let response = server(GatewayConfig::default(), store)
        .router()
        .oneshot(get("localhost", "/ipns/unknown.example/page", true))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

fn linked_config(bare_name_links: bool) -> GatewayConfig {
    let mut config = GatewayConfig::default();
    config.gateway.name_linked_hosts = vec!["docs.example.org".to_string()];
    config.redirects.bare_name_links = bare_name_links;
    config
}

fn linked_site() -> MemoryStore {
    site(Some("/old /new 301"))
        .with_name("docs.example.org", "/ipfs/bafyroot")
        .unwrap()
}

#[tokio::test]
async fn test_name_linked_host_serves_content() {
    let response = server(linked_config(false), linked_site())
        .router()
        .oneshot(get("docs.example.org", "/new", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "new page");
}

#[tokio::test]
async fn test_bare_name_linked_host_rules_are_opt_in() {
    let response = server(linked_config(false), linked_site())
        .router()
        .oneshot(get("docs.example.org", "/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = server(linked_config(true), linked_site())
        .router()
        .oneshot(get("docs.example.org", "/old", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(response.headers()[header::LOCATION], "/new");
}

#[tokio::test]
async fn test_name_linked_host_rebased_on_inner_identifier() {
    let store = linked_site()
        .with_file("/ipfs/bafyinner/_redirects", "/* /index.html 200")
        .unwrap()
        .with_file("/ipfs/bafyinner/index.html", "inner home")
        .unwrap();
    let response = server(linked_config(false), store)
        .router()
        .oneshot(get("docs.example.org", "/ipfs/bafyinner/some/route", false))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "inner home");
}

#[tokio::test]
async fn test_head_request_is_served() {
    let request = axum::http::Request::builder()
        .method("HEAD")
        .uri("/ipfs/bafyroot/new")
        .header("Host", "localhost")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = server(GatewayConfig::default(), site(None))
        .router()
        .oneshot(request)
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_LENGTH], "8");
}
