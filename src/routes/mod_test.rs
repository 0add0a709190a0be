use super::*;
use crate::detector::DisabledDetector;
use crate::state::test_helpers::test_app_state;
use std::net::SocketAddr;
use std::sync::Arc;

async fn spawn_app(origins: CorsOrigins) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind should succeed");
    let addr = listener.local_addr().expect("local addr");
    let app = app(test_app_state(Arc::new(DisabledDetector)), &origins);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    addr
}

#[tokio::test]
async fn index_returns_static_text() {
    let addr = spawn_app(CorsOrigins::Any).await;
    let resp = reqwest::get(format!("http://{addr}/")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::OK);
    assert_eq!(resp.text().await.unwrap(), INDEX_BODY);
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let addr = spawn_app(CorsOrigins::Any).await;
    let resp = reqwest::get(format!("http://{addr}/api/frames")).await.unwrap();
    assert_eq!(resp.status(), reqwest::StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn permissive_cors_allows_any_origin() {
    let addr = spawn_app(CorsOrigins::Any).await;
    let resp = reqwest::Client::new()
        .get(format!("http://{addr}/"))
        .header("Origin", "https://anywhere.test")
        .send()
        .await
        .unwrap();
    assert_eq!(
        resp.headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("*")
    );
}

#[tokio::test]
async fn origin_list_rejects_other_origins() {
    let addr = spawn_app(CorsOrigins::List(vec!["https://app.test".into()])).await;
    let client = reqwest::Client::new();

    let allowed = client
        .get(format!("http://{addr}/"))
        .header("Origin", "https://app.test")
        .send()
        .await
        .unwrap();
    assert_eq!(
        allowed
            .headers()
            .get("access-control-allow-origin")
            .and_then(|v| v.to_str().ok()),
        Some("https://app.test")
    );

    let denied = client
        .get(format!("http://{addr}/"))
        .header("Origin", "https://evil.test")
        .send()
        .await
        .unwrap();
    assert!(denied.headers().get("access-control-allow-origin").is_none());
}
