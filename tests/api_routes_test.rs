use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode},
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

use game_cover_proxy::{
    config::Config,
    errors::ProviderResult,
    providers::CoverProvider,
    services::CoverCache,
    web::{AppState, create_router},
};

/// Answers every id after a configurable delay
struct DelayedProvider {
    delay: Duration,
}

#[async_trait]
impl CoverProvider for DelayedProvider {
    fn name(&self) -> &'static str {
        "delayed"
    }

    async fn cover_url(&self, game_id: &str) -> ProviderResult<Option<String>> {
        tokio::time::sleep(self.delay).await;
        Ok(Some(format!("https://cdn.example/{game_id}.jpg")))
    }
}

fn app(config: Config, delay: Duration) -> Router {
    let cache = Arc::new(CoverCache::new(
        Arc::new(DelayedProvider { delay }),
        &config.cache,
    ));
    create_router(AppState::new(config, cache))
}

// Helper function to send requests to the app
async fn send_request(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("origin", "https://launcher.example")
        .body(Body::empty())
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();

    let body_bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json: Value = if body_bytes.is_empty() {
        json!({})
    } else {
        serde_json::from_slice(&body_bytes).unwrap_or(json!({}))
    };

    (status, json)
}

#[tokio::test]
async fn test_api_route_structure() {
    let app = app(Config::default(), Duration::ZERO);

    let routes = [
        ("/health", StatusCode::OK),
        ("/live", StatusCode::OK),
        ("/api/v1/covers?ids=1", StatusCode::OK),
        ("/api/v1/covers/1", StatusCode::OK),
        ("/api/v1/covers/stats", StatusCode::OK),
        ("/api/covers?ids=1", StatusCode::NOT_FOUND),
        ("/api/v1/games", StatusCode::NOT_FOUND),
    ];

    for (uri, expected) in routes {
        let (status, _) = send_request(&app, Method::GET, uri).await;
        assert_eq!(status, expected, "unexpected status for {uri}");
    }
}

#[tokio::test]
async fn test_stats_route_is_not_treated_as_game_id() {
    let app = app(Config::default(), Duration::ZERO);

    let (status, body) = send_request(&app, Method::GET, "/api/v1/covers/stats").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["provider"], "delayed");
    assert!(body["data"].get("game_id").is_none());
}

#[tokio::test]
async fn test_covers_endpoint_only_accepts_get() {
    let app = app(Config::default(), Duration::ZERO);

    let (status, _) = send_request(&app, Method::POST, "/api/v1/covers?ids=1").await;

    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_slow_lookups_hit_request_timeout() {
    let mut config = Config::default();
    config.web.request_timeout = Duration::from_millis(50);
    let app = app(config, Duration::from_secs(5));

    let (status, body) = send_request(&app, Method::GET, "/api/v1/covers?ids=1,2").await;

    assert_eq!(status, StatusCode::REQUEST_TIMEOUT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn test_cors_headers_present() {
    let app = app(Config::default(), Duration::ZERO);

    let request = Request::builder()
        .uri("/api/v1/covers?ids=1")
        .header("origin", "https://launcher.example")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}
