//! Provider tests against local stand-ins for the IGDB, Twitch and RAWG APIs

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde_json::json;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

use game_cover_proxy::{
    config::{Config, ProviderKind},
    errors::ProviderError,
    providers::{CoverProvider, ProviderFactory},
    services::CoverCache,
};

#[derive(Default)]
struct Upstream {
    tokens_issued: AtomicUsize,
    cover_requests: AtomicUsize,
    reject_first_token: AtomicBool,
    seen_queries: Mutex<Vec<String>>,
    seen_auth: Mutex<Vec<(String, String)>>,
}

type Shared = Arc<Upstream>;

async fn issue_token(
    State(upstream): State<Shared>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    let valid = params.get("client_id").map(String::as_str) == Some("client")
        && params.get("client_secret").map(String::as_str) == Some("secret")
        && params.get("grant_type").map(String::as_str) == Some("client_credentials");
    if !valid {
        return StatusCode::BAD_REQUEST.into_response();
    }

    let n = upstream.tokens_issued.fetch_add(1, Ordering::SeqCst) + 1;
    Json(json!({
        "access_token": format!("token-{n}"),
        "expires_in": 5_000_000,
        "token_type": "bearer",
    }))
    .into_response()
}

async fn igdb_covers(
    State(upstream): State<Shared>,
    headers: HeaderMap,
    body: String,
) -> Response {
    upstream.cover_requests.fetch_add(1, Ordering::SeqCst);

    let client_id = headers
        .get("client-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .unwrap_or_default()
        .to_string();
    upstream
        .seen_auth
        .lock()
        .await
        .push((client_id.clone(), bearer.clone()));
    upstream.seen_queries.lock().await.push(body.clone());

    if client_id != "client"
        || bearer.is_empty()
        || (bearer == "token-1" && upstream.reject_first_token.load(Ordering::SeqCst))
    {
        return StatusCode::UNAUTHORIZED.into_response();
    }

    let game_id = body
        .split("where game = ")
        .nth(1)
        .and_then(|rest| rest.split(';').next())
        .unwrap_or_default()
        .trim()
        .to_string();

    match game_id.as_str() {
        "1942" => Json(json!([
            { "id": 85424, "url": "//images.igdb.com/igdb/image/upload/t_thumb/co1r76.jpg" }
        ]))
        .into_response(),
        "500" => StatusCode::INTERNAL_SERVER_ERROR.into_response(),
        "666" => "not json".into_response(),
        _ => Json(json!([])).into_response(),
    }
}

async fn rawg_game(
    Path(game_id): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Response {
    if params.get("key").map(String::as_str) != Some("rawg-key") {
        return StatusCode::UNAUTHORIZED.into_response();
    }
    match game_id.as_str() {
        "3498" => Json(json!({
            "id": 3498,
            "name": "Grand Theft Auto V",
            "background_image": "https://media.rawg.io/media/games/456/gta5.jpg"
        }))
        .into_response(),
        "4200" => Json(json!({ "id": 4200, "background_image": null })).into_response(),
        _ => StatusCode::NOT_FOUND.into_response(),
    }
}

async fn spawn_upstream() -> (String, Shared) {
    let upstream: Shared = Arc::new(Upstream::default());
    let router = Router::new()
        .route("/oauth2/token", post(issue_token))
        .route("/v4/covers", post(igdb_covers))
        .route("/api/games/{game_id}", get(rawg_game))
        .with_state(upstream.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    (format!("http://{addr}"), upstream)
}

fn igdb_config(base: &str) -> Config {
    let mut config = Config::default();
    config.provider.kind = ProviderKind::Igdb;
    config.provider.igdb.client_id = "client".to_string();
    config.provider.igdb.client_secret = Some("secret".to_string());
    config.provider.igdb.base_url = format!("{base}/v4");
    config.provider.igdb.token_url = format!("{base}/oauth2/token");
    config
}

fn rawg_config(base: &str) -> Config {
    let mut config = Config::default();
    config.provider.kind = ProviderKind::Rawg;
    config.provider.rawg.api_key = "rawg-key".to_string();
    config.provider.rawg.base_url = format!("{base}/api");
    config
}

#[tokio::test]
async fn test_igdb_lookup_sends_query_and_credentials() {
    let (base, upstream) = spawn_upstream().await;
    let provider = ProviderFactory::create(&igdb_config(&base)).unwrap();

    let url = provider.cover_url("1942").await.unwrap();

    assert_eq!(
        url.as_deref(),
        Some("//images.igdb.com/igdb/image/upload/t_thumb/co1r76.jpg")
    );
    assert_eq!(
        upstream.seen_queries.lock().await.as_slice(),
        ["fields url; where game = 1942; limit 1;".to_string()]
    );
    assert_eq!(
        upstream.seen_auth.lock().await.as_slice(),
        [("client".to_string(), "token-1".to_string())]
    );
}

#[tokio::test]
async fn test_igdb_token_is_reused_across_lookups() {
    let (base, upstream) = spawn_upstream().await;
    let provider = ProviderFactory::create(&igdb_config(&base)).unwrap();

    for id in ["1942", "1", "2"] {
        provider.cover_url(id).await.unwrap();
    }

    assert_eq!(upstream.tokens_issued.load(Ordering::SeqCst), 1);
    assert_eq!(upstream.cover_requests.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn test_igdb_empty_result_is_not_found() {
    let (base, _) = spawn_upstream().await;
    let provider = ProviderFactory::create(&igdb_config(&base)).unwrap();

    assert_eq!(provider.cover_url("31337").await.unwrap(), None);
}

#[tokio::test]
async fn test_igdb_upstream_errors_surface_as_provider_errors() {
    let (base, _) = spawn_upstream().await;
    let provider = ProviderFactory::create(&igdb_config(&base)).unwrap();

    let err = provider.cover_url("500").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 500, .. }));

    let err = provider.cover_url("666").await.unwrap_err();
    assert!(matches!(err, ProviderError::Parse { .. }));
}

#[tokio::test]
async fn test_rejected_token_is_refreshed_on_next_call() {
    let (base, upstream) = spawn_upstream().await;
    upstream.reject_first_token.store(true, Ordering::SeqCst);
    let provider = ProviderFactory::create(&igdb_config(&base)).unwrap();

    let err = provider.cover_url("1942").await.unwrap_err();
    assert!(err.is_unauthorized());

    let url = provider.cover_url("1942").await.unwrap();
    assert!(url.is_some());
    assert_eq!(upstream.tokens_issued.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_static_igdb_token_skips_token_endpoint() {
    let (base, upstream) = spawn_upstream().await;
    let mut config = igdb_config(&base);
    config.provider.igdb.client_secret = None;
    config.provider.igdb.access_token = Some("static-token".to_string());
    let provider = ProviderFactory::create(&config).unwrap();

    provider.cover_url("1942").await.unwrap();

    assert_eq!(upstream.tokens_issued.load(Ordering::SeqCst), 0);
    assert_eq!(
        upstream.seen_auth.lock().await.as_slice(),
        [("client".to_string(), "static-token".to_string())]
    );
}

#[tokio::test]
async fn test_bad_client_secret_is_an_authentication_failure() {
    let (base, upstream) = spawn_upstream().await;
    let mut config = igdb_config(&base);
    config.provider.igdb.client_secret = Some("wrong".to_string());
    let provider = ProviderFactory::create(&config).unwrap();

    let err = provider.cover_url("1942").await.unwrap_err();

    assert!(matches!(err, ProviderError::AuthenticationFailed { .. }));
    assert_eq!(upstream.cover_requests.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_rawg_lookup() {
    let (base, _) = spawn_upstream().await;
    let provider = ProviderFactory::create(&rawg_config(&base)).unwrap();

    assert_eq!(
        provider.cover_url("3498").await.unwrap().as_deref(),
        Some("https://media.rawg.io/media/games/456/gta5.jpg")
    );
    assert_eq!(provider.cover_url("4200").await.unwrap(), None);
    assert_eq!(provider.cover_url("1").await.unwrap(), None);
}

#[tokio::test]
async fn test_rawg_bad_key_is_an_http_error() {
    let (base, _) = spawn_upstream().await;
    let mut config = rawg_config(&base);
    config.provider.rawg.api_key = "nope".to_string();
    let provider = ProviderFactory::create(&config).unwrap();

    let err = provider.cover_url("3498").await.unwrap_err();
    assert!(matches!(err, ProviderError::Http { status: 401, .. }));
}

#[tokio::test]
async fn test_cache_over_igdb_normalizes_and_caches() {
    let (base, upstream) = spawn_upstream().await;
    let config = igdb_config(&base);
    let provider = ProviderFactory::create(&config).unwrap();
    let cache = CoverCache::new(provider, &config.cache);

    let ids = vec!["1942".to_string(), "31337".to_string(), "500".to_string()];
    let first = cache.lookup(&ids).await;
    let second = cache.lookup(&ids).await;

    assert_eq!(
        first["1942"].as_deref(),
        Some("https://images.igdb.com/igdb/image/upload/t_cover_big/co1r76.jpg")
    );
    assert_eq!(first["31337"], None);
    assert_eq!(first["500"], None);
    assert_eq!(first, second);

    // 3 on the first pass, then only the two unresolved ids again
    assert_eq!(upstream.cover_requests.load(Ordering::SeqCst), 5);
}
