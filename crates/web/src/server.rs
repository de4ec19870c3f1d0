//! Web server implementation

use std::net::SocketAddr;
use std::path::PathBuf;

use axum::{
    http::{header, Method},
    response::IntoResponse,
    routing::{any, get},
    Json, Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::checkout::{buy_now_handler, PoolClient};

const DEFAULT_ADDR: &str = "127.0.0.1:8888";
const DEFAULT_POOL_SERVER: &str = "http://127.0.0.1:10000";

#[derive(Debug, Clone)]
pub struct WebServerConfig {
    pub addr: SocketAddr,
    /// Base URL of the pool server that issues exchange URLs
    pub pool_server: String,
    /// Directory holding the built site
    pub site_root: PathBuf,
}

impl WebServerConfig {
    /// Read `LANDER_WEB_ADDR`, `LANDER_POOL_SERVER` and `LANDER_SITE_ROOT`,
    /// falling back to defaults
    pub fn from_env() -> anyhow::Result<Self> {
        let addr = std::env::var("LANDER_WEB_ADDR")
            .unwrap_or_else(|_| DEFAULT_ADDR.to_string())
            .parse()?;

        let pool_server = std::env::var("LANDER_POOL_SERVER")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_POOL_SERVER.to_string());

        let site_root = std::env::var("LANDER_SITE_ROOT")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("."));

        Ok(Self {
            addr,
            pool_server,
            site_root,
        })
    }
}

impl Default for WebServerConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.parse().unwrap_or_else(|_| SocketAddr::from(([127, 0, 0, 1], 8888))),
            pool_server: DEFAULT_POOL_SERVER.to_string(),
            site_root: PathBuf::from("."),
        }
    }
}

/// Routes: health, the checkout proxy (also under its legacy functions
/// path) and the static site as fallback
pub fn router(cfg: &WebServerConfig) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let checkout = Router::new()
        .route("/api/buy-now", any(buy_now_handler))
        .route("/.netlify/functions/buy-now", any(buy_now_handler))
        .layer(cors)
        .with_state(PoolClient::new(cfg.pool_server.clone()));

    Router::new()
        .route("/health", get(health_handler))
        .merge(checkout)
        .fallback_service(ServeDir::new(&cfg.site_root))
        .layer(TraceLayer::new_for_http())
}

/// Start the web server
pub async fn serve(cfg: WebServerConfig) -> anyhow::Result<()> {
    info!(
        "Serving {} on http://{} (pool: {})",
        cfg.site_root.display(),
        cfg.addr,
        cfg.pool_server
    );

    let listener = tokio::net::TcpListener::bind(cfg.addr).await?;
    axum::serve(listener, router(&cfg)).await?;

    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "lander-web"
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::routing::post;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    /// Pool server stand-in that hands out an exchange URL per tier; tier 99
    /// is sold out
    async fn spawn_pool() -> String {
        let app = Router::new().route(
            "/buy-now",
            post(|Json(body): Json<Value>| async move {
                let tier = body["amountUSD"].as_u64().unwrap_or(0);
                if tier == 99 {
                    Json(json!({ "error": "pool empty" }))
                } else {
                    Json(json!({
                        "exchangeUrl": format!("https://swap.example/{}", tier),
                        "amountUSD": tier
                    }))
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn config(pool_server: String, site_root: PathBuf) -> WebServerConfig {
        WebServerConfig {
            pool_server,
            site_root,
            ..WebServerConfig::default()
        }
    }

    async fn call(app: Router, method: Method, uri: &str, body: &str) -> (StatusCode, Value) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    #[tokio::test]
    async fn test_health() {
        let app = router(&WebServerConfig::default());
        let (status, body) = call(app, Method::GET, "/health", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }

    #[tokio::test]
    async fn test_buy_now_maps_to_nearest_tier() {
        let pool = spawn_pool().await;
        let app = router(&config(pool, PathBuf::from(".")));

        let (status, body) = call(app, Method::POST, "/api/buy-now", r#"{"amountUSD": 44}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amountUSD"], 29);
        assert_eq!(body["exchangeUrl"], "https://swap.example/29");
    }

    #[tokio::test]
    async fn test_legacy_function_path() {
        let pool = spawn_pool().await;
        let app = router(&config(pool, PathBuf::from(".")));

        let (status, body) =
            call(app, Method::POST, "/.netlify/functions/buy-now", r#"{"amountUSD": 70}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amountUSD"], 59);
    }

    #[tokio::test]
    async fn test_buy_now_accepts_string_amount() {
        let pool = spawn_pool().await;
        let app = router(&config(pool, PathBuf::from(".")));

        let (status, body) = call(app, Method::POST, "/api/buy-now", r#"{"amountUSD": "24"}"#).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["amountUSD"], 19);
    }

    #[tokio::test]
    async fn test_missing_amount() {
        let app = router(&WebServerConfig::default());
        let (status, body) = call(app, Method::POST, "/api/buy-now", "{}").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Missing amountUSD");
    }

    #[tokio::test]
    async fn test_method_not_allowed() {
        let app = router(&WebServerConfig::default());
        let (status, body) = call(app, Method::GET, "/api/buy-now", "").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(body["error"], "Method not allowed");
    }

    #[tokio::test]
    async fn test_options_ok() {
        let app = router(&WebServerConfig::default());
        let (status, _) = call(app, Method::OPTIONS, "/api/buy-now", "").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_pool_without_exchange_url() {
        let pool = spawn_pool().await;
        let app = router(&config(pool, PathBuf::from(".")));

        let (status, body) = call(app, Method::POST, "/api/buy-now", r#"{"amountUSD": 120}"#).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["error"], "No exchange API returned");
    }

    #[tokio::test]
    async fn test_serves_site_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Glow</h1>").unwrap();
        let app = router(&config(DEFAULT_POOL_SERVER.to_string(), dir.path().to_path_buf()));

        let response = app
            .oneshot(Request::builder().uri("/index.html").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>Glow</h1>");
    }
}
