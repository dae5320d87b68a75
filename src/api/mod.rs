mod extract;
mod health;
mod images;
mod properties;
mod stats;
mod utils;

use crate::util::config::CorsConfig;
use crate::util::middleware;
use crate::AppState;
use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::middleware::from_fn;
use axum::routing::{get, patch, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tracing::{info, warn};

/// 上传路由的请求体上限，需大于图片上限才能让校验返回友好提示
const UPLOAD_BODY_LIMIT: usize = 16 * 1024 * 1024;

/// 按配置创建CORS层
fn create_cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allows_any() {
        info!("[global] CORS配置 - 允许任意来源");
        return CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any);
    }

    info!("[global] CORS配置 - 允许的源: {}", config.allowed_origins.join(","));

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|s| match s.trim().parse() {
            Ok(origin) => Some(origin),
            Err(e) => {
                warn!("无效的CORS源: {} - {}", s, e);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any)
}

pub fn routes(app_state: AppState) -> Router {
    let upload_dir = app_state.config.images.upload_dir.clone();
    let public_prefix = app_state.config.images.public_prefix.clone();
    let cors = create_cors_layer(&app_state.config.cors);

    Router::new()
        .route("/", get(health::root))
        .route("/health", get(health::health))
        .route("/api/extract", post(extract::extract))
        .route("/api/check-duplicate", post(extract::check_duplicate))
        .route(
            "/api/properties",
            post(properties::create_property).get(properties::list_properties),
        )
        .route(
            "/api/properties/:id",
            get(properties::get_property)
                .put(properties::update_property)
                .delete(properties::delete_property),
        )
        .route(
            "/api/properties/:id/favorite",
            patch(properties::toggle_favorite),
        )
        .route("/api/properties/:id/tags", patch(properties::update_tags))
        .route(
            "/api/upload-image/:id",
            post(images::upload_image).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/api/property-images/:id",
            get(images::get_property_images).delete(images::delete_property_image),
        )
        .route("/api/stats", get(stats::get_stats))
        .nest_service(&public_prefix, ServeDir::new(upload_dir))
        .with_state(app_state)
        .layer(from_fn(middleware::request_logging_middleware))
        .layer(cors)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::db::{create_database, Database, UnavailableDatabase};
    use crate::storage::LocalStorage;
    use crate::util::config::{Config, DatabaseConfig, ImageConfig};
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use serde_json::Value;
    use std::path::Path;
    use std::sync::Arc;
    use tower::ServiceExt;

    pub(crate) const SAMPLE_MESSAGE: &str = "2BHK for rent in Borivali West, 850 sqft, semi-furnished, \
        35000 per month, Contact: 9876543210";

    pub(crate) async fn test_state(dir: &Path) -> AppState {
        let upload_dir = dir.join("uploads");
        let config = Config {
            database: DatabaseConfig {
                url: "sqlite::memory:".to_string(),
                ..Default::default()
            },
            images: ImageConfig {
                upload_dir: upload_dir.display().to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let database: Arc<dyn Database> = create_database(&config.database).await.unwrap();
        let storage = Arc::new(LocalStorage::new(&upload_dir, "/uploads").unwrap());
        AppState::new(config, database, storage)
    }

    pub(crate) async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response: Response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };
        (status, body)
    }

    pub(crate) fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    pub(crate) fn empty_request(method: &str, uri: &str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap()
    }

    pub(crate) async fn create_listing(app: &Router, body: Value) -> String {
        let (status, body) = send(app, json_request("POST", "/api/properties", body)).await;
        assert_eq!(status, StatusCode::OK, "{}", body);
        body["id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn test_request_id_header_is_attached() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let response = app.oneshot(empty_request("GET", "/health")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(middleware::REQUEST_ID_HEADER));
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin_by_default() {
        let dir = tempfile::tempdir().unwrap();
        let app = routes(test_state(dir.path()).await);

        let request = Request::builder()
            .method("GET")
            .uri("/health")
            .header("origin", "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "*"
        );
    }

    #[tokio::test]
    async fn test_uploaded_files_are_served_statically() {
        let dir = tempfile::tempdir().unwrap();
        let state = test_state(dir.path()).await;
        state
            .images
            .storage()
            .put("static-check.txt", b"hello")
            .await
            .unwrap();
        let app = routes(state);

        let response = app
            .oneshot(empty_request("GET", "/uploads/static-check.txt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"hello");
    }

    fn origin_request(origin: &str) -> Request<Body> {
        Request::builder()
            .method("GET")
            .uri("/health")
            .header("origin", origin)
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn test_explicit_origins_are_parsed() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = test_state(dir.path()).await;
        let mut config = (*state.config).clone();
        config.cors = CorsConfig {
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "not a header\n".to_string(),
            ],
        };
        state.config = Arc::new(config);
        let app = routes(state);

        // 无效项被跳过，有效项仍然生效
        let response = app
            .clone()
            .oneshot(origin_request("http://localhost:3000"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("access-control-allow-origin").unwrap(),
            "http://localhost:3000"
        );

        let response = app
            .oneshot(origin_request("http://evil.example"))
            .await
            .unwrap();
        assert!(response
            .headers()
            .get("access-control-allow-origin")
            .is_none());
    }

    #[tokio::test]
    async fn test_unreachable_store_returns_500() {
        let dir = tempfile::tempdir().unwrap();
        let upload_dir = dir.path().join("uploads");
        let config = Config {
            images: ImageConfig {
                upload_dir: upload_dir.display().to_string(),
                ..Default::default()
            },
            ..Default::default()
        };
        let database: Arc<dyn Database> = Arc::new(UnavailableDatabase::new("connection refused"));
        let storage = Arc::new(LocalStorage::new(&upload_dir, "/uploads").unwrap());
        let app = routes(AppState::new(config, database, storage));

        let (status, body) = send(&app, empty_request("GET", "/api/properties")).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Database unavailable"), "{}", detail);
        assert!(detail.contains("connection refused"));

        let (status, body) = send(
            &app,
            json_request("POST", "/api/properties", serde_json::json!({ "raw_message": SAMPLE_MESSAGE })),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["detail"].as_str().unwrap().starts_with("Database unavailable"));
    }
}
