//! Route configuration and setup.
//!
//! Media routes live under [`API_PREFIX`]; health checks in [health](health).

mod health;

use crate::constants::{API_PREFIX, OPENAPI_PATH};
use crate::handlers;
use crate::state::AppState;
use axum::{
    http::{HeaderValue, Method},
    routing::{delete, get, post},
    Json, Router,
};
use plucker_core::Config;
use plucker_infra::{request_id_middleware, security_headers_middleware};
use std::sync::Arc;
use std::time::Duration;
use tower::limit::ConcurrencyLimitLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use health::{health_check, liveness_check};

/// Setup all application routes
pub fn setup_routes(config: &Config, state: Arc<AppState>) -> Result<Router<()>, anyhow::Error> {
    let cors = setup_cors(config)?;

    tracing::info!(
        http_concurrency_limit = config.http_concurrency_limit,
        "HTTP concurrency limit layer enabled"
    );

    let mut app = public_routes()
        .merge(media_routes())
        .with_state(state)
        .merge(utoipa_rapidoc::RapiDoc::new(OPENAPI_PATH).path("/docs"));

    for root in config.roots().iter() {
        app = app.nest_service(
            &format!("{}/files/{}", API_PREFIX, root.name),
            ServeDir::new(&root.base_dir),
        );
    }

    let app = app
        .layer(ConcurrencyLimitLayer::new(config.http_concurrency_limit))
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.request_timeout_secs,
        )))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    Ok(app)
}

/// Setup CORS configuration
fn setup_cors(config: &Config) -> Result<CorsLayer, anyhow::Error> {
    let methods = [Method::GET, Method::POST, Method::DELETE, Method::OPTIONS];
    let cors = if config.cors_origins.iter().any(|o| o == "*") {
        tracing::warn!("CORS configured to allow all origins - not recommended for production");
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(methods)
            .allow_headers(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS origin: {}", e))?;

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(methods)
            .allow_headers(Any)
    };
    Ok(cors)
}

fn public_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/health", get(health_check))
        .route("/live", get(liveness_check))
        .route(
            OPENAPI_PATH,
            get(|| async { Json(crate::api_doc::get_openapi_spec()) }),
        )
}

fn media_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            &format!("{}/media-list", API_PREFIX),
            get(handlers::media_list::list_media),
        )
        .route(
            &format!("{}/delete", API_PREFIX),
            delete(handlers::media_delete::delete_media),
        )
        .route(
            &format!("{}/save", API_PREFIX),
            post(handlers::media_save::save_media),
        )
        .route(
            &format!("{}/metadata", API_PREFIX),
            get(handlers::metadata::get_metadata),
        )
        .route(
            &format!("{}/collections", API_PREFIX),
            get(handlers::collections::list_collections)
                .post(handlers::collections::create_collection),
        )
}
