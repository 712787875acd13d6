//! Community project showcase backend.
//!
//! A JSON-file project store behind a small REST API, plus a sync client that
//! mirrors the store with a local cache.

pub mod api;
pub mod client;
pub mod config;
pub mod cors;
pub mod errors;
pub mod models;
pub mod slug;
pub mod storage;
pub mod validation;

use std::any::Any;
use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{any, get},
    Json, Router,
};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use config::Config;
use errors::{codes, ErrorResponse, GENERIC_SERVER_ERROR};
use storage::ProjectStore;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ProjectStore>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            store: Arc::new(ProjectStore::new(config.data_path.clone())),
            config: Arc::new(config),
        }
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let public_dir = state.config.public_dir.clone();

    // API routes
    let api_routes = Router::new()
        .route(
            "/projects",
            get(api::list_projects).post(api::create_project),
        )
        .route("/projects/{slug}", get(api::get_project))
        .route("/{*rest}", any(api::unknown_endpoint))
        .layer(DefaultBodyLimit::max(api::MAX_BODY_BYTES))
        .layer(middleware::from_fn(cors::cors_layer));

    let router = Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .fallback_service(ServeDir::new(public_dir))
        .with_state(state);

    with_service_layers(router)
}

/// Request tracing and panic recovery for a finished router.
pub fn with_service_layers(router: Router) -> Router {
    router.layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(CatchPanicLayer::custom(panic_response)),
    )
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");
    tracing::error!("Handler panicked: {}", detail);

    let body = ErrorResponse {
        code: codes::INTERNAL_ERROR.to_string(),
        message: GENERIC_SERVER_ERROR.to_string(),
    };
    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
