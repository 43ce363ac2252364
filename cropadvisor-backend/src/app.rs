use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use tower_http::timeout::TimeoutLayer;

use crate::config_helpers::service_unavailable_handler;
use crate::handlers::{auth, index, predict, translate};
use crate::state::AppState;

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build the primary axum router with the provided shared application state.
pub fn build_router(state: Arc<AppState>) -> Router {
    build_router_with_timeout(state, DEFAULT_REQUEST_TIMEOUT)
}

/// Same as [`build_router`] with an explicit per-request deadline.
pub fn build_router_with_timeout(state: Arc<AppState>, timeout: Duration) -> Router {
    Router::new()
        .route("/", get(index::index))
        .route("/signup", get(index::signup_page).post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", get(auth::logout))
        .route("/set_language", post(auth::set_language))
        .route("/predict_page", get(predict::predict_page))
        .route("/predict", post(predict::predict))
        .route("/translate", post(translate::translate))
        .route("/health", get(health_handler))
        .route("/ready", get(ready_handler))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(Extension(state))
}

/// Router served when the application state could not be built. Liveness
/// stays green, readiness reports 503 and every other path gets the
/// maintenance page.
pub fn build_maintenance_router(reason: &str) -> Router {
    tracing::info!(%reason, "starting maintenance router");
    Router::new()
        .route("/health", get(health_handler))
        .route(
            "/ready",
            get(|| async { (StatusCode::SERVICE_UNAVAILABLE, "maintenance") }),
        )
        .fallback(service_unavailable_handler)
}

async fn health_handler() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn ready_handler(Extension(_state): Extension<Arc<AppState>>) -> impl IntoResponse {
    // Reaching this handler means the full state, model included, was built.
    (StatusCode::OK, "OK")
}
