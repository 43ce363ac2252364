use std::sync::Arc;

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::Html;

use crate::handlers::auth::utils::require_session;
use crate::{error::ApiError, pages, state::AppState};

/// GET /predict_page
pub async fn predict_page(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Html<String>, ApiError> {
    let session = require_session(&state, &headers)?;
    let username = session.username.as_deref().unwrap_or_default();
    Ok(Html(pages::predict_page(username, &session.language)))
}
