use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form};
use axum::response::Json;
use serde_json::{json, Value};

use super::dto::Credentials;
use crate::{error::ApiError, state::AppState};

pub const SIGNUP_SUCCESS_MESSAGE: &str = "✅ Account created successfully!";

/// POST /signup
/// Accepts form fields { username, password } and registers a new account.
/// Expected failures (duplicate or empty username) come back as
/// `{status: "error", message}` with 200.
pub async fn signup(
    Extension(state): Extension<Arc<AppState>>,
    form: Result<Form<Credentials>, FormRejection>,
) -> Result<Json<Value>, ApiError> {
    let Form(dto) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;

    // File IO and hashing run off the async workers.
    let auth = state.auth.clone();
    let result = tokio::task::spawn_blocking(move || auth.signup(&dto.username, &dto.password))
        .await
        .map_err(|e| ApiError::unexpected(format!("signup task failed: {e}")))?;

    match result {
        Ok(()) => Ok(Json(
            json!({ "status": "success", "message": SIGNUP_SUCCESS_MESSAGE }),
        )),
        Err(e) if e.is_user_error() => Ok(Json(
            json!({ "status": "error", "message": e.user_message() }),
        )),
        Err(e) => Err(e.into()),
    }
}
