use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form};
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;
use tracing::debug;

use super::dto::Credentials;
use super::utils::{append_cookie, session_cookie, session_token};
use crate::{error::ApiError, state::AppState};

/// POST /login
/// Accepts form fields { username, password }. On success a fresh session
/// token is issued in an HttpOnly cookie and the reply names the page to go
/// to next. Any token the client already held is retired, keeping its
/// language selection.
pub async fn login(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<Credentials>, FormRejection>,
) -> Result<Response, ApiError> {
    let Form(dto) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;
    let prior = session_token(&headers, &state.cookies.name);

    let auth = state.auth.clone();
    let result = tokio::task::spawn_blocking(move || {
        auth.login(&dto.username, &dto.password, prior.as_deref())
    })
    .await
    .map_err(|e| ApiError::unexpected(format!("login task failed: {e}")))?;

    let outcome = match result {
        Ok(outcome) => outcome,
        Err(e) if e.is_user_error() => {
            debug!(reason = %e, "login rejected");
            return Ok(Json(json!({ "status": "error", "message": e.user_message() }))
                .into_response());
        }
        Err(e) => return Err(e.into()),
    };

    let cookie = session_cookie(&state.cookies, outcome.session_id);
    let mut resp = Json(json!({ "status": "success", "redirect": outcome.redirect }))
        .into_response();
    append_cookie(&mut resp, &cookie)?;
    Ok(resp)
}
