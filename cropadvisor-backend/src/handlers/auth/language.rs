use std::sync::Arc;

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

use super::dto::SetLanguage;
use super::utils::{append_cookie, session_cookie, session_token};
use crate::{error::ApiError, state::AppState};

/// POST /set_language
/// Accepts { lang } (default "english"). The value is stored as-is on the
/// client's session; clients without one get an anonymous session so the
/// choice survives until login.
pub async fn set_language(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<serde_json::Value>>,
) -> Result<Response, ApiError> {
    let dto: SetLanguage = match body {
        Some(Json(payload)) => serde_json::from_value(payload)?,
        None => SetLanguage::default(),
    };

    let token = session_token(&headers, &state.cookies.name);
    let updated = token
        .as_deref()
        .is_some_and(|t| state.sessions().set_language(t, &dto.lang));

    let mut resp = Json(json!({ "status": "ok" })).into_response();
    if !updated {
        let id = state.sessions().anonymous(&dto.lang);
        append_cookie(&mut resp, &session_cookie(&state.cookies, id))?;
    }
    Ok(resp)
}
