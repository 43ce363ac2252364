use std::sync::Arc;

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::Json;
use cropadvisor_auth::DEFAULT_LANGUAGE;
use serde_json::{json, Value};

use crate::handlers::auth::utils::current_session;
use crate::{error::ApiError, state::AppState};

#[derive(Debug, serde::Deserialize)]
pub struct TranslateRequest {
    #[serde(default)]
    pub text: String,
    pub lang: Option<String>,
}

/// POST /translate
/// Accepts { text, lang } and returns { translated }. Without `lang` the
/// session's language is used. Translation failures echo `text`.
pub async fn translate(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    body: Option<Json<Value>>,
) -> Result<Json<Value>, ApiError> {
    let payload = body
        .ok_or_else(|| ApiError::bad_request("missing request body"))?
        .0;
    let dto: TranslateRequest = serde_json::from_value(payload)?;

    let lang = match dto.lang {
        Some(lang) => lang,
        None => current_session(&state, &headers)
            .map(|s| s.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string()),
    };

    let translated = state.translator.translate(&dto.text, &lang).await;
    Ok(Json(json!({ "translated": translated })))
}
