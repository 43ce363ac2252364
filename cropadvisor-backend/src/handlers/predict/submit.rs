use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::rejection::FormRejection;
use axum::extract::{Extension, Form};
use axum::http::HeaderMap;
use axum::response::Html;
use cropadvisor_model::{crop_info, SoilSample};
use tracing::info;

use crate::handlers::auth::utils::require_session;
use crate::pages::{self, TranslatedInfo};
use crate::validation::{to_payload, ValidationIssue};
use crate::{error::ApiError, state::AppState};

/// POST /predict
/// Form fields { N, P, K, temperature, humidity, ph, rainfall }. The session
/// check runs before the body is looked at, so anonymous clients are
/// redirected even when they send garbage.
pub async fn predict(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Result<Html<String>, ApiError> {
    let session = require_session(&state, &headers)?;
    let Form(fields) = form.map_err(|e| ApiError::bad_request(e.body_text()))?;

    let sample = SoilSample::from_form(&fields).map_err(|errs| {
        let issues: Vec<ValidationIssue> = errs.iter().map(ValidationIssue::from).collect();
        ApiError::Validation(to_payload(&issues))
    })?;

    let crop = state.classifier.predict(&sample)?;
    let advice = crop_info(&crop);
    info!(
        username = session.username.as_deref().unwrap_or("-"),
        %crop,
        "crop recommended"
    );

    let lang = session.language.as_str();
    let (tip, fertilizer) = tokio::join!(
        state.translator.translate(advice.tip, lang),
        state.translator.translate(advice.fertilizer, lang),
    );

    Ok(Html(pages::result_page(
        &crop,
        &TranslatedInfo { tip, fertilizer },
        lang,
    )))
}
