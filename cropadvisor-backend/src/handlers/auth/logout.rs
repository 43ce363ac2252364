use std::sync::Arc;

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};

use super::utils::{append_cookie, cleared_session_cookie, session_token};
use crate::{error::ApiError, state::AppState};

/// GET /logout
/// End the server-side session, clear the cookie and go back to the login page.
pub async fn logout(
    Extension(state): Extension<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let token = session_token(&headers, &state.cookies.name);
    state.auth.logout(token.as_deref());

    let mut resp = Redirect::to("/").into_response();
    append_cookie(&mut resp, &cleared_session_cookie(&state.cookies))?;
    Ok(resp)
}
