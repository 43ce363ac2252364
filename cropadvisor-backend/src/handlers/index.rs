use std::sync::Arc;

use axum::extract::Extension;
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Redirect, Response};
use cropadvisor_auth::flow::PROTECTED_LANDING;

use crate::handlers::auth::utils::current_session;
use crate::{pages, state::AppState};

/// GET /
/// Logged-in clients skip straight to the recommendation form.
pub async fn index(Extension(state): Extension<Arc<AppState>>, headers: HeaderMap) -> Response {
    match current_session(&state, &headers) {
        Some(session) if session.is_authenticated() => {
            Redirect::to(PROTECTED_LANDING).into_response()
        }
        _ => Html(pages::login_page()).into_response(),
    }
}

/// GET /signup
pub async fn signup_page() -> Html<String> {
    Html(pages::signup_page())
}
