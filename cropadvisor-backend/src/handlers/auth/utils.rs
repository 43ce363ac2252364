use axum::http::{header::SET_COOKIE, HeaderMap, HeaderValue};
use axum::response::Response;
use cookie::{Cookie, SameSite};
use cropadvisor_auth::Session;
use tracing::debug;

use crate::{
    error::ApiError,
    state::{AppState, CookieSettings},
};

/// Extract the raw session token from the request cookies.
pub fn session_token(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
    headers
        .get_all("cookie")
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find_map(|cookies| {
            cookies.split(';').find_map(|c| {
                Cookie::parse(c.trim())
                    .ok()
                    .filter(|parsed| parsed.name() == cookie_name)
                    .map(|parsed| parsed.value().to_string())
            })
        })
        .filter(|token| !token.is_empty())
}

/// Look up the live session for the request, authenticated or not.
pub fn current_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    let token = session_token(headers, &state.cookies.name)?;
    let session = state.sessions().current(&token);
    if session.is_none() {
        debug!("session cookie presented but no live session matches");
    }
    session
}

/// Require an authenticated session, otherwise the caller is sent back to
/// the login page.
pub fn require_session(state: &AppState, headers: &HeaderMap) -> Result<Session, ApiError> {
    current_session(state, headers)
        .filter(Session::is_authenticated)
        .ok_or(ApiError::LoginRequired)
}

/// Cookie carrying a session token.
pub fn session_cookie(settings: &CookieSettings, token: String) -> Cookie<'static> {
    Cookie::build((settings.name.clone(), token))
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(SameSite::Lax)
        .build()
}

/// Expired cookie that makes the client drop its session token.
pub fn cleared_session_cookie(settings: &CookieSettings) -> Cookie<'static> {
    let mut cookie = session_cookie(settings, String::new());
    cookie.make_removal();
    cookie
}

/// Append a `Set-Cookie` header to a response.
pub fn append_cookie(resp: &mut Response, cookie: &Cookie<'_>) -> Result<(), ApiError> {
    let value = HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ApiError::unexpected(format!("invalid cookie header: {e}")))?;
    resp.headers_mut().append(SET_COOKIE, value);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(cookie: &str) -> HeaderMap {
        let mut h = HeaderMap::new();
        h.insert("cookie", HeaderValue::from_str(cookie).unwrap());
        h
    }

    #[test]
    fn finds_named_cookie_among_others() {
        let h = headers_with("theme=dark; cropadvisor_session=abc123; other=1");
        assert_eq!(
            session_token(&h, "cropadvisor_session").as_deref(),
            Some("abc123")
        );
        assert_eq!(session_token(&h, "missing"), None);
    }

    #[test]
    fn empty_token_counts_as_absent() {
        let h = headers_with("cropadvisor_session=");
        assert_eq!(session_token(&h, "cropadvisor_session"), None);
    }

    #[test]
    fn session_cookie_attributes() {
        let settings = CookieSettings {
            name: "sid".into(),
            secure: true,
        };
        let rendered = session_cookie(&settings, "tok".into()).to_string();
        assert!(rendered.starts_with("sid=tok"));
        assert!(rendered.contains("HttpOnly"));
        assert!(rendered.contains("SameSite=Lax"));
        assert!(rendered.contains("Secure"));
        assert!(rendered.contains("Path=/"));

        let cleared = cleared_session_cookie(&settings).to_string();
        assert!(cleared.starts_with("sid=;"));
        assert!(cleared.contains("Max-Age=0"));
    }
}
