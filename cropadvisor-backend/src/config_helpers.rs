use std::net::{IpAddr, Ipv6Addr, SocketAddr};
use std::time::Duration;

use axum::{http::StatusCode, response::Html, response::IntoResponse};
use cropadvisor_auth::{PasswordError, PasswordScheme, SessionOptions};
use cropadvisor_config::Config;
use cropadvisor_translate::TranslationGateway;

/// Build session manager options from application config.
pub fn session_options_from_config(cfg: &Config) -> SessionOptions {
    let options = SessionOptions::default()
        .with_anonymous_ttl(Duration::from_secs(cfg.session.anonymous_ttl_minutes * 60))
        .with_max_anonymous(cfg.session.max_anonymous_sessions);
    match cfg.session.idle_ttl_minutes {
        0 => options,
        minutes => options.with_idle_ttl(Duration::from_secs(minutes * 60)),
    }
}

/// Resolve the password scheme used for new credential records.
pub fn password_scheme_from_config(cfg: &Config) -> Result<PasswordScheme, PasswordError> {
    PasswordScheme::from_name(&cfg.storage.password_scheme)
}

/// Build the translation gateway from application config.
pub fn translation_from_config(cfg: &Config) -> TranslationGateway {
    TranslationGateway::from_settings(
        cfg.translation.enabled,
        &cfg.translation.endpoint,
        Duration::from_millis(cfg.translation.timeout_ms),
    )
}

/// Parse host:port into a SocketAddr, with fallback to 0.0.0.0.
pub fn parse_bind_address(host: &str, port: u16) -> SocketAddr {
    host.parse::<IpAddr>()
        .map(|ip| SocketAddr::new(ip, port))
        .or_else(|_| host.parse::<SocketAddr>())
        .or_else(|_| host.parse::<Ipv6Addr>().map(|ip| SocketAddr::new(IpAddr::V6(ip), port)))
        .unwrap_or_else(|_| SocketAddr::from(([0, 0, 0, 0], port)))
}

/// Fallback handler returning a maintenance HTML page with 503 status.
pub async fn service_unavailable_handler() -> impl IntoResponse {
    let body = Html(
        "<html><head><title>Service Unavailable</title></head>\
         <body><h1>Service Unavailable</h1>\
         <p>The crop model could not be loaded. \
         Please try again later.</p></body></html>",
    );
    (StatusCode::SERVICE_UNAVAILABLE, body)
}
