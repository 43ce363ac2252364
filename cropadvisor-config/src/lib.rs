use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;

/// Pre-compiled regex for hostname validation (compiled once at first use)
static HOSTNAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9\.]*[a-zA-Z0-9]$").unwrap());

/// Pre-compiled regex for cookie names (RFC 6265 token characters)
static COOKIE_NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z0-9!#$%&'*+\-.^_`|~]+$").unwrap());

/// Password digest schemes understood by the credential store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordSchemeName {
    Sha256,
    Argon2,
}

impl PasswordSchemeName {
    /// Resolve a configured scheme name, ignoring case and surrounding
    /// whitespace. `argon2id` is accepted as an alias of `argon2`.
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "sha256" => Some(Self::Sha256),
            "argon2" | "argon2id" => Some(Self::Argon2),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RawConfigFile {
    #[serde(default)]
    pub server: Option<ServerSection>,
    #[serde(default)]
    pub logging: Option<LoggingSection>,
    #[serde(default)]
    pub storage: Option<StorageSection>,
    #[serde(default)]
    pub session: Option<SessionSection>,
    #[serde(default)]
    pub model: Option<ModelSection>,
    #[serde(default)]
    pub translation: Option<TranslationSection>,
}

#[derive(Debug, Deserialize)]
pub struct ServerSection {
    #[serde(default)]
    pub host: Option<String>,
    #[serde(default)]
    pub port: Option<u16>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct LoggingSection {
    #[serde(default)]
    pub level: Option<String>,
    #[serde(default)]
    pub json: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct StorageSection {
    #[serde(default)]
    pub users_file: Option<String>,
    #[serde(default)]
    pub password_scheme: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct SessionSection {
    #[serde(default)]
    pub cookie_name: Option<String>,
    #[serde(default)]
    pub idle_ttl_minutes: Option<u64>,
    #[serde(default)]
    pub anonymous_ttl_minutes: Option<u64>,
    #[serde(default)]
    pub max_anonymous_sessions: Option<usize>,
    #[serde(default)]
    pub secure_cookie: Option<bool>,
}

#[derive(Debug, Deserialize)]
pub struct ModelSection {
    #[serde(default)]
    pub path: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TranslationSection {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub endpoint: Option<String>,
    #[serde(default)]
    pub timeout_ms: Option<u64>,
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("Io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Parse error: {0}")]
    Parse(String),
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Load a RawConfigFile from a path. The format is inferred from the extension: .toml, .yaml/.yml, .json
pub fn load_raw_from_file<P: AsRef<Path>>(path: P) -> Result<RawConfigFile, ConfigError> {
    let path = path.as_ref();
    let s = fs::read_to_string(path)?;
    let ext = path
        .extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_ascii_lowercase());
    parse_config_str(&s, ext.as_deref())
}

#[inline]
fn parse_config_str(s: &str, ext: Option<&str>) -> Result<RawConfigFile, ConfigError> {
    match ext {
        #[cfg(feature = "toml")]
        Some("toml") => toml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        #[cfg(feature = "yaml")]
        Some("yaml" | "yml") => {
            serde_yaml::from_str(s).map_err(|e| ConfigError::Parse(e.to_string()))
        }
        #[cfg(feature = "json")]
        Some("json") => serde_json::from_str(s).map_err(|e| ConfigError::Parse(e.to_string())),
        _ => parse_config_auto(s),
    }
}

/// Try each enabled format in turn; the first one that parses wins.
#[inline]
fn parse_config_auto(s: &str) -> Result<RawConfigFile, ConfigError> {
    #[cfg(feature = "toml")]
    if let Ok(cfg) = toml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "json")]
    if let Ok(cfg) = serde_json::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(feature = "yaml")]
    if let Ok(cfg) = serde_yaml::from_str(s) {
        return Ok(cfg);
    }

    #[cfg(any(feature = "yaml", feature = "toml", feature = "json"))]
    {
        Err(ConfigError::Parse(
            "failed to parse config as any supported format".into(),
        ))
    }

    #[cfg(not(any(feature = "yaml", feature = "toml", feature = "json")))]
    {
        let _ = s;
        Err(ConfigError::Parse("no config format enabled".into()))
    }
}

/// Concrete application configuration with defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub storage: StorageConfig,
    pub session: SessionConfig,
    pub model: ModelConfig,
    pub translation: TranslationConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub request_timeout_secs: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub json: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StorageConfig {
    /// Path of the username → password-hash JSON file.
    pub users_file: String,
    /// Scheme used for newly created records, see [`PasswordSchemeName::parse`].
    pub password_scheme: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionConfig {
    pub cookie_name: String,
    /// Idle lifetime of a session; 0 disables expiry.
    pub idle_ttl_minutes: u64,
    /// Idle lifetime of sessions created without a login. Always enforced.
    pub anonymous_ttl_minutes: u64,
    /// Cap on live anonymous sessions; the oldest are evicted beyond it.
    pub max_anonymous_sessions: usize,
    pub secure_cookie: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModelConfig {
    /// Forest artifact; the default is the sample shipped with the backend,
    /// relative to the workspace root.
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranslationConfig {
    pub enabled: bool,
    pub endpoint: String,
    pub timeout_ms: u64,
}

pub const DEFAULT_TRANSLATE_ENDPOINT: &str =
    "https://translate.googleapis.com/translate_a/single";

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: "127.0.0.1".to_string(),
                port: 5000,
                request_timeout_secs: 30,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                json: false,
            },
            storage: StorageConfig {
                users_file: "users.json".to_string(),
                password_scheme: "sha256".to_string(),
            },
            session: SessionConfig {
                cookie_name: "cropadvisor_session".to_string(),
                idle_ttl_minutes: 0,
                anonymous_ttl_minutes: 30,
                max_anonymous_sessions: 1024,
                secure_cookie: false,
            },
            model: ModelConfig {
                path: "cropadvisor-backend/assets/crop_model.json".to_string(),
            },
            translation: TranslationConfig {
                enabled: true,
                endpoint: DEFAULT_TRANSLATE_ENDPOINT.to_string(),
                timeout_ms: 5000,
            },
        }
    }
}

#[inline]
fn parse_bool(s: &str) -> Result<bool, ()> {
    match s.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Ok(true),
        "0" | "false" | "no" | "n" | "off" => Ok(false),
        _ => Err(()),
    }
}

/// Helper macro to apply optional value if present
macro_rules! apply_opt {
    ($target:expr, $source:expr) => {
        if let Some(v) = $source {
            $target = v;
        }
    };
}

/// Load concrete `Config` from optional file and environment variables.
/// Environment variables take precedence over file values and defaults.
pub fn load_config<P: AsRef<Path>>(path: Option<P>) -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(p) = path {
        let raw = load_raw_from_file(p)?;
        apply_raw(&mut cfg, raw);
    }

    apply_env_overrides(&mut cfg)?;
    validate_config(&cfg)?;

    Ok(cfg)
}

fn apply_raw(cfg: &mut Config, raw: RawConfigFile) {
    if let Some(server) = raw.server {
        apply_opt!(cfg.server.host, server.host);
        apply_opt!(cfg.server.port, server.port);
        apply_opt!(cfg.server.request_timeout_secs, server.request_timeout_secs);
    }
    if let Some(logging) = raw.logging {
        apply_opt!(cfg.logging.level, logging.level);
        apply_opt!(cfg.logging.json, logging.json);
    }
    if let Some(storage) = raw.storage {
        apply_opt!(cfg.storage.users_file, storage.users_file);
        apply_opt!(cfg.storage.password_scheme, storage.password_scheme);
    }
    if let Some(session) = raw.session {
        apply_opt!(cfg.session.cookie_name, session.cookie_name);
        apply_opt!(cfg.session.idle_ttl_minutes, session.idle_ttl_minutes);
        apply_opt!(cfg.session.anonymous_ttl_minutes, session.anonymous_ttl_minutes);
        apply_opt!(cfg.session.max_anonymous_sessions, session.max_anonymous_sessions);
        apply_opt!(cfg.session.secure_cookie, session.secure_cookie);
    }
    if let Some(model) = raw.model {
        apply_opt!(cfg.model.path, model.path);
    }
    if let Some(t) = raw.translation {
        apply_opt!(cfg.translation.enabled, t.enabled);
        apply_opt!(cfg.translation.endpoint, t.endpoint);
        apply_opt!(cfg.translation.timeout_ms, t.timeout_ms);
    }
}

#[inline]
fn env_parse<T: std::str::FromStr>(key: &str) -> Result<Option<T>, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(v) => v
            .parse::<T>()
            .map(Some)
            .map_err(|e| ConfigError::Parse(format!("invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_bool(key: &str) -> Result<Option<bool>, ConfigError> {
    match env::var(key) {
        Ok(v) => parse_bool(&v)
            .map(Some)
            .map_err(|_| ConfigError::Parse(format!("invalid {}", key))),
        Err(_) => Ok(None),
    }
}

#[inline]
fn env_str(key: &str) -> Option<String> {
    env::var(key).ok()
}

/// Apply all environment variable overrides to config
fn apply_env_overrides(cfg: &mut Config) -> Result<(), ConfigError> {
    // Server
    if let Some(v) = env_str("CROPADVISOR_SERVER_HOST") {
        cfg.server.host = v;
    }
    if let Some(v) = env_parse::<u16>("CROPADVISOR_SERVER_PORT")? {
        cfg.server.port = v;
    }
    if let Some(v) = env_parse::<u64>("CROPADVISOR_REQUEST_TIMEOUT_SECS")? {
        cfg.server.request_timeout_secs = v;
    }

    // Logging
    if let Some(v) = env_str("CROPADVISOR_LOG_LEVEL") {
        cfg.logging.level = v;
    }
    if let Some(v) = env_bool("CROPADVISOR_LOG_JSON")? {
        cfg.logging.json = v;
    }

    // Storage
    if let Some(v) = env_str("CROPADVISOR_USERS_FILE") {
        cfg.storage.users_file = v;
    }
    if let Some(v) = env_str("CROPADVISOR_PASSWORD_SCHEME") {
        cfg.storage.password_scheme = v;
    }

    // Session
    if let Some(v) = env_str("CROPADVISOR_SESSION_COOKIE") {
        cfg.session.cookie_name = v;
    }
    if let Some(v) = env_parse::<u64>("CROPADVISOR_SESSION_IDLE_TTL_MINUTES")? {
        cfg.session.idle_ttl_minutes = v;
    }
    if let Some(v) = env_parse::<u64>("CROPADVISOR_SESSION_ANONYMOUS_TTL_MINUTES")? {
        cfg.session.anonymous_ttl_minutes = v;
    }
    if let Some(v) = env_parse::<usize>("CROPADVISOR_SESSION_MAX_ANONYMOUS")? {
        cfg.session.max_anonymous_sessions = v;
    }
    if let Some(v) = env_bool("CROPADVISOR_SESSION_SECURE_COOKIE")? {
        cfg.session.secure_cookie = v;
    }

    // Model
    if let Some(v) = env_str("CROPADVISOR_MODEL_PATH") {
        cfg.model.path = v;
    }

    // Translation
    if let Some(v) = env_bool("CROPADVISOR_TRANSLATION_ENABLED")? {
        cfg.translation.enabled = v;
    }
    if let Some(v) = env_str("CROPADVISOR_TRANSLATION_ENDPOINT") {
        cfg.translation.endpoint = v;
    }
    if let Some(v) = env_parse::<u64>("CROPADVISOR_TRANSLATION_TIMEOUT_MS")? {
        cfg.translation.timeout_ms = v;
    }

    Ok(())
}

/// Validate higher-level constraints on the resolved configuration.
pub fn validate_config(cfg: &Config) -> Result<(), ConfigError> {
    if cfg.server.port == 0 {
        return Err(ConfigError::Validation("server.port must be > 0".into()));
    }
    let host_ok = cfg.server.host.parse::<std::net::IpAddr>().is_ok()
        || HOSTNAME_REGEX.is_match(&cfg.server.host);
    if !host_ok {
        return Err(ConfigError::Validation(format!(
            "invalid server.host: {}",
            cfg.server.host
        )));
    }
    if cfg.server.request_timeout_secs == 0 {
        return Err(ConfigError::Validation(
            "server.request_timeout_secs must be > 0".into(),
        ));
    }

    if cfg.storage.users_file.trim().is_empty() {
        return Err(ConfigError::Validation(
            "storage.users_file must not be empty".into(),
        ));
    }
    if PasswordSchemeName::parse(&cfg.storage.password_scheme).is_none() {
        return Err(ConfigError::Validation(format!(
            "unsupported storage.password_scheme: {}",
            cfg.storage.password_scheme
        )));
    }

    if !COOKIE_NAME_REGEX.is_match(&cfg.session.cookie_name) {
        return Err(ConfigError::Validation(format!(
            "invalid session.cookie_name: {}",
            cfg.session.cookie_name
        )));
    }
    if cfg.session.anonymous_ttl_minutes == 0 {
        return Err(ConfigError::Validation(
            "session.anonymous_ttl_minutes must be > 0".into(),
        ));
    }
    if cfg.session.max_anonymous_sessions == 0 {
        return Err(ConfigError::Validation(
            "session.max_anonymous_sessions must be > 0".into(),
        ));
    }

    if cfg.model.path.trim().is_empty() {
        return Err(ConfigError::Validation("model.path must not be empty".into()));
    }

    if cfg.translation.enabled {
        match url::Url::parse(&cfg.translation.endpoint) {
            Ok(u) if u.scheme() == "http" || u.scheme() == "https" => {}
            _ => {
                return Err(ConfigError::Validation(format!(
                    "invalid translation.endpoint: {}",
                    cfg.translation.endpoint
                )))
            }
        }
        if cfg.translation.timeout_ms == 0 {
            return Err(ConfigError::Validation(
                "translation.timeout_ms must be > 0".into(),
            ));
        }
    }
    Ok(())
}
