#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, Response};
use axum::Router;
use cropadvisor_auth::{AuthFlow, CredentialStore, PasswordScheme, SessionManager, SessionOptions};
use cropadvisor_backend::build_router;
use cropadvisor_backend::state::{AppState, CookieSettings};
use cropadvisor_model::{CropClassifier, FixedClassifier};
use cropadvisor_translate::{TranslateError, TranslationGateway, Translator};
use tempfile::TempDir;
use tower::util::ServiceExt;

pub const COOKIE: &str = "cropadvisor_session";

/// Translator that tags text with the target and counts calls.
#[derive(Default)]
pub struct Recording {
    pub calls: AtomicUsize,
}

impl Recording {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Translator for Recording {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("[{target}] {text}"))
    }
}

pub struct TestApp {
    pub state: Arc<AppState>,
    pub router: Router,
    pub dir: TempDir,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with(
            Arc::new(FixedClassifier::new("Rice")),
            TranslationGateway::disabled(),
        )
    }

    pub fn with(classifier: Arc<dyn CropClassifier>, translator: TranslationGateway) -> Self {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = Arc::new(CredentialStore::new(dir.path().join("users.json")));
        let sessions = Arc::new(SessionManager::new(SessionOptions::default()));
        let auth = AuthFlow::new(store, sessions, PasswordScheme::default());
        let state = Arc::new(AppState::new(
            auth,
            classifier,
            translator,
            CookieSettings::default(),
        ));
        let router = build_router(state.clone());
        Self { state, router, dir }
    }

    pub async fn send(&self, req: Request<Body>) -> Response<Body> {
        self.router.clone().oneshot(req).await.expect("oneshot")
    }

    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder().method(Method::GET).uri(uri);
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
        }
        self.send(builder.body(Body::empty()).unwrap()).await
    }

    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn post_json(
        &self,
        uri: &str,
        body: serde_json::Value,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let mut builder = Request::builder()
            .method(Method::POST)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json");
        if let Some(token) = cookie {
            builder = builder.header(header::COOKIE, format!("{COOKIE}={token}"));
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    /// Sign up and log in, returning the session token.
    pub async fn login_as(&self, username: &str, password: &str) -> String {
        let creds = format!("username={username}&password={password}");
        self.post_form("/signup", &creds, None).await;
        let resp = self.post_form("/login", &creds, None).await;
        session_from(&resp).expect("login should set a session cookie")
    }
}

/// Token set by the response's session cookie, if any.
pub fn session_from(resp: &Response<Body>) -> Option<String> {
    resp.headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| cookie::Cookie::parse(v.to_string()).ok())
        .find(|c| c.name() == COOKIE)
        .map(|c| c.value().to_string())
}

pub async fn body_string(resp: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .expect("body");
    String::from_utf8(bytes.to_vec()).expect("utf8 body")
}

pub async fn body_json(resp: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_string(resp).await).expect("json body")
}
