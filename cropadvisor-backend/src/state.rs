use std::sync::Arc;

use cropadvisor_auth::{AuthFlow, CredentialStore, PasswordError, SessionManager};
use cropadvisor_config::Config;
use cropadvisor_model::{CropClassifier, ForestModel, ModelError};
use cropadvisor_translate::TranslationGateway;
use thiserror::Error;

use crate::config_helpers::{
    password_scheme_from_config, session_options_from_config, translation_from_config,
};

/// Session cookie attributes taken from configuration.
#[derive(Debug, Clone)]
pub struct CookieSettings {
    pub name: String,
    pub secure: bool,
}

impl Default for CookieSettings {
    fn default() -> Self {
        Self {
            name: "cropadvisor_session".to_string(),
            secure: false,
        }
    }
}

/// Failures that keep the full application state from being assembled.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("failed to load crop model: {0}")]
    Model(#[from] ModelError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Shared application state passed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthFlow,
    pub classifier: Arc<dyn CropClassifier>,
    pub translator: TranslationGateway,
    pub cookies: CookieSettings,
}

impl AppState {
    /// Build a state container from its constituent parts.
    pub fn new(
        auth: AuthFlow,
        classifier: Arc<dyn CropClassifier>,
        translator: TranslationGateway,
        cookies: CookieSettings,
    ) -> Self {
        Self {
            auth,
            classifier,
            translator,
            cookies,
        }
    }

    /// Assemble the credential store, session manager, classifier and
    /// translator described by `cfg`.
    pub fn from_config(cfg: &Config) -> Result<Self, StartupError> {
        let classifier = ForestModel::from_path(&cfg.model.path)?;
        Self::with_classifier(cfg, Arc::new(classifier))
    }

    /// Like [`AppState::from_config`] but with a caller-supplied classifier.
    pub fn with_classifier(
        cfg: &Config,
        classifier: Arc<dyn CropClassifier>,
    ) -> Result<Self, StartupError> {
        let store = Arc::new(CredentialStore::new(&cfg.storage.users_file));
        let sessions = Arc::new(SessionManager::new(session_options_from_config(cfg)));
        let auth = AuthFlow::new(store, sessions, password_scheme_from_config(cfg)?);

        Ok(Self::new(
            auth,
            classifier,
            translation_from_config(cfg),
            CookieSettings {
                name: cfg.session.cookie_name.clone(),
                secure: cfg.session.secure_cookie,
            },
        ))
    }

    pub fn sessions(&self) -> &SessionManager {
        self.auth.sessions()
    }
}
