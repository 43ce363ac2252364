//! Signup, login and logout orchestration over the credential store and the
//! session manager.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::session::SessionManager;
use crate::store::{CredentialStore, StoreError};
use crate::{verify_password, PasswordError, PasswordScheme};

/// Landing page handed back to clients after a successful login.
pub const PROTECTED_LANDING: &str = "/predict_page";

/// Reasons a signup or login can fail.
///
/// `NotFound` and `BadCredentials` are reported separately to the user. This
/// reveals whether a username is registered.
#[derive(Debug, Error)]
pub enum AuthFlowError {
    #[error("user already exists")]
    AlreadyExists,
    #[error("user not found")]
    NotFound,
    #[error("incorrect password")]
    BadCredentials,
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Storage(#[from] StoreError),
    #[error(transparent)]
    Password(#[from] PasswordError),
}

impl AuthFlowError {
    /// Message shown to the end user for the expected failure cases.
    pub fn user_message(&self) -> String {
        match self {
            Self::AlreadyExists => "⚠️ User already exists!".to_string(),
            Self::NotFound => "❌ User not found!".to_string(),
            Self::BadCredentials => "❌ Incorrect password!".to_string(),
            Self::InvalidInput(reason) => format!("⚠️ {reason}"),
            Self::Storage(_) | Self::Password(_) => {
                "❌ Something went wrong, please try again.".to_string()
            }
        }
    }

    /// Whether this is an expected, user-caused failure rather than an
    /// infrastructure fault.
    pub fn is_user_error(&self) -> bool {
        !matches!(self, Self::Storage(_) | Self::Password(_))
    }
}

/// Result of a successful login.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginOutcome {
    pub session_id: String,
    pub redirect: &'static str,
}

/// Signup/login orchestration.
#[derive(Debug, Clone)]
pub struct AuthFlow {
    store: Arc<CredentialStore>,
    sessions: Arc<SessionManager>,
    scheme: PasswordScheme,
}

impl AuthFlow {
    pub fn new(
        store: Arc<CredentialStore>,
        sessions: Arc<SessionManager>,
        scheme: PasswordScheme,
    ) -> Self {
        Self {
            store,
            sessions,
            scheme,
        }
    }

    pub fn store(&self) -> &CredentialStore {
        &self.store
    }

    pub fn sessions(&self) -> &SessionManager {
        &self.sessions
    }

    /// Register a new user. Nothing is persisted on failure.
    pub fn signup(&self, username: &str, password: &str) -> Result<(), AuthFlowError> {
        let username = username.trim();
        let password = password.trim();
        if username.is_empty() {
            return Err(AuthFlowError::InvalidInput(
                "Username must not be empty!".into(),
            ));
        }

        self.store.update(|creds| {
            if creds.contains_key(username) {
                return Err(AuthFlowError::AlreadyExists);
            }
            let digest = self.scheme.hash(password)?;
            creds.insert(username.to_string(), digest);
            Ok(())
        })?;

        info!(username, "account created");
        Ok(())
    }

    /// Check credentials and open a fresh session.
    ///
    /// `prior_session` is the token the client presented, if any; its
    /// language preference is kept and the token itself is retired.
    pub fn login(
        &self,
        username: &str,
        password: &str,
        prior_session: Option<&str>,
    ) -> Result<LoginOutcome, AuthFlowError> {
        let username = username.trim();
        let password = password.trim();

        let stored = self
            .store
            .lookup(username)
            .ok_or(AuthFlowError::NotFound)?;
        if !verify_password(password, &stored) {
            return Err(AuthFlowError::BadCredentials);
        }

        let session_id = self.sessions.login(username, prior_session);
        // No background sweeper; idle sessions are reaped on login.
        let purged = self.sessions.purge_expired();
        info!(username, purged, "login succeeded");
        Ok(LoginOutcome {
            session_id,
            redirect: PROTECTED_LANDING,
        })
    }

    /// End the client's session, if it has one.
    pub fn logout(&self, session_id: Option<&str>) {
        if let Some(ended) = session_id.and_then(|id| self.sessions.end(id)) {
            info!(username = ended.username.as_deref().unwrap_or("-"), "logged out");
        }
    }
}
