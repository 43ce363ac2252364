//! Best-effort text translation.
//!
//! [`TranslationGateway`] never fails: English targets are returned as-is and
//! any translator error falls back to the original text.

use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tracing::debug;

mod google;
mod languages;

pub use google::GoogleTranslator;
pub use languages::{is_english, language_code, ENGLISH_ALIASES};

/// Reasons a translation attempt failed. Only visible to [`Translator`]
/// callers; the gateway swallows all of them.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("translation request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("translation service returned status {0}")]
    Status(u16),
    #[error("unexpected translation response: {0}")]
    MalformedResponse(String),
    #[error("unsupported target language: {0}")]
    UnsupportedLanguage(String),
}

/// A backend able to translate text into a target language.
#[async_trait::async_trait]
pub trait Translator: Send + Sync + 'static {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError>;
}

/// Front door used by request handlers.
#[derive(Clone, Default)]
pub struct TranslationGateway {
    translator: Option<Arc<dyn Translator>>,
}

impl std::fmt::Debug for TranslationGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TranslationGateway")
            .field("enabled", &self.translator.is_some())
            .finish()
    }
}

impl TranslationGateway {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self {
            translator: Some(translator),
        }
    }

    /// Gateway that echoes every input.
    pub fn disabled() -> Self {
        Self { translator: None }
    }

    /// Build the HTTP-backed gateway, or a disabled one when `enabled` is false.
    pub fn from_settings(enabled: bool, endpoint: &str, timeout: Duration) -> Self {
        if !enabled {
            return Self::disabled();
        }
        match GoogleTranslator::new(endpoint, timeout) {
            Ok(t) => Self::new(Arc::new(t)),
            Err(error) => {
                tracing::warn!(%error, "translation client unavailable; translations disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.translator.is_some()
    }

    /// Translate `text` into `lang`, returning `text` unchanged for English
    /// targets, blank input, a disabled gateway, or any failure.
    pub async fn translate(&self, text: &str, lang: &str) -> String {
        if is_english(lang) || text.trim().is_empty() {
            return text.to_string();
        }
        let Some(translator) = &self.translator else {
            return text.to_string();
        };
        match translator.translate(text, lang).await {
            Ok(out) => out,
            Err(error) => {
                debug!(%error, lang, "translation unavailable; returning original text");
                text.to_string()
            }
        }
    }
}
