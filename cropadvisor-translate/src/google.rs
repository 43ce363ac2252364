use std::time::Duration;

use serde_json::Value;

use crate::languages::language_code;
use crate::{TranslateError, Translator};

/// Client for the public Google Translate `translate_a/single` endpoint.
#[derive(Debug, Clone)]
pub struct GoogleTranslator {
    http: reqwest::Client,
    endpoint: String,
}

impl GoogleTranslator {
    /// Build a client whose every request is bounded by `timeout`.
    pub fn new(endpoint: impl Into<String>, timeout: Duration) -> Result<Self, TranslateError> {
        let http = reqwest::Client::builder()
            .user_agent(concat!("cropadvisor/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;
        Ok(Self {
            http,
            endpoint: endpoint.into(),
        })
    }
}

#[async_trait::async_trait]
impl Translator for GoogleTranslator {
    async fn translate(&self, text: &str, target: &str) -> Result<String, TranslateError> {
        let code = language_code(target);
        if code.is_empty() {
            return Err(TranslateError::UnsupportedLanguage(target.to_string()));
        }

        let resp = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", code),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = resp.status();
        if status.as_u16() == 400 {
            return Err(TranslateError::UnsupportedLanguage(target.to_string()));
        }
        if !status.is_success() {
            return Err(TranslateError::Status(status.as_u16()));
        }

        let body: Value = resp.json().await?;
        parse_response(&body)
    }
}

/// Join the translated segments of a `translate_a/single` reply.
///
/// The reply is a nested array whose first element lists
/// `[translated, original, ...]` segments.
pub(crate) fn parse_response(body: &Value) -> Result<String, TranslateError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| TranslateError::MalformedResponse("missing segment list".into()))?;

    let mut out = String::new();
    for seg in segments {
        if let Some(piece) = seg.get(0).and_then(Value::as_str) {
            out.push_str(piece);
        }
    }
    if out.is_empty() {
        return Err(TranslateError::MalformedResponse("no translated text".into()));
    }
    Ok(out)
}
