use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use cropadvisor_auth::{AuthFlowError, StoreError};
use cropadvisor_model::ModelError;
use serde_json::json;
use thiserror::Error;

type SerdeJsonError = serde_json::Error;

/// Top-level API error shared by all route handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("storage error: {0}")]
    Storage(#[from] StoreError),
    #[error("prediction failed: {0}")]
    Model(#[from] ModelError),
    #[error("login required")]
    LoginRequired,
    #[error("bad request: {0}")]
    BadRequest(String),
    #[error("validation error")]
    Validation(serde_json::Value),
    #[error(transparent)]
    SerdeJson(#[from] SerdeJsonError),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Model(_) => StatusCode::INTERNAL_SERVER_ERROR,
            // Protected pages bounce anonymous clients back to the login page.
            ApiError::LoginRequired => return Redirect::to("/").into_response(),
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::SerdeJson(_) => StatusCode::BAD_REQUEST,
            ApiError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!(error = %self, "request failed");
        }

        let payload = match self {
            ApiError::Validation(v) => v,
            other => json!({ "error": other.to_string() }),
        };

        (status, Json(payload)).into_response()
    }
}

impl From<AuthFlowError> for ApiError {
    /// Only infrastructure failures reach this conversion; user-caused
    /// failures are rendered by the handlers as `{status: "error"}` bodies.
    fn from(err: AuthFlowError) -> Self {
        match err {
            AuthFlowError::Storage(e) => ApiError::Storage(e),
            AuthFlowError::InvalidInput(reason) => ApiError::BadRequest(reason),
            other => ApiError::Unexpected(other.to_string()),
        }
    }
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header;

    async fn body_json(resp: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn login_required_redirects_to_login_page() {
        let resp = ApiError::LoginRequired.into_response();
        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(resp.headers()[header::LOCATION], "/");
    }

    #[tokio::test]
    async fn validation_body_is_passed_through() {
        let details = json!({"validation": {"N": {"code": "required", "message": "N is required"}}});
        let resp = ApiError::Validation(details.clone()).into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(resp).await, details);
    }

    #[tokio::test]
    async fn server_errors_render_message() {
        let resp = ApiError::unexpected("boom").into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(resp).await, json!({"error": "unexpected error: boom"}));
    }
}
