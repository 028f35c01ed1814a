//! HTTP error bodies.
//!
//! Every failure becomes `{"detail": {"message": ..., "source_language"?, "target_language"?}}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::translation::TranslateError;

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: ErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_language: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_language: Option<String>,
}

/// A translation error plus the languages the caller asked for.
#[derive(Debug)]
pub struct ApiError {
    pub error: TranslateError,
    pub source_language: Option<String>,
    pub target_language: Option<String>,
}

impl ApiError {
    pub const fn new(
        error: TranslateError,
        source_language: Option<String>,
        target_language: Option<String>,
    ) -> Self {
        Self {
            error,
            source_language,
            target_language,
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::from_u16(self.error.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn log(&self) {
        let kind = self.error.kind();
        let to = self.target_language.as_deref().unwrap_or("-");
        match &self.error {
            TranslateError::InvalidInput(_) | TranslateError::UnsupportedLanguage { .. } => {
                debug!(kind, to, message = %self.error, "rejected request");
            }
            TranslateError::UpstreamUnavailable { diagnostic }
            | TranslateError::UpstreamResponseInvalid { diagnostic } => {
                warn!(kind, to, %diagnostic, "upstream failure");
            }
            TranslateError::Internal { diagnostic } => {
                error!(kind, to, %diagnostic, "internal error");
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let body = ErrorBody {
            detail: ErrorDetail {
                message: self.error.to_string(),
                source_language: self.source_language.clone(),
                target_language: self.target_language.clone(),
            },
        };

        (self.status(), Json(body)).into_response()
    }
}

/// Error body for a handler that panicked.
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let diagnostic = err
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| err.downcast_ref::<&str>().map(ToString::to_string))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ApiError::new(TranslateError::Internal { diagnostic }, None, None).into_response()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::translation::LanguageField;

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_unsupported_language_body() {
        let response = ApiError::new(
            TranslateError::UnsupportedLanguage {
                field: LanguageField::Target,
                value: "xx".into(),
            },
            None,
            Some("xx".into()),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["detail"]["target_language"], "xx");
        assert!(body["detail"].get("source_language").is_none());
        assert!(body["detail"]["message"].as_str().unwrap().contains("xx"));
    }

    #[tokio::test]
    async fn test_upstream_body_is_sanitized() {
        let response = ApiError::new(
            TranslateError::UpstreamResponseInvalid {
                diagnostic: "401 Unauthorized: token=abc123".into(),
            },
            Some("en".into()),
            Some("es".into()),
        )
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        let text = body.to_string();
        assert!(!text.contains("abc123"));
        assert_eq!(body["detail"]["source_language"], "en");
        assert_eq!(body["detail"]["target_language"], "es");
    }

    #[tokio::test]
    async fn test_panic_response_is_well_formed() {
        let response = panic_response(Box::new("boom"));

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["detail"]["message"], "Internal error while translating");
    }
}
