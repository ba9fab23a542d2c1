use axum::extract::multipart::MultipartRejection;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::{error, warn};

use crate::domain::DomainError;

/// A [`DomainError`] rendered as `{"error": ...}` with a matching status.
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            DomainError::Validation(_)
            | DomainError::UnsupportedLanguage(_)
            | DomainError::UploadValidation(_) => StatusCode::BAD_REQUEST,
            DomainError::ResolutionMiss
            | DomainError::NotFound(_)
            | DomainError::ModelNotFound(_) => StatusCode::NOT_FOUND,
            DomainError::ModelUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Client-facing message. Request errors carry their bare message.
    pub fn message(&self) -> String {
        match &self.0 {
            DomainError::Validation(message)
            | DomainError::UploadValidation(message)
            | DomainError::NotFound(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(DomainError::Validation(rejection.body_text()))
    }
}

impl From<MultipartRejection> for ApiError {
    fn from(rejection: MultipartRejection) -> Self {
        ApiError(DomainError::Validation(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self.0, "Request failed");
        } else {
            warn!(status = status.as_u16(), error = %self.0, "Request rejected");
        }
        (status, Json(json!({ "error": self.message() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (DomainError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (DomainError::UnsupportedLanguage("xx".into()), StatusCode::BAD_REQUEST),
            (DomainError::ResolutionMiss, StatusCode::NOT_FOUND),
            (
                DomainError::ModelUnavailable {
                    language: "hindi".into(),
                    reason: "missing".into(),
                },
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (DomainError::Io("disk".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError(err).status(), status);
        }
    }

    #[test]
    fn test_request_errors_keep_bare_message() {
        assert_eq!(
            ApiError(DomainError::Validation("No text provided".into())).message(),
            "No text provided"
        );
        assert_eq!(
            ApiError(DomainError::ResolutionMiss).message(),
            "No signs found for the given text"
        );
    }
}
