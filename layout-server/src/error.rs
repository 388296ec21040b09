//! HTTP error responses.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use layout_core::{StoreError, ValidationError};

/// Errors returned by the template API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// No document with the requested ID.
    #[error("Template not found: {0}")]
    NotFound(String),
    /// The submitted document failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The path segment is not a document ID.
    #[error("Invalid template id: {0}")]
    InvalidId(String),
    /// The request body is not a well-formed document.
    #[error("Invalid template: {}", .0.body_text())]
    Body(#[from] JsonRejection),
    /// The storage backend failed.
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(id) => Self::NotFound(id),
            other => Self::Store(other),
        }
    }
}

impl ApiError {
    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::InvalidId(_) => StatusCode::BAD_REQUEST,
            Self::Body(rejection) => rejection.status(),
            Self::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("Template request failed: {}", self);
        } else {
            tracing::debug!("Template request rejected: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes() {
        assert_eq!(
            ApiError::NotFound("x".into()).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ValidationError::EmptyName).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::InvalidId("x".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(StoreError::LockPoisoned).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn store_not_found_maps_to_not_found() {
        let err = ApiError::from(StoreError::NotFound("abc".into()));
        assert!(matches!(err, ApiError::NotFound(ref id) if id == "abc"));
    }

    #[test]
    fn validation_message_is_user_facing() {
        let err = ApiError::from(ValidationError::MissingCategory);
        assert_eq!(err.to_string(), "A category must be selected");
    }
}
