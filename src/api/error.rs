//! HTTP mapping for [`crate::errors::Error`].

use crate::errors::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Wraps a crate error so handlers can return it with `?`.
#[derive(Debug)]
pub struct ApiError(pub Error);

/// Handler result type.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        Self(error)
    }
}

impl ApiError {
    /// Status code for the wrapped error.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        match self.0 {
            Error::NotFound { .. } => StatusCode::NOT_FOUND,
            Error::Validation { .. }
            | Error::InvalidAmount { .. }
            | Error::InvalidPercentage { .. } => StatusCode::BAD_REQUEST,
            Error::Config { .. } | Error::Database(_) | Error::Io(_) | Error::EnvVar(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!(error = %self.0, "Request failed");
        } else {
            tracing::debug!(error = %self.0, status = status.as_u16(), "Request rejected");
        }
        (status, Json(json!({ "error": self.0.to_string() }))).into_response()
    }
}
