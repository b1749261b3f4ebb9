//! Client-facing failures.
//!
//! The message carried by each variant is exactly what the client sees. Some
//! handlers expose the store's own message, others replace it with a fixed
//! text; [`ApiError::masked`] logs the hidden cause before replacing it.

use std::fmt::Display;

use poem::http::StatusCode;
use thiserror::Error;
use validator::ValidationErrors;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::BadRequest(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 500 carrying the underlying error text verbatim.
    pub fn internal(err: impl Display) -> Self {
        let message = err.to_string();
        tracing::error!(error = %message, "request failed");
        Self::Internal(message)
    }

    /// 500 with a fixed message; the real cause only goes to the log.
    pub fn masked(err: impl Display, message: &str) -> Self {
        tracing::error!(error = %err, "{message}");
        Self::Internal(message.to_owned())
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationErrors> for ApiError {
    fn from(errors: ValidationErrors) -> Self {
        let message = errors
            .field_errors()
            .values()
            .flat_map(|errs| errs.iter())
            .find_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .unwrap_or_else(|| errors.to_string());
        Self::BadRequest(message)
    }
}
