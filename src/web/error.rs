//! Error kinds surfaced by the API handlers.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use super::envelope::Envelope;
use crate::db::{PoolError, ValidationError};

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{message}")]
    Internal {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl ApiError {
    #[must_use]
    pub fn not_found(message: &str) -> Self {
        Self::NotFound(message.to_string())
    }

    /// Wrap a database failure; only `message` reaches the caller.
    #[must_use]
    pub fn internal(message: &str, source: impl Into<anyhow::Error>) -> Self {
        Self::Internal {
            message: message.to_string(),
            source: source.into(),
        }
    }

    #[must_use]
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err.to_string())
    }
}

impl From<PoolError> for ApiError {
    fn from(err: PoolError) -> Self {
        Self::internal("Database is unavailable.", err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if let Self::Internal { message, source } = &self {
            tracing::error!("{message} {source:#}");
        }
        (status, Json(Envelope::failure(self.to_string()))).into_response()
    }
}
