use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::domain::InvalidIdentifier;
use crate::services::{InsightError, ProductError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    InternalError(String),
}

/// Error body shape: `{"detail": "..."}`.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            Self::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (StatusCode::INTERNAL_SERVER_ERROR, msg)
            }
        };

        (status, Json(ErrorBody { detail })).into_response()
    }
}

impl From<InvalidIdentifier> for ApiError {
    fn from(err: InvalidIdentifier) -> Self {
        Self::ValidationError(err.to_string())
    }
}

impl From<ProductError> for ApiError {
    fn from(err: ProductError) -> Self {
        match err {
            ProductError::NotFound(_) => Self::NotFound(err.to_string()),
            ProductError::Validation(msg) => Self::ValidationError(msg),
            ProductError::Database(_) => Self::InternalError(err.to_string()),
        }
    }
}

impl From<InsightError> for ApiError {
    fn from(err: InsightError) -> Self {
        match err {
            InsightError::ProductNotFound => Self::NotFound(err.to_string()),
            InsightError::Validation(msg) => Self::ValidationError(msg),
            InsightError::InvalidIdentifier(inner) => inner.into(),
            InsightError::Backend(_) | InsightError::Database(_) => {
                Self::InternalError(err.to_string())
            }
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    /// Prefixes internal errors with the failing operation; other kinds pass through.
    #[must_use]
    pub fn during(self, operation: &str) -> Self {
        match self {
            Self::InternalError(msg) => Self::InternalError(format!("{operation}: {msg}")),
            other => other,
        }
    }
}
