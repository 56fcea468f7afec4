//! Error handling for the Supply Chain Management API
//!
//! Provides consistent JSON error responses and maps store failures onto the
//! ledger's error taxonomy.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use sqlx::error::ErrorKind;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Validation errors
    #[error("Validation error: {message}")]
    Validation { field: String, message: String },

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Referential violation: {0}")]
    ReferentialViolation(String),

    // Business logic errors
    #[error("Conflict: {message}")]
    Conflict { resource: String, message: String },

    // Store errors
    #[error("Store unreachable: {0}")]
    ConnectivityFailure(String),

    #[error("Transaction rolled back: {0}")]
    TransactionFailure(String),

    #[error("Database error: {0}")]
    DatabaseError(#[source] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(db_err) = &err {
            match db_err.kind() {
                ErrorKind::ForeignKeyViolation => {
                    return AppError::ReferentialViolation(
                        db_err
                            .constraint()
                            .map(str::to_string)
                            .unwrap_or_else(|| db_err.message().to_string()),
                    );
                }
                ErrorKind::UniqueViolation => {
                    return AppError::DuplicateEntry(
                        db_err
                            .constraint()
                            .map(str::to_string)
                            .unwrap_or_else(|| "record".to_string()),
                    );
                }
                _ => {}
            }
        }

        match err {
            e @ (sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)) => AppError::ConnectivityFailure(e.to_string()),
            other => AppError::DatabaseError(other),
        }
    }
}

impl AppError {
    /// Shorthand for a field validation failure
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Re-label a failure raised inside a multi-statement transaction.
    ///
    /// Domain errors keep their kind; anything coming from the store itself
    /// becomes a `TransactionFailure`.
    pub fn in_transaction(self) -> Self {
        match self {
            AppError::DatabaseError(err) => AppError::TransactionFailure(err.to_string()),
            AppError::Internal(msg) => AppError::TransactionFailure(msg),
            AppError::InternalError(err) => AppError::TransactionFailure(err.to_string()),
            other => other,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation { .. } => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_) | AppError::Conflict { .. } => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ReferentialViolation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ConnectivityFailure(_) => StatusCode::SERVICE_UNAVAILABLE,
            AppError::TransactionFailure(_)
            | AppError::DatabaseError(_)
            | AppError::Internal(_)
            | AppError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation { .. } => "VALIDATION_ERROR",
            AppError::DuplicateEntry(_) => "DUPLICATE_ENTRY",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::ReferentialViolation(_) => "REFERENTIAL_VIOLATION",
            AppError::Conflict { .. } => "CONFLICT",
            AppError::ConnectivityFailure(_) => "CONNECTIVITY_FAILURE",
            AppError::TransactionFailure(_) => "TRANSACTION_FAILURE",
            AppError::DatabaseError(_) => "DATABASE_ERROR",
            AppError::Internal(_) | AppError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (message, field) = match &self {
            AppError::Validation { field, message } => (message.clone(), Some(field.clone())),
            AppError::DuplicateEntry(field) => (
                format!("A record with this {} already exists", field),
                Some(field.clone()),
            ),
            AppError::NotFound(resource) => (format!("{} not found", resource), None),
            AppError::ReferentialViolation(detail) => (
                format!("A referenced record does not exist ({})", detail),
                None,
            ),
            AppError::Conflict { resource, message } => (message.clone(), Some(resource.clone())),
            AppError::ConnectivityFailure(detail) => (
                format!("Database connection lost, try again: {}", detail),
                None,
            ),
            AppError::TransactionFailure(detail) => {
                (format!("Transaction rolled back: {}", detail), None)
            }
            AppError::DatabaseError(_) => ("A database error occurred".to_string(), None),
            AppError::Internal(msg) => (msg.clone(), None),
            AppError::InternalError(_) => ("An internal server error occurred".to_string(), None),
        };

        // Log the error for debugging
        tracing::error!("Error: {:?}", self);

        let detail = ErrorDetail {
            code: self.code().to_string(),
            message,
            field,
        };

        (self.status_code(), Json(ErrorResponse { error: detail })).into_response()
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
