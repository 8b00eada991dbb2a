use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use std::fmt;

use crate::services::{AttendanceError, ShiftError, StatsError, TransactionError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    DatabaseError(String),

    ValidationError(String),

    Unauthorized(String),

    Forbidden(String),

    Conflict(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// Wire shape every error response uses.
#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::ValidationError(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg),
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        (status, Json(ErrorBody { message })).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<AttendanceError> for ApiError {
    fn from(err: AttendanceError) -> Self {
        match err {
            AttendanceError::UnknownUser | AttendanceError::InvalidPin => {
                ApiError::Unauthorized(err.to_string())
            }
            AttendanceError::Blocked(block) => ApiError::Forbidden(block.to_string()),
            AttendanceError::Forbidden(msg) => ApiError::Forbidden(msg),
            AttendanceError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<ShiftError> for ApiError {
    fn from(err: ShiftError) -> Self {
        match err {
            ShiftError::NotFound => ApiError::NotFound("Shift not found".to_string()),
            ShiftError::Forbidden(msg) => ApiError::Forbidden(msg),
            ShiftError::AlreadyClosed => {
                ApiError::Conflict("Shift is already closed".to_string())
            }
            ShiftError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<TransactionError> for ApiError {
    fn from(err: TransactionError) -> Self {
        match err {
            TransactionError::Validation(msg) => ApiError::ValidationError(msg),
            TransactionError::Forbidden(msg) => ApiError::Forbidden(msg),
            TransactionError::NotFound => {
                ApiError::NotFound("Transaction not found".to_string())
            }
            TransactionError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}

impl From<StatsError> for ApiError {
    fn from(err: StatsError) -> Self {
        match err {
            StatsError::Database(msg) => ApiError::DatabaseError(msg),
        }
    }
}
