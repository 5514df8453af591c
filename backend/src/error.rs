//! Error handling for the landed-cost ledger
//!
//! Provides the error taxonomy surfaced to callers and its HTTP rendering

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use shared::DomainError;
use thiserror::Error;
use uuid::Uuid;

/// Why a stage advance was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("contract {contract_id} is already at Final Destination")]
    AlreadyTerminal { contract_id: Uuid },

    #[error("contract {contract_id} has no bag milestones")]
    NoMilestones { contract_id: Uuid },
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Integrity errors
    #[error("{entity} {id} does not exist")]
    ReferentialIntegrity { entity: &'static str, id: Uuid },

    #[error("Invalid transition: {0}")]
    InvalidTransition(#[from] TransitionError),

    // Validation errors
    #[error("Validation error: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    // Writer errors
    #[error("Ledger writer is not running")]
    WriterUnavailable,

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

impl AppError {
    pub fn missing(entity: &'static str, id: Uuid) -> Self {
        AppError::ReferentialIntegrity { entity, id }
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Invalid { field, message } => AppError::Validation {
                field: field.to_string(),
                message: message.to_string(),
            },
            DomainError::AlreadyTerminal(stage) => {
                AppError::Conflict(format!("stage {} cannot be left", stage))
            }
            DomainError::Overflow(field) => AppError::Validation {
                field: field.to_string(),
                message: "value is out of range".to_string(),
            },
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
        let (status, code, field) = match &self {
            AppError::ReferentialIntegrity { entity, .. } => (
                StatusCode::CONFLICT,
                "REFERENTIAL_INTEGRITY",
                Some(entity.to_string()),
            ),
            AppError::InvalidTransition(TransitionError::AlreadyTerminal { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "ALREADY_TERMINAL", None)
            }
            AppError::InvalidTransition(TransitionError::NoMilestones { .. }) => {
                (StatusCode::UNPROCESSABLE_ENTITY, "NO_MILESTONES", None)
            }
            AppError::Validation { field, .. } => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", Some(field.clone()))
            }
            AppError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND", None),
            AppError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT", None),
            AppError::WriterUnavailable => {
                (StatusCode::SERVICE_UNAVAILABLE, "WRITER_UNAVAILABLE", None)
            }
            AppError::Internal(_) | AppError::InternalError(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", None)
            }
        };

        let message = match &self {
            AppError::InternalError(_) => "An internal server error occurred".to_string(),
            other => other.to_string(),
        };

        if status.is_server_error() {
            tracing::error!(error = ?self, "request failed");
        } else {
            tracing::debug!(error = %self, "request rejected");
        }

        let body = ErrorResponse {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                field,
            },
        };
        (status, Json(body)).into_response()
    }
}

/// Result type alias for services and handlers
pub type AppResult<T> = Result<T, AppError>;
