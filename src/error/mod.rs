//! Unified error handling for the identity provider mocks

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Invalid construction-time configuration. Never reaches the network.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `start()` called on a server that is already running.
    #[error("Server has already been started")]
    AlreadyRunning,

    /// Request validation failed; carries one entry per offending field.
    #[error("Validation error")]
    Validation(Vec<FieldError>),

    /// An authorization code that could not be parsed at all.
    #[error("Malformed authorization code: {0}")]
    MalformedCode(String),

    /// An authorization code that parsed but carries no usable identity.
    #[error("Authorization code carries no identity")]
    MissingIdentity,

    /// A request shape no well-formed relying party produces (e.g. the wrong
    /// content type on the token endpoint). Treated as a caller bug.
    #[error("Protocol violation: {0}")]
    Protocol(String),

    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// A single field-level validation problem
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<serde_json::Value>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_type, message, details) = match &self {
            AppError::Validation(fields) => (
                StatusCode::BAD_REQUEST,
                "validation",
                "Invalid token request".to_string(),
                serde_json::to_value(fields).ok(),
            ),
            AppError::MalformedCode(msg) => (
                StatusCode::BAD_REQUEST,
                "malformed_code",
                msg.clone(),
                None,
            ),
            AppError::MissingIdentity => (
                StatusCode::BAD_REQUEST,
                "missing_identity",
                self.to_string(),
                None,
            ),
            AppError::Protocol(msg) => {
                tracing::error!("Protocol violation: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "protocol_violation",
                    msg.clone(),
                    None,
                )
            }
            AppError::Jwt(e) => {
                tracing::error!("JWT error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "jwt_error",
                    "Failed to sign or verify token".to_string(),
                    None,
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
            // Lifecycle and configuration errors are returned from
            // constructors and start(), not from request handlers.
            AppError::Config(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "configuration_error",
                msg.clone(),
                None,
            ),
            AppError::AlreadyRunning | AppError::Io(_) => {
                tracing::error!("Unexpected error in request path: {:?}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal_error",
                    "An internal error occurred".to_string(),
                    None,
                )
            }
        };

        let body = Json(ErrorResponse {
            error: error_type.to_string(),
            message,
            details,
        });

        (status, body).into_response()
    }
}
