// crates/backend-lib/src/error.rs

//! Error types for the auth core, the credential stores and the HTTP edge.
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gatekeeper_common::{ErrorBody, ErrorDetail};
use thiserror::Error;

/// Outcome of a failed authentication, issuance or guard check.
///
/// `InvalidCredentials` and `Unauthenticated` carry no detail on purpose:
/// callers must not be able to tell which check failed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unauthenticated")]
    Unauthenticated,

    #[error("Token signing failed: {0}")]
    Signing(String),
}

/// Errors raised by credential store implementations
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Identity not found")]
    NotFound,

    #[error("Identifier already registered: {0}")]
    Duplicate(String),

    #[error("Invalid identity record: {0}")]
    InvalidRecord(String),

    #[error("Password hashing failed: {0}")]
    Hash(String),

    #[error("Store backend error: {0}")]
    Backend(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Application error types with error codes and context
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    Unauthenticated,

    #[error("Token signing failed: {0}")]
    Signing(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::Unauthenticated => AppError::Unauthenticated,
            AuthError::Signing(msg) => AppError::Signing(msg),
        }
    }
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials | AppError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AppError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::InvalidCredentials => "AUTH_001",
            AppError::Unauthenticated => "AUTH_002",
            AppError::Signing(_) => "AUTH_003",
            AppError::InvalidInput(_) => "VAL_001",
            AppError::Config(_) => "CFG_001",
        }
    }

    /// Get a sanitized message suitable for production use
    pub fn sanitized_message(&self) -> String {
        match self {
            AppError::InvalidCredentials => "Invalid credentials".to_string(),
            AppError::Unauthenticated => "Authentication required".to_string(),
            AppError::InvalidInput(_) => "Invalid input provided".to_string(),
            _ => "An internal server error occurred".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Use detailed messages in development, sanitized in production
        let message = if cfg!(debug_assertions) {
            self.to_string()
        } else {
            self.sanitized_message()
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: self.error_code().to_string(),
                message,
            },
        };

        (status, axum::Json(body)).into_response()
    }
}
