// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent user-facing messages.

use crate::services::auth::AuthErrorCode;

/// Fallback shown for anything that has no dedicated message.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong. Please try again.";

/// Application error type that converts to an alert message for the UI.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Auth backend rejected request: {0:?}")]
    Auth(AuthErrorCode),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Text shown to the user in an alert or error banner.
    ///
    /// Backend and network details are logged, never displayed.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Unauthorized => "Please log in to continue.".to_string(),
            AppError::NotFound(_) => "The requested item no longer exists.".to_string(),
            AppError::Validation(msg) => msg.clone(),
            AppError::Auth(code) => code.message().to_string(),
            AppError::Database(msg) => {
                tracing::error!(error = %msg, "Database error");
                GENERIC_ERROR_MESSAGE.to_string()
            }
            AppError::Network(msg) => {
                tracing::error!(error = %msg, "Network error");
                GENERIC_ERROR_MESSAGE.to_string()
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                GENERIC_ERROR_MESSAGE.to_string()
            }
        }
    }

    /// The backend rejection code, if this error came from the auth service.
    pub fn auth_code(&self) -> Option<&AuthErrorCode> {
        match self {
            AppError::Auth(code) => Some(code),
            _ => None,
        }
    }
}

impl From<AuthErrorCode> for AppError {
    fn from(code: AuthErrorCode) -> Self {
        AppError::Auth(code)
    }
}

/// Result type alias for screen operations
pub type Result<T> = std::result::Result<T, AppError>;
