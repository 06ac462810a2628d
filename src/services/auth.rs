// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Identity Toolkit client for email/password accounts.
//!
//! Handles:
//! - Sign-in and sign-up with email and password
//! - Re-authentication before sensitive account changes
//! - Password updates
//! - Mapping backend error codes to user-facing messages

use crate::error::{AppError, GENERIC_ERROR_MESSAGE};
use crate::session::AuthUser;
use async_trait::async_trait;
use serde::Deserialize;

/// Backend rejection reasons.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthErrorCode {
    EmailNotFound,
    WrongPassword,
    InvalidCredential,
    UserDisabled,
    TooManyRequests,
    EmailAlreadyInUse,
    WeakPassword,
    InvalidEmail,
    RequiresRecentLogin,
    /// Anything not in the table, with the raw backend code
    Unknown(String),
}

impl AuthErrorCode {
    /// Map an Identity Toolkit error code.
    ///
    /// Codes may carry a suffix such as `"WEAK_PASSWORD : Password should be
    /// at least 6 characters"`; only the leading token is significant.
    pub fn from_backend(raw: &str) -> Self {
        let code = raw.split([' ', ':']).next().unwrap_or_default();
        match code {
            "EMAIL_NOT_FOUND" => Self::EmailNotFound,
            "INVALID_PASSWORD" => Self::WrongPassword,
            "INVALID_LOGIN_CREDENTIALS" => Self::InvalidCredential,
            "USER_DISABLED" => Self::UserDisabled,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyRequests,
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "WEAK_PASSWORD" => Self::WeakPassword,
            "INVALID_EMAIL" => Self::InvalidEmail,
            "CREDENTIAL_TOO_OLD_LOGIN_AGAIN" | "TOKEN_EXPIRED" => Self::RequiresRecentLogin,
            _ => Self::Unknown(raw.to_string()),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::EmailNotFound => "No account found with this email.",
            Self::WrongPassword => "Incorrect password.",
            Self::InvalidCredential => "Invalid email or password.",
            Self::UserDisabled => "This account has been disabled.",
            Self::TooManyRequests => "Too many attempts. Please try again later.",
            Self::EmailAlreadyInUse => "This email is already in use.",
            Self::WeakPassword => "Password must be at least 6 characters.",
            Self::InvalidEmail => "Please enter a valid email.",
            Self::RequiresRecentLogin => "Please log in again before changing your password.",
            Self::Unknown(_) => GENERIC_ERROR_MESSAGE,
        }
    }
}

/// Account operations of the identity backend.
#[async_trait]
pub trait AuthBackend: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError>;

    /// Confirm the current password; returns a fresh token.
    async fn reauthenticate(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.sign_in(email, password).await
    }

    async fn update_password(
        &self,
        user: &AuthUser,
        new_password: &str,
    ) -> Result<AuthUser, AppError>;
}

/// Identity Toolkit REST client.
#[derive(Clone)]
pub struct IdentityToolkitClient {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccountResponse {
    local_id: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    id_token: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

impl IdentityToolkitClient {
    pub fn new(base_url: String, api_key: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        }
    }

    pub fn from_config(config: &crate::config::Config) -> Self {
        Self::new(
            config.identity_toolkit_url.clone(),
            config.firebase_api_key.clone(),
        )
    }

    /// POST to `accounts:<method>` and parse the account response.
    async fn call(
        &self,
        method: &str,
        body: serde_json::Value,
        previous_token: Option<&str>,
    ) -> Result<AuthUser, AppError> {
        let url = format!("{}/accounts:{}", self.base_url, method);

        let response = self
            .http
            .post(&url)
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Network(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let code = serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|e| AuthErrorCode::from_backend(&e.error.message))
                .unwrap_or_else(|_| AuthErrorCode::Unknown(format!("HTTP {}", status)));
            tracing::warn!(method, status = status.as_u16(), code = ?code, "Auth request rejected");
            return Err(AppError::Auth(code));
        }

        let account: AccountResponse = response
            .json()
            .await
            .map_err(|e| AppError::Network(format!("Failed to parse auth response: {}", e)))?;

        Ok(AuthUser {
            uid: account.local_id,
            email: account.email,
            id_token: account
                .id_token
                .or_else(|| previous_token.map(str::to_string))
                .unwrap_or_default(),
        })
    }
}

#[async_trait]
impl AuthBackend for IdentityToolkitClient {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        self.call("signInWithPassword", body, None).await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let body = serde_json::json!({
            "email": email,
            "password": password,
            "returnSecureToken": true,
        });
        let user = self.call("signUp", body, None).await?;
        tracing::info!(uid = %user.uid, "Account created");
        Ok(user)
    }

    async fn update_password(
        &self,
        user: &AuthUser,
        new_password: &str,
    ) -> Result<AuthUser, AppError> {
        let body = serde_json::json!({
            "idToken": user.id_token,
            "password": new_password,
            "returnSecureToken": true,
        });
        let updated = self.call("update", body, Some(&user.id_token)).await?;
        tracing::info!(uid = %updated.uid, "Password updated");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_codes() {
        assert_eq!(
            AuthErrorCode::from_backend("INVALID_PASSWORD"),
            AuthErrorCode::WrongPassword
        );
        assert_eq!(
            AuthErrorCode::from_backend("WEAK_PASSWORD : Password should be at least 6 characters"),
            AuthErrorCode::WeakPassword
        );
        assert_eq!(
            AuthErrorCode::from_backend("CREDENTIAL_TOO_OLD_LOGIN_AGAIN"),
            AuthErrorCode::RequiresRecentLogin
        );
        assert_eq!(
            AuthErrorCode::from_backend("QUOTA_EXCEEDED"),
            AuthErrorCode::Unknown("QUOTA_EXCEEDED".to_string())
        );
    }

    #[test]
    fn test_unknown_code_uses_generic_message() {
        assert_eq!(
            AuthErrorCode::Unknown("X".to_string()).message(),
            GENERIC_ERROR_MESSAGE
        );
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = IdentityToolkitClient::new("http://localhost/v1/".to_string(), "k".to_string());
        assert_eq!(client.base_url, "http://localhost/v1");
    }
}
