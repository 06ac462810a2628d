// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Change-password form.
//!
//! Rules run in a fixed order and each failing rule overwrites the error
//! slot of its field, so the last failing rule for a field is the one shown.

use crate::error::AppError;
use crate::forms::{
    password_len, Destination, FieldErrors, FormStatus, MIN_PASSWORD_LEN,
    PASSWORDS_DO_NOT_MATCH, PASSWORD_TOO_SHORT,
};
use crate::services::auth::{AuthBackend, AuthErrorCode};
use crate::session::Session;

pub const SAME_AS_OLD: &str = "New password cannot be the same as the old one.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ChangePasswordField {
    CurrentPassword,
    NewPassword,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default)]
pub struct ChangePasswordForm {
    current_password: String,
    new_password: String,
    confirm_password: String,
    errors: FieldErrors<ChangePasswordField>,
    banner: Option<String>,
    status: FormStatus,
}

impl ChangePasswordForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: ChangePasswordField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ChangePasswordField::CurrentPassword => self.current_password = value,
            ChangePasswordField::NewPassword => self.new_password = value,
            ChangePasswordField::ConfirmPassword => self.confirm_password = value,
        }
        self.errors.clear(field);
        self.banner = None;
        self.status = FormStatus::Editing;
    }

    pub fn errors(&self) -> &FieldErrors<ChangePasswordField> {
        &self.errors
    }

    pub fn error(&self, field: ChangePasswordField) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    pub fn validate(&self) -> FieldErrors<ChangePasswordField> {
        use ChangePasswordField::*;

        let mut errors = FieldErrors::new();
        if self.current_password.is_empty() {
            errors.set(CurrentPassword, "Please enter your current password.");
        }
        if self.new_password.is_empty() {
            errors.set(NewPassword, "Please enter a new password.");
        }
        if password_len(&self.new_password) < MIN_PASSWORD_LEN {
            errors.set(NewPassword, PASSWORD_TOO_SHORT);
        }
        if !self.current_password.is_empty() && self.new_password == self.current_password {
            errors.set(NewPassword, SAME_AS_OLD);
        }
        if self.confirm_password.is_empty() {
            errors.set(ConfirmPassword, "Please confirm your new password.");
        }
        if self.confirm_password != self.new_password {
            errors.set(ConfirmPassword, PASSWORDS_DO_NOT_MATCH);
        }
        errors
    }

    /// Validate, confirm the current password with the backend, then update.
    pub async fn submit(&mut self, auth: &dyn AuthBackend, session: &Session) -> Option<Destination> {
        self.status = FormStatus::Validating;
        self.banner = None;
        self.errors = self.validate();
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "Change-password validation failed");
            self.status = FormStatus::Failed;
            return None;
        }

        let Some(user) = session.current_user() else {
            self.reject(AppError::Unauthorized);
            return None;
        };
        let email = user.email.clone().unwrap_or_default();

        self.status = FormStatus::Submitting;
        let result = async {
            let fresh = auth.reauthenticate(&email, &self.current_password).await?;
            auth.update_password(&fresh, &self.new_password).await
        }
        .await;

        match result {
            Ok(updated) => {
                session.set_user(Some(updated));
                self.current_password.clear();
                self.new_password.clear();
                self.confirm_password.clear();
                self.status = FormStatus::Succeeded;
                Some(Destination::Back)
            }
            Err(err) => {
                self.reject(err);
                None
            }
        }
    }

    fn reject(&mut self, err: AppError) {
        let message = err.user_message();
        match err.auth_code() {
            Some(
                AuthErrorCode::WrongPassword
                | AuthErrorCode::InvalidCredential
                | AuthErrorCode::TooManyRequests,
            ) => self
                .errors
                .set(ChangePasswordField::CurrentPassword, message.clone()),
            Some(AuthErrorCode::RequiresRecentLogin) => self
                .errors
                .set(ChangePasswordField::NewPassword, message.clone()),
            _ => self.banner = Some(message.clone()),
        }
        self.status = FormStatus::Rejected(message);
    }
}
