// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Login form.

use crate::error::AppError;
use crate::forms::{Destination, FieldErrors, FormStatus};
use crate::services::auth::{AuthBackend, AuthErrorCode};
use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LoginField {
    Email,
    Password,
}

#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    email: String,
    password: String,
    errors: FieldErrors<LoginField>,
    banner: Option<String>,
    status: FormStatus,
}

impl LoginForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: LoginField, value: impl Into<String>) {
        let value = value.into();
        match field {
            LoginField::Email => self.email = value,
            LoginField::Password => self.password = value,
        }
        self.errors.clear(field);
        self.banner = None;
        self.status = FormStatus::Editing;
    }

    pub fn errors(&self) -> &FieldErrors<LoginField> {
        &self.errors
    }

    pub fn error(&self, field: LoginField) -> Option<&str> {
        self.errors.get(field)
    }

    /// Form-level message not tied to a field.
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Check every rule; does not touch form state.
    pub fn validate(&self) -> FieldErrors<LoginField> {
        let mut errors = FieldErrors::new();
        if self.email.is_empty() {
            errors.set(LoginField::Email, "Please enter your email.");
        }
        if self.password.is_empty() {
            errors.set(LoginField::Password, "Please enter your password.");
        }
        errors
    }

    /// Validate, then sign in. On success the session holds the user.
    pub async fn submit(&mut self, auth: &dyn AuthBackend, session: &Session) -> Option<Destination> {
        self.status = FormStatus::Validating;
        self.banner = None;
        self.errors = self.validate();
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "Login validation failed");
            self.status = FormStatus::Failed;
            return None;
        }

        self.status = FormStatus::Submitting;
        match auth.sign_in(&self.email, &self.password).await {
            Ok(user) => {
                session.set_user(Some(user));
                self.password.clear();
                self.status = FormStatus::Succeeded;
                Some(Destination::Home)
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
                | AuthErrorCode::TooManyRequests
                | AuthErrorCode::UserDisabled,
            ) => self.errors.set(LoginField::Password, message.clone()),
            Some(AuthErrorCode::EmailNotFound | AuthErrorCode::InvalidEmail) => {
                self.errors.set(LoginField::Email, message.clone())
            }
            _ => self.banner = Some(message.clone()),
        }
        self.status = FormStatus::Rejected(message);
    }
}
