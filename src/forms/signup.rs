// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Signup form.

use crate::error::AppError;
use crate::forms::{
    is_valid_email, password_len, Destination, FieldErrors, FormStatus, MIN_PASSWORD_LEN,
    PASSWORDS_DO_NOT_MATCH, PASSWORD_TOO_SHORT,
};
use crate::services::account::AccountService;
use crate::services::auth::AuthErrorCode;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum SignupField {
    FullName,
    Email,
    Password,
    ConfirmPassword,
}

#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    full_name: String,
    email: String,
    password: String,
    confirm_password: String,
    errors: FieldErrors<SignupField>,
    banner: Option<String>,
    status: FormStatus,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: SignupField, value: impl Into<String>) {
        let value = value.into();
        match field {
            SignupField::FullName => self.full_name = value,
            SignupField::Email => self.email = value,
            SignupField::Password => self.password = value,
            SignupField::ConfirmPassword => self.confirm_password = value,
        }
        self.errors.clear(field);
        self.banner = None;
        self.status = FormStatus::Editing;
    }

    pub fn errors(&self) -> &FieldErrors<SignupField> {
        &self.errors
    }

    pub fn error(&self, field: SignupField) -> Option<&str> {
        self.errors.get(field)
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn status(&self) -> &FormStatus {
        &self.status
    }

    /// Check every rule so all problems show at once.
    pub fn validate(&self) -> FieldErrors<SignupField> {
        let mut errors = FieldErrors::new();
        if self.full_name.trim().is_empty() {
            errors.set(SignupField::FullName, "Please enter your full name.");
        }
        if !is_valid_email(&self.email) {
            errors.set(SignupField::Email, "Please enter a valid email.");
        }
        if password_len(&self.password) < MIN_PASSWORD_LEN {
            errors.set(SignupField::Password, PASSWORD_TOO_SHORT);
        }
        if self.confirm_password != self.password {
            errors.set(SignupField::ConfirmPassword, PASSWORDS_DO_NOT_MATCH);
        }
        errors
    }

    /// Validate, then create the account.
    ///
    /// The form only collects a full name, so it is sent as the first name
    /// with an empty last name.
    pub async fn submit(&mut self, accounts: &AccountService) -> Option<Destination> {
        self.status = FormStatus::Validating;
        self.banner = None;
        self.errors = self.validate();
        if !self.errors.is_empty() {
            tracing::debug!(errors = self.errors.len(), "Signup validation failed");
            self.status = FormStatus::Failed;
            return None;
        }

        self.status = FormStatus::Submitting;
        let result = accounts
            .create_account(self.full_name.trim(), "", &self.email, &self.password)
            .await;

        match result {
            Ok(_) => {
                self.password.clear();
                self.confirm_password.clear();
                self.status = FormStatus::Succeeded;
                Some(Destination::ReplaceHome)
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
            Some(AuthErrorCode::EmailAlreadyInUse | AuthErrorCode::InvalidEmail) => {
                self.errors.set(SignupField::Email, message.clone())
            }
            Some(AuthErrorCode::WeakPassword) => {
                self.errors.set(SignupField::Password, message.clone())
            }
            _ => self.banner = Some(message.clone()),
        }
        self.status = FormStatus::Rejected(message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_rules_reported_together() {
        let mut form = SignupForm::new();
        form.set_field(SignupField::FullName, "   ");
        form.set_field(SignupField::Email, "not-an-email");
        form.set_field(SignupField::Password, "12345");
        form.set_field(SignupField::ConfirmPassword, "54321");

        let errors = form.validate();
        assert_eq!(errors.len(), 4);
        assert_eq!(
            errors.get(SignupField::FullName),
            Some("Please enter your full name.")
        );
        assert_eq!(errors.get(SignupField::Email), Some("Please enter a valid email."));
        assert_eq!(
            errors.get(SignupField::Password),
            Some("Password must be at least 6 characters.")
        );
        assert_eq!(
            errors.get(SignupField::ConfirmPassword),
            Some("Passwords do not match.")
        );
    }

    #[test]
    fn test_valid_form() {
        let mut form = SignupForm::new();
        form.set_field(SignupField::FullName, "Jane Doe");
        form.set_field(SignupField::Email, "jane@example.com");
        form.set_field(SignupField::Password, "secret1");
        form.set_field(SignupField::ConfirmPassword, "secret1");
        assert!(form.validate().is_empty());
    }
}
