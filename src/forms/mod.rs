// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Credential forms: field state, synchronous validation and submission.
//!
//! Every form moves through the same states:
//! `Editing -> Validating -> Failed | Submitting -> Succeeded | Rejected`.
//! Editing a field clears that field's error immediately.

pub mod change_password;
pub mod login;
pub mod signup;

pub use change_password::{ChangePasswordField, ChangePasswordForm};
pub use login::{LoginField, LoginForm};
pub use signup::{SignupField, SignupForm};

use serde::Serialize;
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

pub const MIN_PASSWORD_LEN: usize = 6;
pub const PASSWORD_TOO_SHORT: &str = "Password must be at least 6 characters.";
pub const PASSWORDS_DO_NOT_MATCH: &str = "Passwords do not match.";

/// Lifecycle of a form submission.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[serde(tag = "state", content = "message", rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum FormStatus {
    #[default]
    Editing,
    Validating,
    /// Local validation failed; see the field errors
    Failed,
    Submitting,
    Succeeded,
    /// The backend refused the request
    Rejected(String),
}

/// Where the UI should go after a successful submit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Destination {
    /// Push the home screen
    Home,
    /// Replace the navigation stack with the home screen
    ReplaceHome,
    /// Pop back to the previous screen
    Back,
}

/// One error message per field. Setting a field twice keeps the last one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldErrors<F: Ord> {
    errors: BTreeMap<F, String>,
}

impl<F: Ord> Default for FieldErrors<F> {
    fn default() -> Self {
        Self {
            errors: BTreeMap::new(),
        }
    }
}

impl<F: Ord + Copy> FieldErrors<F> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: F, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }

    pub fn clear(&mut self, field: F) {
        self.errors.remove(&field);
    }

    pub fn get(&self, field: F) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (F, &str)> {
        self.errors.iter().map(|(f, m)| (*f, m.as_str()))
    }
}

/// Loose `local@domain.tld` check.
///
/// Accepts any text containing a run of non-whitespace characters shaped
/// like `x@y.z`.
pub fn is_valid_email(text: &str) -> bool {
    text.split_whitespace().any(|token| {
        let chars: Vec<char> = token.chars().collect();
        chars.iter().enumerate().any(|(at, &c)| {
            c == '@'
                && at >= 1
                && chars
                    .iter()
                    .enumerate()
                    .any(|(dot, &d)| d == '.' && dot >= at + 2 && dot + 1 < chars.len())
        })
    })
}

/// Password length as the user perceives it.
pub(crate) fn password_len(password: &str) -> usize {
    password.chars().count()
}
