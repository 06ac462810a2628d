// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use fittrack::config::Config;
use fittrack::db::{FirestoreDb, MemoryStore};
use fittrack::error::AppError;
use fittrack::services::{AuthBackend, AuthErrorCode};
use fittrack::session::AuthUser;
use fittrack::AppContext;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Check if emulator is available via environment variable.
#[allow(dead_code)]
pub fn emulator_available() -> bool {
    std::env::var("FIRESTORE_EMULATOR_HOST").is_ok()
}

/// Skip test with message if emulator not available.
#[macro_export]
macro_rules! require_emulator {
    () => {
        if !crate::common::emulator_available() {
            eprintln!("⚠️  Skipping: FIRESTORE_EMULATOR_HOST not set");
            return;
        }
    };
}

/// Create a test database connection.
#[allow(dead_code)]
pub async fn test_db() -> FirestoreDb {
    FirestoreDb::new("test-project")
        .await
        .expect("Failed to connect to Firestore emulator")
}

/// A recorded auth call.
#[derive(Debug, Clone, PartialEq, Eq)]
#[allow(dead_code)]
pub enum AuthCall {
    SignIn(String),
    SignUp(String),
    Reauthenticate(String),
    UpdatePassword(String),
}

/// In-process identity backend with a fixed set of accounts.
#[derive(Default)]
pub struct FakeAuth {
    accounts: Mutex<HashMap<String, (String, String)>>,
    calls: Mutex<Vec<AuthCall>>,
    fail_next: Mutex<Option<AuthErrorCode>>,
}

#[allow(dead_code)]
impl FakeAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `email` with `password`; returns its uid.
    pub fn add_account(&self, email: &str, password: &str) -> String {
        let mut accounts = self.accounts.lock().unwrap();
        let uid = format!("uid-{}", accounts.len() + 1);
        accounts.insert(email.to_string(), (uid.clone(), password.to_string()));
        uid
    }

    pub fn password_of(&self, email: &str) -> Option<String> {
        self.accounts
            .lock()
            .unwrap()
            .get(email)
            .map(|(_, password)| password.clone())
    }

    /// Make the next call fail with `code`.
    pub fn fail_next(&self, code: AuthErrorCode) {
        *self.fail_next.lock().unwrap() = Some(code);
    }

    pub fn calls(&self) -> Vec<AuthCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: AuthCall) -> Result<(), AppError> {
        self.calls.lock().unwrap().push(call);
        match self.fail_next.lock().unwrap().take() {
            Some(code) => Err(AppError::Auth(code)),
            None => Ok(()),
        }
    }

    fn check(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        let accounts = self.accounts.lock().unwrap();
        let (uid, stored) = accounts
            .get(email)
            .ok_or(AppError::Auth(AuthErrorCode::EmailNotFound))?;
        if stored != password {
            return Err(AppError::Auth(AuthErrorCode::WrongPassword));
        }
        Ok(user(uid, email))
    }
}

fn user(uid: &str, email: &str) -> AuthUser {
    AuthUser {
        uid: uid.to_string(),
        email: Some(email.to_string()),
        id_token: format!("token-{}", uid),
    }
}

#[async_trait]
impl AuthBackend for FakeAuth {
    async fn sign_in(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.record(AuthCall::SignIn(email.to_string()))?;
        self.check(email, password)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.record(AuthCall::SignUp(email.to_string()))?;
        if self.accounts.lock().unwrap().contains_key(email) {
            return Err(AppError::Auth(AuthErrorCode::EmailAlreadyInUse));
        }
        let uid = self.add_account(email, password);
        Ok(user(&uid, email))
    }

    async fn reauthenticate(&self, email: &str, password: &str) -> Result<AuthUser, AppError> {
        self.record(AuthCall::Reauthenticate(email.to_string()))?;
        self.check(email, password)
    }

    async fn update_password(
        &self,
        current: &AuthUser,
        new_password: &str,
    ) -> Result<AuthUser, AppError> {
        let email = current.email.clone().unwrap_or_default();
        self.record(AuthCall::UpdatePassword(email.clone()))?;
        if let Some(account) = self.accounts.lock().unwrap().get_mut(&email) {
            account.1 = new_password.to_string();
        }
        Ok(current.clone())
    }
}

/// Test context over an in-memory store and a fake identity backend.
#[allow(dead_code)]
pub struct TestApp {
    pub ctx: AppContext,
    pub store: Arc<MemoryStore>,
    pub auth: Arc<FakeAuth>,
}

#[allow(dead_code)]
impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let auth = Arc::new(FakeAuth::new());
        let ctx = AppContext::with_backends(Config::test_default(), store.clone(), auth.clone());
        Self { ctx, store, auth }
    }

    /// Sign in as a fresh account without going through a form.
    pub fn sign_in(&self, email: &str) -> String {
        let uid = self.auth.add_account(email, "secret123");
        self.ctx.session.set_user(Some(user(&uid, email)));
        uid
    }
}
