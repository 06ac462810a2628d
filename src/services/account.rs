// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Account creation: identity record plus profile document.

use crate::db::{collections, to_data, CollectionPath, DocumentStore};
use crate::error::AppError;
use crate::models::UserProfile;
use crate::services::auth::AuthBackend;
use crate::session::{AuthUser, Session};
use crate::time_utils::format_utc_rfc3339;
use std::sync::Arc;

/// Creates accounts and manages the signed-in identity.
#[derive(Clone)]
pub struct AccountService {
    auth: Arc<dyn AuthBackend>,
    store: Arc<dyn DocumentStore>,
    session: Session,
}

impl AccountService {
    pub fn new(auth: Arc<dyn AuthBackend>, store: Arc<dyn DocumentStore>, session: Session) -> Self {
        Self {
            auth,
            store,
            session,
        }
    }

    pub fn auth(&self) -> &dyn AuthBackend {
        self.auth.as_ref()
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Register the identity, then write its profile document.
    ///
    /// The user is signed in once both writes succeed.
    pub async fn create_account(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<AuthUser, AppError> {
        let user = self.auth.sign_up(email, password).await?;

        let profile = UserProfile {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            email: Some(email.to_string()),
            height: None,
            weight: None,
            photo: None,
            created_at: Some(format_utc_rfc3339(chrono::Utc::now())),
        };

        self.store
            .set_record(
                &CollectionPath::root(collections::USERS),
                &user.uid,
                to_data(&profile)?,
            )
            .await?;

        tracing::info!(uid = %user.uid, "Profile document created");
        self.session.set_user(Some(user.clone()));
        Ok(user)
    }

    pub fn sign_out(&self) {
        self.session.sign_out();
    }
}
