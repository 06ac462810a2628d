// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Shared application context handed to every screen.

use crate::config::Config;
use crate::db::{DocumentStore, FirestoreDb};
use crate::error::AppError;
use crate::services::{
    AccountService, AuthBackend, BmiScreen, IdentityToolkitClient, NutritionService,
    ProfileService, WorkoutService,
};
use crate::session::Session;
use crate::theme::Theme;
use std::sync::Arc;

/// Config, theme, session and backends, passed explicitly.
#[derive(Clone)]
pub struct AppContext {
    pub config: Config,
    pub theme: Theme,
    pub session: Session,
    pub store: Arc<dyn DocumentStore>,
    pub auth: Arc<dyn AuthBackend>,
    /// Shared so every caller sees the same profile snapshots
    profile: ProfileService,
}

impl AppContext {
    /// Connect to Firestore and the Identity Toolkit described by `config`.
    pub async fn connect(config: Config) -> Result<Self, AppError> {
        let store = FirestoreDb::new(&config.gcp_project_id).await?;
        let auth = IdentityToolkitClient::from_config(&config);
        tracing::info!(
            project = %config.gcp_project_id,
            theme = ?config.theme_mode,
            "Application context ready"
        );
        Ok(Self::with_backends(config, Arc::new(store), Arc::new(auth)))
    }

    /// Build a context over caller-supplied backends.
    pub fn with_backends(
        config: Config,
        store: Arc<dyn DocumentStore>,
        auth: Arc<dyn AuthBackend>,
    ) -> Self {
        let session = Session::new();
        let profile = ProfileService::new(store.clone(), session.clone());
        Self {
            theme: Theme::new(config.theme_mode),
            config,
            session,
            store,
            auth,
            profile,
        }
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggled();
    }

    pub fn accounts(&self) -> AccountService {
        AccountService::new(self.auth.clone(), self.store.clone(), self.session.clone())
    }

    pub fn bmi_screen(&self) -> BmiScreen {
        BmiScreen::new(
            self.store.clone(),
            self.session.clone(),
            self.config.default_height_cm,
        )
    }

    pub fn workouts(&self) -> WorkoutService {
        WorkoutService::new(self.store.clone(), self.session.clone())
    }

    pub fn nutrition(&self) -> NutritionService {
        NutritionService::new(self.store.clone(), self.session.clone())
    }

    /// Handle to the context's profile service; clones share snapshots.
    pub fn profile(&self) -> ProfileService {
        self.profile.clone()
    }
}
