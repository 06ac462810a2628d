// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile editing and live profile snapshots.

use crate::db::{collections, to_data, CollectionPath, DocumentStore};
use crate::error::AppError;
use crate::forms::FieldErrors;
use crate::images::encode_data_uri;
use crate::models::UserProfile;
use crate::session::{watch_with, Session, Subscription};
use std::sync::Arc;
use tokio::sync::watch;
use validator::Validate;

/// Parse a numeric text field; anything unusable becomes `None` (`null`).
pub fn coerce_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Inline a picked photo as `data:<mime>;base64,<payload>`.
pub fn encode_photo(bytes: &[u8], mime: &str) -> String {
    encode_data_uri(bytes, mime)
}

fn format_number(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ProfileField {
    FirstName,
    LastName,
    Height,
    Weight,
}

/// Values as they will be stored, checked by `validator`.
#[derive(Debug, Clone, PartialEq, Validate)]
struct ProfileUpdate {
    #[validate(length(min = 1, max = 50, message = "First name must be 1 to 50 characters."))]
    first_name: String,
    #[validate(length(max = 50, message = "Last name must be at most 50 characters."))]
    last_name: String,
    #[validate(range(min = 50.0, max = 300.0, message = "Height must be between 50 and 300 cm."))]
    height: Option<f64>,
    #[validate(range(min = 20.0, max = 500.0, message = "Weight must be between 20 and 500 kg."))]
    weight: Option<f64>,
}

/// Edit-profile form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileForm {
    pub first_name: String,
    pub last_name: String,
    pub height: String,
    pub weight: String,
    pub photo: Option<String>,
}

impl ProfileForm {
    pub fn from_profile(profile: &UserProfile) -> Self {
        Self {
            first_name: profile.first_name.clone(),
            last_name: profile.last_name.clone(),
            height: format_number(profile.height),
            weight: format_number(profile.weight),
            photo: profile.photo.clone(),
        }
    }

    /// Attach a picked photo as an inline data URI.
    pub fn set_photo(&mut self, bytes: &[u8], mime: &str) {
        self.photo = Some(encode_photo(bytes, mime));
    }

    fn to_update(&self) -> ProfileUpdate {
        ProfileUpdate {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            height: coerce_number(&self.height),
            weight: coerce_number(&self.weight),
        }
    }

    pub fn validate(&self) -> FieldErrors<ProfileField> {
        let mut errors = FieldErrors::new();
        let Err(report) = self.to_update().validate() else {
            return errors;
        };

        for (field, failures) in report.field_errors() {
            let name: &str = &field;
            let field = match name {
                "first_name" => ProfileField::FirstName,
                "last_name" => ProfileField::LastName,
                "height" => ProfileField::Height,
                "weight" => ProfileField::Weight,
                _ => continue,
            };
            if let Some(message) = failures.iter().find_map(|f| f.message.as_ref()) {
                errors.set(field, message.to_string());
            }
        }
        errors
    }

    /// The profile to store, keeping fields the form does not edit.
    pub fn apply_to(&self, current: &UserProfile) -> Result<UserProfile, FieldErrors<ProfileField>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }
        let update = self.to_update();
        Ok(UserProfile {
            first_name: update.first_name,
            last_name: update.last_name,
            height: update.height,
            weight: update.weight,
            photo: self.photo.clone(),
            ..current.clone()
        })
    }
}

/// Profile document of the signed-in user.
#[derive(Clone)]
pub struct ProfileService {
    store: Arc<dyn DocumentStore>,
    session: Session,
    snapshot: Arc<watch::Sender<Option<UserProfile>>>,
}

impl ProfileService {
    pub fn new(store: Arc<dyn DocumentStore>, session: Session) -> Self {
        let (snapshot, _) = watch::channel(None);
        Self {
            store,
            session,
            snapshot: Arc::new(snapshot),
        }
    }

    fn path() -> CollectionPath {
        CollectionPath::root(collections::USERS)
    }

    fn require_uid(&self) -> Result<String, AppError> {
        self.session.uid().ok_or(AppError::Unauthorized)
    }

    /// Last loaded profile.
    pub fn current(&self) -> Option<UserProfile> {
        self.snapshot.borrow().clone()
    }

    /// Read the profile and publish it to subscribers.
    pub async fn load(&self) -> Result<Option<UserProfile>, AppError> {
        let uid = self.require_uid()?;
        let profile = self
            .store
            .get_record(&Self::path(), &uid)
            .await?
            .map(|doc| doc.decode::<UserProfile>())
            .transpose()?;

        tracing::debug!(uid = %uid, found = profile.is_some(), "Profile loaded");
        self.snapshot.send_replace(profile.clone());
        Ok(profile)
    }

    /// Validate and store the whole form, then publish the new snapshot.
    pub async fn save(&self, form: &ProfileForm) -> Result<UserProfile, AppError> {
        let uid = self.require_uid()?;
        let current = self.current().unwrap_or_default();

        let profile = form.apply_to(&current).map_err(|errors| {
            let message = errors
                .iter()
                .map(|(_, m)| m)
                .next()
                .unwrap_or("Invalid profile.")
                .to_string();
            AppError::Validation(message)
        })?;

        self.store
            .update_record(&Self::path(), &uid, to_data(&profile)?, true)
            .await?;
        tracing::info!(uid = %uid, "Profile saved");

        self.load()
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Profile {}", uid)))
    }

    /// Receive every published snapshot until the handle is dropped.
    pub fn subscribe<F>(&self, callback: F) -> Subscription
    where
        F: Fn(Option<UserProfile>) + Send + 'static,
    {
        watch_with(self.snapshot.subscribe(), callback)
    }
}
