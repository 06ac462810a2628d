// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plans: default catalog, seeding, editing and image resolution.

use crate::db::{collections, to_data, CollectionPath, DocumentStore};
use crate::error::AppError;
use crate::forms::FieldErrors;
use crate::images::{is_remote_url, to_data_uri};
use crate::models::Workout;
use crate::session::Session;
use std::sync::Arc;

pub const DEFAULT_DURATION: &str = "30 min";
const DEFAULT_ID_PREFIX: &str = "default-";
const CUSTOM_ID_PREFIX: &str = "custom-";

/// Built-in workouts: (title, duration, functionality, bundled image, routine).
const CATALOG: [(&str, &str, &str, &str, &[&str]); 6] = [
    (
        "Full Body Burn",
        "45 min",
        "Works every major muscle group in one session.",
        "full_body.png",
        &["Jumping Jacks", "Push-ups", "Squats", "Lunges", "Plank"],
    ),
    (
        "Core Crusher",
        "20 min",
        "Builds abdominal strength and stability.",
        "core.png",
        &["Crunches", "Russian Twists", "Leg Raises", "Mountain Climbers", "Plank"],
    ),
    (
        "Upper Body Strength",
        "40 min",
        "Strengthens chest, back, shoulders and arms.",
        "upper_body.png",
        &["Push-ups", "Dips", "Pike Push-ups", "Superman Hold"],
    ),
    (
        "Leg Day",
        "35 min",
        "Develops leg power and endurance.",
        "legs.png",
        &["Squats", "Lunges", "Glute Bridges", "Calf Raises", "Wall Sit"],
    ),
    (
        "HIIT Cardio",
        "25 min",
        "Short intense intervals to boost endurance and burn calories.",
        "hiit.png",
        &["Burpees", "High Knees", "Jump Squats", "Skaters"],
    ),
    (
        "Yoga Flow",
        "30 min",
        "Improves flexibility, balance and recovery.",
        "yoga.png",
        &["Sun Salutation", "Warrior II", "Downward Dog", "Child's Pose"],
    ),
];

/// The default workout set, ids `default-1` through `default-6`.
pub fn default_workouts() -> Vec<Workout> {
    CATALOG
        .iter()
        .enumerate()
        .map(
            |(i, (title, duration, functionality, image, routine))| Workout {
                id: format!("{}{}", DEFAULT_ID_PREFIX, i + 1),
                title: title.to_string(),
                duration: duration.to_string(),
                functionality: functionality.to_string(),
                image: Some(image.to_string()),
                image_base64: None,
                routine: routine.iter().map(|s| s.to_string()).collect(),
            },
        )
        .collect()
}

/// Bundled image of a catalog workout.
pub fn default_image_for(id: &str) -> Option<&'static str> {
    let n: usize = id.strip_prefix(DEFAULT_ID_PREFIX)?.parse().ok()?;
    CATALOG.get(n.checked_sub(1)?).map(|entry| entry.3)
}

/// Split multiline text into trimmed exercises, dropping blank lines.
pub fn parse_routine(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// One exercise per line, for the edit form.
pub fn routine_to_text(routine: &[String]) -> String {
    routine.join("\n")
}

/// What to render for a workout's picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Inline photo as a data URI
    Inline(String),
    /// Asset shipped with the app
    Bundled(&'static str),
    Remote(String),
}

/// Inline photo first, then the catalog image for the id, then a remote URL.
pub fn resolve_image(workout: &Workout) -> Option<ImageSource> {
    if let Some(inline) = workout.image_base64.as_deref().filter(|s| !s.trim().is_empty()) {
        return Some(ImageSource::Inline(to_data_uri(inline)));
    }
    if let Some(asset) = default_image_for(&workout.id) {
        return Some(ImageSource::Bundled(asset));
    }
    workout
        .image
        .as_deref()
        .filter(|url| is_remote_url(url))
        .map(|url| ImageSource::Remote(url.to_string()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum WorkoutField {
    Title,
    Image,
}

/// Add/edit workout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkoutForm {
    /// Set when editing an existing workout
    pub id: Option<String>,
    pub title: String,
    pub duration: String,
    pub functionality: String,
    pub routine_text: String,
    pub image: Option<String>,
    pub image_base64: Option<String>,
}

impl WorkoutForm {
    /// Prefill the form from a stored workout.
    pub fn edit(workout: &Workout) -> Self {
        Self {
            id: Some(workout.id.clone()),
            title: workout.title.clone(),
            duration: workout.duration.clone(),
            functionality: workout.functionality.clone(),
            routine_text: routine_to_text(&workout.routine),
            image: workout.image.clone(),
            image_base64: workout.image_base64.clone(),
        }
    }

    pub fn validate(&self) -> FieldErrors<WorkoutField> {
        let mut errors = FieldErrors::new();
        if self.title.trim().is_empty() {
            errors.set(WorkoutField::Title, "Please enter a workout title.");
        }
        if let Some(inline) = self.image_base64.as_deref() {
            if crate::images::decode_data_uri(inline).is_err() {
                errors.set(WorkoutField::Image, "The selected photo could not be read.");
            }
        }
        errors
    }

    /// Build the workout to store; keeps the id when editing.
    pub fn to_workout(&self) -> Result<Workout, FieldErrors<WorkoutField>> {
        let errors = self.validate();
        if !errors.is_empty() {
            return Err(errors);
        }

        let duration = match self.duration.trim() {
            "" => DEFAULT_DURATION.to_string(),
            d => d.to_string(),
        };

        Ok(Workout {
            id: self.id.clone().unwrap_or_else(|| {
                format!("{}{}", CUSTOM_ID_PREFIX, uuid::Uuid::new_v4().simple())
            }),
            title: self.title.trim().to_string(),
            duration,
            functionality: self.functionality.trim().to_string(),
            image: self.image.clone(),
            image_base64: self.image_base64.clone(),
            routine: parse_routine(&self.routine_text),
        })
    }
}

/// Workout persistence for the signed-in user.
#[derive(Clone)]
pub struct WorkoutService {
    store: Arc<dyn DocumentStore>,
    session: Session,
}

impl WorkoutService {
    pub fn new(store: Arc<dyn DocumentStore>, session: Session) -> Self {
        Self { store, session }
    }

    fn path(uid: &str) -> CollectionPath {
        CollectionPath::user_scoped(uid, collections::WORKOUTS)
    }

    fn require_uid(&self) -> Result<String, AppError> {
        self.session.uid().ok_or(AppError::Unauthorized)
    }

    /// Workouts to show.
    ///
    /// Signed-out users get the catalog from memory. A signed-in user with no
    /// stored workouts gets the catalog written to their collection first.
    pub async fn load(&self) -> Result<Vec<Workout>, AppError> {
        let Some(uid) = self.session.uid() else {
            return Ok(default_workouts());
        };

        let path = Self::path(&uid);
        let docs = self.store.read_records(&path, None).await?;
        if !docs.is_empty() {
            tracing::debug!(uid = %uid, count = docs.len(), "Workouts loaded");
            return docs.into_iter().map(|doc| doc.decode()).collect();
        }

        // Seed ids are fixed, so a concurrent seed rewrites the same documents
        let defaults = default_workouts();
        for workout in &defaults {
            self.store
                .set_record(&path, &workout.id, to_data(workout)?)
                .await?;
        }
        tracing::info!(uid = %uid, count = defaults.len(), "Seeded default workouts");
        Ok(defaults)
    }

    /// Create or update a workout by id.
    pub async fn save(&self, workout: &Workout) -> Result<(), AppError> {
        let uid = self.require_uid()?;
        self.store
            .update_record(&Self::path(&uid), &workout.id, to_data(workout)?, true)
            .await?;
        tracing::info!(uid = %uid, id = %workout.id, "Workout saved");
        Ok(())
    }

    pub async fn delete(&self, id: &str) -> Result<(), AppError> {
        let uid = self.require_uid()?;
        self.store.delete_record(&Self::path(&uid), id).await?;
        tracing::info!(uid = %uid, id, "Workout deleted");
        Ok(())
    }
}
