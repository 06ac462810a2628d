// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Workout plan model.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A workout plan owned by one user.
///
/// Stored at: `users/{uid}/workouts/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Workout {
    /// Stable across edits (`default-<n>` for the seeded catalog)
    pub id: String,
    pub title: String,
    /// Free text, e.g. "30 min"
    pub duration: String,
    /// What the workout is for
    #[serde(default)]
    pub functionality: String,
    /// Bundled asset key or remote URL. Both image fields are written as
    /// `null` when absent, so a merge write clears them.
    #[serde(default)]
    pub image: Option<String>,
    /// Inline photo (base64, optionally as a data URI)
    #[serde(default)]
    pub image_base64: Option<String>,
    /// Exercise names, in order
    #[serde(default)]
    pub routine: Vec<String>,
}
