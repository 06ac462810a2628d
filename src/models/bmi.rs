// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! BMI history record.

use serde::{Deserialize, Serialize};
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Gender {
    Male,
    Female,
}

/// Stored BMI calculation.
///
/// Stored at: `bmiRecords/{id}`, owned via `userId`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct BmiRecord {
    /// Assigned by the store; `None` until persisted
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub gender: Option<Gender>,
    /// Height in cm
    pub height: f64,
    /// Weight in kg
    pub weight: f64,
    pub age: u32,
    /// Rounded to one decimal place
    pub bmi: f64,
    /// When calculated (ISO 8601)
    pub date: String,
    pub user_id: Option<String>,
}
