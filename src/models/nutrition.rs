// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Nutrition goal model.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

/// A meal slot of a nutrition plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum Meal {
    Breakfast,
    Lunch,
    Dinner,
    Snacks,
}

impl Meal {
    pub const ALL: [Meal; 4] = [Meal::Breakfast, Meal::Lunch, Meal::Dinner, Meal::Snacks];
}

/// How demanding a meal is to prepare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum MealLevel {
    #[default]
    Easy,
    Medium,
    Hard,
}

/// A nutrition goal. At most one goal per user is active.
///
/// Stored at: `users/{uid}/nutritionGoals/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct NutritionGoal {
    /// Slug of the name plus creation timestamp
    pub id: String,
    pub name: String,
    pub calories: String,
    #[serde(default)]
    pub img: Option<String>,
    #[serde(default)]
    pub is_active: bool,
    #[serde(rename = "Breakfast", default)]
    pub breakfast: String,
    #[serde(rename = "Lunch", default)]
    pub lunch: String,
    #[serde(rename = "Dinner", default)]
    pub dinner: String,
    #[serde(rename = "Snacks", default)]
    pub snacks: String,
    #[serde(default)]
    pub meal_levels: BTreeMap<Meal, MealLevel>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub updated_at: String,
}

impl NutritionGoal {
    /// Text of one meal slot.
    pub fn meal(&self, meal: Meal) -> &str {
        match meal {
            Meal::Breakfast => &self.breakfast,
            Meal::Lunch => &self.lunch,
            Meal::Dinner => &self.dinner,
            Meal::Snacks => &self.snacks,
        }
    }
}
