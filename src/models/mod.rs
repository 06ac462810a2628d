// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Data models for the application.

pub mod bmi;
pub mod nutrition;
pub mod profile;
pub mod workout;

pub use bmi::{BmiRecord, Gender};
pub use nutrition::{Meal, MealLevel, NutritionGoal};
pub use profile::UserProfile;
pub use workout::Workout;
