// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod auth;
pub mod bmi;
pub mod nutrition;
pub mod profile;
pub mod workouts;

pub use account::AccountService;
pub use auth::{AuthBackend, AuthErrorCode, IdentityToolkitClient};
pub use bmi::BmiScreen;
pub use nutrition::{NutritionForm, NutritionService};
pub use profile::{ProfileForm, ProfileService};
pub use workouts::{WorkoutForm, WorkoutService};
