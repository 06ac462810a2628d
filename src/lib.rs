// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! FitTrack: client core of a personal fitness tracker
//!
//! This crate provides the state and data layer behind the mobile screens:
//! BMI calculation and history, credential forms, workout plans, nutrition
//! goals and the user profile, backed by Firestore and the Identity Toolkit.

pub mod bmi;
pub mod config;
pub mod context;
pub mod db;
pub mod error;
pub mod forms;
pub mod images;
pub mod logging;
pub mod models;
pub mod services;
pub mod session;
pub mod theme;
pub mod time_utils;

pub use context::AppContext;
