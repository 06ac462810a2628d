// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Theme passed explicitly to screens instead of a global context.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
#[cfg(feature = "binding-generation")]
use ts_rs::TS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl FromStr for ThemeMode {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(ThemeMode::Light),
            "dark" => Ok(ThemeMode::Dark),
            _ => Err(()),
        }
    }
}

/// Colour tokens consumed by the UI layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "binding-generation", derive(TS))]
#[cfg_attr(
    feature = "binding-generation",
    ts(export, export_to = "app/src/generated/")
)]
pub struct Theme {
    pub mode: ThemeMode,
    pub background: &'static str,
    pub surface: &'static str,
    pub text: &'static str,
    pub primary: &'static str,
    pub error: &'static str,
}

impl Theme {
    pub fn new(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Light => Self {
                mode,
                background: "#FFFFFF",
                surface: "#F5F5F5",
                text: "#1A1A1A",
                primary: "#FF6B35",
                error: "#D32F2F",
            },
            ThemeMode::Dark => Self {
                mode,
                background: "#121212",
                surface: "#1E1E1E",
                text: "#FAFAFA",
                primary: "#FF8A5C",
                error: "#EF5350",
            },
        }
    }

    /// Flip between light and dark.
    pub fn toggled(&self) -> Self {
        match self.mode {
            ThemeMode::Light => Self::new(ThemeMode::Dark),
            ThemeMode::Dark => Self::new(ThemeMode::Light),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::new(ThemeMode::default())
    }
}
