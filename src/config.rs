//! Application configuration loaded from environment variables.
//!
//! A `.env` file is honoured for local development.

use crate::theme::ThemeMode;
use std::env;

const DEFAULT_IDENTITY_TOOLKIT_URL: &str = "https://identitytoolkit.googleapis.com/v1";

/// Application configuration, loaded once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// GCP project hosting the Firestore database
    pub gcp_project_id: String,
    /// Web API key for the Identity Toolkit endpoints
    pub firebase_api_key: String,
    /// Base URL of the Identity Toolkit REST API (overridable for the emulator)
    pub identity_toolkit_url: String,
    /// Initial theme mode
    pub theme_mode: ThemeMode,
    /// Initial height on the BMI slider, in cm
    pub default_height_cm: f64,
}

impl Config {
    /// Fixed configuration for tests.
    pub fn test_default() -> Self {
        Self {
            gcp_project_id: "test-project".to_string(),
            firebase_api_key: "test_api_key".to_string(),
            identity_toolkit_url: "http://localhost:9099/identitytoolkit.googleapis.com/v1"
                .to_string(),
            theme_mode: ThemeMode::Light,
            default_height_cm: crate::bmi::DEFAULT_HEIGHT_CM,
        }
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let theme_mode = match env::var("FITTRACK_THEME") {
            Ok(raw) => raw
                .parse()
                .map_err(|_| ConfigError::Invalid("FITTRACK_THEME", raw))?,
            Err(_) => ThemeMode::Light,
        };

        let default_height_cm = match env::var("BMI_DEFAULT_HEIGHT_CM") {
            Ok(raw) => raw
                .trim()
                .parse::<f64>()
                .map(crate::bmi::clamp_height)
                .map_err(|_| ConfigError::Invalid("BMI_DEFAULT_HEIGHT_CM", raw))?,
            Err(_) => crate::bmi::DEFAULT_HEIGHT_CM,
        };

        Ok(Self {
            gcp_project_id: env::var("GCP_PROJECT_ID").unwrap_or_else(|_| "local-dev".to_string()),
            firebase_api_key: env::var("FIREBASE_API_KEY")
                .map(|v| v.trim().to_string())
                .map_err(|_| ConfigError::Missing("FIREBASE_API_KEY"))?,
            identity_toolkit_url: env::var("IDENTITY_TOOLKIT_URL")
                .unwrap_or_else(|_| DEFAULT_IDENTITY_TOOLKIT_URL.to_string()),
            theme_mode,
            default_height_cm,
        })
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    Missing(&'static str),

    #[error("Invalid value for {0}: {1}")]
    Invalid(&'static str, String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_from_env() {
        env::set_var("FIREBASE_API_KEY", " test_key ");
        env::set_var("FITTRACK_THEME", "dark");
        env::set_var("BMI_DEFAULT_HEIGHT_CM", "250");

        let config = Config::from_env().expect("Config should load");

        assert_eq!(config.firebase_api_key, "test_key");
        assert_eq!(config.theme_mode, ThemeMode::Dark);
        // Clamped to the slider range
        assert_eq!(config.default_height_cm, 220.0);
        assert_eq!(config.identity_toolkit_url, DEFAULT_IDENTITY_TOOLKIT_URL);
    }
}
