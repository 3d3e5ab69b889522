//! Application settings and configuration management.
//!
//! Settings select the active spoofing profile and extend the OAuth rule
//! set; they can also declare additional profiles inline. Sources are
//! applied with proper precedence.

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::spoof::ProfileDefinition;

/// Errors that can occur during configuration loading or validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read configuration file.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML configuration.
    #[error("Failed to parse TOML configuration: {0}")]
    TomlParseError(#[from] toml::de::Error),

    /// Failed to serialize TOML configuration.
    #[error("Failed to serialize TOML configuration: {0}")]
    TomlSerializeError(#[from] toml::ser::Error),

    /// Failed to parse JSON configuration.
    #[error("Failed to parse JSON configuration: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Invalid configuration value.
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// Unsupported file format.
    #[error("Unsupported configuration file format: {0}")]
    UnsupportedFormat(String),
}

/// Main application settings.
///
/// # Configuration Precedence
///
/// Settings are applied in the following order (later sources override
/// earlier):
/// 1. Default values
/// 2. Configuration file (TOML or JSON)
/// 3. Environment variables (`VEIL_*`)
/// 4. CLI arguments
///
/// # Example
///
/// ```rust
/// use veil_browser::config::AppSettings;
///
/// let settings = AppSettings::default().with_active_profile("chrome-desktop");
/// assert!(settings.spoof_enabled);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    /// Id of the spoofing profile to activate.
    #[serde(default = "default_active_profile")]
    pub active_profile: String,

    /// Whether identity spoofing is injected at all.
    #[serde(default = "default_spoof_enabled")]
    pub spoof_enabled: bool,

    /// Extra provider domains appended to the OAuth rule set.
    #[serde(default)]
    pub extra_oauth_domains: Vec<String>,

    /// Additional profiles declared in configuration, registered alongside
    /// the built-ins.
    #[serde(default)]
    pub profiles: Vec<ProfileDefinition>,
}

// Default value functions for serde
fn default_active_profile() -> String {
    "firefox-desktop".to_string()
}

fn default_spoof_enabled() -> bool {
    true
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            active_profile: default_active_profile(),
            spoof_enabled: default_spoof_enabled(),
            extra_oauth_domains: Vec::new(),
            profiles: Vec::new(),
        }
    }
}

impl AppSettings {
    /// Creates settings with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a configuration file.
    ///
    /// Supports both TOML and JSON formats, detected by file extension.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;

        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => Ok(toml::from_str(&content)?),
            Some("json") => Ok(serde_json::from_str(&content)?),
            Some(other) => Err(ConfigError::UnsupportedFormat(other.to_string())),
            None => Err(ConfigError::UnsupportedFormat(
                "no file extension".to_string(),
            )),
        }
    }

    /// Saves settings to a TOML file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Applies environment variable overrides (`VEIL_PROFILE`,
    /// `VEIL_SPOOF_ENABLED`, `VEIL_OAUTH_DOMAINS`).
    pub fn merge_with_env(mut self) -> Self {
        if let Ok(profile) = env::var("VEIL_PROFILE") {
            if !profile.is_empty() {
                self.active_profile = profile;
            }
        }

        if let Ok(val) = env::var("VEIL_SPOOF_ENABLED") {
            self.spoof_enabled = val.to_lowercase() == "true" || val == "1";
        }

        if let Ok(domains) = env::var("VEIL_OAUTH_DOMAINS") {
            self.extra_oauth_domains.extend(
                domains
                    .split(',')
                    .map(str::trim)
                    .filter(|d| !d.is_empty())
                    .map(String::from),
            );
        }

        self
    }

    /// Applies CLI argument overrides.
    pub fn merge_with_args(mut self, args: &CliArgs) -> Self {
        if let Some(ref profile) = args.profile {
            self.active_profile = profile.clone();
        }
        if let Some(spoof) = args.spoof_enabled {
            self.spoof_enabled = spoof;
        }
        self
    }

    /// Validates all settings.
    ///
    /// # Errors
    ///
    /// Returns an error if any setting is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.active_profile.is_empty() {
            return Err(ConfigError::ValidationError(
                "active_profile cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Sets the active profile id.
    pub fn with_active_profile(mut self, id: impl Into<String>) -> Self {
        self.active_profile = id.into();
        self
    }

    /// Enables or disables spoof injection.
    pub fn with_spoof_enabled(mut self, enabled: bool) -> Self {
        self.spoof_enabled = enabled;
        self
    }
}

/// Parsed command-line arguments relevant to settings.
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Path to a configuration file.
    pub config_file: Option<PathBuf>,
    /// Spoofing profile id override.
    pub profile: Option<String>,
    /// Spoof injection override.
    pub spoof_enabled: Option<bool>,
}

impl CliArgs {
    /// Loads settings with the full precedence chain:
    /// defaults < file < environment < CLI.
    pub fn load_settings(&self) -> Result<AppSettings, ConfigError> {
        let settings = match &self.config_file {
            Some(path) => AppSettings::from_file(path)?,
            None => AppSettings::default(),
        };

        let settings = settings.merge_with_env().merge_with_args(self);
        settings.validate()?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = AppSettings::default();
        assert_eq!(settings.active_profile, "firefox-desktop");
        assert!(settings.spoof_enabled);
        assert!(settings.extra_oauth_domains.is_empty());
        assert!(settings.profiles.is_empty());
    }

    #[test]
    fn test_toml_roundtrip() {
        let settings = AppSettings::default()
            .with_active_profile("chrome-desktop")
            .with_spoof_enabled(false);

        let text = toml::to_string_pretty(&settings).unwrap();
        let back: AppSettings = toml::from_str(&text).unwrap();

        assert_eq!(back.active_profile, "chrome-desktop");
        assert!(!back.spoof_enabled);
    }

    #[test]
    fn test_cli_args_override_settings() {
        let args = CliArgs {
            profile: Some("chrome-desktop".to_string()),
            spoof_enabled: Some(false),
            ..Default::default()
        };

        let settings = AppSettings::default().merge_with_args(&args);
        assert_eq!(settings.active_profile, "chrome-desktop");
        assert!(!settings.spoof_enabled);
    }

    #[test]
    fn test_validation_rejects_empty_profile() {
        let settings = AppSettings::default().with_active_profile("");
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_unsupported_format_is_rejected() {
        let dir = std::env::temp_dir();
        let path = dir.join("veil-settings-test.yaml");
        std::fs::write(&path, "active_profile: nope").unwrap();

        let err = AppSettings::from_file(&path).unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedFormat(_)));

        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_file_settings_parse() {
        let dir = std::env::temp_dir();
        let path = dir.join("veil-settings-test.toml");
        std::fs::write(
            &path,
            "active_profile = \"chrome-desktop\"\nspoof_enabled = false\n",
        )
        .unwrap();

        let settings = AppSettings::from_file(&path).unwrap();
        assert_eq!(settings.active_profile, "chrome-desktop");
        assert!(!settings.spoof_enabled);

        let _ = std::fs::remove_file(&path);
    }
}
