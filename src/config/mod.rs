//! Configuration module for veil-browser.
//!
//! This module provides configuration management for the application,
//! including:
//! - Loading settings from files (TOML/JSON)
//! - Environment variable overrides
//! - CLI argument merging
//! - Validation and defaults
//!
//! # Example
//!
//! ```rust,no_run
//! use veil_browser::config::AppSettings;
//!
//! // Load from defaults
//! let settings = AppSettings::default();
//!
//! // Load from a specific file
//! let settings = AppSettings::from_file("veil.toml").unwrap();
//!
//! // Override with environment variables
//! let settings = settings.merge_with_env();
//! ```

mod settings;

pub use settings::{AppSettings, CliArgs, ConfigError};
