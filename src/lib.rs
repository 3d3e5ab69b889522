//! # Veil-Browser
//!
//! Identity masking for embedded browser surfaces, written in Rust.
//!
//! Veil-browser spoofs the identity signals an embedded browser exposes to
//! hosted third-party web content, defeating automated/headless-browser
//! detection heuristics (chiefly login/OAuth providers) while preserving
//! site functionality.
//!
//! ## Features
//!
//! - **Spoofing Profiles**: coherent fake browser identities with enforced
//!   cross-signal consistency
//! - **Script Synthesis**: deterministic compilation of a profile into an
//!   idempotent, fault-isolated override script
//! - **Early Injection**: a delivery contract guaranteeing the script runs
//!   before any hosted script, per document
//! - **OAuth Classification**: pure URL classification for authentication
//!   flows, consumed by the host's navigation handling
//! - **Flexible Configuration**: TOML/JSON files, environment variables,
//!   CLI arguments
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use veil_browser::{
//!     policy::is_auth_navigation,
//!     spoof::ProfileRegistry,
//!     surface::InjectionController,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let registry = ProfileRegistry::with_builtins();
//!     let profile = registry.resolve("firefox-desktop")?;
//!     let controller = InjectionController::new(profile)?;
//!
//!     // controller.attach(&surface) registers the compiled script with the
//!     // embedding engine's document lifecycle hook.
//!     assert!(!controller.script().as_str().is_empty());
//!
//!     assert!(is_auth_navigation(Some("https://accounts.google.com/o/oauth2/v2/auth")));
//!     Ok(())
//! }
//! ```
//!
//! ## Module Overview
//!
//! - [`spoof`]: profile data model, registry, and script synthesis
//! - [`surface`]: embedded-surface boundary, injection control, per-document state
//! - [`policy`]: OAuth/login navigation classification
//! - [`config`]: configuration loading and management
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                      Veil-Browser                        │
//! ├──────────────────────────────────────────────────────────┤
//! │  ┌─────────┐  ┌──────────┐  ┌──────────┐                 │
//! │  │  Spoof  │  │ Surface  │  │  Policy  │                 │
//! │  │ Engine  │  │Injection │  │Classifier│                 │
//! │  └────┬────┘  └────┬─────┘  └────┬─────┘                 │
//! │       └────────────┴─────────────┘                       │
//! │                    │                                     │
//! │              ┌─────┴─────┐                               │
//! │              │  Config   │                               │
//! │              └───────────┘                               │
//! └──────────────────────────────────────────────────────────┘
//! ```

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Full version string with name
pub const FULL_VERSION: &str = concat!(env!("CARGO_PKG_NAME"), " v", env!("CARGO_PKG_VERSION"));

// ============================================================================
// Module Exports
// ============================================================================

/// Configuration management for loading settings from files, env, and CLI.
pub mod config;

/// OAuth/login navigation URL classification.
pub mod policy;

/// Spoofing profile data model, registry, and script synthesis.
pub mod spoof;

/// Embedded-surface boundary: injection control and per-document state.
pub mod surface;

// ============================================================================
// Re-exports for Convenience
// ============================================================================

// Config types
pub use config::{AppSettings, CliArgs, ConfigError};

// Policy types
pub use policy::{is_auth_navigation, FallbackPattern, OAuthRuleSet};

// Spoof types
pub use spoof::{
    BrowserFamily, ConnectionInfo, MimeTypeEntry, NavigatorOverride, OverrideValue, PluginEntry,
    ProfileDefinition, ProfileRegistry, ScriptSynthesizer, ScriptText, SpoofError,
};

// Surface types
pub use surface::{DocumentState, EmbeddedSurface, InjectionController, MockSurface, ScriptRun};

// ============================================================================
// Prelude Module
// ============================================================================

/// Prelude module for convenient imports.
///
/// ```rust
/// use veil_browser::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::AppSettings;
    pub use crate::policy::{is_auth_navigation, OAuthRuleSet};
    pub use crate::spoof::{ProfileDefinition, ProfileRegistry, ScriptSynthesizer};
    pub use crate::surface::{EmbeddedSurface, InjectionController};
    pub use crate::{FULL_VERSION, NAME, VERSION};
}
