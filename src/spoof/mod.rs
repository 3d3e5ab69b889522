//! Identity Spoofing Profile Engine
//!
//! This module is the core of veil-browser: it describes coherent fake browser
//! identities and compiles them into injectable override scripts.
//!
//! # Modules
//!
//! - `profile` - Profile data model and cross-signal consistency validation
//! - `registry` - Known-profile registry and active-profile resolution
//! - `synthesizer` - Compilation of a profile into injectable script text
//!
//! # Cross-Signal Consistency
//!
//! A spoofed identity must not leak contradictory signals across independent
//! browser APIs: a Firefox-family profile exposing `navigator.deviceMemory`
//! or a `window.chrome` runtime bridge is more detectable than no spoofing at
//! all. Consistency is enforced at registration time and treated as a
//! configuration defect, never silently repaired.
//!
//! # Example
//!
//! ```rust,no_run
//! use veil_browser::spoof::{ProfileRegistry, ScriptSynthesizer};
//!
//! let registry = ProfileRegistry::with_builtins();
//! let profile = registry.resolve("firefox-desktop").unwrap();
//! let script = ScriptSynthesizer::compile(profile);
//! assert!(script.as_str().contains("webdriver"));
//! ```

use thiserror::Error;

pub mod profile;
pub mod registry;
pub mod synthesizer;

// Re-export commonly used types for convenience
pub use profile::{
    BrowserFamily, ConnectionInfo, MimeTypeEntry, NavigatorOverride, OverrideValue, PluginEntry,
    ProfileDefinition,
};
pub use registry::ProfileRegistry;
pub use synthesizer::{ScriptSynthesizer, ScriptText};

/// Errors raised by the spoofing profile engine.
///
/// Both variants are configuration defects: they are reported at startup and
/// are not recoverable at runtime.
#[derive(Debug, Error)]
pub enum SpoofError {
    /// The requested profile id is not registered.
    #[error("unknown spoofing profile: {0:?}")]
    UnknownProfile(String),

    /// A profile id was registered twice.
    #[error("duplicate spoofing profile: {0:?}")]
    DuplicateProfile(String),

    /// A profile violates the cross-signal consistency invariant for its
    /// browser family.
    #[error("inconsistent profile {id:?}: {reason}")]
    InconsistentProfile { id: String, reason: String },
}
