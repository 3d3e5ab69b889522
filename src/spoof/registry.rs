//! Profile Registry
//!
//! Holds the set of known spoofing profiles and resolves the active one by
//! id. Exactly one profile is active per running instance; switching profiles
//! is a configuration-time decision, not a runtime operation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::spoof::profile::ProfileDefinition;
use crate::spoof::SpoofError;

/// Registry of known spoofing profiles.
///
/// Profiles are registered once at startup and are immutable afterwards.
/// Registration validates the cross-signal consistency invariant, so a
/// resolved profile is always safe to compile.
#[derive(Debug, Default)]
pub struct ProfileRegistry {
    profiles: BTreeMap<String, ProfileDefinition>,
}

impl ProfileRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry pre-populated with the built-in profiles.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();

        // Built-ins are consistent by construction.
        for profile in [
            ProfileDefinition::chrome_desktop(),
            ProfileDefinition::firefox_desktop(),
        ] {
            if let Err(e) = registry.register(profile) {
                unreachable!("built-in profile rejected: {e}");
            }
        }

        registry
    }

    /// Registers a profile.
    ///
    /// # Errors
    ///
    /// Returns [`SpoofError::InconsistentProfile`] if the profile violates
    /// the family consistency invariant, or [`SpoofError::DuplicateProfile`]
    /// if the id is already taken.
    pub fn register(&mut self, profile: ProfileDefinition) -> Result<(), SpoofError> {
        profile.validate()?;

        if self.profiles.contains_key(&profile.id) {
            return Err(SpoofError::DuplicateProfile(profile.id));
        }

        debug!(id = %profile.id, family = %profile.family, "registered spoofing profile");
        self.profiles.insert(profile.id.clone(), profile);
        Ok(())
    }

    /// Resolves a profile by id.
    ///
    /// # Errors
    ///
    /// Returns [`SpoofError::UnknownProfile`] if the id is not registered.
    /// This is a fatal configuration error at startup.
    pub fn resolve(&self, id: &str) -> Result<&ProfileDefinition, SpoofError> {
        self.profiles
            .get(id)
            .ok_or_else(|| SpoofError::UnknownProfile(id.to_string()))
    }

    /// Registered profile ids, in sorted order.
    pub fn ids(&self) -> Vec<&str> {
        self.profiles.keys().map(String::as_str).collect()
    }

    /// Number of registered profiles.
    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    /// Whether the registry holds no profiles.
    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spoof::profile::BrowserFamily;

    #[test]
    fn test_builtins_are_registered() {
        let registry = ProfileRegistry::with_builtins();

        assert_eq!(registry.ids(), vec!["chrome-desktop", "firefox-desktop"]);
        assert_eq!(
            registry.resolve("chrome-desktop").unwrap().family,
            BrowserFamily::Chrome
        );
        assert_eq!(
            registry.resolve("firefox-desktop").unwrap().family,
            BrowserFamily::Firefox
        );
    }

    #[test]
    fn test_unknown_profile_errors() {
        let registry = ProfileRegistry::with_builtins();

        let err = registry.resolve("safari-desktop").unwrap_err();
        assert!(matches!(err, SpoofError::UnknownProfile(id) if id == "safari-desktop"));
    }

    #[test]
    fn test_inconsistent_profile_is_refused() {
        let mut registry = ProfileRegistry::new();
        let mut profile = ProfileDefinition::firefox_desktop();
        profile.has_runtime_bridge = true;

        assert!(registry.register(profile).is_err());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_duplicate_id_is_refused() {
        let mut registry = ProfileRegistry::with_builtins();

        let err = registry
            .register(ProfileDefinition::firefox_desktop())
            .unwrap_err();
        assert!(matches!(err, SpoofError::DuplicateProfile(_)));
        assert_eq!(registry.len(), 2);
    }
}
