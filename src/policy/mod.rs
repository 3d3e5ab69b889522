//! Navigation URL Policy
//!
//! Pure classification of navigation targets. The only question answered
//! here is whether a URL looks like a login/OAuth flow; the host's
//! navigation-intent handling consumes the boolean to decide popup/window
//! and spoof-bypass treatment.

pub mod oauth;

// Re-export commonly used types for convenience
pub use oauth::{default_rules, is_auth_navigation, FallbackPattern, OAuthRuleSet};
