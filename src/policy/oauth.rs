//! OAuth / Login Flow Classification
//!
//! Classifies a navigation URL as an authentication flow or not. The rule
//! set is static configuration: an ordered list of provider domains matched
//! as substrings of the entire lowercased URL, then an ordered list of
//! fallback patterns.
//!
//! The domain check deliberately matches against the whole URL rather than
//! the host component only. That looseness can false-positive on a path or
//! query parameter containing a domain-like string; it is preserved as-is
//! because callers depend on the broad match.
//!
//! The classifier is pure: no side effects, no state between calls, and it
//! never raises — absent or malformed input classifies as `false`.

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// One fallback rule, tested against the lowercased URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPattern {
    /// The URL contains the substring.
    Contains(String),
    /// The URL contains every listed substring simultaneously.
    ContainsAll(Vec<String>),
}

impl FallbackPattern {
    fn matches(&self, url: &str) -> bool {
        match self {
            FallbackPattern::Contains(needle) => url.contains(needle.as_str()),
            FallbackPattern::ContainsAll(needles) => {
                needles.iter().all(|n| url.contains(n.as_str()))
            }
        }
    }
}

/// Ordered OAuth classification rules. Immutable at runtime.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OAuthRuleSet {
    /// Exact provider domains, matched as substrings of the entire URL.
    pub domains: Vec<String>,
    /// Fallback patterns, tested in order after the domain list.
    pub fallbacks: Vec<FallbackPattern>,
}

impl OAuthRuleSet {
    pub fn new(domains: Vec<String>, fallbacks: Vec<FallbackPattern>) -> Self {
        Self { domains, fallbacks }
    }

    /// Extends the domain list, keeping rule order stable.
    pub fn with_extra_domains(mut self, extra: impl IntoIterator<Item = String>) -> Self {
        self.domains.extend(extra);
        self
    }

    /// Classifies `url` as an authentication flow (`true`) or not.
    ///
    /// `None` and the empty string classify as `false`. The whole URL is
    /// lowercased before matching; domains are tested first, in order, then
    /// the fallback patterns.
    pub fn classify(&self, url: Option<&str>) -> bool {
        let url = match url {
            Some(u) if !u.is_empty() => u.to_lowercase(),
            _ => return false,
        };

        for domain in &self.domains {
            if url.contains(domain.as_str()) {
                trace!(%url, %domain, "classified as auth flow by domain");
                return true;
            }
        }

        for pattern in &self.fallbacks {
            if pattern.matches(&url) {
                trace!(%url, ?pattern, "classified as auth flow by fallback");
                return true;
            }
        }

        false
    }
}

impl Default for OAuthRuleSet {
    fn default() -> Self {
        Self::new(
            vec!["accounts.google.com".to_string()],
            vec![
                FallbackPattern::Contains("oauth".to_string()),
                FallbackPattern::Contains("/auth".to_string()),
                FallbackPattern::ContainsAll(vec![
                    "signin".to_string(),
                    "google".to_string(),
                ]),
                FallbackPattern::Contains("response_type=code".to_string()),
                FallbackPattern::Contains("response_type=token".to_string()),
            ],
        )
    }
}

static DEFAULT_RULES: Lazy<OAuthRuleSet> = Lazy::new(OAuthRuleSet::default);

/// The built-in rule set.
pub fn default_rules() -> &'static OAuthRuleSet {
    &DEFAULT_RULES
}

/// Classifies `url` against the built-in rule set.
pub fn is_auth_navigation(url: Option<&str>) -> bool {
    DEFAULT_RULES.classify(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_oauth_url_is_auth() {
        assert!(is_auth_navigation(Some(
            "https://accounts.google.com/o/oauth2/v2/auth?response_type=code"
        )));
    }

    #[test]
    fn test_plain_url_is_not_auth() {
        assert!(!is_auth_navigation(Some("https://example.com/dashboard")));
    }

    #[test]
    fn test_absent_and_empty_input_degrade_to_false() {
        assert!(!is_auth_navigation(None));
        assert!(!is_auth_navigation(Some("")));
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        assert!(is_auth_navigation(Some(
            "HTTPS://ACCOUNTS.GOOGLE.COM/ServiceLogin"
        )));
        assert!(is_auth_navigation(Some("https://example.com/OAuth/start")));
    }

    #[test]
    fn test_fallback_patterns_in_order() {
        assert!(is_auth_navigation(Some("https://example.com/oauth2/start")));
        assert!(is_auth_navigation(Some("https://example.com/auth/login")));
        assert!(is_auth_navigation(Some(
            "https://mail.google.com/mail/signin"
        )));
        assert!(is_auth_navigation(Some(
            "https://idp.example.com/authorize?response_type=token"
        )));
    }

    #[test]
    fn test_signin_requires_provider_qualifier() {
        assert!(!is_auth_navigation(Some("https://example.com/signin")));
        assert!(is_auth_navigation(Some(
            "https://example.com/signin?idp=google"
        )));
    }

    #[test]
    fn test_whole_url_matching_is_loose() {
        // Domain-like strings anywhere in the URL hit, by design.
        assert!(is_auth_navigation(Some(
            "https://example.com/redirect?next=accounts.google.com"
        )));
    }

    #[test]
    fn test_extra_domains_extend_the_rule_set() {
        let rules = OAuthRuleSet::default()
            .with_extra_domains(["login.microsoftonline.com".to_string()]);

        assert!(rules.classify(Some(
            "https://login.microsoftonline.com/common/wsfed"
        )));
        assert!(!rules.classify(Some("https://example.com/dashboard")));
    }

    #[test]
    fn test_classifier_holds_no_state() {
        let rules = OAuthRuleSet::default();
        let url = Some("https://accounts.google.com/");

        assert_eq!(rules.classify(url), rules.classify(url));
        assert!(!rules.classify(Some("https://example.com/")));
        assert!(rules.classify(url));
    }
}
