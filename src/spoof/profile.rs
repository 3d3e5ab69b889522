//! Spoofed Browser Identity Profiles
//!
//! A [`ProfileDefinition`] is an immutable description of one fake browser
//! identity: which vendor family it claims, what the navigator surface should
//! report, which plugin/MIME tables are visible, what the 3D-rendering API
//! returns for the unmasked vendor/renderer queries, and which embedder
//! globals must be scrubbed from the page.
//!
//! Profiles are data only. Compilation into an injectable script is the job
//! of [`crate::spoof::synthesizer::ScriptSynthesizer`].
//!
//! # Consistency
//!
//! Fields must be mutually consistent with the chosen family. A profile
//! claiming a non-Chrome family must not carry the `window.chrome` runtime
//! bridge or a `deviceMemory` value; a Chrome-family profile must supply
//! non-empty plugin/MIME tables and the bridge. [`ProfileDefinition::validate`]
//! enforces this; the registry refuses inconsistent profiles outright.

use serde::{Deserialize, Serialize};

use crate::spoof::SpoofError;

/// Browser vendor family a profile claims to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BrowserFamily {
    /// Chromium-derived identity (Chrome, Edge, ...).
    Chrome,
    /// Gecko-derived identity.
    Firefox,
}

impl BrowserFamily {
    /// Whether this family ships the vendor `window.chrome` runtime bridge.
    pub fn expects_runtime_bridge(&self) -> bool {
        matches!(self, BrowserFamily::Chrome)
    }
}

impl std::fmt::Display for BrowserFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BrowserFamily::Chrome => write!(f, "chrome"),
            BrowserFamily::Firefox => write!(f, "firefox"),
        }
    }
}

/// One entry of the spoofed `navigator.plugins` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluginEntry {
    /// Plugin name, also the `namedItem` lookup key.
    pub name: String,
    /// Plugin filename.
    pub filename: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
}

impl PluginEntry {
    pub fn new(
        name: impl Into<String>,
        filename: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            filename: filename.into(),
            description: description.into(),
        }
    }
}

/// One entry of the spoofed `navigator.mimeTypes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MimeTypeEntry {
    /// MIME type string (e.g. "application/pdf"), the `namedItem` lookup key.
    pub mime_type: String,
    /// File suffixes (e.g. "pdf").
    #[serde(default)]
    pub suffixes: String,
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// Index into the profile's plugin table for `enabledPlugin`, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enabled_plugin: Option<usize>,
}

impl MimeTypeEntry {
    pub fn new(
        mime_type: impl Into<String>,
        suffixes: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            mime_type: mime_type.into(),
            suffixes: suffixes.into(),
            description: description.into(),
            enabled_plugin: None,
        }
    }

    /// Links this MIME type to a plugin table index.
    pub fn with_enabled_plugin(mut self, index: usize) -> Self {
        self.enabled_plugin = Some(index);
        self
    }
}

/// Spoofed `navigator.connection` descriptor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConnectionInfo {
    /// Effective connection type (e.g. "4g").
    pub effective_type: String,
    /// Round-trip estimate in milliseconds.
    pub rtt: u32,
    /// Downlink estimate in Mbps.
    pub downlink: f64,
    /// Data-saver flag.
    pub save_data: bool,
}

impl Default for ConnectionInfo {
    fn default() -> Self {
        Self {
            effective_type: "4g".to_string(),
            rtt: 50,
            downlink: 10.0,
            save_data: false,
        }
    }
}

/// Literal value produced by a navigator property getter rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverrideValue {
    /// The property reads `undefined`.
    Undefined,
    Bool(bool),
    Int(i64),
    Str(String),
    StrList(Vec<String>),
}

/// One extra (property name -> getter rule) entry applied on `navigator`
/// beyond the typed profile fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigatorOverride {
    /// Property name on `navigator`.
    pub property: String,
    /// Value the redefined getter returns.
    pub value: OverrideValue,
}

impl NavigatorOverride {
    pub fn new(property: impl Into<String>, value: OverrideValue) -> Self {
        Self {
            property: property.into(),
            value,
        }
    }
}

/// Immutable description of one spoofed browser identity.
///
/// Loaded once at startup (built-in or from configuration) and never mutated.
/// See the module docs for the consistency invariant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileDefinition {
    /// Registry id of this profile.
    pub id: String,

    /// Claimed vendor family.
    pub family: BrowserFamily,

    /// User-agent string the host applies at the engine-profile level.
    ///
    /// The injected script cannot rewrite the UA request header, so this is a
    /// hint for the embedding surface, not an injection step.
    pub user_agent: String,

    /// Ordered extra navigator property overrides beyond the typed fields.
    #[serde(default)]
    pub navigator_overrides: Vec<NavigatorOverride>,

    /// Locale list; `languages[0]` doubles as `navigator.language`.
    pub languages: Vec<String>,

    /// Spoofed `navigator.plugins` table.
    #[serde(default)]
    pub plugins: Vec<PluginEntry>,

    /// Spoofed `navigator.mimeTypes` table.
    #[serde(default)]
    pub mime_types: Vec<MimeTypeEntry>,

    /// Unmasked-vendor string returned for 3D-context parameter 37445.
    pub webgl_vendor: String,

    /// Unmasked-renderer string returned for 3D-context parameter 37446.
    pub webgl_renderer: String,

    /// Whether the `window.chrome` runtime bridge object is installed.
    #[serde(default)]
    pub has_runtime_bridge: bool,

    /// Spoofed logical core count.
    pub hardware_concurrency: u32,

    /// Spoofed device memory in GB, or absent (reads `undefined`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub device_memory: Option<u32>,

    /// Spoofed `navigator.connection` descriptor, or absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connection_info: Option<ConnectionInfo>,

    /// Spoofed `navigator.buildID`, or absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub build_id: Option<String>,

    /// Global property names deleted from the page if present, regardless of
    /// family (host-embedding bridge objects such as `qt`).
    #[serde(default)]
    pub cleanup_targets: Vec<String>,
}

impl ProfileDefinition {
    /// Built-in Chrome-family desktop identity.
    pub fn chrome_desktop() -> Self {
        Self {
            id: "chrome-desktop".to_string(),
            family: BrowserFamily::Chrome,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            navigator_overrides: Vec::new(),
            languages: vec!["en-US".to_string(), "en".to_string()],
            plugins: vec![
                PluginEntry::new(
                    "Chrome PDF Plugin",
                    "internal-pdf-viewer",
                    "Portable Document Format",
                ),
                PluginEntry::new("Chrome PDF Viewer", "mhjfbmdgcfjbbpaeojofohoefgiehjai", ""),
                PluginEntry::new("Native Client", "internal-nacl-plugin", ""),
            ],
            mime_types: vec![
                MimeTypeEntry::new("application/pdf", "pdf", "Portable Document Format")
                    .with_enabled_plugin(0),
                MimeTypeEntry::new("text/pdf", "pdf", "Portable Document Format")
                    .with_enabled_plugin(0),
            ],
            webgl_vendor: "Google Inc. (Intel)".to_string(),
            webgl_renderer: "ANGLE (Intel, Mesa Intel(R) UHD Graphics (ICL GT1), OpenGL 4.6)"
                .to_string(),
            has_runtime_bridge: true,
            hardware_concurrency: 8,
            device_memory: Some(8),
            connection_info: Some(ConnectionInfo::default()),
            build_id: None,
            cleanup_targets: vec!["qt".to_string()],
        }
    }

    /// Built-in Firefox-family desktop identity.
    ///
    /// This is the canonical default: no runtime bridge, no `deviceMemory`,
    /// no `navigator.connection`, and the fixed Gecko buildID that real
    /// Firefox has reported since version 64.
    pub fn firefox_desktop() -> Self {
        Self {
            id: "firefox-desktop".to_string(),
            family: BrowserFamily::Firefox,
            user_agent: "Mozilla/5.0 (X11; Linux x86_64; rv:121.0) Gecko/20100101 Firefox/121.0"
                .to_string(),
            navigator_overrides: vec![NavigatorOverride::new(
                "oscpu",
                OverrideValue::Str("Linux x86_64".to_string()),
            )],
            languages: vec!["en-US".to_string(), "en".to_string()],
            plugins: Vec::new(),
            mime_types: Vec::new(),
            webgl_vendor: "Mesa".to_string(),
            webgl_renderer: "Mesa Intel(R) UHD Graphics (ICL GT1)".to_string(),
            has_runtime_bridge: false,
            hardware_concurrency: 8,
            device_memory: None,
            connection_info: None,
            build_id: Some("20181001000000".to_string()),
            cleanup_targets: vec!["qt".to_string()],
        }
    }

    /// Checks the cross-signal consistency invariant for this profile.
    ///
    /// # Errors
    ///
    /// Returns [`SpoofError::InconsistentProfile`] describing the first
    /// violation found. A violating profile is a configuration defect and is
    /// never silently repaired.
    pub fn validate(&self) -> Result<(), SpoofError> {
        let fail = |reason: &str| {
            Err(SpoofError::InconsistentProfile {
                id: self.id.clone(),
                reason: reason.to_string(),
            })
        };

        if self.id.is_empty() {
            return fail("profile id cannot be empty");
        }
        if self.user_agent.is_empty() {
            return fail("user agent cannot be empty");
        }
        if self.languages.is_empty() {
            return fail("languages cannot be empty");
        }
        if self.webgl_vendor.is_empty() || self.webgl_renderer.is_empty() {
            return fail("webgl vendor/renderer cannot be empty");
        }

        match self.family {
            BrowserFamily::Chrome => {
                if !self.has_runtime_bridge {
                    return fail("chrome family requires the runtime bridge object");
                }
                if self.plugins.is_empty() {
                    return fail("chrome family requires a non-empty plugin table");
                }
                if self.mime_types.is_empty() {
                    return fail("chrome family requires a non-empty MIME type table");
                }
            }
            BrowserFamily::Firefox => {
                if self.has_runtime_bridge {
                    return fail("non-chrome family must not carry the runtime bridge object");
                }
                if self.device_memory.is_some() {
                    return fail("non-chrome family must not expose deviceMemory");
                }
            }
        }

        for mt in &self.mime_types {
            if let Some(index) = mt.enabled_plugin {
                if index >= self.plugins.len() {
                    return fail("MIME type links to a plugin index out of range");
                }
            }
        }

        Ok(())
    }
}
