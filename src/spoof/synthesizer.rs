//! Override Script Synthesis
//!
//! Compiles a [`ProfileDefinition`] into the script text that is injected
//! into every hosted document. Compilation is deterministic and pure: the
//! same profile always produces byte-identical output, and no clock or
//! randomness is consulted.
//!
//! # Emitted Script Contract
//!
//! The compiled script is a single IIFE that:
//! - checks-and-sets a per-document idempotency flag and returns immediately
//!   on re-execution;
//! - applies every override step in a fixed order, each wrapped in its own
//!   `try/catch` so a failing step never prevents later steps from running;
//! - wraps the permissions query and the 3D-context parameter query as
//!   wrap-and-delegate decorators: the documented inputs are special-cased,
//!   everything else goes to the retained original with identical call and
//!   return semantics.
//!
//! The script must run before any hosted-page script observes the global
//! scope; delivery is the job of
//! [`crate::surface::InjectionController`].

use crate::spoof::profile::{OverrideValue, ProfileDefinition};

/// Global flag the compiled script checks-and-sets to guarantee single
/// application per document.
pub const IDEMPOTENCY_FLAG: &str = "__veilIdentityApplied";

/// Global flag tracking whether the Control modifier is currently held.
/// Consumed by the host's navigation-intent handling.
pub const MODIFIER_FLAG: &str = "__veilCtrlHeld";

/// Global flag set once all override steps have run. Diagnostics only.
pub const COMPLETION_FLAG: &str = "__veilIdentityReady";

/// Unmasked-vendor parameter code of the 3D-rendering API. Fixed wire
/// constant, never altered.
const GL_UNMASKED_VENDOR: u32 = 37445;

/// Unmasked-renderer parameter code of the 3D-rendering API. Fixed wire
/// constant, never altered.
const GL_UNMASKED_RENDERER: u32 = 37446;

/// Compiled override script for one profile.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptText(String);

impl ScriptText {
    /// The script source.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the wrapper and returns the script source.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ScriptText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ScriptText {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Compiles profiles into injectable override scripts.
pub struct ScriptSynthesizer;

impl ScriptSynthesizer {
    /// Compiles `profile` into the override script. Deterministic and pure.
    ///
    /// The caller is expected to have validated the profile; compilation
    /// itself never fails.
    pub fn compile(profile: &ProfileDefinition) -> ScriptText {
        let mut script = String::new();

        script.push_str("(function() {\n    'use strict';\n\n");
        script.push_str(&guard_section());
        script.push_str(&webdriver_section());
        script.push_str(&tables_section(profile));
        script.push_str(&languages_section(profile));
        script.push_str(&bridge_section(profile));
        script.push_str(&cleanup_section(profile));
        script.push_str(&permissions_section());
        script.push_str(&webgl_section(profile));
        script.push_str(&connection_section(profile));
        script.push_str(&hardware_concurrency_section(profile));
        script.push_str(&device_memory_section(profile));
        script.push_str(&build_id_section(profile));
        script.push_str(&extra_overrides_section(profile));
        script.push_str(&modifier_key_section());
        script.push_str(&completion_section());
        script.push_str("})();\n");

        ScriptText(script)
    }
}

fn guard_section() -> String {
    format!(
        "    // Run once per document\n    \
         if (window.{flag}) {{ return; }}\n    \
         window.{flag} = true;\n\n",
        flag = IDEMPOTENCY_FLAG
    )
}

fn webdriver_section() -> String {
    "    // 1. Automation indicator reads undefined\n    \
     try {\n        \
     Object.defineProperty(navigator, 'webdriver', {\n            \
     get: () => undefined,\n            \
     configurable: true\n        \
     });\n    \
     } catch (e) {}\n\n"
        .to_string()
}

fn tables_section(profile: &ProfileDefinition) -> String {
    let mut plugin_entries = String::new();
    for (i, plugin) in profile.plugins.iter().enumerate() {
        plugin_entries.push_str(&format!(
            "            {i}: {{ name: {name}, filename: {filename}, \
             description: {description}, length: 1 }},\n",
            name = js_str(&plugin.name),
            filename = js_str(&plugin.filename),
            description = js_str(&plugin.description),
        ));
    }

    let mut mime_entries = String::new();
    for (i, mime) in profile.mime_types.iter().enumerate() {
        let enabled = match mime.enabled_plugin {
            Some(index) => format!(", enabledPlugin: veilPlugins[{index}]"),
            None => String::new(),
        };
        mime_entries.push_str(&format!(
            "            {i}: {{ type: {mime_type}, suffixes: {suffixes}, \
             description: {description}{enabled} }},\n",
            mime_type = js_str(&mime.mime_type),
            suffixes = js_str(&mime.suffixes),
            description = js_str(&mime.description),
        ));
    }

    format!(
        "    // 2. Plugin and MIME type enumeration tables\n    \
         try {{\n        \
         const veilPlugins = {{\n\
         {plugin_entries}            \
         length: {plugin_count},\n            \
         item: function(i) {{ return this[i] || null; }},\n            \
         namedItem: function(name) {{\n                \
         for (let i = 0; i < this.length; i++) {{\n                    \
         if (this[i].name === name) return this[i];\n                \
         }}\n                \
         return null;\n            \
         }},\n            \
         refresh: function() {{}}\n        \
         }};\n        \
         Object.defineProperty(navigator, 'plugins', {{\n            \
         get: () => veilPlugins,\n            \
         configurable: true\n        \
         }});\n\n        \
         const veilMimeTypes = {{\n\
         {mime_entries}            \
         length: {mime_count},\n            \
         item: function(i) {{ return this[i] || null; }},\n            \
         namedItem: function(name) {{\n                \
         for (let i = 0; i < this.length; i++) {{\n                    \
         if (this[i].type === name) return this[i];\n                \
         }}\n                \
         return null;\n            \
         }}\n        \
         }};\n        \
         Object.defineProperty(navigator, 'mimeTypes', {{\n            \
         get: () => veilMimeTypes,\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n",
        plugin_count = profile.plugins.len(),
        mime_count = profile.mime_types.len(),
    )
}

fn languages_section(profile: &ProfileDefinition) -> String {
    format!(
        "    // 3. Locale list\n    \
         try {{\n        \
         Object.defineProperty(navigator, 'languages', {{\n            \
         get: () => {languages},\n            \
         configurable: true\n        \
         }});\n        \
         Object.defineProperty(navigator, 'language', {{\n            \
         get: () => {language},\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n",
        languages = js_string_array(&profile.languages),
        language = js_str(&profile.languages[0]),
    )
}

fn bridge_section(profile: &ProfileDefinition) -> String {
    if !profile.has_runtime_bridge {
        return "    // 4. No runtime bridge for this family\n    \
                try {\n        \
                if (window.chrome) { delete window.chrome; }\n    \
                } catch (e) {}\n\n"
            .to_string();
    }

    // Vendor enum literals and stub methods match what real Chromium exposes.
    "    // 4. Vendor runtime bridge object\n    \
     try {\n        \
     window.chrome = {\n            \
     app: {\n                \
     isInstalled: false,\n                \
     InstallState: { DISABLED: 'disabled', INSTALLED: 'installed', NOT_INSTALLED: 'not_installed' },\n                \
     RunningState: { CANNOT_RUN: 'cannot_run', READY_TO_RUN: 'ready_to_run', RUNNING: 'running' }\n            \
     },\n            \
     runtime: {\n                \
     OnInstalledReason: { CHROME_UPDATE: 'chrome_update', INSTALL: 'install', SHARED_MODULE_UPDATE: 'shared_module_update', UPDATE: 'update' },\n                \
     OnRestartRequiredReason: { APP_UPDATE: 'app_update', OS_UPDATE: 'os_update', PERIODIC: 'periodic' },\n                \
     PlatformArch: { ARM: 'arm', ARM64: 'arm64', MIPS: 'mips', MIPS64: 'mips64', X86_32: 'x86-32', X86_64: 'x86-64' },\n                \
     PlatformNaclArch: { ARM: 'arm', MIPS: 'mips', MIPS64: 'mips64', X86_32: 'x86-32', X86_64: 'x86-64' },\n                \
     PlatformOs: { ANDROID: 'android', CROS: 'cros', LINUX: 'linux', MAC: 'mac', OPENBSD: 'openbsd', WIN: 'win' },\n                \
     RequestUpdateCheckStatus: { NO_UPDATE: 'no_update', THROTTLED: 'throttled', UPDATE_AVAILABLE: 'update_available' },\n                \
     connect: function() { return { onDisconnect: { addListener: function() {} }, onMessage: { addListener: function() {} }, postMessage: function() {} }; },\n                \
     sendMessage: function() {},\n                \
     id: undefined\n            \
     },\n            \
     csi: function() { return {}; },\n            \
     loadTimes: function() {\n                \
     return {\n                    \
     requestTime: Date.now() / 1000,\n                    \
     startLoadTime: Date.now() / 1000,\n                    \
     commitLoadTime: Date.now() / 1000,\n                    \
     finishDocumentLoadTime: Date.now() / 1000,\n                    \
     finishLoadTime: Date.now() / 1000,\n                    \
     firstPaintTime: Date.now() / 1000,\n                    \
     firstPaintAfterLoadTime: 0,\n                    \
     navigationType: 'navigate',\n                    \
     wasFetchedViaSpdy: false,\n                    \
     wasNpnNegotiated: true,\n                    \
     npnNegotiatedProtocol: 'h2',\n                    \
     wasAlternateProtocolAvailable: false,\n                    \
     connectionInfo: 'h2'\n                \
     };\n            \
     }\n        \
     };\n    \
     } catch (e) {}\n\n"
        .to_string()
}

fn cleanup_section(profile: &ProfileDefinition) -> String {
    if profile.cleanup_targets.is_empty() {
        return String::new();
    }

    let mut deletes = String::new();
    for target in &profile.cleanup_targets {
        deletes.push_str(&format!(
            "        delete window.{};\n",
            sanitize_identifier(target)
        ));
    }

    format!(
        "    // 5. Embedder bridge globals\n    \
         try {{\n\
         {deletes}    \
         }} catch (e) {{}}\n\n"
    )
}

fn permissions_section() -> String {
    // Only the notifications capability is ever special-cased; every other
    // query must reach the retained original with identical call and return
    // semantics.
    "    // 6. Permissions query\n    \
     try {\n        \
     if (navigator.permissions && navigator.permissions.query) {\n            \
     const originalQuery = navigator.permissions.query.bind(navigator.permissions);\n            \
     navigator.permissions.query = function(parameters) {\n                \
     if (parameters.name === 'notifications') {\n                    \
     return Promise.resolve({ state: Notification.permission, onchange: null });\n                \
     }\n                \
     return originalQuery(parameters);\n            \
     };\n        \
     }\n    \
     } catch (e) {}\n\n"
        .to_string()
}

fn webgl_section(profile: &ProfileDefinition) -> String {
    let vendor = js_str(&profile.webgl_vendor);
    let renderer = js_str(&profile.webgl_renderer);

    // The secondary context type is absent in some builds; each prototype is
    // patched under its own guard.
    format!(
        "    // 7. 3D-context parameter queries\n    \
         try {{\n        \
         const getParameterOrig = WebGLRenderingContext.prototype.getParameter;\n        \
         WebGLRenderingContext.prototype.getParameter = function(parameter) {{\n            \
         if (parameter === {vendor_code}) return {vendor};\n            \
         if (parameter === {renderer_code}) return {renderer};\n            \
         return getParameterOrig.call(this, parameter);\n        \
         }};\n    \
         }} catch (e) {{}}\n    \
         try {{\n        \
         const getParameter2Orig = WebGL2RenderingContext.prototype.getParameter;\n        \
         WebGL2RenderingContext.prototype.getParameter = function(parameter) {{\n            \
         if (parameter === {vendor_code}) return {vendor};\n            \
         if (parameter === {renderer_code}) return {renderer};\n            \
         return getParameter2Orig.call(this, parameter);\n        \
         }};\n    \
         }} catch (e) {{}}\n\n",
        vendor_code = GL_UNMASKED_VENDOR,
        renderer_code = GL_UNMASKED_RENDERER,
    )
}

fn connection_section(profile: &ProfileDefinition) -> String {
    let getter = match &profile.connection_info {
        Some(info) => format!(
            "({{\n                \
             effectiveType: {effective_type},\n                \
             rtt: {rtt},\n                \
             downlink: {downlink},\n                \
             saveData: {save_data},\n                \
             onchange: null\n            \
             }})",
            effective_type = js_str(&info.effective_type),
            rtt = info.rtt,
            downlink = info.downlink,
            save_data = info.save_data,
        ),
        None => "undefined".to_string(),
    };

    format!(
        "    // 8. Network connection info\n    \
         try {{\n        \
         Object.defineProperty(navigator, 'connection', {{\n            \
         get: () => {getter},\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n"
    )
}

fn hardware_concurrency_section(profile: &ProfileDefinition) -> String {
    format!(
        "    // 9. Hardware concurrency\n    \
         try {{\n        \
         Object.defineProperty(navigator, 'hardwareConcurrency', {{\n            \
         get: () => {},\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n",
        profile.hardware_concurrency
    )
}

fn device_memory_section(profile: &ProfileDefinition) -> String {
    let value = match profile.device_memory {
        Some(gb) => gb.to_string(),
        None => "undefined".to_string(),
    };

    format!(
        "    // 10. Device memory\n    \
         try {{\n        \
         Object.defineProperty(navigator, 'deviceMemory', {{\n            \
         get: () => {value},\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n"
    )
}

fn build_id_section(profile: &ProfileDefinition) -> String {
    let Some(build_id) = &profile.build_id else {
        return String::new();
    };

    format!(
        "    // 11. Gecko build id\n    \
         try {{\n        \
         Object.defineProperty(navigator, 'buildID', {{\n            \
         get: () => {},\n            \
         configurable: true\n        \
         }});\n    \
         }} catch (e) {{}}\n\n",
        js_str(build_id)
    )
}

fn extra_overrides_section(profile: &ProfileDefinition) -> String {
    if profile.navigator_overrides.is_empty() {
        return String::new();
    }

    let mut section = String::from("    // 12. Profile-specific navigator overrides\n");
    for entry in &profile.navigator_overrides {
        section.push_str(&format!(
            "    try {{\n        \
             Object.defineProperty(navigator, {property}, {{\n            \
             get: () => {value},\n            \
             configurable: true\n        \
             }});\n    \
             }} catch (e) {{}}\n",
            property = js_str(&entry.property),
            value = override_value_js(&entry.value),
        ));
    }
    section.push('\n');
    section
}

fn modifier_key_section() -> String {
    format!(
        "    // 13. Modifier key tracking for link-open handling\n    \
         try {{\n        \
         window.{flag} = false;\n        \
         document.addEventListener('keydown', function(e) {{\n            \
         if (e.key === 'Control') {{ window.{flag} = true; }}\n        \
         }}, true);\n        \
         document.addEventListener('keyup', function(e) {{\n            \
         if (e.key === 'Control') {{ window.{flag} = false; }}\n        \
         }}, true);\n        \
         window.addEventListener('blur', function() {{\n            \
         window.{flag} = false;\n        \
         }});\n    \
         }} catch (e) {{}}\n\n",
        flag = MODIFIER_FLAG
    )
}

fn completion_section() -> String {
    format!(
        "    // 14. Completion marker\n    \
         try {{\n        \
         window.{flag} = true;\n        \
         console.debug('veil: identity overrides applied');\n    \
         }} catch (e) {{}}\n",
        flag = COMPLETION_FLAG
    )
}

fn override_value_js(value: &OverrideValue) -> String {
    match value {
        OverrideValue::Undefined => "undefined".to_string(),
        OverrideValue::Bool(b) => b.to_string(),
        OverrideValue::Int(i) => i.to_string(),
        OverrideValue::Str(s) => js_str(s),
        OverrideValue::StrList(list) => js_string_array(list),
    }
}

/// Quotes `s` as a single-quoted JS string literal.
fn js_str(s: &str) -> String {
    format!("'{}'", escape_js_string(s))
}

fn js_string_array(items: &[String]) -> String {
    let quoted: Vec<String> = items.iter().map(|s| js_str(s)).collect();
    format!("[{}]", quoted.join(", "))
}

/// Escape string for JavaScript
fn escape_js_string(s: &str) -> String {
    s.replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('"', "\\\"")
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

/// Restricts cleanup target names to plain identifier characters; anything
/// else would splice into the emitted script.
fn sanitize_identifier(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '$')
        .collect()
}
