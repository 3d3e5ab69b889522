//! Integration tests for the spoofing profile engine
//!
//! Covers cross-signal consistency validation, registry resolution, and the
//! observable properties of compiled override scripts for both built-in
//! families.

use veil_browser::spoof::{
    synthesizer::{COMPLETION_FLAG, IDEMPOTENCY_FLAG},
    BrowserFamily, ProfileDefinition, ProfileRegistry, ScriptSynthesizer, SpoofError,
};

#[test]
fn test_registry_resolves_builtin_families() {
    let registry = ProfileRegistry::with_builtins();

    let chrome = registry.resolve("chrome-desktop").unwrap();
    assert_eq!(chrome.family, BrowserFamily::Chrome);
    assert!(chrome.has_runtime_bridge);
    assert!(!chrome.plugins.is_empty());

    let firefox = registry.resolve("firefox-desktop").unwrap();
    assert_eq!(firefox.family, BrowserFamily::Firefox);
    assert!(!firefox.has_runtime_bridge);
    assert!(firefox.device_memory.is_none());
}

#[test]
fn test_unknown_profile_is_fatal_configuration_error() {
    let registry = ProfileRegistry::with_builtins();

    match registry.resolve("does-not-exist") {
        Err(SpoofError::UnknownProfile(id)) => assert_eq!(id, "does-not-exist"),
        other => panic!("expected UnknownProfile, got {other:?}"),
    }
}

#[test]
fn test_cross_signal_consistency_is_enforced_both_ways() {
    let mut registry = ProfileRegistry::new();

    // A non-Chrome identity leaking Chrome signals.
    let mut leaky_firefox = ProfileDefinition::firefox_desktop();
    leaky_firefox.has_runtime_bridge = true;
    assert!(registry.register(leaky_firefox).is_err());

    let mut leaky_firefox = ProfileDefinition::firefox_desktop();
    leaky_firefox.device_memory = Some(16);
    assert!(registry.register(leaky_firefox).is_err());

    // A Chrome identity missing Chrome signals.
    let mut bare_chrome = ProfileDefinition::chrome_desktop();
    bare_chrome.plugins.clear();
    assert!(registry.register(bare_chrome).is_err());

    let mut bare_chrome = ProfileDefinition::chrome_desktop();
    bare_chrome.has_runtime_bridge = false;
    assert!(registry.register(bare_chrome).is_err());
}

#[test]
fn test_compiled_script_is_idempotent_by_guard() {
    let script = ScriptSynthesizer::compile(&ProfileDefinition::firefox_desktop());
    let text = script.as_str();

    // The guard check-and-set comes first; a second execution returns before
    // touching any property.
    let guard_check = text
        .find(&format!("if (window.{IDEMPOTENCY_FLAG}) {{ return; }}"))
        .expect("guard check missing");
    let guard_set = text
        .find(&format!("window.{IDEMPOTENCY_FLAG} = true;"))
        .expect("guard set missing");
    let first_override = text.find("Object.defineProperty").unwrap();

    assert!(guard_check < guard_set);
    assert!(guard_set < first_override);
}

#[test]
fn test_every_profile_masks_the_automation_indicator() {
    let registry = ProfileRegistry::with_builtins();

    for id in registry.ids() {
        let profile = registry.resolve(id).unwrap();
        let script = ScriptSynthesizer::compile(profile);

        assert!(
            script
                .as_str()
                .contains("Object.defineProperty(navigator, 'webdriver'"),
            "{id}: webdriver override missing"
        );
    }
}

#[test]
fn test_chrome_script_spoofs_webgl_and_delegates_the_rest() {
    let profile = ProfileDefinition::chrome_desktop();
    let script = ScriptSynthesizer::compile(&profile);
    let text = script.as_str();

    assert!(text.contains("if (parameter === 37445) return 'Google Inc. (Intel)';"));
    assert!(text.contains(
        "if (parameter === 37446) return \
         'ANGLE (Intel, Mesa Intel(R) UHD Graphics (ICL GT1), OpenGL 4.6)';"
    ));
    // Unrecognized parameter codes reach the retained originals.
    assert!(text.contains("return getParameterOrig.call(this, parameter);"));
    assert!(text.contains("return getParameter2Orig.call(this, parameter);"));
}

#[test]
fn test_firefox_script_scrubs_foreign_family_signals() {
    let script = ScriptSynthesizer::compile(&ProfileDefinition::firefox_desktop());
    let text = script.as_str();

    assert!(text.contains("if (window.chrome) { delete window.chrome; }"));
    assert!(!text.contains("window.chrome = {"));
    assert!(text.contains("delete window.qt;"));

    // deviceMemory reads undefined, buildID reads the pinned Gecko value.
    let device_memory = text
        .find("Object.defineProperty(navigator, 'deviceMemory'")
        .unwrap();
    assert!(text[device_memory..device_memory + 200].contains("get: () => undefined"));
    assert!(text.contains("Object.defineProperty(navigator, 'buildID'"));
    assert!(text.contains("'20181001000000'"));
}

#[test]
fn test_tables_support_item_and_named_item() {
    let script = ScriptSynthesizer::compile(&ProfileDefinition::chrome_desktop());
    let text = script.as_str();

    assert!(text.contains("item: function(i) { return this[i] || null; }"));
    assert!(text.contains("if (this[i].name === name) return this[i];"));
    assert!(text.contains("if (this[i].type === name) return this[i];"));
    assert!(text.contains("refresh: function() {}"));
}

#[test]
fn test_permissions_wrap_preserves_delegation() {
    let script = ScriptSynthesizer::compile(&ProfileDefinition::chrome_desktop());
    let text = script.as_str();

    assert!(text.contains("const originalQuery = navigator.permissions.query.bind(navigator.permissions);"));
    assert!(text.contains("if (parameters.name === 'notifications')"));
    assert!(text.contains("Promise.resolve({ state: Notification.permission, onchange: null })"));
    assert!(text.contains("return originalQuery(parameters);"));

    // notifications is the only special-cased capability name.
    assert_eq!(text.matches("parameters.name ===").count(), 1);
}

#[test]
fn test_compilation_is_pure() {
    let profile = ProfileDefinition::chrome_desktop();

    let runs: Vec<String> = (0..3)
        .map(|_| ScriptSynthesizer::compile(&profile).into_string())
        .collect();

    assert_eq!(runs[0], runs[1]);
    assert_eq!(runs[1], runs[2]);
}

#[test]
fn test_completion_marker_present_for_diagnostics() {
    let script = ScriptSynthesizer::compile(&ProfileDefinition::firefox_desktop());
    assert!(script
        .as_str()
        .contains(&format!("window.{COMPLETION_FLAG} = true;")));
}
