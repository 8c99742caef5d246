//! Capability guard tests

use portalcfg::config::ConfigDocument;
use portalcfg::config::loader::parse_document;
use portalcfg::guards::{
    FeatureGate, Gate, MemoryPreferences, ModuleGate, RoleGate, USER_ROLE_KEY, feature_enabled,
    module_action_enabled, role_allowed,
};

fn document(body: &str) -> ConfigDocument {
    parse_document(body).unwrap()
}

#[test]
fn test_features_absent_means_disabled() {
    let documents = [
        document("{}"),
        document(r#"{"modules": {"chat": {"send": true}}}"#),
        document(r#"{"api": {"webhookBaseUrl": "https://x"}}"#),
    ];
    for doc in &documents {
        for name in ["chat", "bills", "notices", ""] {
            assert!(!feature_enabled(Some(doc), name));
        }
    }
}

#[test]
fn test_feature_strict_equality() {
    let doc = document(
        r#"{"features": {"a": true, "b": "true", "c": 1, "d": false, "e": null, "f": {}, "g": [true]}}"#,
    );
    assert!(feature_enabled(Some(&doc), "a"));
    for name in ["b", "c", "d", "e", "f", "g"] {
        assert!(!feature_enabled(Some(&doc), name), "{name} must read as disabled");
    }
}

#[test]
fn test_module_action_levels() {
    let doc = document(
        r#"{"modules": {"bills": {"pay": true, "download": "true"}, "shops": [], "chat": {}}}"#,
    );
    assert!(module_action_enabled(Some(&doc), "bills", "pay"));
    assert!(!module_action_enabled(Some(&doc), "bills", "download"));
    assert!(!module_action_enabled(Some(&doc), "shops", "list"));
    assert!(!module_action_enabled(Some(&doc), "chat", "send"));
    assert!(!module_action_enabled(Some(&doc), "notices", "read"));
    assert!(!module_action_enabled(Some(&document("{}")), "bills", "pay"));
}

#[test]
fn test_role_open_by_default() {
    let unrestricted: Vec<String> = Vec::new();
    for role in [None, Some("user"), Some("admin"), Some("")] {
        assert!(role_allowed(unrestricted.as_slice(), role));
    }
}

#[test]
fn test_role_membership() {
    assert!(!role_allowed(&["admin"], Some("user")));
    assert!(role_allowed(&["admin"], Some("admin")));
    assert!(role_allowed(&["admin", "manager"], Some("manager")));
    assert!(!role_allowed(&["admin", "manager"], Some("Admin")));
}

#[test]
fn test_unset_role_counts_as_user() {
    assert!(role_allowed(&["user"], None));
    assert!(!role_allowed(&["admin"], None));
}

#[test]
fn test_role_gate_tracks_preference_changes() {
    let preferences = MemoryPreferences::new();
    let allowed = vec!["admin".to_owned()];
    let gate = RoleGate::new(allowed.as_slice(), &preferences);

    assert_eq!(gate.render(|| "dashboard", || "fallback"), "fallback");
    preferences.set(USER_ROLE_KEY, "admin");
    assert_eq!(gate.render(|| "dashboard", || "fallback"), "dashboard");
    preferences.set(USER_ROLE_KEY, "user");
    assert_eq!(gate.render(|| "dashboard", || "fallback"), "fallback");
}

#[test]
fn test_gates_without_document_stay_closed() {
    assert!(!FeatureGate::new(None, "chat").is_open());
    assert!(!ModuleGate::new(None, "bills", "pay").is_open());
    assert_eq!(
        FeatureGate::new(None, "chat").render(|| "chat", || "placeholder"),
        "placeholder"
    );
}
