//! Capability guards
//!
//! Three independent predicates decide what the page tree renders:
//!
//! | guard | input | default when input is missing |
//! |---|---|---|
//! | feature | `features[name]` | closed |
//! | module action | `modules[module][action]` | closed |
//! | role | allowed role list + current role | **open** when the list is empty |
//!
//! Feature and module-action guards only open on a literal JSON `true`. The
//! role guard reads the current role from a [`PreferenceStore`] on every
//! evaluation, since the authentication layer may change it at any time.

use crate::config::document::ConfigDocument;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Preference key holding the current user's role
pub const USER_ROLE_KEY: &str = "user_role";

/// Role assumed when the preference is unset
pub const DEFAULT_ROLE: &str = "user";

/// Whether `features[name]` is exactly `true`
#[must_use]
pub fn feature_enabled(doc: Option<&ConfigDocument>, name: &str) -> bool {
    doc.and_then(|doc| doc.features.as_ref())
        .and_then(|features| features.get(name))
        == Some(&Value::Bool(true))
}

/// Whether `modules[module][action]` is exactly `true`
#[must_use]
pub fn module_action_enabled(doc: Option<&ConfigDocument>, module: &str, action: &str) -> bool {
    doc.and_then(|doc| doc.modules.as_ref())
        .and_then(|modules| modules.get(module))
        .and_then(Value::as_object)
        .and_then(|actions| actions.get(action))
        == Some(&Value::Bool(true))
}

/// Whether `current` may see content restricted to `allowed`
///
/// An empty list places no restriction. An unset role counts as [`DEFAULT_ROLE`].
#[must_use]
pub fn role_allowed<S: AsRef<str>>(allowed: &[S], current: Option<&str>) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let current = current.unwrap_or(DEFAULT_ROLE);
    allowed.iter().any(|role| role.as_ref() == current)
}

/// Key-value preferences owned by the authentication layer
pub trait PreferenceStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
}

/// Current role from `store`, falling back to [`DEFAULT_ROLE`]
#[must_use]
pub fn current_role(store: &dyn PreferenceStore) -> String {
    store
        .get(USER_ROLE_KEY)
        .unwrap_or_else(|| DEFAULT_ROLE.to_owned())
}

/// Thread-safe in-memory preference store
#[derive(Debug, Default)]
pub struct MemoryPreferences {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryPreferences {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with a role, or empty when `role` is `None`
    #[must_use]
    pub fn with_role(role: Option<&str>) -> Self {
        let store = Self::new();
        if let Some(role) = role {
            store.set(USER_ROLE_KEY, role);
        }
        store
    }

    pub fn set(&self, key: &str, value: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_owned(), value.to_owned());
    }

    pub fn remove(&self, key: &str) {
        self.values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key);
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

/// A guard that picks one of two branches
///
/// `render` re-evaluates the guard on every call.
pub trait Gate {
    fn is_open(&self) -> bool;

    fn render<T>(&self, when_open: impl FnOnce() -> T, when_closed: impl FnOnce() -> T) -> T {
        if self.is_open() {
            when_open()
        } else {
            when_closed()
        }
    }
}

/// Gate on a feature flag
///
/// An inverted gate opens while the feature is off, for "coming soon" content.
#[derive(Debug, Clone, Copy)]
pub struct FeatureGate<'a> {
    doc: Option<&'a ConfigDocument>,
    feature: &'a str,
    invert: bool,
}

impl<'a> FeatureGate<'a> {
    #[must_use]
    pub const fn new(doc: Option<&'a ConfigDocument>, feature: &'a str) -> Self {
        Self {
            doc,
            feature,
            invert: false,
        }
    }

    #[must_use]
    pub const fn inverted(self) -> Self {
        Self {
            invert: !self.invert,
            ..self
        }
    }
}

impl Gate for FeatureGate<'_> {
    fn is_open(&self) -> bool {
        feature_enabled(self.doc, self.feature) != self.invert
    }
}

/// Gate on a module action
#[derive(Debug, Clone, Copy)]
pub struct ModuleGate<'a> {
    doc: Option<&'a ConfigDocument>,
    module: &'a str,
    action: &'a str,
}

impl<'a> ModuleGate<'a> {
    #[must_use]
    pub const fn new(doc: Option<&'a ConfigDocument>, module: &'a str, action: &'a str) -> Self {
        Self {
            doc,
            module,
            action,
        }
    }
}

impl Gate for ModuleGate<'_> {
    fn is_open(&self) -> bool {
        module_action_enabled(self.doc, self.module, self.action)
    }
}

/// Gate on the current role
pub struct RoleGate<'a, S> {
    allowed: &'a [S],
    preferences: &'a dyn PreferenceStore,
}

impl<'a, S: AsRef<str>> RoleGate<'a, S> {
    #[must_use]
    pub fn new(allowed: &'a [S], preferences: &'a dyn PreferenceStore) -> Self {
        Self {
            allowed,
            preferences,
        }
    }
}

impl<S: AsRef<str>> Gate for RoleGate<'_, S> {
    fn is_open(&self) -> bool {
        let role = self.preferences.get(USER_ROLE_KEY);
        role_allowed(self.allowed, role.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> ConfigDocument {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn features_closed_without_section() {
        assert!(!feature_enabled(None, "chat"));
        assert!(!feature_enabled(Some(&ConfigDocument::default()), "chat"));
        assert!(!feature_enabled(Some(&doc(json!({"features": {}}))), "chat"));
    }

    #[test]
    fn features_require_literal_true() {
        let document = doc(json!({
            "features": {"chat": true, "bills": false, "notices": "true", "shops": 1, "opinions": null}
        }));
        assert!(feature_enabled(Some(&document), "chat"));
        for name in ["bills", "notices", "shops", "opinions", "missing"] {
            assert!(!feature_enabled(Some(&document), name), "{name}");
        }
    }

    #[test]
    fn module_actions_require_literal_true_at_every_level() {
        let document = doc(json!({
            "modules": {
                "payments": {"initiate": true, "refund": "true"},
                "shops": true,
                "chat": null
            }
        }));
        assert!(module_action_enabled(Some(&document), "payments", "initiate"));
        assert!(!module_action_enabled(Some(&document), "payments", "refund"));
        assert!(!module_action_enabled(Some(&document), "payments", "missing"));
        assert!(!module_action_enabled(Some(&document), "shops", "list"));
        assert!(!module_action_enabled(Some(&document), "chat", "send"));
        assert!(!module_action_enabled(Some(&document), "missing", "any"));
        assert!(!module_action_enabled(None, "payments", "initiate"));
    }

    #[test]
    fn empty_role_list_is_open() {
        let none: [&str; 0] = [];
        assert!(role_allowed(&none, None));
        assert!(role_allowed(&none, Some("guest")));
        assert!(role_allowed(&none, Some("admin")));
    }

    #[test]
    fn role_list_requires_membership() {
        assert!(!role_allowed(&["admin"], Some("user")));
        assert!(role_allowed(&["admin"], Some("admin")));
        assert!(!role_allowed(&["admin"], None));
        assert!(role_allowed(&["admin", "user"], None));
    }

    #[test]
    fn current_role_defaults_to_user() {
        let store = MemoryPreferences::new();
        assert_eq!(current_role(&store), "user");
        store.set(USER_ROLE_KEY, "landlord");
        assert_eq!(current_role(&store), "landlord");
    }

    #[test]
    fn role_gate_reads_store_on_every_render() {
        let store = MemoryPreferences::with_role(Some("user"));
        let allowed = ["admin"];
        let gate = RoleGate::new(&allowed, &store);

        assert_eq!(gate.render(|| "panel", || "denied"), "denied");
        store.set(USER_ROLE_KEY, "admin");
        assert_eq!(gate.render(|| "panel", || "denied"), "panel");
        store.remove(USER_ROLE_KEY);
        assert!(!gate.is_open());
    }

    #[test]
    fn feature_and_module_gates_select_branches() {
        let document = doc(json!({
            "features": {"chat": true},
            "modules": {"bills": {"pay": false}}
        }));
        let chat = FeatureGate::new(Some(&document), "chat");
        let pay = ModuleGate::new(Some(&document), "bills", "pay");

        assert_eq!(chat.render(|| 1, || 0), 1);
        assert_eq!(pay.render(|| 1, || 0), 0);
        assert_eq!(FeatureGate::new(None, "chat").render(|| 1, || 0), 0);
    }

    #[test]
    fn inverted_feature_gate_opens_while_disabled() {
        let document = doc(json!({"features": {"chat": true, "shops": "true"}}));

        assert!(!FeatureGate::new(Some(&document), "chat").inverted().is_open());
        assert!(FeatureGate::new(Some(&document), "shops").inverted().is_open());
        assert!(FeatureGate::new(None, "chat").inverted().is_open());
        assert!(
            FeatureGate::new(Some(&document), "chat")
                .inverted()
                .inverted()
                .is_open()
        );
    }
}
