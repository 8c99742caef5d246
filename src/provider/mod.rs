//! Configuration provider
//!
//! Hands the loaded document to every consumer without re-fetching it.
//! Consumers ask the provider for a [`ProviderView`]; guards and the endpoint
//! resolver are only reachable through the `Ready` variant's
//! [`ConfigContext`], so nothing can evaluate them while the document is
//! still loading.

use crate::config::{ConfigDocument, ConfigLoader, ConfigSource, LoadState};
use crate::endpoints::{self, Operation};
use crate::error::PortalError;
use crate::guards::{self, FeatureGate, ModuleGate, PreferenceStore, RoleGate};
use crate::system::System;
use crate::theme::StyleEnvironment;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Shared handle to one loader and the environment it writes into
///
/// Clones share the loader, so mounting a clone never triggers a second fetch.
#[derive(Clone)]
pub struct ConfigProvider {
    loader: Arc<ConfigLoader>,
    style: Arc<dyn StyleEnvironment>,
    preferences: Arc<dyn PreferenceStore>,
}

impl ConfigProvider {
    #[must_use]
    pub fn new(
        loader: Arc<ConfigLoader>,
        style: Arc<dyn StyleEnvironment>,
        preferences: Arc<dyn PreferenceStore>,
    ) -> Self {
        Self {
            loader,
            style,
            preferences,
        }
    }

    /// Trigger the one-time load and return the resulting view
    pub fn mount(&self, system: &dyn System) -> ProviderView<'_> {
        self.loader.load(system, self.style.as_ref());
        self.view()
    }

    /// Current view without triggering a load
    #[must_use]
    pub fn view(&self) -> ProviderView<'_> {
        match self.loader.state() {
            LoadState::Loading => ProviderView::Loading,
            LoadState::Ready(document) => ProviderView::Ready(ConfigContext {
                document,
                preferences: self.preferences.as_ref(),
            }),
            LoadState::Failed(err) => {
                ProviderView::Failed(FailedScreen::new(err, self.loader.source()))
            }
        }
    }

    #[must_use]
    pub fn loader(&self) -> &ConfigLoader {
        &self.loader
    }

    #[must_use]
    pub fn style(&self) -> &dyn StyleEnvironment {
        self.style.as_ref()
    }
}

/// What consumers render
pub enum ProviderView<'a> {
    /// Neutral placeholder; no guard or resolver may run
    Loading,
    Ready(ConfigContext<'a>),
    Failed(FailedScreen),
}

impl ProviderView<'_> {
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(*self, Self::Loading)
    }
}

/// Read-only access to a loaded document and its derived helpers
pub struct ConfigContext<'a> {
    document: Arc<ConfigDocument>,
    preferences: &'a dyn PreferenceStore,
}

impl<'a> ConfigContext<'a> {
    #[must_use]
    pub fn document(&self) -> &ConfigDocument {
        &self.document
    }

    #[must_use]
    pub fn resolve(&self, operation: &str) -> Option<String> {
        endpoints::resolve(Some(self.document.as_ref()), operation)
    }

    #[must_use]
    pub fn resolve_operation(&self, operation: Operation) -> Option<String> {
        endpoints::resolve_operation(Some(self.document.as_ref()), operation)
    }

    #[must_use]
    pub fn headers(&self) -> BTreeMap<String, String> {
        endpoints::headers(Some(self.document.as_ref()))
    }

    #[must_use]
    pub fn feature_enabled(&self, feature: &str) -> bool {
        guards::feature_enabled(Some(self.document.as_ref()), feature)
    }

    #[must_use]
    pub fn module_action_enabled(&self, module: &str, action: &str) -> bool {
        guards::module_action_enabled(Some(self.document.as_ref()), module, action)
    }

    /// Checks the role as it is right now; never cached
    #[must_use]
    pub fn role_allowed<S: AsRef<str>>(&self, allowed: &[S]) -> bool {
        let role = self.preferences.get(guards::USER_ROLE_KEY);
        guards::role_allowed(allowed, role.as_deref())
    }

    #[must_use]
    pub fn current_role(&self) -> String {
        guards::current_role(self.preferences)
    }

    #[must_use]
    pub fn label<'s>(&'s self, name: &str, default: &'s str) -> &'s str {
        self.document.label(name, default)
    }

    /// Theme token for a color role name; anything else passes through
    #[must_use]
    pub fn resolve_color<'s>(&'s self, name: &'s str) -> &'s str {
        self.document
            .theme
            .as_ref()
            .map_or(name, |theme| theme.resolve_color(name))
    }

    #[must_use]
    pub fn feature_gate<'s>(&'s self, feature: &'s str) -> FeatureGate<'s> {
        FeatureGate::new(Some(self.document.as_ref()), feature)
    }

    #[must_use]
    pub fn module_gate<'s>(&'s self, module: &'s str, action: &'s str) -> ModuleGate<'s> {
        ModuleGate::new(Some(self.document.as_ref()), module, action)
    }

    #[must_use]
    pub fn role_gate<'s, S: AsRef<str>>(&'s self, allowed: &'s [S]) -> RoleGate<'s, S>
    where
        'a: 's,
    {
        RoleGate::new(allowed, self.preferences)
    }
}

/// Full-screen error shown when the configuration cannot be loaded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedScreen {
    pub error: PortalError,
    /// What the operator can do about it
    pub hint: String,
}

impl FailedScreen {
    #[must_use]
    pub fn new(error: PortalError, source: &ConfigSource) -> Self {
        Self {
            error,
            hint: format!(
                "Make sure {source} is reachable and contains a valid JSON configuration document, then reload."
            ),
        }
    }

    /// The raw failure message
    #[must_use]
    pub fn message(&self) -> String {
        self.error.to_string()
    }
}

impl fmt::Display for FailedScreen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.error, self.hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::guards::{Gate, MemoryPreferences, USER_ROLE_KEY};
    use crate::system::{HttpResponse, MockSystem};
    use crate::theme::StyleSheet;

    const URL: &str = "https://portal.test/config.json";

    fn provider(preferences: Arc<MemoryPreferences>) -> ConfigProvider {
        ConfigProvider::new(
            Arc::new(ConfigLoader::new(ConfigSource::parse(URL))),
            Arc::new(StyleSheet::new()),
            preferences,
        )
    }

    #[test]
    fn view_is_loading_before_mount() {
        let provider = provider(Arc::new(MemoryPreferences::new()));
        assert!(provider.view().is_loading());
    }

    #[test]
    fn ready_context_exposes_helpers() {
        let system = MockSystem::new()
            .with_response(
                URL,
                HttpResponse::ok(
                    r#"{"features":{"chat":true},"api":{"webhookBaseUrl":"https://x"},"labels":{"bills":"Levies"}}"#,
                ),
            )
            .unwrap();
        let preferences = Arc::new(MemoryPreferences::new());
        let provider = provider(Arc::clone(&preferences));

        let ProviderView::Ready(context) = provider.mount(&system) else {
            panic!("expected ready view");
        };
        assert!(context.feature_enabled("chat"));
        assert_eq!(context.resolve("chat").as_deref(), Some("https://x/nhc-chat"));
        assert_eq!(context.label("bills", "Bills"), "Levies");
        assert_eq!(context.current_role(), "user");
        assert!(!context.role_allowed(&["admin"]));

        let admin_only = ["admin"];
        let gate = context.role_gate(&admin_only);
        assert!(!gate.is_open());
        preferences.set(USER_ROLE_KEY, "admin");
        assert!(gate.is_open());
        assert!(context.role_allowed(&["admin"]));
    }

    #[test]
    fn context_resolves_color_roles() {
        let system = MockSystem::new()
            .with_response(
                URL,
                HttpResponse::ok(r##"{"theme":{"colors":{"primary":"#0b5394"}}}"##),
            )
            .unwrap();
        let provider = provider(Arc::new(MemoryPreferences::new()));

        let ProviderView::Ready(context) = provider.mount(&system) else {
            panic!("expected ready view");
        };
        assert_eq!(context.resolve_color("primary"), "#0b5394");
        assert_eq!(context.resolve_color("warning"), "warning");
        assert_eq!(context.resolve_color("transparent"), "transparent");
    }

    #[test]
    fn failure_produces_failed_screen() {
        let system = MockSystem::new()
            .with_response(URL, HttpResponse::status(500, "Internal Server Error"))
            .unwrap();
        let provider = provider(Arc::new(MemoryPreferences::new()));

        let ProviderView::Failed(screen) = provider.mount(&system) else {
            panic!("expected failed view");
        };
        assert_eq!(screen.message(), "Failed to load config: 500 Internal Server Error");
        assert_eq!(screen.error.exit_code(), 1);
        assert!(screen.hint.contains(URL));
        assert!(screen.to_string().contains("reachable"));
    }

    #[test]
    fn clones_share_one_fetch() {
        let system = MockSystem::new()
            .with_response(URL, HttpResponse::ok("{}"))
            .unwrap();
        let first = provider(Arc::new(MemoryPreferences::new()));
        let second = first.clone();

        assert!(matches!(first.mount(&system), ProviderView::Ready(_)));
        assert!(matches!(second.mount(&system), ProviderView::Ready(_)));
        assert_eq!(system.fetch_count(), 1);
    }
}
