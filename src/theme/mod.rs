//! Theme application
//!
//! Derives the global style tokens from a document and commits them to the
//! rendering environment. Tokens are written by name, so applying the same
//! document again overwrites each variable with the value it already had.
//!
//! # Tokens
//! - `--color-{role}` for each of the seven color roles the document sets
//! - `--border-radius`, always: `9999px` for `rounded-full`, `8px` otherwise

use crate::config::document::{ColorRole, ConfigDocument, RadiusScale};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};
use tracing::debug;

/// Process-wide store of global style variables
pub trait StyleEnvironment: Send + Sync {
    /// Set (or replace) a global variable
    fn set_property(&self, name: &str, value: &str);

    /// Current value of a global variable
    fn property(&self, name: &str) -> Option<String>;
}

/// In-memory style environment rendered as a `:root` block
#[derive(Debug, Default)]
pub struct StyleSheet {
    vars: RwLock<BTreeMap<String, String>>,
}

impl StyleSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide sheet, the rendering environment paired with
    /// [`ConfigLoader::global`](crate::config::ConfigLoader::global)
    pub fn global() -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<StyleSheet>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new())))
    }

    /// Copy of every variable currently set
    #[must_use]
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of variables currently set
    #[must_use]
    pub fn len(&self) -> usize {
        self.vars.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render as a CSS `:root` rule
    #[must_use]
    pub fn to_css(&self) -> String {
        let mut css = String::from(":root {\n");
        for (name, value) in self.snapshot() {
            css.push_str(&format!("  {name}: {value};\n"));
        }
        css.push('}');
        css
    }

    /// Render as a flat JSON object
    #[must_use]
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.snapshot()
                .into_iter()
                .map(|(name, value)| (name, Value::String(value)))
                .collect::<Map<String, Value>>(),
        )
    }
}

impl StyleEnvironment for StyleSheet {
    fn set_property(&self, name: &str, value: &str) {
        self.vars
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(name.to_owned(), value.to_owned());
    }

    fn property(&self, name: &str) -> Option<String> {
        self.vars
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }
}

/// Tokens a document commits, in write order
#[must_use]
pub fn theme_tokens(doc: &ConfigDocument) -> Vec<(&'static str, String)> {
    let mut tokens = Vec::with_capacity(ColorRole::ALL.len() + 1);

    if let Some(theme) = doc.theme.as_ref() {
        for role in ColorRole::ALL {
            if let Some(color) = theme.color(role) {
                tokens.push((role.css_variable(), color.to_owned()));
            }
        }
    }

    let radius = doc
        .theme
        .as_ref()
        .map_or(RadiusScale::Rounded, |theme| theme.radius());
    tokens.push((RadiusScale::CSS_VARIABLE, radius.css_value().to_owned()));

    tokens
}

/// Commit the document's theme to `env`
pub fn apply_theme(doc: &ConfigDocument, env: &dyn StyleEnvironment) {
    for (name, value) in theme_tokens(doc) {
        debug!(variable = name, value = %value, "Committing theme token");
        env.set_property(name, &value);
    }
}
