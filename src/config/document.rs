//! The configuration document and its typed sections
//!
//! Every section is optional, and a section of the wrong type (`null`, an
//! array, a string) decodes as absent rather than failing the load. String
//! tables keep only their string entries. Feature and module-action values are
//! kept as raw JSON so that only a literal `true` enables anything; `"true"`,
//! `1` and the like parse fine and read as disabled.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fmt;

/// Root of the portal configuration, immutable once loaded
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfigDocument {
    #[serde(
        deserialize_with = "object_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub theme: Option<ThemeConfig>,

    /// Feature name -> flag
    #[serde(
        deserialize_with = "object_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub features: Option<Map<String, Value>>,

    /// Module name -> (action name -> flag)
    #[serde(
        deserialize_with = "object_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub modules: Option<Map<String, Value>>,

    /// Display-string overrides
    #[serde(
        deserialize_with = "string_table",
        skip_serializing_if = "Option::is_none"
    )]
    pub labels: Option<BTreeMap<String, String>>,

    #[serde(
        deserialize_with = "object_section",
        skip_serializing_if = "Option::is_none"
    )]
    pub api: Option<ApiConfig>,
}

impl ConfigDocument {
    /// Label override for `name`, or `default` when the document has none
    ///
    /// An empty override counts as missing.
    #[must_use]
    pub fn label<'a>(&'a self, name: &str, default: &'a str) -> &'a str {
        self.labels
            .as_ref()
            .and_then(|labels| labels.get(name))
            .filter(|label| !label.is_empty())
            .map_or(default, String::as_str)
    }

    /// Names of the top-level sections present in this document
    #[must_use]
    pub fn sections(&self) -> Vec<&'static str> {
        let mut present = Vec::new();
        if self.theme.is_some() {
            present.push("theme");
        }
        if self.features.is_some() {
            present.push("features");
        }
        if self.modules.is_some() {
            present.push("modules");
        }
        if self.labels.is_some() {
            present.push("labels");
        }
        if self.api.is_some() {
            present.push("api");
        }
        present
    }

    /// Configured webhook base origin, if any
    #[must_use]
    pub fn webhook_base_url(&self) -> Option<&str> {
        self.api.as_ref()?.webhook_base_url.as_deref()
    }
}

/// Theme section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Color role -> color token. Unknown roles are kept but never applied.
    #[serde(
        deserialize_with = "string_table",
        skip_serializing_if = "Option::is_none"
    )]
    pub colors: Option<BTreeMap<String, String>>,

    #[serde(
        rename = "borderRadius",
        deserialize_with = "string_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub border_radius: Option<String>,
}

impl ThemeConfig {
    /// Color token configured for `role`
    #[must_use]
    pub fn color(&self, role: ColorRole) -> Option<&str> {
        self.colors.as_ref()?.get(role.key()).map(String::as_str)
    }

    /// Token for a color role name, or `name` itself when the theme does not
    /// set that role
    ///
    /// Lets styling code accept either a role (`"primary"`) or a literal
    /// color (`"#fff"`) in the same slot.
    #[must_use]
    pub fn resolve_color<'a>(&'a self, name: &'a str) -> &'a str {
        ColorRole::from_key(name)
            .and_then(|role| self.color(role))
            .filter(|token| !token.is_empty())
            .unwrap_or(name)
    }

    /// Radius scale derived from the `borderRadius` token
    #[must_use]
    pub fn radius(&self) -> RadiusScale {
        match self.border_radius.as_deref() {
            Some(RadiusScale::ROUNDED_FULL) => RadiusScale::Pill,
            _ => RadiusScale::Rounded,
        }
    }
}

/// API section
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    #[serde(
        rename = "webhookBaseUrl",
        deserialize_with = "string_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub webhook_base_url: Option<String>,

    /// Extra headers merged into every resolved request
    #[serde(
        deserialize_with = "string_table",
        skip_serializing_if = "Option::is_none"
    )]
    pub headers: Option<BTreeMap<String, String>>,
}

/// An object section decoded as `T`; any other JSON type reads as absent
fn object_section<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => Ok(serde_json::from_value(value).ok()),
        _ => Ok(None),
    }
}

/// The string entries of an object; other entries are dropped
fn string_table<'de, D>(deserializer: D) -> Result<Option<BTreeMap<String, String>>, D::Error>
where
    D: Deserializer<'de>,
{
    let Value::Object(entries) = Value::deserialize(deserializer)? else {
        return Ok(None);
    };
    Ok(Some(
        entries
            .into_iter()
            .filter_map(|(name, value)| match value {
                Value::String(text) => Some((name, text)),
                _ => None,
            })
            .collect(),
    ))
}

fn string_value<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(Some(text)),
        _ => Ok(None),
    }
}

/// The seven semantic color roles a theme can set
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColorRole {
    Primary,
    Secondary,
    Background,
    Text,
    Success,
    Warning,
    Error,
}

impl ColorRole {
    pub const ALL: [Self; 7] = [
        Self::Primary,
        Self::Secondary,
        Self::Background,
        Self::Text,
        Self::Success,
        Self::Warning,
        Self::Error,
    ];

    /// Key of this role under `theme.colors`
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Primary => "primary",
            Self::Secondary => "secondary",
            Self::Background => "background",
            Self::Text => "text",
            Self::Success => "success",
            Self::Warning => "warning",
            Self::Error => "error",
        }
    }

    /// Global style variable the role is committed to
    #[must_use]
    pub const fn css_variable(self) -> &'static str {
        match self {
            Self::Primary => "--color-primary",
            Self::Secondary => "--color-secondary",
            Self::Background => "--color-background",
            Self::Text => "--color-text",
            Self::Success => "--color-success",
            Self::Warning => "--color-warning",
            Self::Error => "--color-error",
        }
    }

    /// Role for a `theme.colors` key
    #[must_use]
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.key() == key)
    }
}

impl fmt::Display for ColorRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Radius scale selected by `theme.borderRadius`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RadiusScale {
    /// `rounded-full`: pill-shaped controls
    Pill,
    /// Anything else, including an absent token
    Rounded,
}

impl RadiusScale {
    pub const ROUNDED_FULL: &'static str = "rounded-full";

    /// Global style variable holding the radius
    pub const CSS_VARIABLE: &'static str = "--border-radius";

    /// Value written to [`RadiusScale::CSS_VARIABLE`]
    #[must_use]
    pub const fn css_value(self) -> &'static str {
        match self {
            Self::Pill => "9999px",
            Self::Rounded => "8px",
        }
    }
}
