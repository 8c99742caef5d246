//! Configuration lint
//!
//! The schema only requires an object at the root. These checks look at values
//! the engine will silently degrade on (sections of the wrong type, non-boolean
//! flags, unknown color roles, an unusable base URL) and report them as
//! warnings. Nothing here rejects a document.

use crate::config::document::{ColorRole, ConfigDocument, RadiusScale};
use anyhow::{Context as _, Result, bail};
use regex::Regex;
use serde_json::{Map, Value};
use std::fmt;
use std::sync::OnceLock;
use url::Url;

const COLOR_PATTERN: &str = r"^(#([0-9a-fA-F]{3,4}|[0-9a-fA-F]{6}|[0-9a-fA-F]{8})|(rgb|rgba|hsl|hsla)\(.+\)|var\(--[\w-]+\)|[a-zA-Z]+)$";

/// A single lint finding
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintWarning {
    /// Dotted location inside the document, e.g. `features.chat`
    pub path: String,
    pub message: String,
}

impl LintWarning {
    fn new<P: Into<String>, M: Into<String>>(path: P, message: M) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for LintWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// Lint a parsed document
///
/// Returns every finding, in document order.
#[must_use]
pub fn validate_document(doc: &ConfigDocument) -> Vec<LintWarning> {
    let mut warnings = Vec::new();

    if let Some(theme) = doc.theme.as_ref() {
        if let Some(colors) = theme.colors.as_ref() {
            for (role, token) in colors {
                let path = format!("theme.colors.{role}");
                if ColorRole::from_key(role).is_none() {
                    warnings.push(LintWarning::new(
                        path,
                        "unknown color role; it will not be applied",
                    ));
                } else if !looks_like_color(token) {
                    warnings.push(LintWarning::new(
                        path,
                        format!("'{token}' does not look like a CSS color"),
                    ));
                }
            }
        }

        if let Some(radius) = theme.border_radius.as_deref()
            && radius != RadiusScale::ROUNDED_FULL
        {
            warnings.push(LintWarning::new(
                "theme.borderRadius",
                format!(
                    "'{radius}' is not '{}'; the default radius will be used",
                    RadiusScale::ROUNDED_FULL
                ),
            ));
        }
    }

    if let Some(features) = doc.features.as_ref() {
        lint_flags(features, "features", &mut warnings);
    }

    if let Some(modules) = doc.modules.as_ref() {
        for (module, actions) in modules {
            let path = format!("modules.{module}");
            match actions.as_object() {
                Some(actions) => lint_flags(actions, &path, &mut warnings),
                None => warnings.push(LintWarning::new(
                    path,
                    "module is not an object; all of its actions read as disabled",
                )),
            }
        }
    }

    if let Some(base) = doc.webhook_base_url()
        && let Err(err) = validate_base_url(base)
    {
        warnings.push(LintWarning::new("api.webhookBaseUrl", format!("{err:#}")));
    }

    warnings
}

/// Report the parts of a raw document that decode as absent
///
/// A section that is not an object, and any non-string entry of a string
/// table (colors, labels, headers), is ignored when the document is decoded.
#[must_use]
pub fn validate_shapes(raw: &Value) -> Vec<LintWarning> {
    let mut warnings = Vec::new();
    let Some(root) = raw.as_object() else {
        return warnings;
    };

    for section in ["theme", "features", "modules", "labels", "api"] {
        match root.get(section) {
            None | Some(Value::Object(_)) => {}
            Some(other) => warnings.push(LintWarning::new(
                section,
                format!("{} is not an object; the section is ignored", kind(other)),
            )),
        }
    }

    let tables = [
        ("theme.colors", root.get("theme").and_then(|t| t.get("colors"))),
        ("labels", root.get("labels")),
        ("api.headers", root.get("api").and_then(|a| a.get("headers"))),
    ];
    for (path, table) in tables {
        match table {
            Some(Value::Object(entries)) => {
                for (name, value) in entries {
                    if !value.is_string() {
                        warnings.push(LintWarning::new(
                            format!("{path}.{name}"),
                            format!("{} is not a string; the entry is ignored", kind(value)),
                        ));
                    }
                }
            }
            Some(other) if path != "labels" => warnings.push(LintWarning::new(
                path,
                format!("{} is not an object; it is ignored", kind(other)),
            )),
            _ => {}
        }
    }

    for (path, value) in [
        ("theme.borderRadius", root.get("theme").and_then(|t| t.get("borderRadius"))),
        ("api.webhookBaseUrl", root.get("api").and_then(|a| a.get("webhookBaseUrl"))),
    ] {
        if let Some(value) = value
            && !value.is_string()
        {
            warnings.push(LintWarning::new(
                path,
                format!("{} is not a string; it is ignored", kind(value)),
            ));
        }
    }

    warnings
}

/// Check that `base` is an absolute http(s) URL
///
/// # Errors
///
/// Returns a description of the problem when it is not
pub fn validate_base_url(base: &str) -> Result<()> {
    let url = Url::parse(base).with_context(|| format!("'{base}' is not a valid URL"))?;
    if !matches!(url.scheme(), "http" | "https") {
        bail!(
            "'{base}' uses scheme '{}'; expected http or https",
            url.scheme()
        );
    }
    if base.ends_with('/') {
        bail!("'{base}' ends with '/'; resolved endpoints will contain '//'");
    }
    Ok(())
}

const fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

fn lint_flags(flags: &Map<String, Value>, prefix: &str, warnings: &mut Vec<LintWarning>) {
    for (name, value) in flags {
        if !value.is_boolean() {
            warnings.push(LintWarning::new(
                format!("{prefix}.{name}"),
                format!("{value} is not a boolean; it reads as disabled"),
            ));
        }
    }
}

fn looks_like_color(token: &str) -> bool {
    static COLOR: OnceLock<Option<Regex>> = OnceLock::new();

    COLOR
        .get_or_init(|| Regex::new(COLOR_PATTERN).ok())
        .as_ref()
        .is_none_or(|regex| regex.is_match(token.trim()))
}
