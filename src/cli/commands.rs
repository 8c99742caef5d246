//! CLI command implementations
//!
//! Each command runs against a ready [`ConfigContext`] and returns the text to
//! print on stdout.

use crate::cli::{Command, ThemeFormat};
use crate::endpoints::Operation;
use crate::error::PortalError;
use crate::provider::ConfigContext;
use crate::theme::StyleSheet;
use anyhow::{Context as _, Result};
use std::fmt::Write as _;

/// Execute `command` against a loaded configuration
///
/// `style` must be the sheet the configuration's theme was applied to.
pub fn execute(command: &Command, context: &ConfigContext<'_>, style: &StyleSheet) -> Result<String> {
    match command {
        Command::Check => Ok(execute_check(context)),
        Command::Theme { format } => execute_theme(*format, style),
        Command::Resolve { operation } => execute_resolve(context, operation),
        Command::Endpoints => Ok(execute_endpoints(context)),
        Command::Headers => serde_json::to_string_pretty(&context.headers())
            .context("Failed to serialize headers"),
        Command::Feature { name } => Ok(enabled_word(context.feature_enabled(name)).to_owned()),
        Command::Module { module, action } => {
            Ok(enabled_word(context.module_action_enabled(module, action)).to_owned())
        }
        Command::Role { allowed } => Ok(if context.role_allowed(allowed.as_slice()) {
            "allowed"
        } else {
            "denied"
        }
        .to_owned()),
        Command::Color { name } => Ok(context.resolve_color(name).to_owned()),
        Command::Label { name, default } => Ok(context.label(name, default).to_owned()),
    }
}

fn execute_check(context: &ConfigContext<'_>) -> String {
    let document = context.document();
    let sections = document.sections();
    let warnings = document.lint();

    let mut report = String::from("ready\n");
    let _ = writeln!(
        report,
        "sections: {}",
        if sections.is_empty() {
            "none".to_owned()
        } else {
            sections.join(", ")
        }
    );
    if warnings.is_empty() {
        report.push_str("warnings: none");
    } else {
        let _ = write!(report, "warnings: {}", warnings.len());
        for warning in warnings {
            let _ = write!(report, "\n  - {warning}");
        }
    }
    report
}

fn execute_theme(format: ThemeFormat, style: &StyleSheet) -> Result<String> {
    match format {
        ThemeFormat::Css => Ok(style.to_css()),
        ThemeFormat::Json => {
            serde_json::to_string_pretty(&style.to_json()).context("Failed to serialize theme")
        }
    }
}

fn execute_resolve(context: &ConfigContext<'_>, name: &str) -> Result<String> {
    let operation = match name.parse::<Operation>() {
        Ok(operation) => operation,
        Err(unknown) => {
            return Err(anyhow::Error::new(PortalError::unresolved(name)).context(unknown.to_string()));
        }
    };

    context.resolve_operation(operation).ok_or_else(|| {
        anyhow::Error::new(PortalError::unresolved(name))
            .context(format!("Operation '{name}' is unavailable: api.webhookBaseUrl is not configured"))
    })
}

fn execute_endpoints(context: &ConfigContext<'_>) -> String {
    Operation::ALL
        .iter()
        .map(|operation| {
            let url = context
                .resolve_operation(*operation)
                .unwrap_or_else(|| "-".to_owned());
            format!("{:<24} {url}", operation.name())
        })
        .collect::<Vec<_>>()
        .join("\n")
}

const fn enabled_word(enabled: bool) -> &'static str {
    if enabled { "enabled" } else { "disabled" }
}
