//! `portalcfg` - runtime configuration engine for the resident portal
//!
//! One JSON document drives the portal: it themes the UI, gates features,
//! module actions and roles, and maps logical operations to webhook
//! endpoints. This library loads that document exactly once, applies its
//! theme before anyone can observe it, and exposes the derived helpers to
//! every consumer through a [`provider::ConfigProvider`].

pub mod cli;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod guards;
pub mod provider;
pub mod system;
pub mod theme;

use anyhow::{Result, anyhow};
use cli::Args;
use config::{ConfigLoader, ConfigSource};
use guards::MemoryPreferences;
use provider::{ConfigProvider, ProviderView};
use std::sync::Arc;
use system::System;
use theme::{StyleEnvironment, StyleSheet};

/// Main entry point for the portalcfg library
///
/// Loads the configuration through the process-wide loader and executes the
/// requested command, returning what it prints. The theme lands in the
/// process-wide [`StyleSheet`], so later calls still see it.
pub fn run(args: &Args, system: &dyn System) -> Result<String> {
    let loader = ConfigLoader::global(ConfigSource::parse(&args.config));
    run_with(args, system, loader, StyleSheet::global())
}

/// Execute the requested command with an explicit loader and style sheet
///
/// `style` must outlive `loader`'s first load: the theme is committed to the
/// sheet passed on that call only.
pub fn run_with(
    args: &Args,
    system: &dyn System,
    loader: Arc<ConfigLoader>,
    style: Arc<StyleSheet>,
) -> Result<String> {
    let env: Arc<dyn StyleEnvironment> = style.clone();
    let preferences = Arc::new(MemoryPreferences::with_role(args.role.as_deref()));
    let provider = ConfigProvider::new(loader, env, preferences);

    match provider.mount(system) {
        ProviderView::Ready(context) => cli::execute(&args.command, &context, &style),
        ProviderView::Failed(screen) => {
            Err(anyhow::Error::new(screen.error.clone()).context(screen.to_string()))
        }
        ProviderView::Loading => Err(anyhow!("Configuration is still loading")),
    }
}
