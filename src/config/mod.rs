//! Configuration management module
//!
//! Handles locating, fetching, schema-checking and linting the portal
//! configuration document, and the load-once lifecycle around it.

pub mod document;
pub mod loader;
pub mod schema;
pub mod source;
pub mod validation;

pub use document::{ApiConfig, ColorRole, ConfigDocument, RadiusScale, ThemeConfig};
pub use loader::{ConfigLoader, LoadState};
pub use source::{ConfigSource, DEFAULT_CONFIG_SOURCE};

use crate::error::PortalError;
use crate::system::System;
use validation::LintWarning;

impl ConfigDocument {
    /// Fetch and parse a document without the load-once bookkeeping
    ///
    /// # Errors
    ///
    /// Returns `ConfigFetch` or `ConfigParse` as [`loader::fetch_document`] does
    pub fn load_from(system: &dyn System, source: &ConfigSource) -> Result<Self, PortalError> {
        loader::fetch_document(system, source)
    }

    /// Lint this document
    #[must_use]
    pub fn lint(&self) -> Vec<LintWarning> {
        validation::validate_document(self)
    }
}
