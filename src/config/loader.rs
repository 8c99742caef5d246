//! Load-once configuration loader
//!
//! # Lifecycle
//! ```text
//! Loading ──fetch ok, parse ok──▶ apply theme ──▶ Ready(document)
//!    │
//!    └──fetch/status/parse error──────────────▶ Failed(error)
//! ```
//! Both end states are terminal. The outcome lives in a `OnceLock`: the first
//! `load` performs the fetch, concurrent callers block on it, later callers
//! get the stored outcome. The theme is applied inside the initialiser, so no
//! caller can observe `Ready` before the tokens are committed.

use crate::config::document::ConfigDocument;
use crate::config::schema::validate_against_schema;
use crate::config::source::ConfigSource;
use crate::config::validation::validate_shapes;
use crate::error::PortalError;
use crate::system::System;
use crate::theme::{StyleEnvironment, apply_theme};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tracing::{debug, error, info, warn};

/// Observable state of a loader
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// No outcome yet; consumers render a neutral placeholder
    Loading,
    /// The document was loaded and the theme applied
    Ready(Arc<ConfigDocument>),
    /// Loading failed; no theme tokens were written
    Failed(PortalError),
}

impl LoadState {
    #[must_use]
    pub const fn is_ready(&self) -> bool {
        matches!(*self, Self::Ready(_))
    }

    /// The loaded document, when ready
    #[must_use]
    pub fn document(&self) -> Option<&Arc<ConfigDocument>> {
        match self {
            Self::Ready(doc) => Some(doc),
            Self::Loading | Self::Failed(_) => None,
        }
    }

    /// Human-readable failure message, when failed
    #[must_use]
    pub fn failure_message(&self) -> Option<String> {
        match self {
            Self::Failed(err) => Some(err.to_string()),
            Self::Loading | Self::Ready(_) => None,
        }
    }
}

/// Fetches, validates and publishes one configuration document
#[derive(Debug)]
pub struct ConfigLoader {
    source: ConfigSource,
    outcome: OnceLock<Result<Arc<ConfigDocument>, PortalError>>,
}

impl ConfigLoader {
    /// Create a loader for `source`; nothing is fetched until [`ConfigLoader::load`]
    #[must_use]
    pub const fn new(source: ConfigSource) -> Self {
        Self {
            source,
            outcome: OnceLock::new(),
        }
    }

    /// Process-wide loader
    ///
    /// The first call fixes the source; later calls return the same loader
    /// and ignore their argument.
    pub fn global(source: ConfigSource) -> Arc<Self> {
        static GLOBAL: OnceLock<Arc<ConfigLoader>> = OnceLock::new();
        Arc::clone(GLOBAL.get_or_init(|| Arc::new(Self::new(source))))
    }

    #[must_use]
    pub const fn source(&self) -> &ConfigSource {
        &self.source
    }

    /// Load the document once and report the resulting state
    ///
    /// On success the theme is committed to `style` before the document is
    /// published. Every call after the first returns the stored outcome
    /// without touching `system` or `style`.
    pub fn load(&self, system: &dyn System, style: &dyn StyleEnvironment) -> LoadState {
        let mut performed = false;
        let outcome = self.outcome.get_or_init(|| {
            performed = true;
            info!(source = %self.source, "Loading configuration");
            match ConfigDocument::load_from(system, &self.source) {
                Ok(doc) => {
                    for warning in doc.lint() {
                        warn!(%warning, "Configuration lint");
                    }
                    apply_theme(&doc, style);
                    info!(sections = ?doc.sections(), "Configuration ready");
                    Ok(Arc::new(doc))
                }
                Err(err) => {
                    error!(source = %self.source, error = %err, "Configuration failed");
                    Err(err)
                }
            }
        });

        if !performed {
            debug!(source = %self.source, "Configuration already loaded; reusing outcome");
        }
        Self::state_of(Some(outcome))
    }

    /// Current state without triggering a load
    #[must_use]
    pub fn state(&self) -> LoadState {
        Self::state_of(self.outcome.get())
    }

    /// The loaded document, if the loader is ready
    #[must_use]
    pub fn document(&self) -> Option<Arc<ConfigDocument>> {
        self.outcome.get()?.as_ref().ok().cloned()
    }

    fn state_of(outcome: Option<&Result<Arc<ConfigDocument>, PortalError>>) -> LoadState {
        match outcome {
            None => LoadState::Loading,
            Some(Ok(doc)) => LoadState::Ready(Arc::clone(doc)),
            Some(Err(err)) => LoadState::Failed(err.clone()),
        }
    }
}

/// Read the raw document from `source` and parse it
///
/// # Errors
///
/// - `ConfigFetch` when the resource is unreachable or answers with a non-2xx status
/// - `ConfigParse` when the body is not a JSON object
pub fn fetch_document(
    system: &dyn System,
    source: &ConfigSource,
) -> Result<ConfigDocument, PortalError> {
    let body = match source {
        ConfigSource::Http(url) => {
            let response = system
                .fetch(url.as_str())
                .map_err(|e| PortalError::fetch(e.to_string()))?;
            if !response.is_success() {
                return Err(PortalError::fetch(response.status_line()));
            }
            response.body
        }
        ConfigSource::File(path) => {
            if !system.exists(path) {
                return Err(PortalError::fetch(format!(
                    "file not found: {}",
                    path.display()
                )));
            }
            system
                .read_to_string(path)
                .map_err(|e| PortalError::fetch(format!("{}: {e}", path.display())))?
        }
    };

    parse_document(&body)
}

/// Parse and schema-check a configuration body
///
/// Sections of the wrong type are logged and decoded as absent.
///
/// # Errors
///
/// Returns `ConfigParse` if the body is not JSON or its root is not an object
pub fn parse_document(body: &str) -> Result<ConfigDocument, PortalError> {
    let value: Value =
        serde_json::from_str(body).map_err(|e| PortalError::parse(format!("invalid JSON: {e}")))?;

    validate_against_schema(&value)?;
    for warning in validate_shapes(&value) {
        warn!(%warning, "Ignoring malformed configuration entry");
    }

    serde_json::from_value(value).map_err(|e| PortalError::parse(e.to_string()))
}
