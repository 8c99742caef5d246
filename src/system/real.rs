//! Real system implementation using `std::fs` and a blocking `reqwest` client

use super::{HttpResponse, System};
use std::fs;
use std::io;
use std::path::Path;
use std::time::Duration;

/// Production implementation of System trait
///
/// Filesystem calls delegate to the standard library. HTTP
/// fetches use a blocking `reqwest` client. No timeout is applied unless one
/// is configured with [`RealSystem::with_timeout`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RealSystem {
    timeout: Option<Duration>,
}

impl RealSystem {
    /// Create a new `RealSystem` instance
    #[must_use]
    pub const fn new() -> Self {
        Self { timeout: None }
    }

    /// Bound every HTTP fetch by `timeout`
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn client(&self) -> io::Result<reqwest::blocking::Client> {
        reqwest::blocking::Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(|e| io::Error::other(format!("Failed to build HTTP client: {e}")))
    }
}

impl System for RealSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        fs::read_to_string(path)
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }

    fn fetch(&self, url: &str) -> io::Result<HttpResponse> {
        let response = self
            .client()?
            .get(url)
            .send()
            .map_err(|e| io::Error::other(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))?;

        Ok(HttpResponse {
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or_default().to_owned(),
            body,
        })
    }
}
