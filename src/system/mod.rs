//! System abstraction for filesystem and network operations
//!
//! This module provides a unified trait for all external system interactions
//! the configuration engine performs, allowing for easy testing with mock
//! implementations.

use std::io;
use std::path::Path;

pub mod mock;
pub mod real;

pub use mock::{FetchGate, MockSystem};
pub use real::RealSystem;

/// Response of a single HTTP GET
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    /// Numeric status code
    pub status: u16,
    /// Canonical reason phrase for the status, empty when unknown
    pub reason: String,
    /// Response body decoded as UTF-8
    pub body: String,
}

impl HttpResponse {
    /// Build a `200 OK` response with the given body
    #[must_use]
    pub fn ok<S: Into<String>>(body: S) -> Self {
        Self {
            status: 200,
            reason: "OK".to_owned(),
            body: body.into(),
        }
    }

    /// Build a response with an arbitrary status and an empty body
    #[must_use]
    pub fn status<S: Into<String>>(status: u16, reason: S) -> Self {
        Self {
            status,
            reason: reason.into(),
            body: String::new(),
        }
    }

    /// Whether the status is in the 2xx range
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// `"{status} {reason}"`, or just the status when there is no reason phrase
    #[must_use]
    pub fn status_line(&self) -> String {
        if self.reason.is_empty() {
            self.status.to_string()
        } else {
            format!("{} {}", self.status, self.reason)
        }
    }
}

/// Unified trait for system operations (filesystem + network)
///
/// # Implementations
/// - `RealSystem`: Production implementation using `std::fs` and `reqwest`
/// - `MockSystem`: Test implementation using in-memory storage and canned responses
pub trait System: Send + Sync {
    // ==================== Filesystem Operations ====================

    /// Read entire file contents as a string
    fn read_to_string(&self, path: &Path) -> io::Result<String>;

    /// Check if a path exists
    fn exists(&self, path: &Path) -> bool;

    // ==================== Network Operations ====================

    /// Issue a GET request and return the status and body
    ///
    /// Only transport failures are errors; a non-success status is returned
    /// as a regular response for the caller to judge.
    fn fetch(&self, url: &str) -> io::Result<HttpResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_line_includes_reason_when_known() {
        assert_eq!(
            HttpResponse::status(500, "Internal Server Error").status_line(),
            "500 Internal Server Error"
        );
        assert_eq!(HttpResponse::status(599, "").status_line(), "599");
    }

    #[test]
    fn success_range_is_2xx() {
        assert!(HttpResponse::ok("{}").is_success());
        assert!(HttpResponse::status(204, "No Content").is_success());
        assert!(!HttpResponse::status(304, "Not Modified").is_success());
        assert!(!HttpResponse::status(404, "Not Found").is_success());
        assert!(!HttpResponse::status(199, "").is_success());
    }
}
