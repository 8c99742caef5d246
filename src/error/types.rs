//! Custom error types with exit codes

use thiserror::Error;

/// Main error type for portal configuration operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum PortalError {
    /// Fetch Error - the configuration resource was unreachable or answered with a non-success status
    #[error("Failed to load config: {message}")]
    ConfigFetch { message: String },

    /// Parse Error - the configuration body is not valid JSON or does not match the schema
    #[error("Failed to load config: {message}")]
    ConfigParse { message: String },

    /// Unresolved Operation - an operation name produced no endpoint
    #[error("Unresolved operation: {name}")]
    UnresolvedOperation { name: String },
}

impl PortalError {
    /// Get the appropriate exit code for this error type
    #[must_use]
    #[inline]
    pub const fn exit_code(&self) -> i32 {
        match *self {
            Self::ConfigFetch { .. } => 1,
            Self::ConfigParse { .. } => 2,
            Self::UnresolvedOperation { .. } => 3,
        }
    }

    /// Create a fetch error
    #[inline]
    pub fn fetch<S: Into<String>>(message: S) -> Self {
        Self::ConfigFetch {
            message: message.into(),
        }
    }

    /// Create a parse error
    #[inline]
    pub fn parse<S: Into<String>>(message: S) -> Self {
        Self::ConfigParse {
            message: message.into(),
        }
    }

    /// Create an unresolved operation error
    #[inline]
    pub fn unresolved<S: Into<String>>(name: S) -> Self {
        Self::UnresolvedOperation { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fetch_and_parse_share_the_load_prefix() {
        let fetch = PortalError::fetch("500 Internal Server Error");
        let parse = PortalError::parse("expected value at line 1 column 1");

        assert_eq!(
            fetch.to_string(),
            "Failed to load config: 500 Internal Server Error"
        );
        assert!(parse.to_string().starts_with("Failed to load config: "));
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            PortalError::fetch("x").exit_code(),
            PortalError::parse("x").exit_code(),
            PortalError::unresolved("x").exit_code(),
        ];
        assert_eq!(codes, [1, 2, 3]);
    }
}
