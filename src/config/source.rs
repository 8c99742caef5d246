//! Where the configuration document is read from

use std::fmt;
use std::path::PathBuf;
use url::Url;

/// Well-known location of the configuration document
pub const DEFAULT_CONFIG_SOURCE: &str = "./config.json";

/// A configuration location: a remote resource or a local file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    Http(Url),
    File(PathBuf),
}

impl ConfigSource {
    /// Interpret `raw` as a source
    ///
    /// `http://` and `https://` strings that parse as URLs are fetched over
    /// the network; anything else is a file path, with an optional `file://`
    /// prefix removed.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if (trimmed.starts_with("http://") || trimmed.starts_with("https://"))
            && let Ok(url) = Url::parse(trimmed)
        {
            return Self::Http(url);
        }

        let path = trimmed.strip_prefix("file://").unwrap_or(trimmed);
        Self::File(PathBuf::from(path))
    }
}

impl Default for ConfigSource {
    fn default() -> Self {
        Self::parse(DEFAULT_CONFIG_SOURCE)
    }
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(url) => write!(f, "{url}"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
