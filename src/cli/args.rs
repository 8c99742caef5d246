use clap::{Parser, Subcommand, ValueEnum};

use crate::config::DEFAULT_CONFIG_SOURCE;

/// Command-line arguments for portalcfg
#[derive(Parser, Debug, Clone)]
#[command(name = "portalcfg")]
#[command(
    about = "Load a resident portal configuration and query its theme, endpoints and feature gates"
)]
#[command(long_about = None)]
#[command(version)]
pub struct Args {
    /// Configuration document: a file path or an http(s) URL
    #[arg(
        long,
        value_name = "SOURCE",
        env = "PORTAL_CONFIG",
        default_value = DEFAULT_CONFIG_SOURCE,
        global = true
    )]
    pub config: String,

    /// Current user's role, as stored by the authentication layer
    #[arg(long, value_name = "ROLE", env = "PORTAL_USER_ROLE", global = true)]
    pub role: Option<String>,

    /// Abort HTTP fetches of the configuration after this many seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout_secs: Option<u64>,

    /// Enable verbose logging output
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Only log errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// What to do with the loaded configuration
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Load the configuration and report its state and lint warnings
    Check,

    /// Print the global style tokens the theme produces
    Theme {
        /// Output format
        #[arg(long, value_enum, default_value_t = ThemeFormat::Css)]
        format: ThemeFormat,
    },

    /// Print the endpoint URL for a logical operation
    Resolve {
        /// Logical operation name, e.g. `chat` or `payment-status`
        operation: String,
    },

    /// Print every known operation with its endpoint URL
    Endpoints,

    /// Print the headers attached to every request, as JSON
    Headers,

    /// Check a feature flag
    Feature {
        /// Feature name
        name: String,
    },

    /// Check a module action flag
    Module {
        /// Module name
        module: String,
        /// Action name
        action: String,
    },

    /// Check the current role against a list of allowed roles
    Role {
        /// Allowed roles; none means unrestricted
        allowed: Vec<String>,
    },

    /// Print the theme token for a color role, or the argument unchanged
    Color {
        /// Color role such as `primary`, or a literal color
        name: String,
    },

    /// Print a display label, falling back to a default
    Label {
        /// Label name
        name: String,
        /// Text printed when the configuration has no override
        #[arg(long, default_value = "")]
        default: String,
    },
}

/// Output format for the `theme` command
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThemeFormat {
    Css,
    Json,
}

impl Args {
    /// Default log level implied by the verbosity flags
    #[must_use]
    pub const fn log_level(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else if self.quiet {
            "error"
        } else {
            "info"
        }
    }
}
