//! # `portalcfg`
//!
//! `portalcfg` loads the resident portal's runtime configuration document and
//! answers the questions the portal asks of it: which theme tokens to set,
//! which webhook serves an operation, which features, module actions and
//! roles are enabled.
//!
//! ## Usage
//!
//! ```sh
//! portalcfg --config https://portal.example.com/config.json check
//! portalcfg resolve payment-status
//! portalcfg --role admin role admin manager
//! portalcfg theme --format json
//! ```
//!
//! Exit codes: 0 success, 1 configuration fetch failed, 2 configuration did
//! not parse, 3 operation unresolved.

use anyhow::Result;
use clap::Parser as _;
use portalcfg::cli::Args;
use portalcfg::error::PortalError;
use portalcfg::system::RealSystem;
use std::time::Duration;
use tracing::error;
use tracing_subscriber::{EnvFilter, fmt};

fn main() -> Result<()> {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(args.log_level()));

    fmt()
        .with_target(false)
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .init();

    let system = RealSystem::new().with_timeout(args.timeout_secs.map(Duration::from_secs));

    match portalcfg::run(&args, &system) {
        Ok(output) => {
            println!("{output}");
            std::process::exit(0)
        }
        Err(err) => {
            error!("{}", err);
            std::process::exit(
                err.downcast_ref::<PortalError>()
                    .map_or(1, PortalError::exit_code),
            );
        }
    }
}
