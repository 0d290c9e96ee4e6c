//! Command-line interface.

pub mod args;
pub mod output;
pub mod push;

use std::path::PathBuf;

use clap::Parser;

use crate::core::config::Settings;
use crate::core::constants;
use crate::core::domain::Target;
use crate::error::{Result, UsageError};

/// dotseal - seal local .env secrets into GitHub Actions.
#[derive(Parser)]
#[command(
    name = "dotseal",
    about = "Seal local .env secrets and push them to a GitHub repository",
    version,
    after_help = "Flags also accept the single-dash form, e.g. -owner=acme -repo=widgets"
)]
pub struct Cli {
    /// Repository owner (user or organization)
    #[arg(long, value_name = "OWNER")]
    pub owner: Option<String>,

    /// Repository name
    #[arg(long, value_name = "REPO")]
    pub repo: Option<String>,

    /// Dotenv file to read secrets from
    #[arg(long, env = "DOTSEAL_ENV_FILE", default_value = constants::ENV_FILE, value_name = "PATH")]
    pub env_file: PathBuf,

    /// GitHub REST API base URL
    #[arg(long, env = "GITHUB_API_URL", default_value = constants::DEFAULT_API_URL, value_name = "URL")]
    pub api_url: String,

    /// GitHub token with permission to write repository secrets
    #[arg(long, env = constants::TOKEN_ENV, hide_env_values = true, value_name = "TOKEN")]
    pub token: Option<String>,

    /// Maximum number of concurrent uploads
    #[arg(long, env = "DOTSEAL_WORKERS", default_value_t = constants::DEFAULT_WORKERS, value_parser = parse_workers)]
    pub workers: usize,

    /// Fetch the key and seal every secret, but upload nothing
    #[arg(long)]
    pub dry_run: bool,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Parse process arguments, accepting single-dash long flags
    pub fn parse_args() -> Self {
        Self::parse_from(args::normalize(std::env::args_os()))
    }

    /// Resolve into run settings
    ///
    /// # Errors
    ///
    /// Returns `UsageError` if owner or repo is missing or empty.
    pub fn into_settings(self) -> std::result::Result<Settings, UsageError> {
        let target = Target::new(self.owner.as_deref(), self.repo.as_deref())?;

        Ok(Settings::new(target)
            .with_env_file(self.env_file)
            .with_api_url(self.api_url)
            .with_token(self.token)
            .with_workers(self.workers)
            .with_dry_run(self.dry_run))
    }
}

fn parse_workers(raw: &str) -> std::result::Result<usize, String> {
    match raw.parse::<usize>() {
        Ok(0) => Err("must be at least 1".to_string()),
        Ok(n) => Ok(n),
        Err(e) => Err(e.to_string()),
    }
}

/// Execute a parsed command line.
///
/// Settings are resolved before the async runtime starts, so usage errors
/// never touch the filesystem or network.
///
/// # Errors
///
/// Returns error if any step of the push fails.
pub fn execute(cli: Cli) -> Result<()> {
    let settings = cli.into_settings()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(push::execute(settings))
}
