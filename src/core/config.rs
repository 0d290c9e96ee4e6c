//! Run configuration.
//!
//! Everything a push needs, resolved once from flags and environment
//! variables before any file or network access.

use std::path::PathBuf;

use crate::core::constants;
use crate::core::domain::Target;

/// Resolved settings for one run
#[derive(Debug, Clone)]
pub struct Settings {
    /// Repository whose secrets are updated
    pub target: Target,
    /// Dotenv file to read secrets from
    pub env_file: PathBuf,
    /// GitHub REST API base URL
    pub api_url: String,
    /// Bearer token; `None` lets the API answer 401
    pub token: Option<String>,
    /// Upload worker pool size
    pub workers: usize,
    /// Seal secrets but do not upload them
    pub dry_run: bool,
}

impl Settings {
    /// Settings for `target` with every other field at its default
    pub fn new(target: Target) -> Self {
        Self {
            target,
            env_file: PathBuf::from(constants::ENV_FILE),
            api_url: constants::DEFAULT_API_URL.to_string(),
            token: None,
            workers: constants::DEFAULT_WORKERS,
            dry_run: false,
        }
    }

    /// Use a different dotenv file
    pub fn with_env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = path.into();
        self
    }

    /// Use a different API base URL
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Set the bearer token; an empty token counts as none
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token.filter(|t| !t.is_empty());
        self
    }

    /// Set the worker pool size (at least one)
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    /// Toggle dry-run mode
    pub fn with_dry_run(mut self, dry_run: bool) -> Self {
        self.dry_run = dry_run;
        self
    }
}
