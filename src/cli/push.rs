//! Push command.
//!
//! Loads the dotenv file, fetches the repository public key and uploads
//! every secret sealed against it.

use std::sync::Arc;

use tracing::debug;

use crate::cli::output;
use crate::core::cipher::Sealer;
use crate::core::config::Settings;
use crate::core::domain::Env;
use crate::core::github::GitHubClient;
use crate::core::sync::{self, DryRun, SyncReport};
use crate::error::{Error, Result, SyncError, UploadError};

/// Push all secrets from the configured dotenv file.
///
/// Everything that can be checked locally (file, names) is checked before
/// the first request; a key fetch failure means no uploads are attempted.
///
/// # Errors
///
/// Returns error if loading, key fetch or any upload fails.
pub async fn execute(settings: Settings) -> Result<()> {
    output::header(&format!("Repository: {}", settings.target));

    let env = Env::load(&settings.env_file)?;
    env.validate()?;

    if env.is_empty() {
        output::dimmed(&format!("no secrets in {}", env.path().display()));
        return Ok(());
    }

    let client = GitHubClient::new(&settings.api_url, settings.token.clone())?;
    let repo = client.repository(settings.target.clone());

    let key = repo.public_key().await.map_err(Error::PublicKey)?;
    let sealer = Arc::new(Sealer::new(&key)?);
    debug!(key_id = sealer.key_id(), "sealing with repository key");
    output::kv("key id:", sealer.key_id());
    output::kv("secrets:", env.len());
    output::blank();

    let entries = env.into_entries();
    let report = if settings.dry_run {
        sync::upload_all(Arc::new(DryRun::default()), sealer, entries, settings.workers).await?
    } else {
        sync::upload_all(Arc::new(repo), sealer, entries, settings.workers).await?
    };

    print_report(&report, &settings);

    if report.failed.is_empty() {
        Ok(())
    } else {
        Err(SyncError::Failed {
            failed: report.failed.len(),
            total: report.total,
        }
        .into())
    }
}

fn print_report(report: &SyncReport, settings: &Settings) {
    for name in &report.uploaded {
        output::success(&output::key(name));
    }

    for (name, err) in &report.failed {
        output::error(&format!("failed to update secret {}: {}", output::key(name), err));
    }

    if let Some((_, UploadError::Remote(err))) = report.failed.first() {
        if err.status().is_some() {
            output::hint(&err.user_friendly_message());
        }
    }

    if !report.cancelled.is_empty() || report.skipped() > 0 {
        output::warn(&format!(
            "{} secrets not uploaded after the first failure",
            report.cancelled.len() + report.skipped()
        ));
    }

    if report.is_success() {
        output::blank();
        if settings.dry_run {
            output::dimmed(&format!(
                "dry run: sealed {} secrets for {}, nothing uploaded",
                report.total, settings.target
            ));
        } else {
            output::success(&format!(
                "updated {} secrets in {}",
                report.total, settings.target
            ));
        }
    }
}
