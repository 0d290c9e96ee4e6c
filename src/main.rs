//! dotseal - seal local .env secrets into GitHub Actions.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dotseal::cli::output;
use dotseal::cli::{execute, Cli};
use dotseal::core::constants::LOG_ENV;
use dotseal::error::{EnvError, Error, SyncError};

fn main() {
    let cli = Cli::parse_args();

    // Initialize tracing subscriber with env-filter support
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("dotseal=debug")
        } else {
            EnvFilter::new("dotseal=warn")
        }
    });

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .init();

    if let Err(e) = execute(cli) {
        output::error(&e.to_string());
        if let Some(hint) = suggestion(&e) {
            output::hint(&hint);
        }
        std::process::exit(1);
    }
}

fn suggestion(e: &Error) -> Option<String> {
    match e {
        Error::Usage(_) => Some("usage: dotseal -owner=<owner> -repo=<repo>".to_string()),
        Error::Env(EnvError::NotFound { .. }) => {
            Some("create a .env file or pass --env-file <path>".to_string())
        }
        Error::Validation(_) => Some("rename the secret in your .env file".to_string()),
        Error::PublicKey(remote) | Error::Remote(remote) if remote.status().is_some() => {
            Some(remote.user_friendly_message())
        }
        Error::Sync(SyncError::Failed { failed, total }) => Some(format!(
            "{} of {} secrets may already be updated; fix the error and run again",
            total - failed,
            total
        )),
        _ => None,
    }
}
