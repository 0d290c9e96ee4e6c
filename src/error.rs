//! Error types.
//!
//! Each stage of the push pipeline has its own error enum; they all
//! convert into the crate-wide [`Error`].

use thiserror::Error;

/// Top-level error.
#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Usage(#[from] UsageError),

    #[error(transparent)]
    Env(#[from] EnvError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("failed to get public key: {0}")]
    PublicKey(#[source] RemoteError),

    #[error(transparent)]
    Sync(#[from] SyncError),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Missing or empty command-line arguments.
#[derive(Error, Debug)]
pub enum UsageError {
    #[error("should be passed repository owner by -owner=")]
    MissingOwner,

    #[error("should be passed repository name by -repo=")]
    MissingRepo,
}

/// Dotenv loading errors.
#[derive(Error, Debug)]
pub enum EnvError {
    #[error("{path} file not found: {source}")]
    NotFound {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed line {line} in {path}: {reason}")]
    Malformed {
        path: String,
        line: usize,
        reason: String,
    },
}

/// Secret name validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("secret name cannot be empty")]
    EmptyName,

    #[error("invalid secret name '{name}': {reason}")]
    InvalidName { name: String, reason: String },
}

/// Key decoding and sealed-box errors.
#[derive(Error, Debug)]
pub enum CipherError {
    #[error("base64 decode error: {0}")]
    InvalidBase64(#[from] base64::DecodeError),

    #[error("public key must be {expected} bytes, got {actual}")]
    InvalidKeyLength { expected: usize, actual: usize },

    #[error("encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("decryption failed: {0}")]
    DecryptionFailed(String),
}

/// GitHub REST API errors.
#[derive(Error, Debug)]
pub enum RemoteError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("api returned {status}: {message}")]
    Status {
        status: reqwest::StatusCode,
        message: String,
    },

    #[error("invalid api url '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },
}

impl RemoteError {
    /// HTTP status returned by the API, if any.
    pub fn status(&self) -> Option<reqwest::StatusCode> {
        match self {
            RemoteError::Status { status, .. } => Some(*status),
            RemoteError::Request(e) => e.status(),
            _ => None,
        }
    }

    /// A short human description of common failure statuses.
    pub fn user_friendly_message(&self) -> String {
        match self.status().map(|s| s.as_u16()) {
            Some(401) => "unauthorized - GITHUB_TOKEN is missing, invalid or expired".to_string(),
            Some(403) => "forbidden - token lacks permission to manage repository secrets".to_string(),
            Some(404) => "not found - repository does not exist or token cannot see it".to_string(),
            Some(422) => "rejected - the api refused the secret payload".to_string(),
            Some(429) => "rate limited - too many requests, try again later".to_string(),
            Some(500..=599) => "service unavailable - github returned a server error".to_string(),
            _ => self.to_string(),
        }
    }
}

/// Failure of a single secret upload.
#[derive(Error, Debug)]
pub enum UploadError {
    #[error(transparent)]
    Cipher(#[from] CipherError),

    #[error(transparent)]
    Remote(#[from] RemoteError),

    #[error("cancelled after an earlier failure")]
    Cancelled,
}

/// Batch upload errors.
#[derive(Error, Debug)]
pub enum SyncError {
    #[error("failed to update {failed} of {total} secrets")]
    Failed { failed: usize, total: usize },

    #[error("upload worker crashed: {0}")]
    Worker(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, Error>;
