//! Constants used throughout dotseal.
//!
//! Centralizes magic strings and configuration values.

/// Default dotenv file name (.env).
pub const ENV_FILE: &str = ".env";

/// Environment variable holding the GitHub bearer token.
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Environment variable for the tracing filter.
pub const LOG_ENV: &str = "DOTSEAL_LOG";

/// Public GitHub REST API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.github.com";

/// REST API version pinned via the `X-GitHub-Api-Version` header.
pub const API_VERSION: &str = "2022-11-28";

/// Media type GitHub recommends for REST requests.
pub const ACCEPT: &str = "application/vnd.github+json";

/// User agent sent with every request.
pub const USER_AGENT: &str = concat!("dotseal/", env!("CARGO_PKG_VERSION"));

/// Default size of the upload worker pool.
pub const DEFAULT_WORKERS: usize = 4;

/// Length in bytes of an X25519 public key.
pub const PUBLIC_KEY_LEN: usize = 32;

/// Secret name prefix reserved by GitHub.
pub const RESERVED_PREFIX: &str = "GITHUB_";
