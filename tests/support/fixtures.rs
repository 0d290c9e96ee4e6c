//! Test fixtures and constants.

/// Repository owner used across tests.
pub const OWNER: &str = "acme";

/// Repository name used across tests.
pub const REPO: &str = "widgets";

/// Key identifier served by the mock API.
pub const KEY_ID: &str = "568250167242549743";

/// Token passed to the binary.
pub const TOKEN: &str = "ghp_test_token";

/// Two-secret .env from the README example.
pub const SAMPLE_ENV: &str = "API_KEY=abc123\nDB_PASS=s3cret\n";

/// .env exercising the parser.
pub const SAMPLE_ENV_COMPLEX: &str = r#"
# This is a comment
SIMPLE=value
QUOTED="quoted value"
SINGLE_QUOTED='single quoted'
export EXPORTED=yes

# Another comment
SPECIAL_CHARS=p@ssw0rd!#$%
"#;

/// Path of the public key endpoint.
pub fn public_key_path() -> String {
    format!("/repos/{}/{}/actions/secrets/public-key", OWNER, REPO)
}

/// Path of a secret's endpoint.
pub fn secret_path(name: &str) -> String {
    format!("/repos/{}/{}/actions/secrets/{}", OWNER, REPO, name)
}
