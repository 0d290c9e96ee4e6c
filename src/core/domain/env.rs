//! Env type.
//!
//! Represents a parsed .env file as a mapping of secret names to values.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::SecretEntry;
use crate::core::validation;
use crate::error::{EnvError, ValidationError};

/// A parsed .env file
///
/// Names are unique: when a name is defined more than once, the last
/// definition wins.
#[derive(Debug, Clone)]
pub struct Env {
    entries: BTreeMap<String, SecretEntry>,
    path: PathBuf,
}

impl Env {
    /// Parse an .env file from disk
    ///
    /// # Errors
    ///
    /// Returns `EnvError::NotFound` if the file does not exist, `EnvError::Read`
    /// if it cannot be read, or `EnvError::Malformed` on a bad line.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, EnvError> {
        let path = path.as_ref();
        let shown = path.display().to_string();
        debug!(path = %shown, "loading env file");

        let contents = std::fs::read_to_string(path).map_err(|source| {
            if source.kind() == std::io::ErrorKind::NotFound {
                EnvError::NotFound {
                    path: shown.clone(),
                    source,
                }
            } else {
                EnvError::Read {
                    path: shown.clone(),
                    source,
                }
            }
        })?;

        let env = Self::parse(&contents, path)?;
        debug!(path = %shown, entries = env.len(), "env file loaded");

        Ok(env)
    }

    /// Parse .env content
    ///
    /// Skips empty lines and comments (lines starting with #), strips an
    /// optional `export ` prefix and supports values with or without quotes.
    ///
    /// # Errors
    ///
    /// Returns `EnvError::Malformed` for a line without `=`, with an empty or
    /// whitespace-containing key, or with a quoted value that is unterminated
    /// or followed by anything but a comment.
    pub fn parse(contents: &str, path: impl Into<PathBuf>) -> Result<Self, EnvError> {
        let path = path.into();
        let mut entries = BTreeMap::new();

        for (index, line) in contents.lines().enumerate() {
            let line = line.trim();

            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let malformed = |reason: &str| EnvError::Malformed {
                path: path.display().to_string(),
                line: index + 1,
                reason: reason.to_string(),
            };

            let line = line.strip_prefix("export ").unwrap_or(line);
            let (key, value) = line
                .split_once('=')
                .ok_or_else(|| malformed("expected KEY=value"))?;

            let key = key.trim();
            if key.is_empty() {
                return Err(malformed("empty key"));
            }
            if key.chars().any(char::is_whitespace) {
                return Err(malformed("key contains whitespace"));
            }

            let value = parse_env_value(value.trim()).map_err(malformed)?;
            let entry = SecretEntry::new(key, value);
            if entries.insert(key.to_string(), entry).is_some() {
                warn!(name = key, line = index + 1, "duplicate secret, later value wins");
            }
        }

        Ok(Self { entries, path })
    }

    /// Check every name against the remote naming rules
    ///
    /// # Errors
    ///
    /// Returns the first `ValidationError` found, in name order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.entries.keys().try_for_each(|name| validation::validate_name(name))
    }

    /// Get a value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries.get(name).map(SecretEntry::value)
    }

    /// Secret names in sorted order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Consume into the list of entries, sorted by name
    pub fn into_entries(self) -> Vec<SecretEntry> {
        self.entries.into_values().collect()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// File path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn parse_env_value(raw: &str) -> Result<String, &'static str> {
    let quote = match raw.chars().next() {
        Some(q @ ('"' | '\'')) => q,
        _ => {
            // Unquoted: ` #` starts a trailing comment
            return Ok(match raw.find(" #") {
                Some(pos) => raw[..pos].trim_end().to_string(),
                None => raw.to_string(),
            });
        }
    };

    let body = &raw[1..];
    let end = closing_quote(body, quote).ok_or("unterminated quoted value")?;

    let rest = body[end + 1..].trim_start();
    if !rest.is_empty() && !rest.starts_with('#') {
        return Err("unexpected text after quoted value");
    }

    let inner = &body[..end];
    if quote == '"' {
        Ok(unescape_double_quoted(inner))
    } else {
        Ok(inner.to_string())
    }
}

/// Byte offset of the quote closing `body`; `\` escapes only inside double quotes
fn closing_quote(body: &str, quote: char) -> Option<usize> {
    let mut chars = body.char_indices();

    while let Some((i, ch)) = chars.next() {
        if ch == quote {
            return Some(i);
        }
        if ch == '\\' && quote == '"' {
            chars.next();
        }
    }

    None
}

fn unescape_double_quoted(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();

    while let Some(ch) = chars.next() {
        if ch != '\\' {
            out.push(ch);
            continue;
        }

        match chars.next() {
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('"') => out.push('"'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }

    out
}
