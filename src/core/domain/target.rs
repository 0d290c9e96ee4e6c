//! Target type.
//!
//! Identifies the repository whose secrets are updated.

use crate::error::UsageError;

/// A GitHub repository (owner, name)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    owner: String,
    repo: String,
}

impl Target {
    /// Create a target from owner and repository name
    ///
    /// Both parts are trimmed.
    ///
    /// # Errors
    ///
    /// Returns `UsageError` if either part is missing or blank.
    pub fn new(owner: Option<&str>, repo: Option<&str>) -> Result<Self, UsageError> {
        let owner = non_blank(owner).ok_or(UsageError::MissingOwner)?;
        let repo = non_blank(repo).ok_or(UsageError::MissingRepo)?;

        Ok(Self {
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    /// Repository owner (user or organization)
    pub fn owner(&self) -> &str {
        &self.owner
    }

    /// Repository name
    pub fn repo(&self) -> &str {
        &self.repo
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl std::fmt::Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.owner, self.repo)
    }
}
