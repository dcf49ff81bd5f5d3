//! Remote sync: mirror the local bookmark file to a repository file

pub mod github;

use log::{debug, info};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;

pub use github::GithubClient;

/// Commit message used when the remote file is first created
pub const CREATE_MESSAGE: &str = "Add bookmarks";

/// Commit message used when the remote file is updated
pub const UPDATE_MESSAGE: &str = "Update bookmarks";

/// Failures talking to the remote repository
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The requested resource does not exist
    #[error("not found")]
    NotFound,

    /// The token was rejected or lacks permission
    #[error("authentication failed: {0}")]
    AuthFailure(String),

    /// The service could not be reached
    #[error("network error: {0}")]
    NetworkFailure(String),

    #[error("{0}")]
    Other(String),
}

/// A file as currently stored in the remote repository
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteFile {
    /// Revision marker required to update the file
    pub sha: String,
    /// Decoded file content
    pub content: String,
}

/// File operations against a single remote repository
pub trait RemoteRepository {
    /// Check that the repository exists and is reachable
    fn resolve(&self) -> Result<(), RemoteError>;

    /// Fetch a file; `RemoteError::NotFound` if it does not exist
    fn get_file(&self, path: &str) -> Result<RemoteFile, RemoteError>;

    fn create_file(&self, path: &str, message: &str, content: &str) -> Result<(), RemoteError>;

    fn update_file(
        &self,
        path: &str,
        message: &str,
        content: &str,
        sha: &str,
    ) -> Result<(), RemoteError>;
}

/// What a push did to the remote file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncOutcome {
    Created,
    Updated,
    Unchanged,
}

impl fmt::Display for SyncOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncOutcome::Created => write!(f, "created"),
            SyncOutcome::Updated => write!(f, "updated"),
            SyncOutcome::Unchanged => write!(f, "already up to date"),
        }
    }
}

/// Push the full content of `local_path` to `filename` in the remote repository
///
/// Updates the remote file using its current sha when it exists and creates it
/// when the remote reports it missing. Nothing is retried.
pub fn push(
    remote: &dyn RemoteRepository,
    filename: &str,
    local_path: &Path,
) -> Result<SyncOutcome, RemoteError> {
    remote.resolve().map_err(|e| match e {
        RemoteError::NotFound => RemoteError::Other("repository not found".to_string()),
        other => other,
    })?;

    let content = fs::read_to_string(local_path).map_err(|e| {
        RemoteError::Other(format!("failed to read {}: {}", local_path.display(), e))
    })?;

    match remote.get_file(filename) {
        Ok(existing) => {
            if existing.content == content {
                debug!("Remote {} already matches local content", filename);
                return Ok(SyncOutcome::Unchanged);
            }
            remote.update_file(filename, UPDATE_MESSAGE, &content, &existing.sha)?;
            info!("Updated remote {}", filename);
            Ok(SyncOutcome::Updated)
        }
        Err(RemoteError::NotFound) => {
            remote.create_file(filename, CREATE_MESSAGE, &content)?;
            info!("Created remote {}", filename);
            Ok(SyncOutcome::Created)
        }
        Err(e) => Err(e),
    }
}

/// Repository identifier in `owner/name` form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl FromStr for RepoId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || format!("'{}' is not a repository in owner/name form", s);
        let (owner, name) = s.trim().split_once('/').ok_or_else(invalid)?;
        if owner.is_empty() || name.is_empty() || name.contains('/') {
            return Err(invalid());
        }
        if owner.chars().chain(name.chars()).any(char::is_whitespace) {
            return Err(invalid());
        }
        Ok(RepoId {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}
