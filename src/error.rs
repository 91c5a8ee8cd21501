use std::path::PathBuf;

use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Error during file I/O operations
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
    /// Error during JSON serialization
    #[error("json error: {0}")]
    SerdeJson(#[from] serde_json::Error),
    /// Error when user input fails.
    #[error("inquire error: {0}")]
    Inquire(#[from] inquire::InquireError),
    /// Error during UTF-8 conversion.
    #[error("UTF-8 error: {0}")]
    Utf8Error(#[from] std::string::FromUtf8Error),
    /// Git exited with a non-zero status
    #[error("git command failed: {0}")]
    GitCommand(String),

    /// Workspace is empty
    #[error("invalid workspace")]
    InvalidWorkspace,
    /// Workspace contains characters outside `[A-Za-z0-9_.-]`
    #[error("invalid workspace characters")]
    InvalidWorkspaceCharacters,
    /// Profile email is empty or malformed
    #[error("invalid email")]
    InvalidEmail,
    /// Profile name is empty
    #[error("invalid name")]
    InvalidName,
    /// Commit reference is empty or contains whitespace
    #[error("invalid hash or branch name")]
    InvalidCommitHash,
    /// Commit author name is empty
    #[error("invalid author name")]
    InvalidAuthorName,
    /// Commit author email is empty or malformed
    #[error("invalid author email")]
    InvalidAuthorEmail,

    /// No layer of the profile store defines the workspace
    #[error("profile not found: '{0}'")]
    ProfileNotFound(String),
    /// Git config has no identity recorded
    #[error("scm user not found")]
    ScmUserNotFound,
    /// Reference does not resolve to a commit
    #[error("scm commit not found: '{0}'")]
    CommitNotFound(String),

    /// Create was asked for a workspace that is already stored
    #[error("profile already exists: '{0}'")]
    ProfileAlreadyExists(String),
    /// Workspace is not stored
    #[error("profile not exists: '{0}'")]
    ProfileNotExists(String),
    /// Identity has no workspace marker
    #[error("profile not configured")]
    ProfileNotConfigured,
    /// Nothing stored to choose from
    #[error("no profiles found")]
    NoProfiles,

    /// Config file could not be parsed
    #[error("malformed config file {}:{line}: {detail}", path.display())]
    MalformedConfig {
        path: PathBuf,
        line: usize,
        detail: String,
    },
    /// Profile store built without any layer
    #[error("profile store needs at least one file")]
    NoProfileLayers,
    /// Home directory could not be determined
    #[error("failed to find the home directory")]
    HomeDirNotFound,
}

impl AppError {
    /// True for errors raised while constructing a value object.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidWorkspace
                | AppError::InvalidWorkspaceCharacters
                | AppError::InvalidEmail
                | AppError::InvalidName
                | AppError::InvalidCommitHash
                | AppError::InvalidAuthorName
                | AppError::InvalidAuthorEmail
        )
    }

    /// True for lookups that found nothing.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            AppError::ProfileNotFound(_)
                | AppError::ScmUserNotFound
                | AppError::CommitNotFound(_)
                | AppError::ProfileNotExists(_)
        )
    }
}
