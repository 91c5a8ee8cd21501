use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    error::AppError,
    validation::{normalize_email, normalize_name},
};

/// Commit reference: a full or abbreviated hash, a branch name or `HEAD`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitHash(String);

impl CommitHash {
    pub fn new(value: &str) -> Result<Self, AppError> {
        let hash = value.trim();

        if hash.is_empty() || hash.chars().any(char::is_whitespace) {
            return Err(AppError::InvalidCommitHash);
        }

        Ok(Self(hash.to_string()))
    }

    /// Tip of the current branch
    pub fn head() -> Self {
        Self("HEAD".to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CommitHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Author identity recorded on a commit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitAuthor {
    name: String,
    email: String,
}

impl CommitAuthor {
    pub fn new(name: &str, email: &str) -> Result<Self, AppError> {
        let email = normalize_email(email).ok_or(AppError::InvalidAuthorEmail)?;
        let name = normalize_name(name).ok_or(AppError::InvalidAuthorName)?;
        Ok(Self { name, email })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> &str {
        &self.email
    }
}

impl fmt::Display for CommitAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} <{}>", self.name, self.email)
    }
}

/// Snapshot of one commit as read from history
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub hash: CommitHash,
    pub author: CommitAuthor,
    pub date: DateTime<Utc>,
    /// Subject line, flattened to a single line
    pub message: String,
}

/// Read access to history plus rewriting of the tip commit's author
pub trait CommitRepository {
    /// Resolves `hash` and reads that commit, or `CommitNotFound`
    fn get(&self, hash: &CommitHash) -> Result<Commit, AppError>;

    /// Rewrites the author of the tip commit, keeping message and date
    fn amend_author(&self, author: &CommitAuthor) -> Result<(), AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_rejects_blank_and_whitespace() {
        assert!(matches!(CommitHash::new("  "), Err(AppError::InvalidCommitHash)));
        assert!(matches!(CommitHash::new("abc def"), Err(AppError::InvalidCommitHash)));
        assert!(matches!(CommitHash::new("abc\tdef"), Err(AppError::InvalidCommitHash)));
        assert_eq!(CommitHash::new(" a1b2c3 ").unwrap().as_str(), "a1b2c3");
    }

    #[test]
    fn test_head_hash() {
        assert_eq!(CommitHash::head().as_str(), "HEAD");
        assert_eq!(CommitHash::head(), CommitHash::new("HEAD").unwrap());
    }

    #[test]
    fn test_author_validation_and_display() {
        let author = CommitAuthor::new(" Jane Doe ", " Jane@Example.com").unwrap();
        assert_eq!(author.to_string(), "Jane Doe <jane@example.com>");

        assert!(matches!(
            CommitAuthor::new("Jane", "broken"),
            Err(AppError::InvalidAuthorEmail)
        ));
        assert!(matches!(
            CommitAuthor::new("", "jane@example.com"),
            Err(AppError::InvalidAuthorName)
        ));
    }
}
