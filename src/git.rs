use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::{
    commit::{Commit, CommitAuthor, CommitHash, CommitRepository},
    error::AppError,
};

/// Field separator for `git log --format` (ASCII unit separator)
const FIELD_SEPARATOR: char = '\u{1f}';
/// Author date (strict ISO 8601), hash, author name, author email, subject
const COMMIT_FORMAT: &str = "--format=%aI%x1f%H%x1f%an%x1f%ae%x1f%s";

/// Builds a git command running inside `dir`
fn git_command(dir: &Path, args: &[&str]) -> Command {
    let mut command = Command::new("git");
    command.args(args).current_dir(dir);
    command
}

/// Runs git and returns stdout, turning a non-zero exit into `GitCommand`
fn run_git(dir: &Path, args: &[&str]) -> Result<String, AppError> {
    debug!(dir = %dir.display(), ?args, "running git");
    let git_command_output: Output = git_command(dir, args).output()?;

    if !git_command_output.status.success() {
        return Err(AppError::GitCommand(
            String::from_utf8(git_command_output.stderr)?.trim().to_string(),
        ));
    }

    Ok(String::from_utf8(git_command_output.stdout)?)
}

/// Absolute path of the git directory for the repository containing `dir`
pub fn find_git_dir(dir: &Path) -> Result<PathBuf, AppError> {
    let output = run_git(dir, &["rev-parse", "--absolute-git-dir"])?;
    Ok(PathBuf::from(output.trim()))
}

/// Commit history of the repository at `path`, read and rewritten through
/// the `git` binary
#[derive(Debug, Clone)]
pub struct GitCommitRepository {
    path: PathBuf,
}

impl GitCommitRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Full hash of the commit `hash` points at, `None` when it resolves to nothing
    fn resolve(&self, hash: &CommitHash) -> Result<Option<String>, AppError> {
        let reference = format!("{}^{{commit}}", hash.as_str());
        let output = git_command(&self.path, &["rev-parse", "--verify", "--quiet", &reference])
            .output()?;

        if output.status.success() {
            return Ok(Some(String::from_utf8(output.stdout)?.trim().to_string()));
        }
        // --quiet exits with 1 for unknown references; anything else is a real failure
        if output.status.code() == Some(1) {
            return Ok(None);
        }

        Err(AppError::GitCommand(
            String::from_utf8(output.stderr)?.trim().to_string(),
        ))
    }
}

impl CommitRepository for GitCommitRepository {
    fn get(&self, hash: &CommitHash) -> Result<Commit, AppError> {
        let not_found = || AppError::CommitNotFound(hash.to_string());

        let full_hash = self.resolve(hash)?.ok_or_else(not_found)?;
        let record = run_git(&self.path, &["log", "-1", COMMIT_FORMAT, &full_hash, "--"])?;

        let commit = parse_commit_record(&record)?.ok_or_else(not_found)?;
        debug!(reference = %hash, hash = %commit.hash, author = %commit.author, "read commit");
        Ok(commit)
    }

    fn amend_author(&self, author: &CommitAuthor) -> Result<(), AppError> {
        let author_arg = format!("--author={author}");
        run_git(
            &self.path,
            &["commit", "--amend", "--no-edit", "--allow-empty", &author_arg],
        )?;

        info!(path = %self.path.display(), author = %author, "amended commit author");
        Ok(())
    }
}

/// Parses one `COMMIT_FORMAT` record; `None` when the record is malformed
fn parse_commit_record(record: &str) -> Result<Option<Commit>, AppError> {
    let fields: Vec<&str> = record
        .trim_end_matches(['\n', '\r'])
        .splitn(5, FIELD_SEPARATOR)
        .collect();
    let [date, hash, name, email, subject] = &fields[..] else {
        return Ok(None);
    };

    let Ok(date) = DateTime::parse_from_rfc3339(date.trim()) else {
        return Ok(None);
    };
    let Ok(hash) = CommitHash::new(hash) else {
        return Ok(None);
    };
    let author = CommitAuthor::new(name, email)?;

    Ok(Some(Commit {
        hash,
        author,
        date: date.with_timezone(&Utc),
        message: subject.split_whitespace().collect::<Vec<_>>().join(" "),
    }))
}
