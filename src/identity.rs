use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::Serialize;
use tracing::{debug, info};

use crate::{error::AppError, ini::IniDocument};

/// Section of git's config holding the identity
const USER_SECTION: &str = "user";
const WORKSPACE_KEY: &str = "workspace";
const NAME_KEY: &str = "name";
const EMAIL_KEY: &str = "email";

/// Identity recorded in git's config, as found there (unvalidated)
#[derive(Serialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct ScmUser {
    pub workspace: String,
    pub email: String,
    pub name: String,
}

impl ScmUser {
    pub fn new(workspace: &str, email: &str, name: &str) -> Self {
        Self {
            workspace: workspace.to_string(),
            email: email.to_string(),
            name: name.to_string(),
        }
    }

    fn is_empty(&self) -> bool {
        self.workspace.is_empty() && self.email.is_empty() && self.name.is_empty()
    }
}

/// Storage of the identity git uses for new commits
pub trait ScmUserRepository {
    /// Returns the recorded identity, or `ScmUserNotFound`
    fn get(&self) -> Result<ScmUser, AppError>;

    /// Records the identity, keeping unrelated configuration
    fn save(&self, user: &ScmUser) -> Result<(), AppError>;

    /// Clears the identity keys
    fn delete(&self) -> Result<(), AppError>;
}

/// Identity stored in a git config file (`.git/config` or `~/.gitconfig`)
#[derive(Debug, Clone)]
pub struct GitUserRepository {
    path: PathBuf,
}

impl GitUserRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<IniDocument, AppError> {
        Ok(IniDocument::load(&self.path)?.with_indent("\t").ignore_case())
    }
}

impl ScmUserRepository for GitUserRepository {
    fn get(&self) -> Result<ScmUser, AppError> {
        if !self.path.is_file() {
            debug!(path = %self.path.display(), "git config not found");
            return Err(AppError::ScmUserNotFound);
        }

        let Ok(doc) = self.load() else {
            debug!(path = %self.path.display(), "git config unreadable");
            return Err(AppError::ScmUserNotFound);
        };
        if !doc.has_section(USER_SECTION) {
            return Err(AppError::ScmUserNotFound);
        }

        let value = |key| doc.get(USER_SECTION, key).unwrap_or_default();
        let user = ScmUser::new(value(WORKSPACE_KEY), value(EMAIL_KEY), value(NAME_KEY));
        if user.is_empty() {
            return Err(AppError::ScmUserNotFound);
        }

        Ok(user)
    }

    fn save(&self, user: &ScmUser) -> Result<(), AppError> {
        if !self.path.exists() {
            if let Some(parent) = self.path.parent().filter(|parent| !parent.as_os_str().is_empty()) {
                fs::create_dir_all(parent)?;
            }
            fs::write(&self.path, "")?;
        }

        let mut doc = self.load()?;
        doc.set(USER_SECTION, WORKSPACE_KEY, &user.workspace);
        doc.set(USER_SECTION, NAME_KEY, &user.name);
        doc.set(USER_SECTION, EMAIL_KEY, &user.email);
        doc.save(&self.path)?;

        info!(path = %self.path.display(), workspace = %user.workspace, "saved git user");
        Ok(())
    }

    fn delete(&self) -> Result<(), AppError> {
        if !self.path.exists() {
            debug!(path = %self.path.display(), "git config not found, nothing to unset");
            return Ok(());
        }

        let mut doc = self.load()?;
        if !doc.has_section(USER_SECTION) {
            return Err(AppError::ScmUserNotFound);
        }

        for key in [WORKSPACE_KEY, NAME_KEY, EMAIL_KEY] {
            doc.remove_key(USER_SECTION, key);
        }
        doc.save(&self.path)?;

        info!(path = %self.path.display(), "removed git user");
        Ok(())
    }
}
