use std::{env, path::PathBuf};

use tracing::{debug, warn};

use crate::{error::AppError, git::find_git_dir};

/// Profile file name, looked up in the home and working directories
pub const PROFILE_FILE_NAME: &str = ".gitprofile";
/// Global git config file in the home directory
const GLOBAL_GIT_CONFIG: &str = ".gitconfig";

/// Options coming from the command line or the environment
#[derive(Debug, Clone, Default)]
pub struct SettingsOptions {
    /// Profile file, or a directory containing one
    pub profile: Option<PathBuf>,
    /// Use the working directory's profile file as the primary layer
    pub local: bool,
    /// Overrides the current directory
    pub pwd: Option<PathBuf>,
}

/// Resolved locations used by every command
#[derive(Debug, Clone)]
pub struct Settings {
    pub home_dir: PathBuf,
    pub working_dir: PathBuf,
    /// Profile files, highest priority first
    pub profile_layers: Vec<PathBuf>,
}

impl Settings {
    /// Resolves settings against the user's home and current directory
    pub fn resolve(options: &SettingsOptions) -> Result<Self, AppError> {
        let home_dir = dirs::home_dir().ok_or(AppError::HomeDirNotFound)?;
        let current_dir = env::current_dir()?;
        Ok(Self::from_parts(options, home_dir, current_dir))
    }

    /// Resolves settings against explicit directories
    ///
    /// The primary layer is `~/.gitprofile` unless `--profile` or `--local`
    /// says otherwise; the working directory's `.gitprofile` follows it.
    pub fn from_parts(options: &SettingsOptions, home_dir: PathBuf, current_dir: PathBuf) -> Self {
        let working_dir = options.pwd.clone().unwrap_or(current_dir);
        let local_profile = working_dir.join(PROFILE_FILE_NAME);

        let mut primary = home_dir.join(PROFILE_FILE_NAME);
        if let Some(profile) = &options.profile {
            primary = if profile.is_dir() {
                profile.join(PROFILE_FILE_NAME)
            } else {
                profile.clone()
            };
        }
        if options.local {
            primary = local_profile.clone();
        }

        let mut profile_layers = vec![primary];
        if !options.local && profile_layers[0] != local_profile {
            profile_layers.push(local_profile);
        }

        debug!(?profile_layers, working_dir = %working_dir.display(), "resolved settings");
        Self {
            home_dir,
            working_dir,
            profile_layers,
        }
    }

    pub fn primary_profile(&self) -> &PathBuf {
        &self.profile_layers[0]
    }

    /// Git config file holding the identity: `~/.gitconfig` when `global`,
    /// otherwise the config of the repository containing the working directory
    pub fn identity_file(&self, global: bool) -> PathBuf {
        if global {
            return self.home_dir.join(GLOBAL_GIT_CONFIG);
        }

        match find_git_dir(&self.working_dir) {
            Ok(git_dir) => git_dir.join("config"),
            Err(err) => {
                warn!(working_dir = %self.working_dir.display(), %err, "no git repository found");
                self.working_dir.join(".git").join("config")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dirs() -> (tempfile::TempDir, PathBuf, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let home = dir.path().join("home");
        let project = dir.path().join("project");
        std::fs::create_dir_all(&home).unwrap();
        std::fs::create_dir_all(&project).unwrap();
        (dir, home, project)
    }

    #[test]
    fn test_default_layers() {
        let (_dir, home, project) = dirs();
        let settings = Settings::from_parts(&SettingsOptions::default(), home.clone(), project.clone());

        assert_eq!(
            settings.profile_layers,
            vec![home.join(PROFILE_FILE_NAME), project.join(PROFILE_FILE_NAME)]
        );
        assert_eq!(settings.working_dir, project);
    }

    #[test]
    fn test_local_flag_uses_only_working_dir() {
        let (_dir, home, project) = dirs();
        let options = SettingsOptions {
            local: true,
            ..Default::default()
        };
        let settings = Settings::from_parts(&options, home, project.clone());

        assert_eq!(settings.profile_layers, vec![project.join(PROFILE_FILE_NAME)]);
    }

    #[test]
    fn test_profile_override_file_and_directory() {
        let (dir, home, project) = dirs();
        let custom_file = dir.path().join("profiles.ini");
        let options = SettingsOptions {
            profile: Some(custom_file.clone()),
            ..Default::default()
        };
        let settings = Settings::from_parts(&options, home.clone(), project.clone());
        assert_eq!(settings.primary_profile(), &custom_file);

        let options = SettingsOptions {
            profile: Some(home.clone()),
            ..Default::default()
        };
        let settings = Settings::from_parts(&options, home.clone(), project);
        assert_eq!(settings.primary_profile(), &home.join(PROFILE_FILE_NAME));
    }

    #[test]
    fn test_pwd_override_and_dedup() {
        let (_dir, home, project) = dirs();
        let options = SettingsOptions {
            pwd: Some(home.clone()),
            ..Default::default()
        };
        let settings = Settings::from_parts(&options, home.clone(), project);

        assert_eq!(settings.working_dir, home);
        assert_eq!(settings.profile_layers, vec![home.join(PROFILE_FILE_NAME)]);
    }

    #[test]
    fn test_global_identity_file() {
        let (_dir, home, project) = dirs();
        let settings = Settings::from_parts(&SettingsOptions::default(), home.clone(), project);
        assert_eq!(settings.identity_file(true), home.join(".gitconfig"));
    }
}
