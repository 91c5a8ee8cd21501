use colored::Colorize;

use crate::{error::AppError, profile::Profile};

/// User-facing text for an error
pub fn error_message(err: &AppError) -> String {
    match err {
        AppError::ProfileAlreadyExists(workspace) => {
            format!("Profile \"{workspace}\" already exists.")
        }
        AppError::ProfileNotExists(workspace) | AppError::ProfileNotFound(workspace) => {
            format!("Profile \"{workspace}\" does not exist.")
        }
        AppError::ProfileNotConfigured => "No profile is configured.".to_string(),
        AppError::NoProfiles => "No profiles found.".to_string(),
        AppError::ScmUserNotFound => "No git user is configured.".to_string(),
        AppError::CommitNotFound(reference) => format!("Commit \"{reference}\" not found."),
        AppError::InvalidWorkspace => "The workspace is invalid.".to_string(),
        AppError::InvalidWorkspaceCharacters => {
            "The workspace must contain only letters, numbers, '_', '.' and '-'.".to_string()
        }
        AppError::InvalidEmail => "The email is invalid.".to_string(),
        AppError::InvalidName => "The name is invalid.".to_string(),
        AppError::InvalidCommitHash => "The commit hash or branch name is invalid.".to_string(),
        AppError::InvalidAuthorName => "The author name is invalid.".to_string(),
        AppError::InvalidAuthorEmail => "The author email is invalid.".to_string(),
        AppError::MalformedConfig { .. }
        | AppError::NoProfileLayers
        | AppError::HomeDirNotFound
        | AppError::GitCommand(_)
        | AppError::Io(_)
        | AppError::SerdeJson(_)
        | AppError::Inquire(_)
        | AppError::Utf8Error(_) => err.to_string(),
    }
}

/// Command that fixes the error, when there is an obvious one
pub fn hint(err: &AppError) -> Option<String> {
    match err {
        AppError::ProfileNotExists(workspace) => Some(format!("git-profile set {workspace}")),
        AppError::ProfileNotConfigured => Some("git-profile use".to_string()),
        AppError::NoProfiles => Some("git-profile set".to_string()),
        _ => None,
    }
}

/// Prints a follow-up command the user may want to run
pub fn suggest(what: &str, command: &str) {
    println!("\n{} {what}:", "Suggest".yellow());
    println!("  {}", command.bold());
}

/// Prints every field of a profile
pub fn print_profile(profile: &Profile) {
    println!("{} {}", "Workspace:".blue(), profile.workspace());
    println!("{} {}", "Email:".blue(), profile.email());
    println!("{} {}", "Name:".blue(), profile.name());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_domain_errors_have_friendly_messages() {
        assert_eq!(
            error_message(&AppError::ProfileAlreadyExists("work".into())),
            "Profile \"work\" already exists."
        );
        assert_eq!(
            error_message(&AppError::ProfileNotExists("work".into())),
            "Profile \"work\" does not exist."
        );
        assert_eq!(error_message(&AppError::InvalidEmail), "The email is invalid.");
    }

    #[test]
    fn test_hints() {
        assert_eq!(
            hint(&AppError::ProfileNotExists("work".into())).as_deref(),
            Some("git-profile set work")
        );
        assert_eq!(hint(&AppError::InvalidEmail), None);
    }

    #[test]
    fn test_transport_errors_pass_through() {
        let err = AppError::MalformedConfig {
            path: PathBuf::from("/x"),
            line: 2,
            detail: "expected `key = value`".into(),
        };
        assert_eq!(error_message(&err), err.to_string());
        let err = AppError::GitCommand("fatal: not a git repository".into());
        assert_eq!(error_message(&err), "git command failed: fatal: not a git repository");
    }
}
