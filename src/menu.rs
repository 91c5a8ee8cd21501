use colored::Colorize;
use inquire::Select;

use crate::{
    commands::{
        amend_command, current_command, delete_command, list_command, set_command, use_command,
        App,
    },
    error::AppError,
    output::error_message,
    profile::Profile,
};

/// Menu entry leaving a selection; never a valid workspace
pub const BACK_OPTION: &str = "(back)";

/// Runs interactive menu interface
pub fn run_menu(app: &App) -> Result<(), AppError> {
    loop {
        let actions: Vec<&'static str> = vec![
            "use profile",
            "add or update profile",
            "delete profile",
            "show current profile",
            "show all profiles",
            "amend last commit",
            "quit",
        ];

        let action_selected: &'static str =
            Select::new(&format!("{}", "select action".blue()), actions).prompt()?;

        let result = match action_selected {
            "use profile" => use_command(app, None, false),
            "add or update profile" => set_command(app, None, None, None, false),
            "delete profile" => delete_command(app, None),
            "show current profile" => current_command(app, false),
            "show all profiles" => list_command(app, false, false),
            "amend last commit" => amend_command(app, None),
            "quit" => {
                println!("{}", "quitting".yellow());
                break Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // domain errors are shown and the menu continues
        match result {
            Err(AppError::Inquire(err)) => return Err(AppError::Inquire(err)),
            Err(err) => println!("{}", error_message(&err).red()),
            Ok(()) => {}
        }
    }
}

/// Lets the user pick a workspace; `None` when they go back
pub fn select_workspace(profiles: &[Profile], message: &str) -> Result<Option<String>, AppError> {
    if profiles.is_empty() {
        return Err(AppError::NoProfiles);
    }

    let workspaces: Vec<String> = build_workspace_list(profiles);
    let selected: String = Select::new(&format!("{}", message.blue()), workspaces).prompt()?;

    Ok((selected != BACK_OPTION).then_some(selected))
}

/// Builds list of workspaces for menu to display
pub fn build_workspace_list(profiles: &[Profile]) -> Vec<String> {
    let mut workspaces: Vec<String> = profiles
        .iter()
        .map(|profile| profile.workspace().to_string())
        .collect();
    workspaces.push(BACK_OPTION.to_string());
    workspaces
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::Workspace;

    #[test]
    fn test_back_option_is_not_a_workspace() {
        assert!(Workspace::new(BACK_OPTION).is_err());
    }

    #[test]
    fn test_workspace_list_ends_with_back() {
        let profiles = vec![
            Profile::new("work", "a@b.com", "A").unwrap(),
            Profile::new("home", "c@d.com", "C").unwrap(),
        ];
        assert_eq!(build_workspace_list(&profiles), vec!["work", "home", BACK_OPTION]);
    }

    #[test]
    fn test_select_without_profiles() {
        assert!(matches!(
            select_workspace(&[], "pick"),
            Err(AppError::NoProfiles)
        ));
    }
}
