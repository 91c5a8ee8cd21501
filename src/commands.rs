use colored::Colorize;
use inquire::Confirm;

use crate::{
    config::Settings,
    error::AppError,
    git::GitCommitRepository,
    identity::GitUserRepository,
    menu::select_workspace,
    output::{print_profile, suggest},
    profile::{Email, Name, Profile, Workspace},
    service::{
        amend_profile, create_profile, current_identity, current_profile, delete_profile,
        get_profile, list_profiles, set_profile, unset_profile, update_profile,
    },
    storage::IniFileProfileRepository,
    validation::prompt_until_valid,
};

/// Repositories wired from the resolved settings
pub struct App {
    settings: Settings,
    profiles: IniFileProfileRepository,
    commits: GitCommitRepository,
}

impl App {
    pub fn new(settings: Settings) -> Result<Self, AppError> {
        let profiles = IniFileProfileRepository::new(settings.profile_layers.clone())?;
        let commits = GitCommitRepository::new(&settings.working_dir);
        Ok(Self {
            settings,
            profiles,
            commits,
        })
    }

    /// Identity store of the repository, or the global one
    fn users(&self, global: bool) -> GitUserRepository {
        GitUserRepository::new(self.settings.identity_file(global))
    }

    pub fn profiles(&self) -> Result<Vec<Profile>, AppError> {
        list_profiles(&self.profiles)
    }
}

/// Resolves the workspace argument, prompting when it is missing
fn workspace_or_prompt(workspace: Option<&str>) -> Result<Workspace, AppError> {
    match workspace {
        Some(workspace) => Workspace::new(workspace),
        None => prompt_until_valid(&format!("{}", "enter workspace:".blue()), None, Workspace::new),
    }
}

/// Resolves the workspace argument, offering the stored profiles when it is missing
fn workspace_or_select(app: &App, workspace: Option<&str>, message: &str) -> Result<Option<String>, AppError> {
    match workspace {
        Some(workspace) => Ok(Some(workspace.to_string())),
        None => select_workspace(&app.profiles()?, message),
    }
}

/// Creates a profile, or updates it after confirmation
pub fn set_command(
    app: &App,
    workspace: Option<&str>,
    email: Option<&str>,
    name: Option<&str>,
    yes: bool,
) -> Result<(), AppError> {
    let workspace = workspace_or_prompt(workspace)?;

    let existing = match get_profile(&app.profiles, workspace.as_str()) {
        Ok(profile) => Some(profile),
        Err(err) if err.is_not_found() => None,
        Err(err) => return Err(err),
    };

    if existing.is_some() && !yes {
        let update = Confirm::new(&format!(
            "profile \"{workspace}\" already exists, do you want to update it?"
        ))
        .with_default(false)
        .prompt()?;
        if !update {
            println!("{}", "nothing changed".yellow());
            return Ok(());
        }
    }

    let email: String = match email {
        Some(email) => email.to_string(),
        None => prompt_until_valid(
            &format!("{}", "enter email:".blue()),
            existing.as_ref().map(|profile| profile.email().as_str()),
            |input| Email::new(input).map(|_| input.to_string()),
        )?,
    };

    let name: String = match name {
        Some(name) => name.to_string(),
        None => prompt_until_valid(
            &format!("{}", "enter name:".blue()),
            existing.as_ref().map(|profile| profile.name().as_str()),
            |input| Name::new(input).map(|_| input.to_string()),
        )?,
    };

    let (profile, verb) = if existing.is_some() {
        (update_profile(&app.profiles, workspace.as_str(), &email, &name)?, "updated")
    } else {
        (create_profile(&app.profiles, workspace.as_str(), &email, &name)?, "created")
    };

    println!("{} {}", format!("profile {verb}:").green(), profile.workspace());
    suggest(
        "to use the profile with the following command",
        &format!("git-profile use {}", profile.workspace()),
    );
    Ok(())
}

pub fn get_command(app: &App, workspace: Option<&str>) -> Result<(), AppError> {
    let workspace = workspace_or_prompt(workspace)?;
    let profile = get_profile(&app.profiles, workspace.as_str())?;
    print_profile(&profile);
    Ok(())
}

/// Lists every profile; the one in use in the repository is starred
pub fn list_command(app: &App, verbose: bool, json: bool) -> Result<(), AppError> {
    let profiles = app.profiles()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profiles)?);
        return Ok(());
    }

    if profiles.is_empty() {
        println!("{}", "no profiles found".red());
        return Ok(());
    }

    let current = current_profile(&app.profiles, &app.users(false)).ok();
    for profile in &profiles {
        let is_current = current
            .as_ref()
            .is_some_and(|current| current.workspace() == profile.workspace());

        if verbose {
            print_profile(profile);
            if is_current {
                println!("{} true", "Current:".blue());
            }
            println!();
        } else if is_current {
            println!("{}", format!("*{}", profile.workspace()).green());
        } else {
            println!(" {}", profile.workspace());
        }
    }
    Ok(())
}

pub fn delete_command(app: &App, workspace: Option<&str>) -> Result<(), AppError> {
    let Some(workspace) = workspace_or_select(app, workspace, "select profile to delete:")? else {
        return Ok(());
    };

    let workspace = Workspace::new(&workspace)?;
    delete_profile(&app.profiles, workspace.as_str())?;
    println!("{} {}", "profile deleted:".green(), workspace);
    suggest("to list all profiles with the following command", "git-profile list");
    Ok(())
}

/// Applies a profile to the repository (or global) git config
pub fn use_command(app: &App, workspace: Option<&str>, global: bool) -> Result<(), AppError> {
    let Some(workspace) = workspace_or_select(app, workspace, "select profile to use:")? else {
        return Ok(());
    };

    let users = app.users(global);
    let profile = set_profile(&app.profiles, &users, &workspace)?;
    println!(
        "{} {} ({})",
        "switched to profile:".green(),
        profile.workspace(),
        users.path().display()
    );
    suggest("to check the profiles with the following command", "git-profile list");
    Ok(())
}

pub fn unset_command(app: &App, global: bool) -> Result<(), AppError> {
    let users = app.users(global);
    let current = current_profile(&app.profiles, &users).ok();

    unset_profile(&users)?;

    match current {
        Some(profile) => println!("{} {}", "unset profile:".green(), profile.workspace()),
        None => println!("{}", "unset profile".green()),
    }
    Ok(())
}

/// Shows the profile in use, or the raw identity when no profile matches
pub fn current_command(app: &App, global: bool) -> Result<(), AppError> {
    let profile = current_identity(&app.profiles, &app.users(global))?;

    if profile.workspace().is_configured() {
        println!("{}", profile.workspace());
    } else {
        println!(
            "{} <{}> {}",
            profile.name(),
            profile.email(),
            profile.workspace().to_string().yellow()
        );
    }
    Ok(())
}

/// Rewrites the author of the last commit
pub fn amend_command(app: &App, workspace: Option<&str>) -> Result<(), AppError> {
    let commit = amend_profile(&app.profiles, &app.users(false), &app.commits, workspace)?;

    println!("{} {}", "commit author:".green(), commit.author);
    suggest("to check the commit with the following command", "git log -1");
    Ok(())
}

pub fn version_command(app: &App) {
    println!("{} {}", "git-profile".bold(), env!("CARGO_PKG_VERSION"));
    println!("Platform: {}/{}", std::env::consts::OS, std::env::consts::ARCH);
    println!("Profile file: {}", app.settings.primary_profile().display());
}
