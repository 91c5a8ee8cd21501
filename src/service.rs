//! Profile use cases: each function checks one precondition around the
//! repository calls and maps lookup misses to the errors shown to users.

use tracing::{debug, info};

use crate::{
    commit::{Commit, CommitAuthor, CommitHash, CommitRepository},
    error::AppError,
    identity::{ScmUser, ScmUserRepository},
    profile::{Profile, ProfileRepository, Workspace},
};

/// Maps a store miss to `ProfileNotExists`, keeping every other error
fn not_exists(workspace: &Workspace) -> impl FnOnce(AppError) -> AppError + '_ {
    move |err| match err {
        AppError::ProfileNotFound(_) => AppError::ProfileNotExists(workspace.to_string()),
        other => other,
    }
}

/// Stores a new profile; fails with `ProfileAlreadyExists` when the
/// workspace is taken
pub fn create_profile(
    profiles: &dyn ProfileRepository,
    workspace: &str,
    email: &str,
    name: &str,
) -> Result<Profile, AppError> {
    let profile = Profile::new(workspace, email, name)?;

    match profiles.get(profile.workspace()) {
        Ok(_) => {
            return Err(AppError::ProfileAlreadyExists(profile.workspace().to_string()));
        }
        Err(AppError::ProfileNotFound(_)) => {}
        Err(err) => return Err(err),
    }

    profiles.save(&profile)?;
    info!(workspace = %profile.workspace(), "created profile");
    Ok(profile)
}

/// Replaces an existing profile; fails with `ProfileNotExists` otherwise
pub fn update_profile(
    profiles: &dyn ProfileRepository,
    workspace: &str,
    email: &str,
    name: &str,
) -> Result<Profile, AppError> {
    let profile = Profile::new(workspace, email, name)?;

    profiles
        .get(profile.workspace())
        .map_err(not_exists(profile.workspace()))?;

    profiles.save(&profile)?;
    info!(workspace = %profile.workspace(), "updated profile");
    Ok(profile)
}

pub fn get_profile(profiles: &dyn ProfileRepository, workspace: &str) -> Result<Profile, AppError> {
    let workspace = Workspace::new(workspace)?;
    profiles.get(&workspace).map_err(not_exists(&workspace))
}

pub fn list_profiles(profiles: &dyn ProfileRepository) -> Result<Vec<Profile>, AppError> {
    profiles.list()
}

/// Removes a stored profile; fails with `ProfileNotExists` when absent
pub fn delete_profile(profiles: &dyn ProfileRepository, workspace: &str) -> Result<(), AppError> {
    let workspace = Workspace::new(workspace)?;

    profiles.get(&workspace).map_err(not_exists(&workspace))?;

    profiles.delete(&workspace)?;
    info!(workspace = %workspace, "deleted profile");
    Ok(())
}

/// Writes the profile's identity into git's config ("use")
pub fn set_profile(
    profiles: &dyn ProfileRepository,
    users: &dyn ScmUserRepository,
    workspace: &str,
) -> Result<Profile, AppError> {
    let profile = get_profile(profiles, workspace)?;

    users.save(&ScmUser::new(
        profile.workspace().as_str(),
        profile.email().as_str(),
        profile.name().as_str(),
    ))?;

    info!(workspace = %profile.workspace(), "profile in use");
    Ok(profile)
}

/// Clears the identity from git's config
pub fn unset_profile(users: &dyn ScmUserRepository) -> Result<(), AppError> {
    users.delete()
}

/// Profile matching the identity recorded in git's config
pub fn current_profile(
    profiles: &dyn ProfileRepository,
    users: &dyn ScmUserRepository,
) -> Result<Profile, AppError> {
    let user = match users.get() {
        Ok(user) => user,
        Err(AppError::ScmUserNotFound) => return Err(AppError::ProfileNotConfigured),
        Err(err) => return Err(err),
    };

    if user.workspace.is_empty() {
        return Err(AppError::ProfileNotConfigured);
    }

    get_profile(profiles, &user.workspace)
}

/// Like [`current_profile`], but an identity without workspace marker is
/// returned as an unassociated profile when its name and email are valid
pub fn current_identity(
    profiles: &dyn ProfileRepository,
    users: &dyn ScmUserRepository,
) -> Result<Profile, AppError> {
    match current_profile(profiles, users) {
        Err(AppError::ProfileNotConfigured) => {}
        result => return result,
    }

    match users.get() {
        Ok(user) if user.workspace.is_empty() => Profile::without_workspace(&user.email, &user.name)
            .map_err(|_| AppError::ProfileNotConfigured),
        _ => Err(AppError::ProfileNotConfigured),
    }
}

/// Rewrites the tip commit's author to the profile's identity
///
/// Without a `workspace` the profile currently in use is taken. When the
/// tip commit already carries the exact same name and email, it is returned
/// untouched.
pub fn amend_profile(
    profiles: &dyn ProfileRepository,
    users: &dyn ScmUserRepository,
    commits: &dyn CommitRepository,
    workspace: Option<&str>,
) -> Result<Commit, AppError> {
    let profile = match workspace {
        Some(workspace) => get_profile(profiles, workspace)?,
        None => current_profile(profiles, users)?,
    };

    let head = CommitHash::head();
    let commit = commits.get(&head)?;

    if commit.author.name() == profile.name().as_str()
        && commit.author.email() == profile.email().as_str()
    {
        debug!(hash = %commit.hash, "author already matches profile");
        return Ok(commit);
    }

    let author = CommitAuthor::new(profile.name().as_str(), profile.email().as_str())?;
    commits.amend_author(&author)?;

    let amended = commits.get(&head)?;
    info!(
        workspace = %profile.workspace(),
        from = %commit.hash,
        to = %amended.hash,
        "amended commit author"
    );
    Ok(amended)
}
