use std::fmt;

use serde::Serialize;

use crate::{
    error::AppError,
    validation::{normalize_email, normalize_name, normalize_workspace},
};

/// Workspace shown for an identity that matches no saved profile
pub const NOT_CONFIGURED_WORKSPACE: &str = "(not configured)";

/// Unique, lower-case key of a profile
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Workspace(String);

impl Workspace {
    /// Validates and normalizes a workspace
    pub fn new(value: &str) -> Result<Self, AppError> {
        normalize_workspace(value).map(Self)
    }

    /// Sentinel for identities without a saved profile
    pub fn not_configured() -> Self {
        Self(NOT_CONFIGURED_WORKSPACE.to_string())
    }

    pub fn is_configured(&self) -> bool {
        self.0 != NOT_CONFIGURED_WORKSPACE
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Workspace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Lower-case, syntactically valid email address
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn new(value: &str) -> Result<Self, AppError> {
        normalize_email(value).map(Self).ok_or(AppError::InvalidEmail)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Non-empty display name
#[derive(Serialize, Debug, Clone, PartialEq, Eq, Hash)]
#[serde(transparent)]
pub struct Name(String);

impl Name {
    pub fn new(value: &str) -> Result<Self, AppError> {
        normalize_name(value).map(Self).ok_or(AppError::InvalidName)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Saved git identity: a workspace mapped to a name and an email
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
pub struct Profile {
    workspace: Workspace,
    email: Email,
    name: Name,
}

impl Profile {
    /// Builds a profile, validating every field
    ///
    /// # Arguments
    /// * `workspace` - Unique workspace key
    /// * `email` - Git email (user.email)
    /// * `name` - Git name (user.name)
    pub fn new(workspace: &str, email: &str, name: &str) -> Result<Self, AppError> {
        Ok(Self {
            workspace: Workspace::new(workspace)?,
            email: Email::new(email)?,
            name: Name::new(name)?,
        })
    }

    /// Builds a profile for an identity that is not linked to any workspace
    pub fn without_workspace(email: &str, name: &str) -> Result<Self, AppError> {
        Ok(Self {
            workspace: Workspace::not_configured(),
            email: Email::new(email)?,
            name: Name::new(name)?,
        })
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn name(&self) -> &Name {
        &self.name
    }
}

/// Persistence of profiles keyed by workspace
pub trait ProfileRepository {
    /// Returns the profile stored for `workspace`, or `ProfileNotFound`
    fn get(&self, workspace: &Workspace) -> Result<Profile, AppError>;

    /// Inserts or replaces the profile
    fn save(&self, profile: &Profile) -> Result<(), AppError>;

    /// Removes the profile; succeeds when nothing is stored
    fn delete(&self, workspace: &Workspace) -> Result<(), AppError>;

    /// Every stored profile
    fn list(&self) -> Result<Vec<Profile>, AppError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_workspace_reconstruction_is_stable() {
        for raw in ["work", "Personal", " open-source.v2 ", "A_B"] {
            let first = Workspace::new(raw).unwrap();
            let second = Workspace::new(first.as_str()).unwrap();
            assert_eq!(first, second);
        }
    }

    #[test]
    fn test_profile_new_normalizes_fields() {
        let profile = Profile::new(" Work ", " Jane@Example.com ", "  Jane Doe ").unwrap();
        assert_eq!(profile.workspace().as_str(), "work");
        assert_eq!(profile.email().as_str(), "jane@example.com");
        assert_eq!(profile.name().as_str(), "Jane Doe");
    }

    #[test]
    fn test_profile_new_reports_first_invalid_field() {
        assert!(matches!(
            Profile::new("", "a@b.com", "A"),
            Err(AppError::InvalidWorkspace)
        ));
        assert!(matches!(
            Profile::new("work", "nope", "A"),
            Err(AppError::InvalidEmail)
        ));
        assert!(matches!(
            Profile::new("work", "a@b.com", " "),
            Err(AppError::InvalidName)
        ));
    }

    #[test]
    fn test_profile_equality_is_structural() {
        let a = Profile::new("work", "a@b.com", "A B").unwrap();
        let b = Profile::new("WORK", "A@B.com", "A B").unwrap();
        let c = Profile::new("work", "a@b.com", "A C").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_without_workspace_uses_sentinel() {
        let profile = Profile::without_workspace("a@b.com", "A B").unwrap();
        assert!(!profile.workspace().is_configured());
        assert_eq!(profile.workspace().as_str(), NOT_CONFIGURED_WORKSPACE);
    }

    #[test]
    fn test_profile_serializes_flat() {
        let profile = Profile::new("work", "a@b.com", "A B").unwrap();
        let json = serde_json::to_value(&profile).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"workspace": "work", "email": "a@b.com", "name": "A B"})
        );
    }
}
