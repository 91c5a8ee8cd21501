use colored::Colorize;
use inquire::Text;
use validator::ValidateEmail;

use crate::{error::AppError, output::error_message};

/// Prompts user for input until valid input is provided
///
/// # Arguments
/// * `prompt_message` - Text shown before the cursor
/// * `default` - Value used when the user just presses enter
/// * `input_validation` - Check run on every answer; validation errors re-prompt
pub fn prompt_until_valid<F, T>(
    prompt_message: &str,
    default: Option<&str>,
    input_validation: F,
) -> Result<T, AppError>
where
    F: Fn(&str) -> Result<T, AppError>,
{
    loop {
        let mut prompt = Text::new(prompt_message);
        if let Some(value) = default.filter(|value| !value.is_empty()) {
            prompt = prompt.with_default(value);
        }

        let input: String = prompt.prompt()?;
        match input_validation(&input) {
            Ok(value) => break Ok(value),
            Err(err) if err.is_validation() => println!("{}", error_message(&err).red()),
            Err(err) => return Err(err),
        }
    }
}

// Normalization helpers shared by the value objects

/// Trims and lower-cases a workspace, rejecting empty input and characters
/// outside `[A-Za-z0-9_.-]`
pub fn normalize_workspace(input: &str) -> Result<String, AppError> {
    let workspace = input.trim().to_lowercase();

    if workspace.is_empty() {
        return Err(AppError::InvalidWorkspace);
    }

    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-');
    if !workspace.chars().all(allowed) {
        return Err(AppError::InvalidWorkspaceCharacters);
    }

    Ok(workspace)
}

/// Trims and lower-cases an email address, returning `None` when it is
/// empty or not a valid address
pub fn normalize_email(input: &str) -> Option<String> {
    let email = input.trim().to_lowercase();

    if email.is_empty() || !email.validate_email() {
        return None;
    }

    Some(email)
}

/// Trims a display name, returning `None` when nothing is left
pub fn normalize_name(input: &str) -> Option<String> {
    let name = input.trim();
    (!name.is_empty()).then(|| name.to_string())
}
