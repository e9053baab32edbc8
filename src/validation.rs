use std::sync::LazyLock;

use colored::Colorize;
use regex::Regex;
use validator::ValidateEmail;

use crate::error::AppError;
use crate::prompt::Prompter;

/// Maximum length for an email address
const MAX_EMAIL_LENGTH: usize = 100;
/// Maximum length for an account alias
const MAX_ALIAS_LENGTH: usize = 30;

/// Remote URLs must route through a github-<alias> host so the right
/// keypair is picked: git@github-<alias>:<owner>/<repo>.git
static REMOTE_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^git@github-[\w-]+:[\w-]+/[\w-]+\.git$").expect("remote url pattern")
});

/// Prompts until `input_validation` accepts the answer. Validation
/// failures are printed and re-prompted; other errors propagate.
pub fn prompt_until_valid<F>(
    prompter: &dyn Prompter,
    prompt_message: &str,
    input_validation: F,
) -> Result<String, AppError>
where
    F: Fn(&str) -> Result<(), AppError>,
{
    loop {
        let input = prompter.input(prompt_message)?;
        match input_validation(&input) {
            Ok(()) => break Ok(input),
            Err(AppError::Validation(msg)) => println!("{}", msg.red()),
            Err(e) => return Err(e),
        }
    }
}

/// Validates an email address input
pub fn validate_input_email(email: &str) -> Result<(), AppError> {
    if email.is_empty() {
        Err(AppError::Validation("Email cannot be empty".to_string()))
    } else if email.len() > MAX_EMAIL_LENGTH {
        Err(AppError::Validation(format!(
            "Email too long (max {MAX_EMAIL_LENGTH} characters)"
        )))
    } else if !email.validate_email() {
        Err(AppError::Validation("Invalid email format".to_string()))
    } else {
        Ok(())
    }
}

/// Validates an account alias input
pub fn validate_input_alias(alias: &str) -> Result<(), AppError> {
    if alias.is_empty() {
        Err(AppError::Validation("Alias cannot be empty".to_string()))
    } else if alias.len() > MAX_ALIAS_LENGTH {
        Err(AppError::Validation(format!(
            "Alias too long (max {MAX_ALIAS_LENGTH} characters)"
        )))
    } else {
        Ok(())
    }
}

/// Whether `url` matches the strict github-<alias> remote pattern
pub fn is_valid_remote_url(url: &str) -> bool {
    REMOTE_URL.is_match(url)
}

/// Validates a remote URL input
pub fn validate_input_remote_url(url: &str) -> Result<(), AppError> {
    if is_valid_remote_url(url) {
        Ok(())
    } else {
        Err(AppError::Validation(
            "Invalid URL format. Must be git@github-<alias>:<owner>/<repo>.git".to_string(),
        ))
    }
}
