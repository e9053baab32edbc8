use inquire::{Confirm, Select, Text};

use crate::error::AppError;

/// Interactive prompting capability, injected into the workflows so
/// they can be driven by a scripted implementation in tests
pub trait Prompter {
    /// Free-text prompt
    fn input(&self, message: &str) -> Result<String, AppError>;
    /// Yes/no confirmation with a default answer
    fn confirm(&self, message: &str, default: bool) -> Result<bool, AppError>;
    /// Pick one of the given options; returns the chosen option
    fn select(&self, message: &str, options: &[String]) -> Result<String, AppError>;
}

/// Terminal prompter backed by `inquire`
pub struct ConsolePrompter;

impl Prompter for ConsolePrompter {
    fn input(&self, message: &str) -> Result<String, AppError> {
        Ok(Text::new(message).prompt()?)
    }

    fn confirm(&self, message: &str, default: bool) -> Result<bool, AppError> {
        Ok(Confirm::new(message).with_default(default).prompt()?)
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String, AppError> {
        Ok(Select::new(message, options.to_vec()).prompt()?)
    }
}

/// Replays canned answers in order; used by workflow tests
#[cfg(test)]
pub struct ScriptedPrompter {
    answers: std::cell::RefCell<std::collections::VecDeque<String>>,
}

#[cfg(test)]
impl ScriptedPrompter {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: std::cell::RefCell::new(
                answers.iter().map(|a| a.to_string()).collect(),
            ),
        }
    }

    fn next(&self, message: &str) -> Result<String, AppError> {
        self.answers
            .borrow_mut()
            .pop_front()
            .ok_or_else(|| AppError::Validation(format!("no scripted answer for: {message}")))
    }
}

#[cfg(test)]
impl Prompter for ScriptedPrompter {
    fn input(&self, message: &str) -> Result<String, AppError> {
        self.next(message)
    }

    fn confirm(&self, message: &str, _default: bool) -> Result<bool, AppError> {
        Ok(self.next(message)? == "y")
    }

    fn select(&self, message: &str, options: &[String]) -> Result<String, AppError> {
        let answer = self.next(message)?;
        options
            .iter()
            .find(|o| **o == answer)
            .cloned()
            .ok_or_else(|| AppError::Validation(format!("scripted answer '{answer}' not offered")))
    }
}
