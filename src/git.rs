use std::path::Path;
use std::time::Duration;

use crate::error::AppError;
use crate::exec::CommandRunner;

const GIT_TIMEOUT: Duration = Duration::from_secs(20);
const FETCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Checks whether `dir` is a repository root
pub fn is_git_repo(dir: &Path) -> bool {
    dir.join(".git").exists()
}

/// Runs `git init` in `dir`
pub fn init_repo(runner: &dyn CommandRunner, dir: &Path) -> Result<(), AppError> {
    let out = runner.run(&["git", "init"], Some(dir), GIT_TIMEOUT)?;
    if !out.success() {
        return Err(AppError::ToolFailed {
            tool: "git init".to_string(),
            detail: out.stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// Sets a repository-local git config value (not global)
pub fn set_local_config(
    runner: &dyn CommandRunner,
    dir: &Path,
    key: &str,
    value: &str,
) -> Result<(), AppError> {
    let out = runner.run(&["git", "config", key, value], Some(dir), GIT_TIMEOUT)?;
    if !out.success() {
        return Err(AppError::ToolFailed {
            tool: "git config".to_string(),
            detail: out.stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// URL of the `origin` remote, or `None` if no remote is configured
pub fn remote_url(runner: &dyn CommandRunner, dir: &Path) -> Result<Option<String>, AppError> {
    let out = runner.run(
        &["git", "remote", "get-url", "origin"],
        Some(dir),
        GIT_TIMEOUT,
    )?;
    if out.success() {
        Ok(Some(out.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}

/// Adds the `origin` remote
pub fn add_remote(runner: &dyn CommandRunner, dir: &Path, url: &str) -> Result<(), AppError> {
    let out = runner.run(
        &["git", "remote", "add", "origin", url],
        Some(dir),
        GIT_TIMEOUT,
    )?;
    if !out.success() {
        return Err(AppError::ToolFailed {
            tool: "git remote add".to_string(),
            detail: out.stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// Fetches from `origin`
pub fn fetch_origin(runner: &dyn CommandRunner, dir: &Path) -> Result<(), AppError> {
    let out = runner.run(&["git", "fetch", "origin"], Some(dir), FETCH_TIMEOUT)?;
    if !out.success() {
        return Err(AppError::ToolFailed {
            tool: "git fetch".to_string(),
            detail: out.stderr.trim().to_string(),
        });
    }
    Ok(())
}

/// One-line summary of the most recent commit, if any
pub fn latest_commit(runner: &dyn CommandRunner, dir: &Path) -> Result<Option<String>, AppError> {
    let out = runner.run(&["git", "log", "--oneline", "-1"], Some(dir), GIT_TIMEOUT)?;
    if out.success() && !out.stdout.trim().is_empty() {
        Ok(Some(out.stdout.trim().to_string()))
    } else {
        Ok(None)
    }
}

/// All local and remote branch names
pub fn branches(runner: &dyn CommandRunner, dir: &Path) -> Result<Vec<String>, AppError> {
    let out = runner.run(&["git", "branch", "-a"], Some(dir), GIT_TIMEOUT)?;
    if !out.success() {
        return Err(AppError::ToolFailed {
            tool: "git branch".to_string(),
            detail: out.stderr.trim().to_string(),
        });
    }
    Ok(out
        .stdout
        .lines()
        .map(|b| b.trim().trim_start_matches("* ").to_string())
        .filter(|b| !b.is_empty())
        .collect())
}
