use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use colored::Colorize;

use crate::account::AccountEntry;
use crate::error::AppError;
use crate::exec::{self, CommandRunner};
use crate::git;
use crate::prompt::Prompter;
use crate::registry::{self, Paths};
use crate::validation::{prompt_until_valid, validate_input_remote_url};

const GIT_ACCOUNT_FILE: &str = ".git-account";
const GITIGNORE_FILE: &str = ".gitignore";

/// Binds one local repository checkout to one registered account:
/// association record, local git identity, gitignore entry, then a
/// non-fatal verification pass.
pub fn run(
    paths: &Paths,
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    dir_arg: Option<PathBuf>,
) -> Result<(), AppError> {
    let dir = dir_arg.unwrap_or_else(|| PathBuf::from("."));
    let dir = dir
        .canonicalize()
        .map_err(|_| AppError::DirectoryNotFound(dir.clone()))?;
    if !dir.is_dir() {
        return Err(AppError::DirectoryNotFound(dir));
    }
    println!("{}", format!("Working in directory: {}", dir.display()).cyan());

    ensure_git_repo(runner, prompter, &dir)?;

    let accounts = registry::load_accounts(paths)?;
    let account = select_account(prompter, &accounts)?.clone();

    write_association_record(prompter, &dir, &account)?;
    apply_git_identity(runner, &dir, &account)?;
    ensure_gitignore_entry(&dir)?;
    verify_association(runner, prompter, &dir, &account);
    registry::touch_last_used(paths, &account.account)?;

    println!(
        "{}",
        "Repo association complete! Commit and push to test.".green()
    );
    Ok(())
}

fn ensure_git_repo(
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    dir: &Path,
) -> Result<(), AppError> {
    if git::is_git_repo(dir) {
        return Ok(());
    }
    if prompter.confirm("Not a git repository. Initialize one?", false)? {
        git::init_repo(runner, dir)?;
        println!("{}", "Git repository initialized".green());
        Ok(())
    } else {
        Err(AppError::UserAborted)
    }
}

/// Presents the registry for interactive choice and requires explicit
/// confirmation of the selected entry
fn select_account<'a>(
    prompter: &dyn Prompter,
    accounts: &'a [AccountEntry],
) -> Result<&'a AccountEntry, AppError> {
    if accounts.is_empty() {
        return Err(AppError::NoAccountsConfigured);
    }

    let labels: Vec<String> = accounts
        .iter()
        .map(|a| format!("{} ({})", a.account, a.email))
        .collect();
    let chosen = prompter.select("Select account to associate:", &labels)?;
    let index = labels
        .iter()
        .position(|l| *l == chosen)
        .ok_or_else(|| AppError::Validation(format!("unknown selection: {chosen}")))?;
    let account = &accounts[index];

    let message = format!(
        "Confirm association with {} ({})?",
        account.account, account.email
    );
    if prompter.confirm(&message, true)? {
        Ok(account)
    } else {
        Err(AppError::UserAborted)
    }
}

/// Writes the human-readable `.git-account` audit record. An existing
/// record is only overwritten after explicit confirmation.
fn write_association_record(
    prompter: &dyn Prompter,
    dir: &Path,
    account: &AccountEntry,
) -> Result<(), AppError> {
    let path = dir.join(GIT_ACCOUNT_FILE);
    if path.exists() && !prompter.confirm("Overwrite existing .git-account?", false)? {
        return Err(AppError::UserAborted);
    }

    let remote_url = prompt_until_valid(
        prompter,
        "Enter remote repo URL (git@github-<alias>:<owner>/<repo>.git):",
        validate_input_remote_url,
    )?;

    let created = chrono::Local::now().format("%Y-%m-%d %H:%M:%S");
    let content = format!(
        "# Git account association\n\
         account={account_name}\n\
         email={email}\n\
         name={account_name}\n\
         remote_url={remote_url}\n\
         host_alias={host_alias}\n\
         ssh_key={ssh_key}\n\
         created={created}\n",
        account_name = account.account,
        email = account.email,
        host_alias = account.host_alias(),
        ssh_key = account.private_key,
    );
    fs::write(&path, content)?;
    println!(
        "{}",
        format!(".git-account created at {}", path.display()).green()
    );
    Ok(())
}

/// Sets repository-local user.name and user.email to the account
fn apply_git_identity(
    runner: &dyn CommandRunner,
    dir: &Path,
    account: &AccountEntry,
) -> Result<(), AppError> {
    git::set_local_config(runner, dir, "user.name", &account.account)?;
    git::set_local_config(runner, dir, "user.email", &account.email)?;
    println!("{}", "Git config (user.name/email) set".green());
    Ok(())
}

/// Keeps the association record out of version control. Idempotent.
fn ensure_gitignore_entry(dir: &Path) -> Result<(), AppError> {
    let path = dir.join(GITIGNORE_FILE);
    let existing = if path.exists() {
        fs::read_to_string(&path)?
    } else {
        String::new()
    };
    if existing.lines().any(|line| line.trim() == GIT_ACCOUNT_FILE) {
        println!(
            "{}",
            format!("{GIT_ACCOUNT_FILE} already in {GITIGNORE_FILE}").yellow()
        );
        return Ok(());
    }

    let mut file = OpenOptions::new().create(true).append(true).open(&path)?;
    if !existing.is_empty() && !existing.ends_with('\n') {
        writeln!(file)?;
    }
    writeln!(file, "{GIT_ACCOUNT_FILE}")?;
    println!(
        "{}",
        format!("{GIT_ACCOUNT_FILE} added to {GITIGNORE_FILE}").green()
    );
    Ok(())
}

/// Post-association checks. Every failure here is reported with a hint
/// and the workflow still completes.
fn verify_association(
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    dir: &Path,
    account: &AccountEntry,
) {
    println!("{}", "Verifying setup...".cyan());

    let host_alias = account.host_alias();
    if exec::ssh_auth_probe(runner, &host_alias) {
        println!("{}", "SSH verified".green());
    } else {
        log::warn!("ssh verification failed for {host_alias}");
        println!(
            "{}",
            "SSH test failed - check that the key was added on GitHub".yellow()
        );
    }

    match ensure_origin_remote(runner, prompter, dir) {
        Ok(url) => println!("{}", format!("Remote origin: {url}").cyan()),
        Err(e) => {
            log::warn!("could not ensure origin remote: {e}");
            println!("{}", format!("Could not set up origin remote: {e}").yellow());
        }
    }

    if let Err(e) = git::fetch_origin(runner, dir) {
        log::warn!("fetch failed: {e}");
        println!("{}", format!("Fetch from origin failed: {e}").yellow());
    }

    match git::latest_commit(runner, dir) {
        Ok(Some(line)) => println!("{}", format!("Latest commit: {line}").cyan()),
        Ok(None) => println!("{}", "No commits yet".yellow()),
        Err(e) => println!("{}", format!("Could not read git log: {e}").yellow()),
    }

    match git::branches(runner, dir) {
        Ok(branches) if !branches.is_empty() => {
            let shown: Vec<&str> = branches.iter().take(5).map(String::as_str).collect();
            println!(
                "{}",
                format!("Branches ({}): {}", branches.len(), shown.join(", ")).cyan()
            );
        }
        Ok(_) => println!("{}", "No branches yet".yellow()),
        Err(e) => println!("{}", format!("Could not list branches: {e}").yellow()),
    }

    println!("{}", "Verification complete!".green());
}

fn ensure_origin_remote(
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    dir: &Path,
) -> Result<String, AppError> {
    if let Some(url) = git::remote_url(runner, dir)? {
        return Ok(url);
    }
    let url = prompt_until_valid(prompter, "Enter origin URL:", validate_input_remote_url)?;
    git::add_remote(runner, dir, &url)?;
    println!("{}", "Remote origin added".green());
    Ok(url)
}
