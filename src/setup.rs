use std::fs;
use std::path::Path;
use std::time::Duration;

use colored::Colorize;

use crate::account::{self, AccountEntry};
use crate::error::AppError;
use crate::exec::{self, CommandRunner};
use crate::prompt::Prompter;
use crate::registry::{self, Paths};
use crate::ssh_config;
use crate::validation::{prompt_until_valid, validate_input_alias, validate_input_email};

const KEYGEN_TIMEOUT: Duration = Duration::from_secs(30);

/// Registers one SSH keypair per GitHub account alias and records each
/// account in the registry. Aliases are processed strictly one at a time;
/// an abort on one alias halts the rest of the batch.
pub fn run(
    paths: &Paths,
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    aliases_arg: Option<String>,
) -> Result<(), AppError> {
    exec::ssh_available(runner)?;
    registry::ensure_layout(paths)?;
    ssh_config::ensure_include(paths)?;

    let aliases = match aliases_arg {
        Some(list) => split_aliases(&list),
        None => {
            let input = prompter.input("Enter GitHub account aliases (comma-separated):")?;
            split_aliases(&input)
        }
    };
    if aliases.is_empty() {
        println!("{}", "no aliases given, nothing to do".yellow());
        return Ok(());
    }
    for alias in &aliases {
        validate_input_alias(alias)?;
    }

    println!("{}", "GitHub SSH setup".cyan());
    println!(
        "{}",
        "Sets up one SSH keypair per GitHub account on this machine".blue()
    );

    for alias in &aliases {
        process_alias(paths, runner, prompter, alias)?;
    }

    println!("{}", "Setup complete!".green());
    println!("Restart your terminal for SSH config changes to take effect.");
    println!("To bind a repository to an account, run: hubgate repo <dir>");
    Ok(())
}

fn split_aliases(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|a| !a.is_empty())
        .map(ToString::to_string)
        .collect()
}

fn process_alias(
    paths: &Paths,
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
    alias: &str,
) -> Result<(), AppError> {
    println!("{} {}", "Processing account:".white(), alias);

    let accounts = registry::load_accounts(paths)?;
    if registry::find_account(&accounts, alias).is_some() {
        println!(
            "{}",
            format!("Account '{alias}' is already registered").yellow()
        );
        let options: Vec<String> = ["overwrite", "skip", "abort"]
            .iter()
            .map(ToString::to_string)
            .collect();
        match prompter
            .select("Existing registration found:", &options)?
            .as_str()
        {
            "overwrite" => {
                registry::remove_account(paths, alias)?;
                println!("Removing existing registration...");
            }
            "skip" => {
                println!("{}", "Skipping duplicate account".yellow());
                return Ok(());
            }
            _ => return Err(AppError::UserAborted),
        }
    }

    let host_alias = account::host_alias(alias);
    let config = ssh_config::read_config(paths)?;
    if ssh_config::has_stanza(&config, &host_alias) {
        println!(
            "{}",
            format!("SSH config entry exists for {host_alias}").yellow()
        );
        if prompter.confirm("Replace the existing entry?", false)? {
            let cleaned = ssh_config::remove_stanza(&config, &host_alias)?;
            ssh_config::rewrite_config(paths, &cleaned)?;
            println!("{}", "Replaced existing SSH config entry".yellow());
        } else {
            println!("{}", "Keeping SSH config, skipping account".yellow());
            return Ok(());
        }
    }

    let private_key = paths.private_key(alias);
    let public_key = paths.public_key(alias);

    let email = prompt_until_valid(
        prompter,
        &format!("Enter GitHub email for '{alias}':"),
        validate_input_email,
    )?;

    if private_key.exists() {
        println!(
            "{}",
            format!("Reusing existing key at {}", private_key.display()).yellow()
        );
    } else {
        println!("Generating ED25519 SSH key...");
        generate_key(runner, &private_key, &email)?;
    }

    let today = account::today();
    registry::append_account(
        paths,
        AccountEntry {
            account: alias.to_string(),
            email,
            private_key: private_key.to_string_lossy().into_owned(),
            public_key: public_key.to_string_lossy().into_owned(),
            created_at: today.clone(),
            last_used: today,
        },
    )?;
    ssh_config::append_stanza(
        paths,
        &ssh_config::render_stanza(&host_alias, &private_key.to_string_lossy()),
    )?;

    present_guidance(prompter, &public_key)?;
    verify_connection(runner, &host_alias, alias);
    Ok(())
}

fn generate_key(
    runner: &dyn CommandRunner,
    private_key: &Path,
    email: &str,
) -> Result<(), AppError> {
    let key_arg = private_key.to_string_lossy();
    let out = runner.run(
        &["ssh-keygen", "-t", "ed25519", "-f", &key_arg, "-N", "", "-C", email],
        None,
        KEYGEN_TIMEOUT,
    )?;
    if !out.success() {
        let detail = if out.status.is_none() {
            "timed out".to_string()
        } else {
            out.stderr.trim().to_string()
        };
        return Err(AppError::ToolFailed {
            tool: "ssh-keygen".to_string(),
            detail,
        });
    }
    Ok(())
}

/// Prints the public key and the manual GitHub steps, then waits for the
/// operator to finish them
fn present_guidance(prompter: &dyn Prompter, public_key: &Path) -> Result<(), AppError> {
    println!();
    println!("{}", "GITHUB SSH KEY SETUP".magenta());
    println!("{}", "Step 1: Open github.com/settings/ssh/new".cyan());
    println!(
        "{}",
        "Step 2: Go to Settings -> SSH and GPG keys -> New SSH key".cyan()
    );
    println!(
        "{}",
        "Step 3: Paste the key below and give it a title".cyan()
    );
    match fs::read_to_string(public_key) {
        Ok(key) => {
            println!("{}", "=".repeat(50).yellow());
            println!("{}", key.trim_end());
            println!("{}", "=".repeat(50).yellow());
        }
        Err(e) => {
            log::warn!("could not read public key {}: {e}", public_key.display());
            println!(
                "{}",
                format!("Could not read {}; copy it manually", public_key.display()).yellow()
            );
        }
    }
    println!(
        "{}",
        "Step 4: Log OUT of GitHub completely before verifying".cyan()
    );

    prompter.input("Press Enter AFTER completing all steps above")?;
    Ok(())
}

/// SSH authentication probe. Failures are reported with hints but never
/// stop the batch.
fn verify_connection(runner: &dyn CommandRunner, host_alias: &str, alias: &str) {
    println!(
        "{}",
        "Testing SSH connection... (may take up to 30 seconds)".cyan()
    );
    if exec::ssh_auth_probe(runner, host_alias) {
        println!(
            "{}",
            format!("SUCCESS! SSH connection verified for {alias}").green()
        );
        println!(
            "{}",
            format!("You can now use: git@{host_alias}:<owner>/<repo>.git").cyan()
        );
    } else {
        log::warn!("ssh verification failed for {alias}");
        println!("{}", format!("Verification failed for {alias}").red());
        println!("{}", "Possible issues:".yellow());
        println!("{}", "  - Did you complete all 4 steps above?".yellow());
        println!("{}", "  - Did you log OUT of GitHub completely?".yellow());
        println!(
            "{}",
            "  - Check that the key was added in GitHub settings".yellow()
        );
        println!(
            "{}",
            format!("  - Try running: ssh -T git@{host_alias}").cyan()
        );
    }
}
