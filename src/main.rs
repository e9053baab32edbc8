mod account;
mod cli;
mod error;
mod exec;
mod git;
mod menu;
mod prompt;
mod registry;
mod repo;
mod setup;
mod ssh_config;
mod validation;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::error::AppError;
use crate::exec::SystemRunner;
use crate::prompt::ConsolePrompter;
use crate::registry::Paths;

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("{}", e.to_string().red());
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), AppError> {
    let paths = Paths::from_home()?;
    let runner = SystemRunner;
    let prompter = ConsolePrompter;

    match cli.command {
        Some(Commands::Setup { accounts }) => setup::run(&paths, &runner, &prompter, accounts),
        Some(Commands::Repo { dir }) => repo::run(&paths, &runner, &prompter, dir),
        Some(Commands::List) => cli_list_accounts(&paths),
        Some(Commands::Remove { alias }) => cli_remove_account(&paths, &alias),
        None => menu::run_menu(&paths, &runner, &prompter),
    }
}

/// Prints every registered account
pub fn cli_list_accounts(paths: &Paths) -> Result<(), AppError> {
    let accounts = registry::load_accounts(paths)?;
    if accounts.is_empty() {
        println!("{}", "no accounts configured".yellow());
        return Ok(());
    }

    for account in accounts {
        println!(
            "{} <{}>  key: {}  created: {}  last used: {}",
            account.account.green(),
            account.email,
            account.private_key,
            account.created_at,
            account.last_used
        );
    }
    Ok(())
}

/// Removes one account and its key files
pub fn cli_remove_account(paths: &Paths, alias: &str) -> Result<(), AppError> {
    if registry::remove_account(paths, alias)? {
        println!("{} {}", "account removed:".green(), alias);
        Ok(())
    } else {
        Err(AppError::AccountNotFound(alias.to_string()))
    }
}
