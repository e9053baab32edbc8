use colored::Colorize;

use crate::error::AppError;
use crate::exec::CommandRunner;
use crate::prompt::Prompter;
use crate::registry::{self, Paths};
use crate::{cli_list_accounts, cli_remove_account, repo, setup};

const BACK_OPTION: &str = "back";

/// Runs the interactive menu shown when no subcommand is given
pub fn run_menu(
    paths: &Paths,
    runner: &dyn CommandRunner,
    prompter: &dyn Prompter,
) -> Result<(), AppError> {
    loop {
        let actions: Vec<String> = [
            "set up accounts",
            "associate repository",
            "list accounts",
            "remove account",
            "quit",
        ]
        .iter()
        .map(ToString::to_string)
        .collect();

        let action = prompter.select("select action", &actions)?;
        let result = match action.as_str() {
            "set up accounts" => setup::run(paths, runner, prompter, None),
            "associate repository" => repo::run(paths, runner, prompter, None),
            "list accounts" => cli_list_accounts(paths),
            "remove account" => menu_remove_account(paths, prompter),
            "quit" => {
                println!("{}", "quitting".yellow());
                return Ok(());
            }
            _ => unreachable!("unexpected input"),
        };

        // Workflow failures return to the menu instead of exiting
        if let Err(e) = result {
            println!("{}", e.to_string().red());
        }
    }
}

/// Menu for removing an account
fn menu_remove_account(paths: &Paths, prompter: &dyn Prompter) -> Result<(), AppError> {
    let accounts = registry::load_accounts(paths)?;
    if accounts.is_empty() {
        println!("{}", "no accounts to remove".yellow());
        return Ok(());
    }

    let mut aliases: Vec<String> = accounts.iter().map(|a| a.account.clone()).collect();
    aliases.push(BACK_OPTION.to_string());

    let alias = prompter.select("select account to remove:", &aliases)?;
    if alias != BACK_OPTION {
        cli_remove_account(paths, &alias)?;
    }
    Ok(())
}
