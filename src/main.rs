mod cli;
mod commands;
mod commit;
mod config;
mod error;
mod git;
mod identity;
mod ini;
mod menu;
mod output;
mod profile;
mod service;
mod storage;
mod validation;

use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use crate::{
    cli::{Cli, Commands},
    commands::{
        amend_command, current_command, delete_command, get_command, list_command, set_command,
        unset_command, use_command, version_command, App,
    },
    config::Settings,
    error::AppError,
    menu::run_menu,
    output::{error_message, hint, suggest},
};

// Main
fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{}", error_message(&err).red());
            if let Some(command) = hint(&err) {
                suggest("to fix it with the following command", &command);
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr; `RUST_LOG` overrides the level chosen with `-d`
fn init_tracing(debug: u8) {
    let level = match debug {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(cli: Cli) -> Result<(), AppError> {
    let settings = Settings::resolve(&cli.settings_options())?;
    let app = App::new(settings)?;

    match cli.command {
        Some(Commands::Set { workspace, email, name, yes }) => set_command(
            &app,
            workspace.value(),
            email.as_deref(),
            name.as_deref(),
            yes,
        ),
        Some(Commands::Get { workspace }) => get_command(&app, workspace.value()),
        Some(Commands::List { verbose, json }) => list_command(&app, verbose, json),
        Some(Commands::Delete { workspace }) => delete_command(&app, workspace.value()),
        Some(Commands::Use { workspace, global }) => use_command(&app, workspace.value(), global),
        Some(Commands::Unset { global }) => unset_command(&app, global),
        Some(Commands::Current { global }) => current_command(&app, global),
        Some(Commands::Amend { workspace }) => amend_command(&app, workspace.value()),
        Some(Commands::Version) => {
            version_command(&app);
            Ok(())
        }
        None => run_menu(&app),
    }
}
