//! Nous CLI - capture and browse markdown notes from the terminal.

use std::process;

use clap::Parser;

use nous::cli::{Cli, Commands, ConfigCommands};
use nous::commands::{self, Output};
use nous::config::{self, OutputFormat};

fn main() {
    let cli = Cli::parse();

    let resolved = match config::resolve(cli.server.as_deref(), cli.human_readable) {
        Ok(resolved) => resolved,
        Err(e) => {
            report_error(&e, cli.human_readable);
            process::exit(1);
        }
    };
    let human = resolved.output_format == OutputFormat::Human;

    if let Err(e) = run_command(cli.command, &resolved, human) {
        report_error(&e, human);
        process::exit(1);
    }
}

fn run_command(
    command: Commands,
    resolved: &config::ResolvedConfig,
    human: bool,
) -> Result<(), nous::Error> {
    match command {
        Commands::List { from, to, on } => {
            let result = commands::list(resolved, from.as_deref(), to.as_deref(), on.as_deref())?;
            output(&result, human);
        }

        Commands::Create { body, tag } => {
            let result = commands::create(resolved, body, tag)?;
            output(&result, human);
        }

        Commands::Show { id } => {
            let result = commands::show(resolved, &id)?;
            output(&result, human);
        }

        Commands::Toggle { id } => {
            let result = commands::toggle(resolved, &id)?;
            output(&result, human);
        }

        Commands::Edit { id, body, tag } => {
            let result = commands::edit(resolved, &id, body, tag)?;
            output(&result, human);
        }

        Commands::Delete { id } => {
            let result = commands::delete(resolved, &id)?;
            output(&result, human);
        }

        Commands::Todo { id, index } => {
            let result = commands::todo(resolved, &id, index)?;
            output(&result, human);
        }

        #[cfg(feature = "tui")]
        Commands::Tui { on } => {
            let day = match on {
                Some(ref s) => s.parse()?,
                None => nous::day::Day::today(),
            };
            run_tui(resolved, day)?;
        }

        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                let result = commands::config_show(resolved)?;
                output(&result, human);
            }
            ConfigCommands::Get { key } => {
                let result = commands::config_get(&key)?;
                output(&result, human);
            }
            ConfigCommands::Set { key, value } => {
                let result = commands::config_set(&key, &value)?;
                output(&result, human);
            }
            ConfigCommands::Unset { key } => {
                let result = commands::config_unset(&key)?;
                output(&result, human);
            }
            ConfigCommands::Path => {
                let result = commands::config_path()?;
                output(&result, human);
            }
        },
    }

    Ok(())
}

fn output<T: Output>(result: &T, human: bool) {
    if human {
        println!("{}", result.to_human());
    } else {
        println!("{}", result.to_json());
    }
}

fn report_error(e: &nous::Error, human: bool) {
    if human {
        eprintln!("Error: {}", e);
    } else {
        let err = serde_json::json!({ "error": e.to_string() });
        eprintln!("{}", err);
    }
}

#[cfg(feature = "tui")]
fn run_tui(resolved: &config::ResolvedConfig, day: nous::day::Day) -> Result<(), nous::Error> {
    let runtime = tokio::runtime::Runtime::new()?;
    runtime
        .block_on(nous::tui::run_tui(
            &resolved.server_url,
            day,
            resolved.default_tags.clone(),
        ))
        .map_err(|e| nous::Error::Other(e.to_string()))
}
