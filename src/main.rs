//! moviq - Discover movies from the terminal
//!
//! Lists trending and curated movies, searches the catalog, shows movie
//! details with recommendations, and keeps a locally stored favorites list.

use std::process::ExitCode;

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use moviq::app::{App, AppError};
use moviq::cli::{Action, Cli, Settings};
use moviq::{render, shell};

/// Sends logs to stderr, filtered by `RUST_LOG` (default: warnings only)
fn init_logging(verbose: bool) {
    let default = if verbose { "moviq=debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let action = Action::from_command(cli.command.as_ref())?;
    let settings = Settings::from_cli(&cli)?;
    settings.check_action(&action)?;

    let mut app = App::new(&settings)?;
    if let Some(notice) = app.favorites().recovery_notice() {
        eprintln!("warning: {}", notice);
    }

    if action == Action::Shell {
        let stdin = BufReader::new(tokio::io::stdin());
        let mut stdout = std::io::stdout();
        shell::run(&mut app, stdin, &mut stdout).await?;
        return Ok(());
    }

    let output = app.execute(&action).await?;
    print!("{}", output);
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", render::error_message(&e));
            ExitCode::FAILURE
        }
    }
}
