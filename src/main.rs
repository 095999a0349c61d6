use clap::Parser;
use issue_tracker::cli::commands;
use issue_tracker::cli::{Cli, Commands};
use issue_tracker::config;
use issue_tracker::logging::init_logging;
use issue_tracker::{StructuredError, TrackerError};
use std::io::{self, IsTerminal};

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose, cli.quiet, cli.log_file.as_deref()) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    let pretty = cli.pretty;

    let result = match &cli.command {
        Commands::Create(args) => commands::create::execute(args, pretty, &overrides),
        Commands::List(args) => commands::list::execute(args, pretty, &overrides),
        Commands::Update(args) => commands::update::execute(args, pretty, &overrides),
        Commands::Delete(args) => commands::delete::execute(args, pretty, &overrides),
        Commands::Projects => commands::projects::execute(pretty, &overrides),
    };

    if let Err(e) = result {
        handle_error(&e);
    }
}

/// Report an infrastructure failure on stderr and exit non-zero.
///
/// Structured JSON when stderr is not a terminal, human-readable otherwise.
fn handle_error(err: &TrackerError) -> ! {
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code().max(1);

    if io::stderr().is_terminal() {
        eprintln!("{}", structured.to_human(true));
    } else {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        db: cli.db.clone(),
        backend: cli.backend.clone(),
        lock_timeout: cli.lock_timeout,
    }
}
