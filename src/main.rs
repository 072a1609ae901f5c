use bug_query::cli::commands;
use bug_query::cli::{Cli, Commands};
use bug_query::config;
use bug_query::logging::init_logging;
use bug_query::{QueryError, StructuredError};
use clap::Parser;
use std::io::{self, IsTerminal};
use std::path::Path;

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = init_logging(cli.verbose, cli.quiet, None) {
        eprintln!("Failed to initialize logging: {e}");
    }

    let overrides = build_cli_overrides(&cli);
    let settings =
        match config::load_settings(Path::new("."), cli.config.as_deref(), &overrides) {
            Ok(settings) => settings,
            Err(e) => handle_error(&e, cli.json),
        };
    colored::control::set_override(settings.color.use_color());

    let result = match &cli.command {
        Commands::List(args) => commands::list::execute(args, cli.json, &settings),
        Commands::Search(args) => commands::search::execute(args, cli.json, &settings),
        Commands::Count(args) => commands::count::execute(args, cli.json, &settings),
        Commands::Fields => commands::fields::execute(cli.json),
    };

    if let Err(e) = result {
        handle_error(&e, cli.json);
    }
}

/// Handle errors with structured output support.
///
/// When --json is set or stdout is not a TTY, outputs structured JSON to stderr.
/// Otherwise, outputs human-readable error with optional color.
fn handle_error(err: &QueryError, json_mode: bool) -> ! {
    tracing::debug!(recoverable = err.is_user_recoverable(), "command failed: {err}");
    let structured = StructuredError::from_error(err);
    let exit_code = structured.code.exit_code();

    let use_json = json_mode || !io::stdout().is_terminal();

    if use_json {
        let json = structured.to_json();
        eprintln!(
            "{}",
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| json.to_string())
        );
    } else {
        let use_color = io::stderr().is_terminal();
        eprintln!("{}", structured.to_human(use_color));
    }

    std::process::exit(exit_code);
}

fn build_cli_overrides(cli: &Cli) -> config::CliOverrides {
    config::CliOverrides {
        no_color: Some(cli.no_color),
    }
}
