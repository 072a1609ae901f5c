//! CLI definitions and entry point.

use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub mod commands;

/// Search, filter, sort and group bug-record exports
#[derive(Parser, Debug)]
#[command(name = "bq", author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (no output except errors)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Config file (overrides .bq/config.yaml and ~/.config/bq/config.yaml)
    #[arg(long, global = true, env = "BQ_CONFIG")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List records, filtered and sorted
    List(ListArgs),

    /// Search records (grouped by the sort field by default)
    Search(SearchArgs),

    /// Count records, optionally per group
    Count(CountArgs),

    /// List the fields records can be filtered, sorted and grouped by
    Fields,
}

/// Output format for list-like commands.
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable text (default)
    #[default]
    Text,
    /// JSON output
    Json,
}

/// Query flags shared by every command that runs the executor.
#[derive(Args, Debug, Default, Clone)]
pub struct QueryArgs {
    /// Filter clause `<Field>=<value>` (repeatable, all must hold)
    #[arg(long = "filter", short = 'f', value_name = "FIELD=VALUE")]
    pub filters: Vec<String>,

    /// Filter clause recorded with the OR combinator (repeatable)
    #[arg(long = "or-filter", value_name = "FIELD=VALUE")]
    pub or_filters: Vec<String>,

    /// Sort (and group) field
    #[arg(long, short = 's')]
    pub sort: Option<String>,

    /// Sort ascending
    #[arg(long, conflicts_with = "desc")]
    pub asc: bool,

    /// Sort descending (default)
    #[arg(long)]
    pub desc: bool,

    /// Start from a saved query state (JSON); flags are applied on top
    #[arg(long, value_name = "PATH")]
    pub query_file: Option<PathBuf>,
}

/// Arguments for the list command.
#[derive(Args, Debug, Clone)]
pub struct ListArgs {
    /// Record export (JSON array, wrapped array, or JSONL; `-` for stdin)
    pub file: PathBuf,

    /// Free-text search over titles, descriptions, people, status and tags
    #[arg(long)]
    pub search: Option<String>,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Group records by the sort field
    #[arg(long, short = 'g')]
    pub group: bool,

    /// Maximum number of records (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the search command.
#[derive(Args, Debug, Clone)]
pub struct SearchArgs {
    /// Record export (JSON array, wrapped array, or JSONL; `-` for stdin)
    pub file: PathBuf,

    /// Search text
    pub text: String,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Show a flat list instead of groups
    #[arg(long)]
    pub no_group: bool,

    /// Maximum number of records (0 = unlimited)
    #[arg(long, default_value_t = 0)]
    pub limit: usize,

    /// Output format
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,
}

/// Arguments for the count command.
#[derive(Args, Debug, Clone)]
pub struct CountArgs {
    /// Record export (JSON array, wrapped array, or JSONL; `-` for stdin)
    pub file: PathBuf,

    /// Free-text search applied before counting
    #[arg(long)]
    pub search: Option<String>,

    #[command(flatten)]
    pub query: QueryArgs,

    /// Count per group of this field
    #[arg(long)]
    pub by: Option<String>,
}

impl ListArgs {
    #[must_use]
    pub fn output_format(&self, json: bool) -> OutputFormat {
        resolve_format(self.format, json)
    }
}

impl SearchArgs {
    #[must_use]
    pub fn output_format(&self, json: bool) -> OutputFormat {
        resolve_format(self.format, json)
    }
}

fn resolve_format(format: Option<OutputFormat>, json: bool) -> OutputFormat {
    if json {
        OutputFormat::Json
    } else {
        format.unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_list_with_clauses() {
        let cli = Cli::try_parse_from([
            "bq",
            "list",
            "bugs.json",
            "--filter",
            "Status=Open",
            "-f",
            "Tags=ui",
            "--or-filter",
            "Priority=High",
            "--sort",
            "priority",
            "--asc",
            "--group",
        ])
        .unwrap();
        let Commands::List(args) = cli.command else {
            panic!("expected list");
        };
        assert_eq!(args.query.filters, vec!["Status=Open", "Tags=ui"]);
        assert_eq!(args.query.or_filters, vec!["Priority=High"]);
        assert_eq!(args.query.sort.as_deref(), Some("priority"));
        assert!(args.query.asc);
        assert!(args.group);
        assert_eq!(args.limit, 0);
    }

    #[test]
    fn asc_and_desc_conflict() {
        let result = Cli::try_parse_from(["bq", "list", "bugs.json", "--asc", "--desc"]);
        assert!(result.is_err());
    }

    #[test]
    fn global_json_wins_over_format() {
        let cli = Cli::try_parse_from(["bq", "search", "bugs.json", "login", "--format", "text", "--json"])
            .unwrap();
        let Commands::Search(args) = cli.command else {
            panic!("expected search");
        };
        assert_eq!(args.text, "login");
        assert_eq!(args.output_format(cli.json), OutputFormat::Json);
        assert_eq!(args.output_format(false), OutputFormat::Text);
    }
}
