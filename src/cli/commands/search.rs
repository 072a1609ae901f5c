//! Search command implementation.
//!
//! The global search view: free-text search plus the usual clauses, grouped
//! by the sort field unless `--no-group` or `search.group: false` says
//! otherwise.

use super::list::render_text;
use super::{build_query, text_options};
use crate::cli::{OutputFormat, SearchArgs};
use crate::config::Settings;
use crate::error::Result;
use crate::format::ListOutput;
use crate::ingest;
use crate::query;

/// Execute the search command.
///
/// # Errors
///
/// Returns an error if the records cannot be loaded or the query flags are
/// invalid.
pub fn execute(args: &SearchArgs, json: bool, settings: &Settings) -> Result<()> {
    let records = ingest::read_records(&args.file)?;
    let state = build_query(&args.query, Some(&args.text), settings)?;

    let grouped = settings.search_group && !args.no_group;
    let result = if grouped {
        query::execute_grouped(&records, &state)
    } else {
        query::execute(&records, &state)
    };
    let output = ListOutput::from_result(&result, &state, args.limit);

    match args.output_format(json) {
        OutputFormat::Json => {
            let json_output = serde_json::to_string_pretty(&output)?;
            println!("{json_output}");
        }
        OutputFormat::Text => {
            println!(
                "Found {} record(s) matching '{}'",
                output.total,
                args.text.trim()
            );
            if !output.records.is_empty() {
                println!();
                for line in render_text(&output, text_options(settings)) {
                    println!("{line}");
                }
            }
        }
    }

    Ok(())
}
