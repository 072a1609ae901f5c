//! List command implementation.
//!
//! The per-status list view: filtered and sorted records, optionally grouped
//! by the sort field. Supports text and JSON output.

use super::{build_query, text_options};
use crate::cli::{ListArgs, OutputFormat};
use crate::config::Settings;
use crate::error::Result;
use crate::format::{ListOutput, TextFormatOptions, format_group_header, format_record_line_with};
use crate::ingest;
use crate::query;

/// Execute the list command.
///
/// # Errors
///
/// Returns an error if the records cannot be loaded or the query flags are
/// invalid.
pub fn execute(args: &ListArgs, json: bool, settings: &Settings) -> Result<()> {
    let records = ingest::read_records(&args.file)?;
    let state = build_query(&args.query, args.search.as_deref(), settings)?;

    let result = if args.group {
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
            for line in render_text(&output, text_options(settings)) {
                println!("{line}");
            }
        }
    }

    Ok(())
}

/// Render a list view as text lines.
///
/// Grouped views print a header per group with its records indented below.
#[must_use]
pub fn render_text(output: &ListOutput<'_>, options: TextFormatOptions) -> Vec<String> {
    if output.records.is_empty() {
        return vec!["No records found.".to_string()];
    }

    let mut lines = Vec::new();
    match &output.groups {
        Some(groups) => {
            let indented = TextFormatOptions {
                max_width: options.max_width.map(|width| width.saturating_sub(2)),
                ..options
            };
            for (index, group) in groups.iter().enumerate() {
                if index > 0 {
                    lines.push(String::new());
                }
                lines.push(format_group_header(&group.key, group.count, options.use_color));
                for record in &group.records {
                    lines.push(format!("  {}", format_record_line_with(record, indented)));
                }
            }
        }
        None => {
            for record in &output.records {
                lines.push(format_record_line_with(record, options));
            }
        }
    }

    lines.push(String::new());
    if output.records.len() < output.total {
        lines.push(format!(
            "Showing {} of {} record(s)",
            output.records.len(),
            output.total
        ));
    } else {
        lines.push(format!("{} record(s)", output.total));
    }
    lines
}
