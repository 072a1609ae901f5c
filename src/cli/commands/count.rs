use super::{build_query, parse_field};
use crate::cli::CountArgs;
use crate::config::Settings;
use crate::error::Result;
use crate::ingest;
use crate::query::{self, Groups};
use serde::Serialize;

#[derive(Serialize)]
struct CountOutput {
    count: usize,
}

#[derive(Debug, PartialEq, Eq, Serialize)]
struct CountGroup {
    group: String,
    count: usize,
}

#[derive(Serialize)]
struct CountGroupedOutput {
    total: usize,
    by: String,
    groups: Vec<CountGroup>,
}

/// Execute the count command.
///
/// # Errors
///
/// Returns an error if the records cannot be loaded or the query flags are
/// invalid.
pub fn execute(args: &CountArgs, json: bool, settings: &Settings) -> Result<()> {
    let by = args.by.as_deref().map(parse_field).transpose()?;
    let records = ingest::read_records(&args.file)?;
    let state = build_query(&args.query, args.search.as_deref(), settings)?;

    let result = query::execute(&records, &state);
    let total = result.len();

    match by {
        None => {
            if json {
                let payload = serde_json::to_string(&CountOutput { count: total })?;
                println!("{payload}");
            } else {
                println!("{total}");
            }
        }
        Some(field) => {
            let groups = group_counts(&query::group(&result.records, &field));
            if json {
                let payload = serde_json::to_string(&CountGroupedOutput {
                    total,
                    by: field.to_string(),
                    groups,
                })?;
                println!("{payload}");
            } else {
                println!("Total: {total}");
                for group in groups {
                    println!("{}: {}", group.group, group.count);
                }
            }
        }
    }

    Ok(())
}

/// Counts per group, in group order.
fn group_counts(groups: &Groups<'_>) -> Vec<CountGroup> {
    groups
        .iter()
        .map(|(group, records)| CountGroup {
            group: group.clone(),
            count: records.len(),
        })
        .collect()
}
