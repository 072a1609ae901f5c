//! Text formatting for terminal output.
//!
//! Statuses and priorities are free-form on records, so colors are picked
//! by recognizing common words rather than by a fixed enum.

use crate::model::Record;
use crate::query::{LogicalField, resolve};
use colored::Colorize;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Placeholder for a missing status or priority badge.
const MISSING: &str = "-";

/// Formatting options for text output.
#[derive(Debug, Clone, Copy)]
pub struct TextFormatOptions {
    pub use_color: bool,
    pub max_width: Option<usize>,
}

impl TextFormatOptions {
    #[must_use]
    pub const fn plain() -> Self {
        Self {
            use_color: false,
            max_width: None,
        }
    }
}

/// Format a status with a color chosen from its wording.
#[must_use]
pub fn format_status_label(status: &str, use_color: bool) -> String {
    if !use_color {
        return status.to_string();
    }

    let lowered = status.to_lowercase();
    if ["closed", "done", "resolved", "fixed"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        status.bright_black().to_string()
    } else if ["progress", "review", "testing"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        status.yellow().to_string()
    } else if ["blocked", "reopened"].iter().any(|word| lowered.contains(word)) {
        status.red().to_string()
    } else if ["open", "new", "todo", "to do"]
        .iter()
        .any(|word| lowered.contains(word))
    {
        status.green().to_string()
    } else {
        status.normal().to_string()
    }
}

/// Format a priority with a color chosen from its wording.
#[must_use]
pub fn format_priority_label(priority: &str, use_color: bool) -> String {
    if !use_color {
        return priority.to_string();
    }

    match priority.trim().to_lowercase().as_str() {
        "critical" | "urgent" | "blocker" | "highest" | "p0" => priority.red().bold().to_string(),
        "high" | "p1" => priority.red().to_string(),
        "medium" | "normal" | "p2" => priority.yellow().to_string(),
        "low" | "lowest" | "minor" | "p3" | "p4" => priority.bright_black().to_string(),
        _ => priority.normal().to_string(),
    }
}

/// Determine terminal width from environment (falls back to 80).
#[must_use]
pub fn terminal_width() -> usize {
    std::env::var("COLUMNS")
        .ok()
        .and_then(|columns| columns.trim().parse::<usize>().ok())
        .filter(|width| *width > 0)
        .unwrap_or(80)
}

/// Truncate a title to fit within `max_len` visible columns.
///
/// Handles wide characters (emojis, CJK) correctly using `unicode-width`.
#[must_use]
pub fn truncate_title(title: &str, max_len: usize) -> String {
    if max_len == 0 {
        return String::new();
    }
    if UnicodeWidthStr::width(title) <= max_len {
        return title.to_string();
    }
    if max_len <= 3 {
        return take_columns(title, max_len);
    }

    let mut truncated = take_columns(title, max_len - 3);
    truncated.push_str("...");
    truncated
}

fn take_columns(text: &str, columns: usize) -> String {
    let mut width = 0;
    let mut taken = String::new();
    for c in text.chars() {
        let char_width = UnicodeWidthChar::width(c).unwrap_or(0);
        if width + char_width > columns {
            break;
        }
        width += char_width;
        taken.push(c);
    }
    taken
}

/// Format a single-line record summary with options.
///
/// Format: `{id} [{status}] [{priority}] [{type}] {title} @{assignee}`
#[must_use]
pub fn format_record_line_with(record: &Record, options: TextFormatOptions) -> String {
    let status = badge_text(record, &LogicalField::Status);
    let priority = badge_text(record, &LogicalField::Priority);
    let task_type = resolve(record, &LogicalField::TaskType).to_text();
    let assignee = resolve(record, &LogicalField::Assignee);
    let suffix = if assignee.is_empty() {
        String::new()
    } else {
        format!(" @{}", assignee.to_text())
    };

    let prefix_len = UnicodeWidthStr::width(record.id.as_str())
        + UnicodeWidthStr::width(status.as_str())
        + UnicodeWidthStr::width(priority.as_str())
        + UnicodeWidthStr::width(task_type.as_ref())
        + 10;
    let title = options.max_width.map_or_else(
        || record.title_or_empty().to_string(),
        |width| {
            let available = width.saturating_sub(prefix_len + UnicodeWidthStr::width(suffix.as_str()));
            truncate_title(record.title_or_empty(), available)
        },
    );

    let status = format_status_label(&status, options.use_color);
    let priority = format_priority_label(&priority, options.use_color);
    let id = if options.use_color {
        record.id.cyan().to_string()
    } else {
        record.id.clone()
    };

    format!("{id} [{status}] [{priority}] [{task_type}] {title}{suffix}")
}

/// Format a single-line record summary.
#[must_use]
pub fn format_record_line(record: &Record) -> String {
    format_record_line_with(record, TextFormatOptions::plain())
}

/// Format a group heading: `{key} ({count})`.
#[must_use]
pub fn format_group_header(key: &str, count: usize, use_color: bool) -> String {
    let header = format!("{key} ({count})");
    if use_color {
        header.bold().underline().to_string()
    } else {
        header
    }
}

fn badge_text(record: &Record, field: &LogicalField) -> String {
    let value = resolve(record, field);
    if value.is_empty() {
        MISSING.to_string()
    } else {
        value.to_text().into_owned()
    }
}
