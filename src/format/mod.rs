//! Output formatting for `bq`.
//!
//! Supports human-readable text output and machine-parseable JSON.
//! Diagnostics always go to stderr so stdout can be piped.
//!
//! # Output Types
//!
//! - [`ListOutput`] - Records (and optional groups) for list/search
//! - [`FieldInfo`] - Logical field description for `bq fields`

mod output;
mod text;

pub use output::{FieldInfo, GroupOutput, ListOutput};
pub use text::{
    TextFormatOptions, format_group_header, format_priority_label, format_record_line,
    format_record_line_with, format_status_label, terminal_width, truncate_title,
};
