//! Date parsing for date-valued filter clauses.
//!
//! Date fields are matched by case-insensitive substring against whatever
//! the record carries (usually ISO 8601), so clause values are normalized to
//! the `YYYY-MM-DD` prefix that such strings share.

use crate::error::{QueryError, Result};
use chrono::{DateTime, Local, NaiveDate, TimeDelta};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Normalize a date clause value against today's local date.
///
/// See [`normalize_date_value_at`].
///
/// # Errors
///
/// Returns an error if a relative offset uses an unknown unit or overflows.
pub fn normalize_date_value(s: &str, field_name: &str) -> Result<String> {
    normalize_date_value_at(s, field_name, Local::now().date_naive())
}

/// Normalize a date clause value to `YYYY-MM-DD`.
///
/// Supports:
/// - RFC3339: `2025-01-15T12:00:00Z` (the written calendar date is kept)
/// - Simple date: `2025-01-15`
/// - Relative offset from `today`: `+3d`, `-1w`
/// - Keywords: `today`, `tomorrow`, `yesterday`
///
/// Anything else passes through trimmed, so partial values such as
/// `2025-03` keep working as substring filters.
///
/// # Errors
///
/// Returns an error if a relative offset uses an unknown unit or overflows.
pub fn normalize_date_value_at(s: &str, field_name: &str, today: NaiveDate) -> Result<String> {
    let s = s.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(format_date(dt.date_naive()));
    }

    if let Ok(date) = NaiveDate::parse_from_str(s, DATE_FORMAT) {
        return Ok(format_date(date));
    }

    if let Some(rest) = s.strip_prefix(['+', '-'].as_ref()) {
        if let Some(unit_char) = rest.chars().last().filter(char::is_ascii_alphabetic) {
            let amount_str = &rest[..rest.len() - 1];
            if let Ok(amount) = amount_str.parse::<i64>() {
                let amount = if s.starts_with('-') { -amount } else { amount };
                let offset = match unit_char {
                    'd' => TimeDelta::try_days(amount),
                    'w' => TimeDelta::try_weeks(amount),
                    _ => {
                        return Err(invalid(
                            field_name,
                            format!("invalid unit '{unit_char}' (use d or w)"),
                        ));
                    }
                };
                return offset
                    .and_then(|offset| today.checked_add_signed(offset))
                    .map(format_date)
                    .ok_or_else(|| invalid(field_name, "offset out of range".to_string()));
            }
        }
    }

    let keyword_date = match s.to_lowercase().as_str() {
        "today" => Some(today),
        "tomorrow" => today.succ_opt(),
        "yesterday" => today.pred_opt(),
        _ => return Ok(s.to_string()),
    };

    keyword_date
        .map(format_date)
        .ok_or_else(|| invalid(field_name, "date out of range".to_string()))
}

fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

fn invalid(field_name: &str, reason: String) -> QueryError {
    QueryError::InvalidDate {
        field: field_name.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
    }

    fn normalize(s: &str) -> Result<String> {
        normalize_date_value_at(s, "Due date", today())
    }

    #[test]
    fn test_rfc3339_keeps_written_date() {
        assert_eq!(normalize("2025-03-01T23:30:00-05:00").unwrap(), "2025-03-01");
        assert_eq!(normalize("2025-03-01T00:00:00Z").unwrap(), "2025-03-01");
    }

    #[test]
    fn test_simple_date() {
        assert_eq!(normalize(" 2025-06-20 ").unwrap(), "2025-06-20");
    }

    #[test]
    fn test_relative_offsets() {
        assert_eq!(normalize("+3d").unwrap(), "2025-01-18");
        assert_eq!(normalize("-1w").unwrap(), "2025-01-08");
    }

    #[test]
    fn test_keywords() {
        assert_eq!(normalize("today").unwrap(), "2025-01-15");
        assert_eq!(normalize("Tomorrow").unwrap(), "2025-01-16");
        assert_eq!(normalize("yesterday").unwrap(), "2025-01-14");
    }

    #[test]
    fn test_partial_values_pass_through() {
        assert_eq!(normalize("2025-03").unwrap(), "2025-03");
        assert_eq!(normalize("-2025").unwrap(), "-2025");
    }

    #[test]
    fn test_invalid_unit_is_rejected() {
        let err = normalize("+3h").unwrap_err();
        assert!(matches!(err, QueryError::InvalidDate { .. }));
        assert!(err.to_string().contains("use d or w"));
    }

    #[test]
    fn test_overflowing_offset_is_rejected() {
        assert!(normalize("+99999999999w").is_err());
    }
}
