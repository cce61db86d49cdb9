//! Discord command implementations organized by category.

#![allow(clippy::too_long_first_doc_paragraph)]

use crate::errors::{Error, Result};
use chrono::{NaiveDate, NaiveTime};

/// Client book commands
pub mod clients;

/// Financial history and revenue commands
pub mod finance;

/// General utility commands
pub mod general;

/// Appointment scheduling commands
pub mod schedule;

// Export commands
pub use clients::*;
pub use finance::*;
pub use general::*;
pub use schedule::*;

/// Discord rejects messages longer than this many characters.
pub(crate) const MESSAGE_LIMIT: usize = 1900;

/// Parses a date typed as `YYYY-MM-DD` or `DD/MM/YYYY`.
pub(crate) fn parse_date(input: &str) -> Result<NaiveDate> {
    let input = input.trim();
    NaiveDate::parse_from_str(input, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(input, "%d/%m/%Y"))
        .map_err(|_| Error::Validation {
            message: format!("'{input}' is not a date (use YYYY-MM-DD or DD/MM/YYYY)"),
        })
}

/// Parses a time typed as `HH:MM` or `HH:MM:SS`.
pub(crate) fn parse_time(input: &str) -> Result<NaiveTime> {
    let input = input.trim();
    NaiveTime::parse_from_str(input, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(input, "%H:%M:%S"))
        .map_err(|_| Error::Validation {
            message: format!("'{input}' is not a time (use HH:MM)"),
        })
}

/// Appends lines to a reply until the Discord length limit, then notes how many were left out.
pub(crate) fn join_lines_capped<I>(header: String, lines: I) -> String
where
    I: IntoIterator<Item = String>,
{
    let mut reply = header;
    let mut lines = lines.into_iter();
    let mut omitted = 0;

    for line in lines.by_ref() {
        if reply.len() + line.len() + 1 > MESSAGE_LIMIT {
            omitted = 1;
            break;
        }
        reply.push('\n');
        reply.push_str(&line);
    }
    omitted += lines.count();
    if omitted > 0 {
        reply.push_str(&format!("\n…and {omitted} more"));
    }
    reply
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 10).unwrap();
        assert_eq!(parse_date("2025-03-10").unwrap(), expected);
        assert_eq!(parse_date(" 10/03/2025 ").unwrap(), expected);
        assert!(matches!(
            parse_date("10 March"),
            Err(Error::Validation { .. })
        ));
    }

    #[test]
    fn test_parse_time_formats() {
        let expected = NaiveTime::from_hms_opt(14, 0, 0).unwrap();
        assert_eq!(parse_time("14:00").unwrap(), expected);
        assert_eq!(parse_time("14:00:00").unwrap(), expected);
        assert!(parse_time("2pm").is_err());
    }

    #[test]
    fn test_join_lines_capped() {
        let short = join_lines_capped("Header".to_string(), vec!["a".to_string()]);
        assert_eq!(short, "Header\na");

        let long_lines = (0..500).map(|i| format!("line number {i:03}"));
        let capped = join_lines_capped("Header".to_string(), long_lines);
        assert!(capped.len() < MESSAGE_LIMIT + 30);
        assert!(capped.ends_with("more"));
    }
}
