//! Revenue aggregation over the financial history.
//!
//! Everything here is derived from records already in memory: nothing is
//! stored, and totals are recomputed for each report. Records are grouped by
//! their `MM/YYYY` month bucket.

use crate::{
    entities::financial_record,
    errors::{Error, Result},
};
use chrono::Datelike;
use std::{fmt, str::FromStr};

/// A month key of the form `MM/YYYY`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthBucket {
    year: i32,
    month: u32,
}

impl MonthBucket {
    /// Builds a bucket, rejecting months outside 1..=12.
    pub fn new(month: u32, year: i32) -> Result<Self> {
        if !(1..=12).contains(&month) || !(1..=9999).contains(&year) {
            return Err(Error::InvalidMonth {
                value: format!("{month}/{year}"),
            });
        }
        Ok(Self { year, month })
    }

    /// The bucket a calendar date falls in.
    #[must_use]
    pub fn of<D: Datelike>(date: &D) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The bucket immediately before this one.
    #[must_use]
    pub const fn previous(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }
}

impl fmt::Display for MonthBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}/{:04}", self.month, self.year)
    }
}

impl FromStr for MonthBucket {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::InvalidMonth {
            value: s.to_string(),
        };
        let (month, year) = s.trim().split_once('/').ok_or_else(invalid)?;
        let all_digits = |part: &str| !part.is_empty() && part.bytes().all(|b| b.is_ascii_digit());
        if year.len() != 4 || !all_digits(month) || !all_digits(year) {
            return Err(invalid());
        }
        let month: u32 = month.parse().map_err(|_| invalid())?;
        let year: i32 = year.parse().map_err(|_| invalid())?;
        Self::new(month, year).map_err(|_| invalid())
    }
}

/// Picks the month to report on: the operator's filter if given, otherwise the month of `today`.
pub fn resolve_month<D: Datelike>(filter: Option<&str>, today: &D) -> Result<MonthBucket> {
    match filter.map(str::trim).filter(|f| !f.is_empty()) {
        Some(value) => value.parse(),
        None => Ok(MonthBucket::of(today)),
    }
}

/// Revenue figures for one month bucket.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueSummary {
    /// The month reported on
    pub month: MonthBucket,
    /// Sum of `paid` over the month's records
    pub received: f64,
    /// Sum of unpaid amounts over the month's records
    pub pending: f64,
    /// Sum of `paid` over the previous month's records
    pub previous_received: f64,
    /// Month-over-month change of `received`, in percent; `None` when the
    /// previous month received nothing
    pub change_percent: Option<f64>,
    /// Number of records in the month
    pub record_count: usize,
}

/// Sums received and pending amounts for `month` and compares with the month before.
#[must_use]
pub fn summarize(records: &[financial_record::Model], month: MonthBucket) -> RevenueSummary {
    let current_key = month.to_string();
    let previous_key = month.previous().to_string();

    let mut received = 0.0;
    let mut pending = 0.0;
    let mut previous_received = 0.0;
    let mut record_count = 0;

    for record in records {
        if record.month == current_key {
            received += record.paid;
            pending += record.shortfall();
            record_count += 1;
        } else if record.month == previous_key {
            previous_received += record.paid;
        }
    }

    let change_percent = (previous_received > 0.0)
        .then(|| (received - previous_received) * 100.0 / previous_received);

    RevenueSummary {
        month,
        received,
        pending,
        previous_received,
        change_percent,
        record_count,
    }
}

/// Sums `paid` across every month; the all-time figure shown on the dashboard.
#[must_use]
pub fn total_received(records: &[financial_record::Model]) -> f64 {
    records.iter().map(|r| r.paid).sum()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn record(month: &str, billed: f64, paid: f64) -> financial_record::Model {
        financial_record::Model {
            id: 0,
            appointment_id: 0,
            client_name: "Ana".to_string(),
            service: "Volume Russo".to_string(),
            billed,
            paid,
            month: month.to_string(),
            finalized_at: instant(2025, 3, 15, 12),
        }
    }

    #[test]
    fn test_month_bucket_format_and_parse() {
        let bucket: MonthBucket = "03/2025".parse().unwrap();
        assert_eq!(bucket, MonthBucket::new(3, 2025).unwrap());
        assert_eq!(bucket.to_string(), "03/2025");
        assert_eq!("3/2025".parse::<MonthBucket>().unwrap(), bucket);
        assert_eq!(MonthBucket::of(&date(2025, 12, 31)).to_string(), "12/2025");
    }

    #[test]
    fn test_month_bucket_rejects_garbage() {
        for bad in [
            "",
            "2025-03",
            "13/2025",
            "00/2025",
            "03/25",
            "ab/2025",
            "03/+202",
            "+3/2025",
            "03/ 202",
        ] {
            assert!(
                matches!(bad.parse::<MonthBucket>(), Err(Error::InvalidMonth { .. })),
                "{bad} should not parse"
            );
        }
    }

    #[test]
    fn test_previous_wraps_year() {
        let january = MonthBucket::new(1, 2025).unwrap();
        assert_eq!(january.previous().to_string(), "12/2024");
        assert_eq!(
            MonthBucket::new(7, 2025).unwrap().previous().to_string(),
            "06/2025"
        );
    }

    #[test]
    fn test_resolve_month() {
        let today = date(2025, 3, 10);
        assert_eq!(resolve_month(None, &today).unwrap().to_string(), "03/2025");
        assert_eq!(
            resolve_month(Some("  "), &today).unwrap().to_string(),
            "03/2025"
        );
        assert_eq!(
            resolve_month(Some("01/2024"), &today).unwrap().to_string(),
            "01/2024"
        );
        assert!(resolve_month(Some("janeiro"), &today).is_err());
    }

    #[test]
    fn test_summarize_current_and_previous_month() {
        let records = vec![
            record("03/2025", 150.0, 100.0),
            record("03/2025", 80.0, 120.0),
            record("02/2025", 200.0, 200.0),
            record("01/2025", 500.0, 500.0),
        ];

        let summary = summarize(&records, MonthBucket::new(3, 2025).unwrap());
        assert_eq!(summary.received, 220.0);
        // Overpayment does not offset another record's shortfall
        assert_eq!(summary.pending, 50.0);
        assert_eq!(summary.previous_received, 200.0);
        assert_eq!(summary.change_percent, Some(10.0));
        assert_eq!(summary.record_count, 2);
    }

    #[test]
    fn test_summarize_without_previous_month() {
        let records = vec![record("03/2025", 150.0, 150.0)];
        let summary = summarize(&records, MonthBucket::new(3, 2025).unwrap());
        assert_eq!(summary.change_percent, None);

        let empty = summarize(&[], MonthBucket::new(3, 2025).unwrap());
        assert_eq!(empty.received, 0.0);
        assert_eq!(empty.pending, 0.0);
        assert_eq!(empty.record_count, 0);
    }

    #[test]
    fn test_total_received() {
        let records = vec![record("03/2025", 150.0, 100.0), record("02/2025", 50.0, 50.0)];
        assert_eq!(total_received(&records), 150.0);
    }
}
