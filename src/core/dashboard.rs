//! Dashboard views - listings of all three collections and the figures derived from them.
//!
//! [`load_listings`] is the only place where store calls run concurrently:
//! the three collections are independent, so they are fetched together.
//! Everything else in this module works on the loaded [`Listings`] in memory.

use crate::{
    core::{appointment, client, finance, revenue},
    entities::{appointment as appointment_entity, client as client_entity, financial_record},
    errors::Result,
};
use chrono::{Days, NaiveDate};
use sea_orm::DatabaseConnection;
use tracing::debug;

/// Number of days shown by the day strip unless asked otherwise.
pub const DEFAULT_STRIP_DAYS: u32 = 15;

/// Snapshot of the three collections as last loaded.
#[derive(Debug, Clone, Default)]
pub struct Listings {
    /// Active schedule, ordered by date then time
    pub appointments: Vec<appointment_entity::Model>,
    /// Client book, ordered by name
    pub clients: Vec<client_entity::Model>,
    /// Financial history, newest first
    pub records: Vec<financial_record::Model>,
}

/// One day in the day strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StripDay {
    /// The calendar day
    pub date: NaiveDate,
    /// How many appointments are booked on it
    pub appointment_count: usize,
}

impl StripDay {
    /// Whether anything is booked on this day.
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.appointment_count > 0
    }
}

/// Headline counters shown above the agenda.
#[derive(Debug, Clone, PartialEq)]
pub struct Kpis {
    /// Appointments on the selected day, or on the whole schedule
    pub appointment_count: usize,
    /// Number of clients in the book
    pub client_count: usize,
    /// Sum of `paid` across the financial history
    pub received_total: f64,
}

/// Fetches appointments, clients and financial records concurrently.
pub async fn load_listings(db: &DatabaseConnection) -> Result<Listings> {
    let (appointments, clients, records) = tokio::try_join!(
        appointment::list_appointments(db),
        client::list_clients(db),
        finance::list_records(db),
    )?;
    debug!(
        "Loaded {} appointment(s), {} client(s), {} record(s)",
        appointments.len(),
        clients.len(),
        records.len()
    );
    Ok(Listings {
        appointments,
        clients,
        records,
    })
}

/// Appointments on `selected`, or the whole schedule when no day is selected.
#[must_use]
pub fn agenda(
    appointments: &[appointment_entity::Model],
    selected: Option<NaiveDate>,
) -> Vec<&appointment_entity::Model> {
    appointments
        .iter()
        .filter(|a| selected.is_none_or(|day| a.date == day))
        .collect()
}

/// Builds `days` consecutive days starting `offset` days after `start`,
/// each tagged with its number of appointments.
///
/// # Arguments
/// * `appointments` - The loaded schedule
/// * `start` - Usually today
/// * `offset` - Days to shift the first day by; negative looks back
/// * `days` - Length of the strip
#[must_use]
pub fn day_strip(
    appointments: &[appointment_entity::Model],
    start: NaiveDate,
    offset: i64,
    days: u32,
) -> Vec<StripDay> {
    let Some(first) = shift(start, offset) else {
        return Vec::new();
    };

    (0..u64::from(days))
        .map_while(|i| first.checked_add_days(Days::new(i)))
        .map(|date| StripDay {
            date,
            appointment_count: appointments.iter().filter(|a| a.date == date).count(),
        })
        .collect()
}

fn shift(date: NaiveDate, offset: i64) -> Option<NaiveDate> {
    if offset >= 0 {
        date.checked_add_days(Days::new(offset.unsigned_abs()))
    } else {
        date.checked_sub_days(Days::new(offset.unsigned_abs()))
    }
}

/// Computes the headline counters for the current listings.
#[must_use]
pub fn kpis(listings: &Listings, selected: Option<NaiveDate>) -> Kpis {
    Kpis {
        appointment_count: agenda(&listings.appointments, selected).len(),
        client_count: listings.clients.len(),
        received_total: revenue::total_received(&listings.records),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    fn schedule() -> Vec<appointment_entity::Model> {
        let mut first = ana_appointment(1);
        first.date = date(2025, 3, 10);
        let mut second = ana_appointment(2);
        second.date = date(2025, 3, 10);
        second.time = time(16, 0);
        let mut third = ana_appointment(3);
        third.date = date(2025, 3, 12);
        vec![first, second, third]
    }

    #[test]
    fn test_agenda_filters_by_day() {
        let appointments = schedule();
        assert_eq!(agenda(&appointments, None).len(), 3);
        assert_eq!(agenda(&appointments, Some(date(2025, 3, 10))).len(), 2);
        assert!(agenda(&appointments, Some(date(2025, 3, 11))).is_empty());
    }

    #[test]
    fn test_day_strip_marks_busy_days() {
        let appointments = schedule();
        let strip = day_strip(&appointments, date(2025, 3, 9), 0, 5);

        assert_eq!(strip.len(), 5);
        assert_eq!(strip[0].date, date(2025, 3, 9));
        assert!(!strip[0].is_busy());
        assert_eq!(strip[1].appointment_count, 2);
        assert!(!strip[2].is_busy());
        assert_eq!(strip[3].appointment_count, 1);
    }

    #[test]
    fn test_day_strip_offset() {
        let strip = day_strip(&[], date(2025, 3, 10), -3, DEFAULT_STRIP_DAYS);
        assert_eq!(strip.len(), 15);
        assert_eq!(strip[0].date, date(2025, 3, 7));
        assert_eq!(strip[14].date, date(2025, 3, 21));

        let later = day_strip(&[], date(2025, 3, 10), 15, 1);
        assert_eq!(later[0].date, date(2025, 3, 25));
    }

    #[tokio::test]
    async fn test_load_listings_and_kpis() -> Result<()> {
        let db = setup_test_db().await?;
        book_ana(&db).await?;
        client::upsert_client_contact(&db, "Bruna", "+551111").await?;

        let listings = load_listings(&db).await?;
        assert_eq!(listings.appointments.len(), 1);
        assert_eq!(listings.clients.len(), 2);
        assert!(listings.records.is_empty());

        let all = kpis(&listings, None);
        assert_eq!(all.appointment_count, 1);
        assert_eq!(all.client_count, 2);
        assert_eq!(all.received_total, 0.0);

        let other_day = kpis(&listings, Some(date(2025, 3, 11)));
        assert_eq!(other_day.appointment_count, 0);
        Ok(())
    }
}
