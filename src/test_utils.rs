//! Shared test utilities for `AgendaBuddy`.
//!
//! This module provides common helper functions for setting up test databases
//! and building appointments, dates and booking requests with sensible defaults.

#![allow(clippy::unwrap_used)]

use crate::{
    core::{appointment::AppointmentFields, booking},
    entities::appointment,
    errors::Result,
};
use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::DatabaseConnection;

/// Creates an in-memory `SQLite` database with all tables initialized.
/// This is the standard setup for all integration tests.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Shorthand for a calendar date.
pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

/// Shorthand for a time of day.
pub fn time(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

/// Shorthand for a UTC instant on the hour.
pub fn instant(year: i32, month: u32, day: u32, hour: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, 0, 0).unwrap()
}

/// The "current day" used by booking tests.
pub fn today() -> NaiveDate {
    date(2025, 3, 1)
}

/// Appointment fields with default service and prices.
///
/// # Defaults
/// * phone: `"+550000"`
/// * service: `"Volume Russo"`
/// * `total_price`: 150.0, `amount_paid`: 0.0
pub fn test_fields(name: &str, day: NaiveDate, at: NaiveTime) -> AppointmentFields {
    AppointmentFields {
        client_name: name.to_string(),
        phone: "+550000".to_string(),
        date: day,
        time: at,
        service: "Volume Russo".to_string(),
        total_price: 150.0,
        amount_paid: 0.0,
    }
}

/// Booking request for Ana on 2025-03-10 at 14:00, billed 150, nothing paid.
pub fn ana_request() -> booking::BookingRequest {
    booking::BookingRequest {
        client_name: "Ana".to_string(),
        phone: "+550000".to_string(),
        date: Some(date(2025, 3, 10)),
        time: Some(time(14, 0)),
        service: "Volume Russo".to_string(),
        total_price: Some(150.0),
        amount_paid: Some(0.0),
        editing_id: None,
    }
}

/// In-memory appointment model matching [`ana_request`], for pure tests.
pub fn ana_appointment(id: i64) -> appointment::Model {
    appointment::Model {
        id,
        client_name: "Ana".to_string(),
        phone: "+550000".to_string(),
        date: date(2025, 3, 10),
        time: time(14, 0),
        service: "Volume Russo".to_string(),
        total_price: 150.0,
        amount_paid: 0.0,
    }
}

/// Books [`ana_request`] through the full workflow and returns the stored appointment.
pub async fn book_ana(db: &DatabaseConnection) -> Result<appointment::Model> {
    Ok(booking::book_appointment(db, ana_request(), today())
        .await?
        .appointment)
}
