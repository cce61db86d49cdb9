//! Booking workflow - create or edit an appointment and refresh the client's contact.
//!
//! A booking runs in three phases:
//! 1. [`prepare_booking`] validates the request without touching the store.
//! 2. [`check_slot`] reads the slot and rejects it if another appointment holds it.
//! 3. [`commit_booking`] writes the appointment, then upserts the client by name.
//!
//! The slot check and the write are separate round-trips and the store has no
//! `(date, time)` constraint, so two bookings that both pass [`check_slot`]
//! before either commits will both be written. The two writes in the commit
//! phase are not wrapped in a transaction either: if the client upsert fails,
//! the appointment stays written.

use crate::{
    config::settings::DEFAULT_SERVICE,
    core::{
        appointment::{self, AppointmentFields},
        client,
        dashboard::{self, Listings},
        ensure_valid_amount,
    },
    entities::{appointment as appointment_entity, client as client_entity},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::DatabaseConnection;
use tracing::{debug, info, instrument, warn};

/// What the operator submitted on the booking form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingRequest {
    /// Client name; required
    pub client_name: String,
    /// Contact phone
    pub phone: String,
    /// Day of the appointment; required
    pub date: Option<NaiveDate>,
    /// Start time; required
    pub time: Option<NaiveTime>,
    /// Service label; the default service when blank
    pub service: String,
    /// Total price, 0 when omitted
    pub total_price: Option<f64>,
    /// Amount paid, 0 when omitted
    pub amount_paid: Option<f64>,
    /// Id of the appointment being edited; `None` books a new one
    pub editing_id: Option<i64>,
}

/// A request that passed validation and is ready to be checked and written.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedBooking {
    /// Normalized field values
    pub fields: AppointmentFields,
    /// Id of the appointment being edited, if any
    pub editing_id: Option<i64>,
}

/// Result of a successful booking.
#[derive(Debug, Clone)]
pub struct BookingOutcome {
    /// The appointment as stored
    pub appointment: appointment_entity::Model,
    /// The client after its contact was refreshed
    pub client: client_entity::Model,
    /// Whether an existing appointment was edited rather than created
    pub edited: bool,
    /// Fresh listings of all three collections
    pub listings: Listings,
}

/// Validates a booking request against `today` without any store access.
///
/// Checks run in a fixed order: a new booking dated before `today` is rejected
/// first, then missing name, date or time, then invalid amounts.
pub fn prepare_booking(request: BookingRequest, today: NaiveDate) -> Result<PreparedBooking> {
    if request.editing_id.is_none() {
        if let Some(date) = request.date {
            if date < today {
                return Err(Error::PastDate { date });
            }
        }
    }

    let client_name = request.client_name.trim().to_string();
    let (Some(date), Some(time)) = (request.date, request.time) else {
        return Err(Error::Validation {
            message: "Client name, date and time are required".to_string(),
        });
    };
    if client_name.is_empty() {
        return Err(Error::Validation {
            message: "Client name, date and time are required".to_string(),
        });
    }

    let total_price = request.total_price.unwrap_or(0.0);
    let amount_paid = request.amount_paid.unwrap_or(0.0);
    ensure_valid_amount(total_price)?;
    ensure_valid_amount(amount_paid)?;

    let service = match request.service.trim() {
        "" => DEFAULT_SERVICE.to_string(),
        label => label.to_string(),
    };

    Ok(PreparedBooking {
        fields: AppointmentFields {
            client_name,
            phone: request.phone.trim().to_string(),
            date,
            time,
            service,
            total_price,
            amount_paid,
        },
        editing_id: request.editing_id,
    })
}

/// Rejects the booking if a different appointment already holds its slot.
///
/// An edit that keeps its own slot passes.
pub async fn check_slot(db: &DatabaseConnection, booking: &PreparedBooking) -> Result<()> {
    let occupant =
        appointment::find_slot_occupant(db, booking.fields.date, booking.fields.time).await?;

    match occupant {
        Some(existing) if Some(existing.id) != booking.editing_id => {
            warn!(
                "Slot {} {} already taken by '{}' (appointment {})",
                existing.date, existing.time, existing.client_name, existing.id
            );
            Err(Error::SlotTaken {
                date: existing.date,
                time: existing.time,
                client_name: existing.client_name,
            })
        }
        _ => Ok(()),
    }
}

/// Writes the appointment (insert or update by id), then upserts the client by name.
pub async fn commit_booking(
    db: &DatabaseConnection,
    booking: PreparedBooking,
) -> Result<BookingOutcome> {
    let name = booking.fields.client_name.clone();
    let phone = booking.fields.phone.clone();

    let (stored, edited) = match booking.editing_id {
        Some(id) => (
            appointment::update_appointment(db, id, booking.fields).await?,
            true,
        ),
        None => (appointment::insert_appointment(db, booking.fields).await?, false),
    };

    let client = client::upsert_client_contact(db, &name, &phone).await?;
    let listings = dashboard::load_listings(db).await?;

    Ok(BookingOutcome {
        appointment: stored,
        client,
        edited,
        listings,
    })
}

/// Books a new appointment or edits an existing one.
///
/// `today` is the operator's local calendar day; new bookings before it are rejected.
#[instrument(skip(db))]
pub async fn book_appointment(
    db: &DatabaseConnection,
    request: BookingRequest,
    today: NaiveDate,
) -> Result<BookingOutcome> {
    let booking = prepare_booking(request, today)?;
    check_and_commit(db, booking).await
}

/// Like [`book_appointment`], but a blank phone is filled from the client book.
///
/// The request is fully validated before the client lookup, so a rejected
/// form never reaches the store.
///
/// # Arguments
/// * `request` - The submitted form; `phone` may be blank
/// * `today` - The operator's local calendar day
#[instrument(skip(db))]
pub async fn book_with_known_phone(
    db: &DatabaseConnection,
    request: BookingRequest,
    today: NaiveDate,
) -> Result<BookingOutcome> {
    let mut booking = prepare_booking(request, today)?;
    if booking.fields.phone.is_empty() {
        if let Some(phone) = client::known_phone(db, &booking.fields.client_name).await? {
            debug!("Reusing stored phone for '{}'", booking.fields.client_name);
            booking.fields.phone = phone;
        }
    }
    check_and_commit(db, booking).await
}

async fn check_and_commit(
    db: &DatabaseConnection,
    booking: PreparedBooking,
) -> Result<BookingOutcome> {
    check_slot(db, &booking).await?;
    let outcome = commit_booking(db, booking).await?;

    info!(
        "{} appointment {} for '{}' on {} at {}",
        if outcome.edited { "Edited" } else { "Booked" },
        outcome.appointment.id,
        outcome.appointment.client_name,
        outcome.appointment.date,
        outcome.appointment.time
    );
    Ok(outcome)
}
