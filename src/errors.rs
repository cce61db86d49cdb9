//! Unified error type for the booking, billing and client workflows.
//!
//! Every failure, whether a rejected form, an occupied slot or a store error,
//! is reported through [`Error`]. The bot layer shows its `Display` text to the
//! operator as-is, so messages are written for a human reader.

use chrono::{NaiveDate, NaiveTime};
use sea_orm::DbErr;
use thiserror::Error;

/// All errors produced by `AgendaBuddy`.
#[derive(Debug, Error)]
pub enum Error {
    /// A required field was missing or malformed.
    #[error("Invalid input: {message}")]
    Validation {
        /// Human-readable description of the problem
        message: String,
    },

    /// A new booking targeted a day that has already passed.
    #[error("Cannot book an appointment on {date}: that date has already passed")]
    PastDate {
        /// The rejected date
        date: NaiveDate,
    },

    /// The (date, time) slot already holds a different appointment.
    #[error("The slot {date} {time} is already taken by {client_name}")]
    SlotTaken {
        /// Date of the occupied slot
        date: NaiveDate,
        /// Time of the occupied slot
        time: NaiveTime,
        /// Client currently holding the slot
        client_name: String,
    },

    /// A financial record already exists for this appointment.
    #[error("Appointment {appointment_id} has already been finalized")]
    AlreadyFinalized {
        /// The appointment that was already closed out
        appointment_id: i64,
    },

    /// No appointment with this id exists.
    #[error("Appointment {id} not found")]
    AppointmentNotFound {
        /// The missing appointment id
        id: i64,
    },

    /// No client matches the given id or name.
    #[error("Client '{key}' not found")]
    ClientNotFound {
        /// Id or name used for the lookup
        key: String,
    },

    /// No financial record with this id exists.
    #[error("Financial record {id} not found")]
    RecordNotFound {
        /// The missing record id
        id: i64,
    },

    /// A monetary amount was negative, NaN or infinite.
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: f64,
    },

    /// A month filter was not of the form `MM/YYYY`.
    #[error("Invalid month '{value}': expected MM/YYYY")]
    InvalidMonth {
        /// The rejected filter string
        value: String,
    },

    /// Configuration could not be loaded.
    #[error("Configuration error: {message}")]
    Config {
        /// Description of the configuration problem
        message: String,
    },

    /// The store rejected or failed a request.
    #[error("Database error: {0}")]
    Database(#[from] DbErr),

    /// A required environment variable was missing.
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// Building a reply string failed.
    #[error("Formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    /// Discord gateway or HTTP failure.
    #[error("Discord error: {0}")]
    Discord(Box<poise::serenity_prelude::Error>),
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Discord(Box::new(value))
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;
