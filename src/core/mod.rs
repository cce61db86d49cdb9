//! Core business logic - framework-agnostic booking, billing and client operations.
//!
//! The store-level modules ([`appointment`], [`client`], [`finance`]) each wrap
//! one table. The workflow modules ([`booking`], [`cancellation`],
//! [`finalization`]) sequence several of those calls, one round-trip at a
//! time, and the read-side modules ([`dashboard`], [`revenue`], [`messaging`])
//! derive views from data already loaded.

use crate::errors::{Error, Result};

/// Appointment table operations
pub mod appointment;
/// Booking workflow (create or edit)
pub mod booking;
/// Cancellation workflow
pub mod cancellation;
/// Client table operations
pub mod client;
/// Listings, agenda filtering and KPI counts
pub mod dashboard;
/// Financial history table operations and debt settlement
pub mod finance;
/// Payment finalization workflow
pub mod finalization;
/// Client message and WhatsApp link composition
pub mod messaging;
/// Monthly revenue aggregation
pub mod revenue;

/// Rejects amounts that are negative, NaN or infinite.
pub fn ensure_valid_amount(amount: f64) -> Result<f64> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(amount)
}
