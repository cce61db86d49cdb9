//! Payment finalization workflow - close out an appointment into financial history.
//!
//! Finalizing takes the billed and paid amounts entered at checkout (they
//! override whatever the appointment itself carried) and runs, in order:
//! 1. refuse if a financial record already references the appointment,
//! 2. insert the financial record for the current month bucket,
//! 3. add any shortfall to the client's outstanding balance,
//! 4. delete the appointment from the schedule.
//!
//! The steps are sequential store calls with no transaction around them. A
//! failure part-way leaves the earlier steps applied; the guard in step 1 is
//! what stops a retry from writing a second record. Two finalizations racing
//! past step 1 are stopped at step 2 by the unique `appointment_id` column,
//! before the loser touches the client's balance.

use crate::{
    core::{
        appointment, client,
        dashboard::{self, Listings},
        ensure_valid_amount,
        finance::{self, NewRecord},
        revenue::MonthBucket,
    },
    entities::{appointment as appointment_entity, client as client_entity, financial_record},
    errors::{Error, Result},
};
use chrono::{DateTime, Local, Utc};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument, warn};

/// Result of a successful finalization.
#[derive(Debug, Clone)]
pub struct FinalizationOutcome {
    /// The financial record written for the appointment
    pub record: financial_record::Model,
    /// Amount added to the client's debt (0 when fully paid)
    pub shortfall: f64,
    /// The client after its debt was increased, when there was a shortfall
    pub client: Option<client_entity::Model>,
    /// Fresh listings of all three collections
    pub listings: Listings,
}

/// Finalizes a loaded appointment with the amounts entered at checkout.
///
/// `finalized_at` is stamped on the record; its local calendar month picks the bucket.
///
/// # Arguments
/// * `appointment` - The appointment as loaded from the schedule
/// * `billed` - Amount billed at checkout, overriding the stored total
/// * `paid` - Amount paid at checkout, overriding the stored paid amount
/// * `finalized_at` - Finalization instant
///
/// # Errors
/// * [`Error::InvalidAmount`] before any store call if an amount is negative or not finite.
/// * [`Error::AlreadyFinalized`] if a record already references this appointment,
///   whether found by the guard or rejected by the store on insert.
/// * Any store error, with earlier steps left applied.
#[instrument(skip(db, appointment), fields(appointment_id = appointment.id))]
pub async fn finalize_appointment(
    db: &DatabaseConnection,
    appointment: &appointment_entity::Model,
    billed: f64,
    paid: f64,
    finalized_at: DateTime<Utc>,
) -> Result<FinalizationOutcome> {
    ensure_valid_amount(billed)?;
    ensure_valid_amount(paid)?;

    if let Some(existing) = finance::find_record_for_appointment(db, appointment.id).await? {
        warn!(
            "Appointment {} already finalized as record {}",
            appointment.id, existing.id
        );
        return Err(Error::AlreadyFinalized {
            appointment_id: appointment.id,
        });
    }

    let month = MonthBucket::of(&finalized_at.with_timezone(&Local));
    let record = finance::insert_record(
        db,
        NewRecord {
            appointment_id: appointment.id,
            client_name: appointment.client_name.clone(),
            service: appointment.service.clone(),
            billed,
            paid,
            month,
            finalized_at,
        },
    )
    .await?;

    let shortfall = record.shortfall();
    let client = if shortfall > 0.0 {
        Some(client::add_debt(db, &appointment.client_name, shortfall).await?)
    } else {
        None
    };

    appointment::delete_appointment(db, appointment.id).await?;
    let listings = dashboard::load_listings(db).await?;

    info!(
        "Finalized appointment {} for '{}' in {}: billed={:.2}, paid={:.2}, shortfall={:.2}",
        appointment.id, appointment.client_name, month, billed, paid, shortfall
    );
    Ok(FinalizationOutcome {
        record,
        shortfall,
        client,
        listings,
    })
}
