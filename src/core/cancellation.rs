//! Cancellation workflow - remove an appointment and count it against the client.
//!
//! Two independent store calls: delete the appointment, then bump the client's
//! cancellation counter. There is no compensation: if the counter update
//! fails, the appointment is already gone.

use crate::{
    core::{
        appointment, client,
        dashboard::{self, Listings},
    },
    entities::{appointment as appointment_entity, client as client_entity},
    errors::Result,
};
use sea_orm::DatabaseConnection;
use tracing::{info, instrument};

/// Result of a successful cancellation.
#[derive(Debug, Clone)]
pub struct CancellationOutcome {
    /// The client after its counter was incremented
    pub client: client_entity::Model,
    /// Fresh listings of all three collections
    pub listings: Listings,
}

/// Cancels a loaded appointment: deletes it and increments the client's cancellation count.
///
/// A client that does not exist yet is created with a count of 1.
#[instrument(skip(db, appointment), fields(appointment_id = appointment.id))]
pub async fn cancel_appointment(
    db: &DatabaseConnection,
    appointment: &appointment_entity::Model,
) -> Result<CancellationOutcome> {
    appointment::delete_appointment(db, appointment.id).await?;
    let client = client::increment_cancellations(db, &appointment.client_name).await?;
    let listings = dashboard::load_listings(db).await?;

    info!(
        "Cancelled appointment {} for '{}' ({} cancellation(s) total)",
        appointment.id, client.name, client.cancellations
    );
    Ok(CancellationOutcome { client, listings })
}
