//! Appointment store operations - point reads and writes on the active schedule.
//!
//! These are the building blocks the booking, cancellation and finalization
//! workflows sequence together. Each function is a single store round-trip
//! (or a write followed by a read-back) with no business rules of its own,
//! except for amount validation on payment updates.

use crate::{
    core::ensure_valid_amount,
    entities::{Appointment, appointment},
    errors::{Error, Result},
};
use chrono::{NaiveDate, NaiveTime};
use sea_orm::{ActiveValue::Unchanged, QueryOrder, Set, prelude::*};
use tracing::{debug, info};

/// Field values written when an appointment is created or edited.
#[derive(Debug, Clone, PartialEq)]
pub struct AppointmentFields {
    /// Client name, already trimmed
    pub client_name: String,
    /// Contact phone
    pub phone: String,
    /// Calendar day of the slot
    pub date: NaiveDate,
    /// Start time of the slot
    pub time: NaiveTime,
    /// Service label
    pub service: String,
    /// Total price
    pub total_price: f64,
    /// Amount already paid
    pub amount_paid: f64,
}

impl AppointmentFields {
    fn into_active_model(self) -> appointment::ActiveModel {
        appointment::ActiveModel {
            client_name: Set(self.client_name),
            phone: Set(self.phone),
            date: Set(self.date),
            time: Set(self.time),
            service: Set(self.service),
            total_price: Set(self.total_price),
            amount_paid: Set(self.amount_paid),
            ..Default::default()
        }
    }
}

/// Retrieves every appointment on the schedule, ordered by date then time.
pub async fn list_appointments(db: &DatabaseConnection) -> Result<Vec<appointment::Model>> {
    Appointment::find()
        .order_by_asc(appointment::Column::Date)
        .order_by_asc(appointment::Column::Time)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the appointments booked on a single day, ordered by time.
pub async fn list_appointments_on(
    db: &DatabaseConnection,
    date: NaiveDate,
) -> Result<Vec<appointment::Model>> {
    Appointment::find()
        .filter(appointment::Column::Date.eq(date))
        .order_by_asc(appointment::Column::Time)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds an appointment by its id.
pub async fn get_appointment_by_id(
    db: &DatabaseConnection,
    appointment_id: i64,
) -> Result<Option<appointment::Model>> {
    Appointment::find_by_id(appointment_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds the appointment currently occupying the `(date, time)` slot, if any.
///
/// Slots are not unique at the store level, so more than one row may match
/// after a lost race; the lowest id is returned in that case.
pub async fn find_slot_occupant(
    db: &DatabaseConnection,
    date: NaiveDate,
    time: NaiveTime,
) -> Result<Option<appointment::Model>> {
    Appointment::find()
        .filter(appointment::Column::Date.eq(date))
        .filter(appointment::Column::Time.eq(time))
        .order_by_asc(appointment::Column::Id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a new appointment and returns the stored row.
pub async fn insert_appointment(
    db: &DatabaseConnection,
    fields: AppointmentFields,
) -> Result<appointment::Model> {
    let created = fields.into_active_model().insert(db).await?;
    info!(
        "Created appointment {} for '{}' on {} at {}",
        created.id, created.client_name, created.date, created.time
    );
    Ok(created)
}

/// Overwrites every field of an existing appointment by id.
///
/// # Errors
/// Returns [`Error::AppointmentNotFound`] if no row has this id.
pub async fn update_appointment(
    db: &DatabaseConnection,
    appointment_id: i64,
    fields: AppointmentFields,
) -> Result<appointment::Model> {
    let mut model = fields.into_active_model();
    model.id = Unchanged(appointment_id);

    let updated = model.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => Error::AppointmentNotFound { id: appointment_id },
        other => other.into(),
    })?;
    info!("Updated appointment {}", updated.id);
    Ok(updated)
}

/// Deletes an appointment by id.
///
/// # Errors
/// Returns [`Error::AppointmentNotFound`] if nothing was deleted.
pub async fn delete_appointment(db: &DatabaseConnection, appointment_id: i64) -> Result<()> {
    let result = Appointment::delete_by_id(appointment_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::AppointmentNotFound { id: appointment_id });
    }
    debug!("Deleted appointment {}", appointment_id);
    Ok(())
}

/// Records billed and paid amounts on a scheduled appointment without finalizing it.
///
/// This is the quick payment panel: the appointment stays on the schedule and
/// no financial record is written.
///
/// # Arguments
/// * `appointment_id` - The appointment to update
/// * `total_price` - New total price
/// * `amount_paid` - New amount paid so far
pub async fn record_payment(
    db: &DatabaseConnection,
    appointment_id: i64,
    total_price: f64,
    amount_paid: f64,
) -> Result<appointment::Model> {
    ensure_valid_amount(total_price)?;
    ensure_valid_amount(amount_paid)?;

    let model = appointment::ActiveModel {
        id: Unchanged(appointment_id),
        total_price: Set(total_price),
        amount_paid: Set(amount_paid),
        ..Default::default()
    };

    let updated = model.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => Error::AppointmentNotFound { id: appointment_id },
        other => other.into(),
    })?;
    info!(
        "Recorded payment on appointment {}: total={:.2}, paid={:.2}",
        appointment_id, total_price, amount_paid
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;
    use sea_orm::{DatabaseBackend, MockDatabase};

    #[tokio::test]
    async fn test_list_appointments_ordered_by_date_then_time() -> Result<()> {
        let db = setup_test_db().await?;
        insert_appointment(&db, test_fields("Carla", date(2025, 3, 11), time(9, 0))).await?;
        insert_appointment(&db, test_fields("Bruna", date(2025, 3, 10), time(16, 0))).await?;
        insert_appointment(&db, test_fields("Ana", date(2025, 3, 10), time(14, 0))).await?;

        let names: Vec<String> = list_appointments(&db)
            .await?
            .into_iter()
            .map(|a| a.client_name)
            .collect();
        assert_eq!(names, vec!["Ana", "Bruna", "Carla"]);

        let on_tenth = list_appointments_on(&db, date(2025, 3, 10)).await?;
        assert_eq!(on_tenth.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_find_slot_occupant() -> Result<()> {
        let db = setup_test_db().await?;
        let ana =
            insert_appointment(&db, test_fields("Ana", date(2025, 3, 10), time(14, 0))).await?;

        let found = find_slot_occupant(&db, date(2025, 3, 10), time(14, 0)).await?;
        assert_eq!(found, Some(ana));

        let free = find_slot_occupant(&db, date(2025, 3, 10), time(15, 0)).await?;
        assert!(free.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_missing_appointment() -> Result<()> {
        let db = setup_test_db().await?;
        let result =
            update_appointment(&db, 42, test_fields("Ana", date(2025, 3, 10), time(14, 0))).await;
        assert!(matches!(result, Err(Error::AppointmentNotFound { id: 42 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_appointment() -> Result<()> {
        let db = setup_test_db().await?;
        let result = delete_appointment(&db, 7).await;
        assert!(matches!(result, Err(Error::AppointmentNotFound { id: 7 })));
        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_keeps_appointment_scheduled() -> Result<()> {
        let db = setup_test_db().await?;
        let appt =
            insert_appointment(&db, test_fields("Ana", date(2025, 3, 10), time(14, 0))).await?;

        let updated = record_payment(&db, appt.id, 150.0, 60.0).await?;
        assert_eq!(updated.total_price, 150.0);
        assert_eq!(updated.amount_paid, 60.0);
        assert_eq!(updated.pending_amount(), 90.0);
        assert_eq!(updated.client_name, "Ana");

        let stored = get_appointment_by_id(&db, appt.id).await?.unwrap();
        assert_eq!(stored, updated);
        Ok(())
    }

    #[tokio::test]
    async fn test_record_payment_rejects_bad_amounts() -> Result<()> {
        let db = MockDatabase::new(DatabaseBackend::Sqlite).into_connection();

        let result = record_payment(&db, 1, -5.0, 0.0).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        let result = record_payment(&db, 1, 10.0, f64::NAN).await;
        assert!(matches!(result, Err(Error::InvalidAmount { .. })));

        assert!(db.into_transaction_log().is_empty());
        Ok(())
    }
}
