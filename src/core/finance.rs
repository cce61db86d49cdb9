//! Financial history operations - the permanent trail of finalized appointments.
//!
//! Records are inserted once by the finalization workflow and are never
//! deleted. Debt settlement is the only mutation: it raises `paid` to `billed`
//! and takes the settled amount off the client's outstanding balance.

use crate::{
    core::{client, revenue::MonthBucket},
    entities::{FinancialRecord, client as client_entity, financial_record},
    errors::{Error, Result},
};
use chrono::{DateTime, Utc};
use sea_orm::{QueryOrder, Set, SqlErr, prelude::*, sea_query::Expr};
use tracing::{info, warn};

/// Values for a new financial record.
#[derive(Debug, Clone, PartialEq)]
pub struct NewRecord {
    /// Appointment being closed out
    pub appointment_id: i64,
    /// Client name copied from the appointment
    pub client_name: String,
    /// Service label copied from the appointment
    pub service: String,
    /// Amount billed
    pub billed: f64,
    /// Amount paid
    pub paid: f64,
    /// Month bucket of the finalization
    pub month: MonthBucket,
    /// Finalization timestamp
    pub finalized_at: DateTime<Utc>,
}

/// Result of settling a record's outstanding debt.
#[derive(Debug, Clone)]
pub struct Settlement {
    /// The record after settlement
    pub record: financial_record::Model,
    /// Amount that was settled (0 if nothing was owed)
    pub settled: f64,
    /// The client after its balance was reduced, if the client still exists
    pub client: Option<client_entity::Model>,
}

/// Retrieves the full financial history, newest first.
pub async fn list_records(db: &DatabaseConnection) -> Result<Vec<financial_record::Model>> {
    FinancialRecord::find()
        .order_by_desc(financial_record::Column::FinalizedAt)
        .order_by_desc(financial_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the records of one month bucket, newest first.
pub async fn list_records_for_month(
    db: &DatabaseConnection,
    month: &MonthBucket,
) -> Result<Vec<financial_record::Model>> {
    FinancialRecord::find()
        .filter(financial_record::Column::Month.eq(month.to_string()))
        .order_by_desc(financial_record::Column::FinalizedAt)
        .order_by_desc(financial_record::Column::Id)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Retrieves the records that still carry a shortfall, oldest first.
pub async fn list_unsettled_records(
    db: &DatabaseConnection,
) -> Result<Vec<financial_record::Model>> {
    FinancialRecord::find()
        .filter(
            Expr::col(financial_record::Column::Billed)
                .gt(Expr::col(financial_record::Column::Paid)),
        )
        .order_by_asc(financial_record::Column::FinalizedAt)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds the record written for an appointment, if it was ever finalized.
pub async fn find_record_for_appointment(
    db: &DatabaseConnection,
    appointment_id: i64,
) -> Result<Option<financial_record::Model>> {
    FinancialRecord::find()
        .filter(financial_record::Column::AppointmentId.eq(appointment_id))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Finds a record by id.
pub async fn get_record_by_id(
    db: &DatabaseConnection,
    record_id: i64,
) -> Result<Option<financial_record::Model>> {
    FinancialRecord::find_by_id(record_id)
        .one(db)
        .await
        .map_err(Into::into)
}

/// Inserts a financial record and returns the stored row.
///
/// # Arguments
/// * `record` - Values for the new row
///
/// # Errors
/// Returns [`Error::AlreadyFinalized`] if a record for the same appointment
/// already exists; `appointment_id` is unique in the store.
pub async fn insert_record(
    db: &DatabaseConnection,
    record: NewRecord,
) -> Result<financial_record::Model> {
    let model = financial_record::ActiveModel {
        appointment_id: Set(record.appointment_id),
        client_name: Set(record.client_name),
        service: Set(record.service),
        billed: Set(record.billed),
        paid: Set(record.paid),
        month: Set(record.month.to_string()),
        finalized_at: Set(record.finalized_at),
        ..Default::default()
    };

    let appointment_id = record.appointment_id;
    let created = model.insert(db).await.map_err(|e| match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Error::AlreadyFinalized { appointment_id },
        _ => e.into(),
    })?;
    info!(
        "Created financial record {} for appointment {} ({}): billed={:.2}, paid={:.2}",
        created.id, created.appointment_id, created.month, created.billed, created.paid
    );
    Ok(created)
}

/// Settles the debt carried by a record: `paid` becomes `billed` and the
/// client's outstanding balance drops by the same shortfall.
///
/// A record with nothing owed is returned unchanged with `settled == 0`.
///
/// # Errors
/// Returns [`Error::RecordNotFound`] if the record does not exist.
pub async fn settle_record(db: &DatabaseConnection, record_id: i64) -> Result<Settlement> {
    let record = get_record_by_id(db, record_id)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    let shortfall = record.shortfall();
    if shortfall <= 0.0 {
        return Ok(Settlement {
            record,
            settled: 0.0,
            client: None,
        });
    }

    // Only the call that actually moves `paid` up to `billed` reduces the debt
    let result = FinancialRecord::update_many()
        .col_expr(
            financial_record::Column::Paid,
            Expr::col(financial_record::Column::Billed).into(),
        )
        .filter(financial_record::Column::Id.eq(record_id))
        .filter(
            Expr::col(financial_record::Column::Billed)
                .gt(Expr::col(financial_record::Column::Paid)),
        )
        .exec(db)
        .await?;

    let settled_record = get_record_by_id(db, record_id)
        .await?
        .ok_or(Error::RecordNotFound { id: record_id })?;

    if result.rows_affected == 0 {
        warn!("Record {} was settled by another request", record_id);
        return Ok(Settlement {
            record: settled_record,
            settled: 0.0,
            client: None,
        });
    }

    let client = client::reduce_debt(db, &settled_record.client_name, shortfall).await?;
    info!(
        "Settled record {} for '{}': {:.2}",
        record_id, settled_record.client_name, shortfall
    );

    Ok(Settlement {
        record: settled_record,
        settled: shortfall,
        client,
    })
}
