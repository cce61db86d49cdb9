//! Appointment entity - One booked slot on the active schedule.
//!
//! The client is referenced by `client_name`, not by id: the name is the join
//! key into the `clients` table. An appointment is deleted when it is cancelled
//! and also when it is finalized (its payment then lives on as a
//! [`super::financial_record`] row).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Appointment database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "appointments")]
pub struct Model {
    /// Unique identifier for the appointment
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Name of the client, matched against `clients.name`
    pub client_name: String,
    /// Contact phone as typed by the operator
    pub phone: String,
    /// Calendar day of the appointment
    pub date: Date,
    /// Start time of the appointment
    pub time: Time,
    /// Service label (e.g., "Volume Russo")
    pub service: String,
    /// Total price agreed for the service
    pub total_price: f64,
    /// Amount already paid towards `total_price`
    pub amount_paid: f64,
}

impl Model {
    /// Amount still owed on this appointment, never negative.
    #[must_use]
    pub fn pending_amount(&self) -> f64 {
        (self.total_price - self.amount_paid).max(0.0)
    }
}

/// Appointments have no foreign keys; clients are joined by name.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
