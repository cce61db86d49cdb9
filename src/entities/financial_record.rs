//! Financial record entity - The permanent trail left by a finalized appointment.
//!
//! Written once when an appointment is finalized. The only later mutation is a
//! debt settlement raising `paid` to `billed`.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Financial record database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "financial_records")]
pub struct Model {
    /// Unique identifier for the record
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Id of the appointment this record closed out (the row itself is gone).
    /// Unique: an appointment is finalized at most once.
    #[sea_orm(unique)]
    pub appointment_id: i64,
    /// Client name copied from the appointment
    pub client_name: String,
    /// Service label copied from the appointment
    pub service: String,
    /// Amount billed at finalization
    pub billed: f64,
    /// Amount paid at finalization (or later, on settlement)
    pub paid: f64,
    /// Month bucket, formatted `MM/YYYY`
    pub month: String,
    /// When the appointment was finalized
    pub finalized_at: DateTimeUtc,
}

impl Model {
    /// Unpaid part of this record, never negative.
    #[must_use]
    pub fn shortfall(&self) -> f64 {
        (self.billed - self.paid).max(0.0)
    }
}

/// Records keep the appointment id as a plain value; the appointment is deleted.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
