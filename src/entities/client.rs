//! Client entity - Contact details plus running debt and cancellation counters.
//!
//! `name` is unique and acts as the natural key for upserts. Two people with
//! the same name are the same client as far as the store is concerned.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Client database model
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "clients")]
pub struct Model {
    /// Unique identifier for the client
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Display name, also the upsert key
    #[sea_orm(unique)]
    pub name: String,
    /// Contact phone, refreshed on every booking
    pub phone: String,
    /// Accumulated unpaid amount across finalized appointments
    pub outstanding_balance: f64,
    /// Number of appointments this client has cancelled
    pub cancellations: i32,
}

/// Clients are referenced by name only.
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
