//! Entity module - Contains all SeaORM entity definitions for the database.
//! These entities represent the three record collections: the active schedule,
//! the client book, and the financial history.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod appointment;
pub mod client;
pub mod financial_record;

// Re-export specific types to avoid conflicts
pub use appointment::{
    Column as AppointmentColumn, Entity as Appointment, Model as AppointmentModel,
};
pub use client::{Column as ClientColumn, Entity as Client, Model as ClientModel};
pub use financial_record::{
    Column as FinancialRecordColumn, Entity as FinancialRecord, Model as FinancialRecordModel,
};
