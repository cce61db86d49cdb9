//! Database configuration module for `AgendaBuddy`.
//!
//! This module handles the database connection and table creation using `SeaORM`.
//! Tables are generated from the entity definitions with
//! `Schema::create_table_from_entity`, so the schema always matches the Rust structs.
//! Two uniqueness constraints exist: `clients.name`, which the upserts rely on,
//! and `financial_records.appointment_id`, which stops a second finalization.
//! Appointment slots are deliberately left without a `(date, time)` constraint.

use crate::entities::{Appointment, Client, FinancialRecord};
use crate::errors::{Error, Result};
use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use std::path::Path;
use tracing::info;

const DEFAULT_DATABASE_URL: &str = "sqlite://data/agenda_buddy.sqlite?mode=rwc";

/// Gets the database URL from the `DATABASE_URL` environment variable,
/// falling back to a local `SQLite` file.
#[must_use]
pub fn get_database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}

/// Establishes a connection to the database named by [`get_database_url`].
pub async fn create_connection() -> Result<DatabaseConnection> {
    let database_url = get_database_url();
    ensure_sqlite_dir(&database_url)?;
    info!("Connecting to database at {}", database_url);
    Database::connect(&database_url).await.map_err(Into::into)
}

/// Creates the parent directory of a file-backed `SQLite` URL; `SQLite` only creates the file.
fn ensure_sqlite_dir(database_url: &str) -> Result<()> {
    let Some(rest) = database_url.strip_prefix("sqlite://") else {
        return Ok(());
    };
    let file = rest.split('?').next().unwrap_or_default();
    if let Some(parent) = Path::new(file).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).map_err(|e| Error::Config {
                message: format!("Cannot create database directory {parent:?}: {e}"),
            })?;
        }
    }
    Ok(())
}

/// Creates the appointments, clients and financial records tables if they are missing.
pub async fn create_tables<C>(db: &C) -> Result<()>
where
    C: ConnectionTrait,
{
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut appointment_table = schema.create_table_from_entity(Appointment);
    let mut client_table = schema.create_table_from_entity(Client);
    let mut record_table = schema.create_table_from_entity(FinancialRecord);
    appointment_table.if_not_exists();
    client_table.if_not_exists();
    record_table.if_not_exists();

    db.execute(builder.build(&appointment_table)).await?;
    db.execute(builder.build(&client_table)).await?;
    db.execute(builder.build(&record_table)).await?;

    info!("Database tables ensured");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::{AppointmentModel, ClientModel, FinancialRecordModel};
    use sea_orm::{EntityTrait, QuerySelect};

    #[tokio::test]
    async fn test_create_tables() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;

        // Test that tables exist by querying them
        let _: Vec<AppointmentModel> = Appointment::find().limit(1).all(&db).await?;
        let _: Vec<ClientModel> = Client::find().limit(1).all(&db).await?;
        let _: Vec<FinancialRecordModel> = FinancialRecord::find().limit(1).all(&db).await?;

        Ok(())
    }

    #[tokio::test]
    async fn test_create_tables_is_idempotent() -> Result<()> {
        let db = Database::connect("sqlite::memory:").await?;
        create_tables(&db).await?;
        create_tables(&db).await?;
        Ok(())
    }

    #[test]
    fn test_ensure_sqlite_dir() -> Result<()> {
        ensure_sqlite_dir("sqlite::memory:")?;
        ensure_sqlite_dir("sqlite://agenda.sqlite?mode=rwc")?;

        let dir = std::env::temp_dir().join(format!("agenda_buddy_{}", std::process::id()));
        let url = format!("sqlite://{}/db.sqlite?mode=rwc", dir.display());
        ensure_sqlite_dir(&url)?;
        assert!(dir.is_dir());
        let _ = std::fs::remove_dir_all(&dir);
        Ok(())
    }
}
