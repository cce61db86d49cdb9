//! Client store operations - the client book keyed by name.
//!
//! Clients are created implicitly the first time a name is booked, cancelled or
//! finalized, through upserts on the unique `name` column. Counters and
//! balances are changed with single-statement increments
//! (`cancellations = cancellations + 1`) instead of reading the row, adding in
//! memory and writing it back, so two writers cannot lose each other's update.

use crate::{
    core::ensure_valid_amount,
    entities::{Client, client},
    errors::{Error, Result},
};
use sea_orm::{
    ActiveValue::Unchanged,
    QueryOrder, Set,
    prelude::*,
    sea_query::{Expr, OnConflict},
};
use tracing::{debug, info, warn};

/// Operator-supplied values for a direct client edit.
#[derive(Debug, Clone, PartialEq)]
pub struct ClientUpdate {
    /// New display name (also the join key for future appointments)
    pub name: String,
    /// New phone
    pub phone: String,
    /// Outstanding balance, written verbatim
    pub outstanding_balance: f64,
    /// Cancellation count, written verbatim
    pub cancellations: i32,
}

/// Retrieves every client, ordered alphabetically by name.
pub async fn list_clients(db: &DatabaseConnection) -> Result<Vec<client::Model>> {
    Client::find()
        .order_by_asc(client::Column::Name)
        .all(db)
        .await
        .map_err(Into::into)
}

/// Finds a client by exact name.
pub async fn get_client_by_name(
    db: &DatabaseConnection,
    name: &str,
) -> Result<Option<client::Model>> {
    Client::find()
        .filter(client::Column::Name.eq(name))
        .one(db)
        .await
        .map_err(Into::into)
}

/// Returns the stored phone for a typed name, so a booking can reuse it.
pub async fn known_phone(db: &DatabaseConnection, name: &str) -> Result<Option<String>> {
    Ok(get_client_by_name(db, name.trim())
        .await?
        .map(|c| c.phone)
        .filter(|phone| !phone.is_empty()))
}

async fn require_by_name(db: &DatabaseConnection, name: &str) -> Result<client::Model> {
    get_client_by_name(db, name)
        .await?
        .ok_or_else(|| Error::ClientNotFound {
            key: name.to_string(),
        })
}

fn new_client(name: &str) -> client::ActiveModel {
    client::ActiveModel {
        name: Set(name.to_string()),
        phone: Set(String::new()),
        outstanding_balance: Set(0.0),
        cancellations: Set(0),
        ..Default::default()
    }
}

/// Creates the client if the name is new, otherwise refreshes its phone.
///
/// Balance and cancellation count of an existing client are left untouched.
pub async fn upsert_client_contact(
    db: &DatabaseConnection,
    name: &str,
    phone: &str,
) -> Result<client::Model> {
    let mut model = new_client(name);
    model.phone = Set(phone.to_string());

    Client::insert(model)
        .on_conflict(
            OnConflict::column(client::Column::Name)
                .update_column(client::Column::Phone)
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    debug!("Upserted contact for client '{}'", name);
    require_by_name(db, name).await
}

/// Adds one to the client's cancellation count, creating the client at 1 if unknown.
pub async fn increment_cancellations(
    db: &DatabaseConnection,
    name: &str,
) -> Result<client::Model> {
    let mut model = new_client(name);
    model.cancellations = Set(1);

    Client::insert(model)
        .on_conflict(
            OnConflict::column(client::Column::Name)
                .value(
                    client::Column::Cancellations,
                    Expr::col(client::Column::Cancellations).add(1),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let updated = require_by_name(db, name).await?;
    info!(
        "Client '{}' now has {} cancellation(s)",
        name, updated.cancellations
    );
    Ok(updated)
}

/// Adds `amount` to the client's outstanding balance, creating the client if unknown.
pub async fn add_debt(db: &DatabaseConnection, name: &str, amount: f64) -> Result<client::Model> {
    ensure_valid_amount(amount)?;

    let mut model = new_client(name);
    model.outstanding_balance = Set(amount);

    Client::insert(model)
        .on_conflict(
            OnConflict::column(client::Column::Name)
                .value(
                    client::Column::OutstandingBalance,
                    Expr::col(client::Column::OutstandingBalance).add(amount),
                )
                .to_owned(),
        )
        .exec_without_returning(db)
        .await?;

    let updated = require_by_name(db, name).await?;
    info!(
        "Client '{}' debt increased by {:.2} to {:.2}",
        name, amount, updated.outstanding_balance
    );
    Ok(updated)
}

/// Subtracts `amount` from the client's outstanding balance.
///
/// Returns `None` when no client carries this name; the settlement that
/// triggered it still stands, the balance simply has nowhere to go.
pub async fn reduce_debt(
    db: &DatabaseConnection,
    name: &str,
    amount: f64,
) -> Result<Option<client::Model>> {
    ensure_valid_amount(amount)?;

    let result = Client::update_many()
        .col_expr(
            client::Column::OutstandingBalance,
            Expr::col(client::Column::OutstandingBalance).sub(amount),
        )
        .filter(client::Column::Name.eq(name))
        .exec(db)
        .await?;

    if result.rows_affected == 0 {
        warn!("No client named '{}' to reduce debt for", name);
        return Ok(None);
    }

    let updated = require_by_name(db, name).await?;
    info!(
        "Client '{}' debt reduced by {:.2} to {:.2}",
        name, amount, updated.outstanding_balance
    );
    Ok(Some(updated))
}

/// Overwrites a client's fields by id with operator-supplied values.
///
/// No accrual rules apply here: balance and cancellation count are stored
/// exactly as given.
pub async fn update_client(
    db: &DatabaseConnection,
    client_id: i64,
    update: ClientUpdate,
) -> Result<client::Model> {
    let name = update.name.trim().to_string();
    if name.is_empty() {
        return Err(Error::Validation {
            message: "Client name cannot be empty".to_string(),
        });
    }
    if !update.outstanding_balance.is_finite() {
        return Err(Error::InvalidAmount {
            amount: update.outstanding_balance,
        });
    }

    let model = client::ActiveModel {
        id: Unchanged(client_id),
        name: Set(name),
        phone: Set(update.phone),
        outstanding_balance: Set(update.outstanding_balance),
        cancellations: Set(update.cancellations),
    };

    let updated = model.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => Error::ClientNotFound {
            key: client_id.to_string(),
        },
        other => other.into(),
    })?;
    info!("Client {} edited by operator", client_id);
    Ok(updated)
}

/// Deletes a client by id. Appointments and history naming the client are kept.
pub async fn delete_client(db: &DatabaseConnection, client_id: i64) -> Result<()> {
    let result = Client::delete_by_id(client_id).exec(db).await?;
    if result.rows_affected == 0 {
        return Err(Error::ClientNotFound {
            key: client_id.to_string(),
        });
    }
    info!("Deleted client {}", client_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::*;

    #[tokio::test]
    async fn test_upsert_creates_then_refreshes_phone() -> Result<()> {
        let db = setup_test_db().await?;

        let created = upsert_client_contact(&db, "Ana", "+550000").await?;
        assert_eq!(created.phone, "+550000");
        assert_eq!(created.outstanding_balance, 0.0);
        assert_eq!(created.cancellations, 0);

        add_debt(&db, "Ana", 30.0).await?;
        let refreshed = upsert_client_contact(&db, "Ana", "+551111").await?;
        assert_eq!(refreshed.id, created.id);
        assert_eq!(refreshed.phone, "+551111");
        assert_eq!(refreshed.outstanding_balance, 30.0);

        assert_eq!(list_clients(&db).await?.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_increment_cancellations_defaults_to_zero() -> Result<()> {
        let db = setup_test_db().await?;

        let first = increment_cancellations(&db, "Bruna").await?;
        assert_eq!(first.cancellations, 1);
        assert_eq!(first.phone, "");

        let second = increment_cancellations(&db, "Bruna").await?;
        assert_eq!(second.cancellations, 2);
        assert_eq!(second.id, first.id);
        Ok(())
    }

    #[tokio::test]
    async fn test_add_and_reduce_debt() -> Result<()> {
        let db = setup_test_db().await?;
        upsert_client_contact(&db, "Ana", "+550000").await?;

        add_debt(&db, "Ana", 50.0).await?;
        let after_add = add_debt(&db, "Ana", 25.0).await?;
        assert_eq!(after_add.outstanding_balance, 75.0);

        let after_reduce = reduce_debt(&db, "Ana", 50.0).await?.unwrap();
        assert_eq!(after_reduce.outstanding_balance, 25.0);

        assert!(reduce_debt(&db, "Nobody", 10.0).await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_client_overrides_counters_verbatim() -> Result<()> {
        let db = setup_test_db().await?;
        let ana = upsert_client_contact(&db, "Ana", "+550000").await?;
        add_debt(&db, "Ana", 50.0).await?;

        let edited = update_client(
            &db,
            ana.id,
            ClientUpdate {
                name: " Ana Paula ".to_string(),
                phone: "+559999".to_string(),
                outstanding_balance: 0.0,
                cancellations: 5,
            },
        )
        .await?;

        assert_eq!(edited.name, "Ana Paula");
        assert_eq!(edited.outstanding_balance, 0.0);
        assert_eq!(edited.cancellations, 5);
        assert!(get_client_by_name(&db, "Ana").await?.is_none());
        Ok(())
    }

    #[tokio::test]
    async fn test_update_and_delete_unknown_client() -> Result<()> {
        let db = setup_test_db().await?;
        let update = ClientUpdate {
            name: "Ana".to_string(),
            phone: String::new(),
            outstanding_balance: 0.0,
            cancellations: 0,
        };
        assert!(matches!(
            update_client(&db, 99, update).await,
            Err(Error::ClientNotFound { .. })
        ));
        assert!(matches!(
            delete_client(&db, 99).await,
            Err(Error::ClientNotFound { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_known_phone() -> Result<()> {
        let db = setup_test_db().await?;
        upsert_client_contact(&db, "Ana", "+550000").await?;
        increment_cancellations(&db, "Bruna").await?;

        assert_eq!(known_phone(&db, " Ana ").await?, Some("+550000".to_string()));
        assert_eq!(known_phone(&db, "Bruna").await?, None);
        assert_eq!(known_phone(&db, "Carla").await?, None);
        Ok(())
    }
}
