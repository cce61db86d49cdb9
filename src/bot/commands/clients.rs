//! Client book Discord commands - listing, editing, deleting and messaging clients.

use crate::{core::messaging::format_money, entities::client};

/// One client-book line: name, phone, balance and cancellations.
pub(crate) fn format_client(client: &client::Model, currency: &str) -> String {
    let phone = if client.phone.is_empty() {
        "no phone"
    } else {
        client.phone.as_str()
    };
    format!(
        "`#{}` **{}** • {} • balance {} • {} cancellation(s)",
        client.id,
        client.name,
        phone,
        format_money(currency, client.outstanding_balance),
        client.cancellations
    )
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::format_client;
    use crate::{
        bot::{BotData, commands::join_lines_capped, handlers::autocomplete},
        core::{
            appointment,
            client::{self, ClientUpdate},
            messaging::{self, MessageSubject},
        },
        errors::{Error, Result},
    };
    use tracing::info;

    /// Lists every client with contact, balance and cancellation count.
    #[poise::command(slash_command, prefix_command)]
    pub async fn clients(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let clients = client::list_clients(db).await?;

        if clients.is_empty() {
            ctx.say("No clients yet. They are added when you book them.")
                .await?;
            return Ok(());
        }

        let header = format!("👥 **Clients** ({})", clients.len());
        let lines = clients.iter().map(|c| format_client(c, currency));
        ctx.say(join_lines_capped(header, lines)).await?;
        Ok(())
    }

    /// Edits a client's record. Omitted fields keep their current values.
    ///
    /// Balance and cancellations are stored exactly as given.
    #[poise::command(slash_command, prefix_command)]
    pub async fn client_edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Client to edit"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        name: String,
        #[description = "New name"] new_name: Option<String>,
        #[description = "New phone"] phone: Option<String>,
        #[description = "Outstanding balance"] balance: Option<f64>,
        #[description = "Cancellation count"] cancellations: Option<i32>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let current = client::get_client_by_name(db, &name)
            .await?
            .ok_or_else(|| Error::ClientNotFound { key: name.clone() })?;

        let updated = client::update_client(
            db,
            current.id,
            ClientUpdate {
                name: new_name.unwrap_or(current.name),
                phone: phone.unwrap_or(current.phone),
                outstanding_balance: balance.unwrap_or(current.outstanding_balance),
                cancellations: cancellations.unwrap_or(current.cancellations),
            },
        )
        .await?;

        ctx.say(format!(
            "✅ Client updated: {}",
            format_client(&updated, &ctx.data().settings.business.currency)
        ))
        .await?;
        Ok(())
    }

    /// Deletes a client from the book. Appointments and history keep the name.
    #[poise::command(slash_command, prefix_command)]
    pub async fn client_delete(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Client to delete"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        name: String,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let current = client::get_client_by_name(db, &name)
            .await?
            .ok_or_else(|| Error::ClientNotFound { key: name.clone() })?;

        client::delete_client(db, current.id).await?;
        ctx.say(format!("🗑️ Client **{}** deleted.", current.name))
            .await?;
        Ok(())
    }

    /// Composes a WhatsApp message for an appointment or a client.
    ///
    /// With an appointment id the message is a charge reminder or a confirmation
    /// request; with a client name it is a debt reminder or a greeting.
    #[poise::command(slash_command, prefix_command)]
    pub async fn message(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment id"] appointment_id: Option<i64>,
        #[description = "Client name"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        client_name: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let business = &ctx.data().settings.business;

        let subject = match (appointment_id, client_name) {
            (Some(id), _) => {
                let appt = appointment::get_appointment_by_id(db, id)
                    .await?
                    .ok_or(Error::AppointmentNotFound { id })?;
                MessageSubject::from(&appt)
            }
            (None, Some(name)) => {
                let found = client::get_client_by_name(db, &name)
                    .await?
                    .ok_or_else(|| Error::ClientNotFound { key: name.clone() })?;
                MessageSubject::from(&found)
            }
            (None, None) => {
                return Err(Error::Validation {
                    message: "Give an appointment id or a client name".to_string(),
                });
            }
        };

        if subject.phone.chars().all(|c| !c.is_ascii_digit()) {
            return Err(Error::Validation {
                message: format!("{} has no phone number on file", subject.client_name),
            });
        }

        let composed =
            messaging::compose(&subject, &business.currency, &business.country_code);
        info!("Composed message for '{}'", subject.client_name);

        ctx.say(format!(
            "💬 Message for **{}**:\n>>> {}\n\n{}",
            subject.client_name, composed.text, composed.link
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
