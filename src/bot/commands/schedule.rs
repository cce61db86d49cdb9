//! Scheduling Discord commands - book, edit, cancel, pay, finalize and the agenda views.
//!
//! This module contains commands that drive the booking, cancellation and
//! finalization workflows in [`crate::core`] and render the active schedule.

use crate::{core::messaging::format_money, entities::appointment};

/// One agenda line: id, day, time, client, service, price and any pending amount.
pub(crate) fn format_appointment(appt: &appointment::Model, currency: &str) -> String {
    let mut line = format!(
        "`#{}` {} {} • **{}** • {} • {}",
        appt.id,
        appt.date.format("%d/%m"),
        appt.time.format("%H:%M"),
        appt.client_name,
        appt.service,
        format_money(currency, appt.total_price)
    );
    if appt.pending_amount() > 0.0 {
        line.push_str(&format!(
            " (pending {})",
            format_money(currency, appt.pending_amount())
        ));
    }
    line
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::format_appointment;
    use crate::{
        bot::{
            BotData,
            commands::{join_lines_capped, parse_date, parse_time},
            handlers::autocomplete,
        },
        config::settings::DEFAULT_SERVICE,
        core::{
            appointment,
            booking::{self, BookingRequest},
            cancellation, dashboard, finalization,
            messaging::format_money,
        },
        entities::appointment as appointment_entity,
        errors::{Error, Result},
    };
    use chrono::{Local, Utc};
    use sea_orm::DatabaseConnection;

    async fn load_appointment(
        db: &DatabaseConnection,
        appointment_id: i64,
    ) -> Result<appointment_entity::Model> {
        appointment::get_appointment_by_id(db, appointment_id)
            .await?
            .ok_or(Error::AppointmentNotFound { id: appointment_id })
    }

    /// Books a new appointment.
    ///
    /// The slot must be free and the date must not be in the past. When no phone
    /// is given, the phone stored for an existing client of the same name is used;
    /// when no price is given, the catalog price of the service is used.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn book(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Client name"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        client_name: String,
        #[description = "Date (YYYY-MM-DD or DD/MM/YYYY)"] date: String,
        #[description = "Time (HH:MM)"] time: String,
        #[description = "Service"]
        #[autocomplete = "autocomplete::autocomplete_service"]
        service: Option<String>,
        #[description = "Client phone"] phone: Option<String>,
        #[description = "Total price"] total: Option<f64>,
        #[description = "Amount already paid"] paid: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let settings = &ctx.data().settings;

        let service = service.unwrap_or_default();
        let catalog_label = if service.trim().is_empty() {
            DEFAULT_SERVICE
        } else {
            service.trim()
        };
        let total = total.or_else(|| {
            settings
                .service(catalog_label)
                .map(|s| s.price)
                .filter(|price| *price > 0.0)
        });

        let request = BookingRequest {
            client_name,
            phone: phone.unwrap_or_default(),
            date: Some(parse_date(&date)?),
            time: Some(parse_time(&time)?),
            service,
            total_price: total,
            amount_paid: paid,
            editing_id: None,
        };

        let outcome =
            booking::book_with_known_phone(db, request, Local::now().date_naive()).await?;

        ctx.say(format!(
            "✅ Booked {}\nClient **{}** has {} appointment(s) on the schedule.",
            format_appointment(&outcome.appointment, &settings.business.currency),
            outcome.client.name,
            outcome
                .listings
                .appointments
                .iter()
                .filter(|a| a.client_name == outcome.client.name)
                .count()
        ))
        .await?;
        Ok(())
    }

    /// Edits an existing appointment. Omitted fields keep their current values.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn edit(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment id"] appointment_id: i64,
        #[description = "Client name"]
        #[autocomplete = "autocomplete::autocomplete_client_name"]
        client_name: Option<String>,
        #[description = "Date (YYYY-MM-DD or DD/MM/YYYY)"] date: Option<String>,
        #[description = "Time (HH:MM)"] time: Option<String>,
        #[description = "Service"]
        #[autocomplete = "autocomplete::autocomplete_service"]
        service: Option<String>,
        #[description = "Client phone"] phone: Option<String>,
        #[description = "Total price"] total: Option<f64>,
        #[description = "Amount already paid"] paid: Option<f64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let current = load_appointment(db, appointment_id).await?;

        let request = BookingRequest {
            client_name: client_name.unwrap_or(current.client_name),
            phone: phone.unwrap_or(current.phone),
            date: Some(date.as_deref().map(parse_date).transpose()?.unwrap_or(current.date)),
            time: Some(time.as_deref().map(parse_time).transpose()?.unwrap_or(current.time)),
            service: service.unwrap_or(current.service),
            total_price: Some(total.unwrap_or(current.total_price)),
            amount_paid: Some(paid.unwrap_or(current.amount_paid)),
            editing_id: Some(appointment_id),
        };

        let outcome =
            booking::book_appointment(db, request, Local::now().date_naive()).await?;

        ctx.say(format!(
            "✅ Updated {}",
            format_appointment(&outcome.appointment, &ctx.data().settings.business.currency)
        ))
        .await?;
        Ok(())
    }

    /// Cancels an appointment and counts the cancellation against the client.
    #[poise::command(slash_command, prefix_command)]
    pub async fn cancel(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment id"] appointment_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let appt = load_appointment(db, appointment_id).await?;

        let outcome = cancellation::cancel_appointment(db, &appt).await?;

        ctx.say(format!(
            "🗑️ Cancelled appointment #{} for **{}** on {} at {}. Total cancellations: {}",
            appt.id,
            outcome.client.name,
            appt.date.format("%d/%m/%Y"),
            appt.time.format("%H:%M"),
            outcome.client.cancellations
        ))
        .await?;
        Ok(())
    }

    /// Records billed and paid amounts on an appointment without finalizing it.
    #[poise::command(slash_command, prefix_command)]
    pub async fn pay(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment id"] appointment_id: i64,
        #[description = "Total price"] total: f64,
        #[description = "Amount paid so far"] paid: f64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let updated = appointment::record_payment(db, appointment_id, total, paid).await?;

        ctx.say(format!(
            "💵 Payment saved: {}",
            format_appointment(&updated, &ctx.data().settings.business.currency)
        ))
        .await?;
        Ok(())
    }

    /// Finalizes an appointment and moves it to the financial history.
    ///
    /// Any shortfall is added to the client's debt and the appointment leaves the schedule.
    /// Amounts default to those stored on the appointment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn finalize(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Appointment id"] appointment_id: i64,
        #[description = "Amount billed (defaults to the appointment's total)"] billed: Option<
            f64,
        >,
        #[description = "Amount paid (defaults to the appointment's paid amount)"] paid: Option<
            f64,
        >,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let appt = load_appointment(db, appointment_id).await?;

        let billed = billed.unwrap_or(appt.total_price);
        let paid = paid.unwrap_or(appt.amount_paid);
        let outcome =
            finalization::finalize_appointment(db, &appt, billed, paid, Utc::now()).await?;

        let mut reply = format!(
            "✅ Finalized #{} for **{}** ({}): billed {}, paid {}.",
            appt.id,
            appt.client_name,
            outcome.record.month,
            format_money(currency, outcome.record.billed),
            format_money(currency, outcome.record.paid)
        );
        if let Some(client) = &outcome.client {
            reply.push_str(&format!(
                "\n⚠️ {} added to the client's debt, now {}.",
                format_money(currency, outcome.shortfall),
                format_money(currency, client.outstanding_balance)
            ));
        }
        ctx.say(reply).await?;
        Ok(())
    }

    /// Shows the agenda for a day, or every upcoming appointment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn agenda(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Day to show (YYYY-MM-DD or DD/MM/YYYY); all when omitted"]
        date: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let selected = date.as_deref().map(parse_date).transpose()?;

        let listings = dashboard::load_listings(db).await?;
        let kpis = dashboard::kpis(&listings, selected);
        let day_list = dashboard::agenda(&listings.appointments, selected);

        let title = selected.map_or_else(
            || "📅 **Upcoming appointments**".to_string(),
            |day| format!("📅 **Agenda for {}**", day.format("%d/%m/%Y")),
        );
        let header = format!(
            "{title}\nAppointments: {} • Clients: {} • Received: {}",
            kpis.appointment_count,
            kpis.client_count,
            format_money(currency, kpis.received_total)
        );

        if day_list.is_empty() {
            ctx.say(format!("{header}\nNothing booked.")).await?;
            return Ok(());
        }

        let lines = day_list
            .into_iter()
            .map(|appt| format_appointment(appt, currency));
        ctx.say(join_lines_capped(header, lines)).await?;
        Ok(())
    }

    /// Shows the next days and how many appointments each one holds.
    #[poise::command(slash_command, prefix_command)]
    pub async fn days(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Days to shift the strip by (negative looks back)"] offset: Option<i64>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let appointments = appointment::list_appointments(db).await?;

        let strip = dashboard::day_strip(
            &appointments,
            Local::now().date_naive(),
            offset.unwrap_or(0),
            dashboard::DEFAULT_STRIP_DAYS,
        );

        let lines = strip.iter().map(|day| {
            let marker = if day.is_busy() { "🟤" } else { "⚪" };
            format!(
                "{marker} {}: {} appointment(s)",
                day.date.format("%a %d/%m"),
                day.appointment_count
            )
        });
        ctx.say(join_lines_capped("🗓️ **Next days**".to_string(), lines))
            .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;

    #[test]
    fn test_format_appointment_shows_pending() {
        let mut appt = ana_appointment(3);
        appt.amount_paid = 100.0;
        assert_eq!(
            format_appointment(&appt, "R$"),
            "`#3` 10/03 14:00 • **Ana** • Volume Russo • R$ 150,00 (pending R$ 50,00)"
        );

        appt.amount_paid = 150.0;
        assert!(!format_appointment(&appt, "R$").contains("pending"));
    }
}
