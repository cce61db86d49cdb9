//! Financial Discord commands - history, revenue, open debts and settlement.

use crate::{
    core::{messaging::format_money, revenue::RevenueSummary},
    entities::financial_record,
};

/// One history line: id, finalization day, client, service and amounts.
pub(crate) fn format_record(record: &financial_record::Model, currency: &str) -> String {
    let mut line = format!(
        "`#{}` {} • **{}** • {} • billed {} • paid {}",
        record.id,
        record.finalized_at.format("%d/%m/%Y"),
        record.client_name,
        record.service,
        format_money(currency, record.billed),
        format_money(currency, record.paid)
    );
    if record.shortfall() > 0.0 {
        line.push_str(&format!(
            " • owes {}",
            format_money(currency, record.shortfall())
        ));
    }
    line
}

/// Renders a revenue summary as a short report.
pub(crate) fn format_summary(summary: &RevenueSummary, currency: &str) -> String {
    let change = summary.change_percent.map_or_else(
        || "no revenue the month before".to_string(),
        |pct| format!("{pct:+.1}% vs {}", summary.month.previous()),
    );
    format!(
        "📊 **Revenue {}**\n\
        Received: {}\n\
        Pending: {}\n\
        Finalized appointments: {}\n\
        Change: {change}",
        summary.month,
        format_money(currency, summary.received),
        format_money(currency, summary.pending),
        summary.record_count
    )
}

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use super::{format_record, format_summary};
    use crate::{
        bot::{BotData, commands::join_lines_capped},
        core::{finance, messaging::format_money, revenue},
        entities::financial_record,
        errors::{Error, Result},
    };
    use chrono::Local;

    /// Shows the financial history of a month (`MM/YYYY`), the current month by default.
    #[poise::command(slash_command, prefix_command)]
    pub async fn history(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as MM/YYYY"] month: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let month = revenue::resolve_month(month.as_deref(), &Local::now().date_naive())?;

        let records = finance::list_records_for_month(db, &month).await?;
        if records.is_empty() {
            ctx.say(format!("No finalized appointments in {month}."))
                .await?;
            return Ok(());
        }

        let header = format!("🧾 **History {month}** ({} record(s))", records.len());
        let lines = records.iter().map(|r| format_record(r, currency));
        ctx.say(join_lines_capped(header, lines)).await?;
        Ok(())
    }

    /// Shows received and pending revenue for a month (`MM/YYYY`).
    ///
    /// The received total is compared with the month before.
    #[poise::command(slash_command, prefix_command)]
    pub async fn revenue(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Month as MM/YYYY"] month: Option<String>,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let month = revenue::resolve_month(month.as_deref(), &Local::now().date_naive())?;

        let records = finance::list_records(db).await?;
        let summary = revenue::summarize(&records, month);

        ctx.say(format_summary(
            &summary,
            &ctx.data().settings.business.currency,
        ))
        .await?;
        Ok(())
    }

    /// Lists finalized appointments that were not fully paid.
    #[poise::command(slash_command, prefix_command)]
    pub async fn debts(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let records = finance::list_unsettled_records(db).await?;

        if records.is_empty() {
            ctx.say("🎉 Nobody owes anything.").await?;
            return Ok(());
        }

        let owed: f64 = records.iter().map(financial_record::Model::shortfall).sum();
        let header = format!("💸 **Open debts** • total {}", format_money(currency, owed));
        let lines = records.iter().map(|r| format_record(r, currency));
        ctx.say(join_lines_capped(header, lines)).await?;
        Ok(())
    }

    /// Marks the debt on a history record as paid and lowers the client's balance.
    #[poise::command(slash_command, prefix_command)]
    pub async fn settle(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "History record id"] record_id: i64,
    ) -> Result<()> {
        let db = &ctx.data().database;
        let currency = &ctx.data().settings.business.currency;
        let settlement = finance::settle_record(db, record_id).await?;

        if settlement.settled <= 0.0 {
            ctx.say(format!("Record #{record_id} has nothing to settle."))
                .await?;
            return Ok(());
        }

        let mut reply = format!(
            "✅ Settled {} for **{}**.",
            format_money(currency, settlement.settled),
            settlement.record.client_name
        );
        if let Some(client) = &settlement.client {
            reply.push_str(&format!(
                " Remaining balance: {}",
                format_money(currency, client.outstanding_balance)
            ));
        }
        ctx.say(reply).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::{core::revenue::MonthBucket, test_utils::*};

    fn record(billed: f64, paid: f64) -> financial_record::Model {
        financial_record::Model {
            id: 7,
            appointment_id: 3,
            client_name: "Ana".to_string(),
            service: "Volume Russo".to_string(),
            billed,
            paid,
            month: "03/2025".to_string(),
            finalized_at: instant(2025, 3, 15, 12),
        }
    }

    #[test]
    fn test_format_record_shows_debt() {
        assert_eq!(
            format_record(&record(150.0, 100.0), "R$"),
            "`#7` 15/03/2025 • **Ana** • Volume Russo • billed R$ 150,00 • paid R$ 100,00 • owes R$ 50,00"
        );
        assert!(!format_record(&record(150.0, 150.0), "R$").contains("owes"));
    }

    #[test]
    fn test_format_summary() {
        let summary = RevenueSummary {
            month: MonthBucket::new(3, 2025).unwrap(),
            received: 300.0,
            pending: 50.0,
            previous_received: 200.0,
            change_percent: Some(50.0),
            record_count: 3,
        };
        let text = format_summary(&summary, "R$");
        assert!(text.contains("Revenue 03/2025"));
        assert!(text.contains("Received: R$ 300,00"));
        assert!(text.contains("+50.0% vs 02/2025"));

        let first_month = RevenueSummary {
            change_percent: None,
            ..summary
        };
        assert!(format_summary(&first_month, "R$").contains("no revenue the month before"));
    }
}
