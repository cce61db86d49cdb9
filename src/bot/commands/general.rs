//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Checks that the bot is up and answers with the studio name.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say(format!(
            "Pong! {} agenda is online.",
            ctx.data().settings.business.name
        ))
        .await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**AgendaBuddy Help**\n\
        Here is a summary of all available commands.\n\n\
        **Schedule**\n\
        • `/book <client> <date> <time> [service] [phone] [total] [paid]` - Books an appointment.\n\
        • `/edit <id> [fields...]` - Changes an appointment; omitted fields stay as they are.\n\
        • `/cancel <id>` - Cancels an appointment and counts it against the client.\n\
        • `/pay <id> <total> <paid>` - Saves a payment without closing the appointment.\n\
        • `/finalize <id> [billed] [paid]` - Moves the appointment to the history; any shortfall becomes debt.\n\
        • `/agenda [date]` - Shows the appointments of a day, or all of them.\n\
        • `/days [offset]` - Shows the next days and how busy each one is.\n\n\
        **Clients**\n\
        • `/clients` - Lists every client with balance and cancellations.\n\
        • `/client_edit <name> [fields...]` - Overwrites a client's record.\n\
        • `/client_delete <name>` - Removes a client from the book.\n\
        • `/message [id] [client]` - Composes a WhatsApp charge, confirmation or greeting.\n\n\
        **Finance**\n\
        • `/history [MM/YYYY]` - Lists the finalized appointments of a month.\n\
        • `/revenue [MM/YYYY]` - Shows received and pending revenue for a month.\n\
        • `/debts` - Lists unpaid history records.\n\
        • `/settle <record>` - Marks a record as paid and lowers the client's balance.\n\n\
        **Utility**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
