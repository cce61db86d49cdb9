//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the `AgendaBuddy` application:
//! the operator books, edits, cancels and finalizes appointments and reads the
//! agenda and revenue through slash commands. All business rules live in
//! [`crate::core`]; commands only parse input and format replies.

/// Discord command implementations (schedule, clients, finance, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::settings::Settings,
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use tracing::{error, info, instrument};

/// Shared data available to all bot commands.
/// This structure holds the database connection and the studio settings
/// that commands need to access.
pub struct BotData {
    /// Database connection for all database operations
    pub database: DatabaseConnection,
    /// Studio settings and service catalog
    pub settings: Settings,
}

impl BotData {
    /// Creates a new `BotData` instance with the given database connection and settings.
    #[must_use]
    pub const fn new(database: DatabaseConnection, settings: Settings) -> Self {
        Self { database, settings }
    }
}

pub use commands::*;
pub use handlers::*;

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {:?}", ctx.command().name, error);
            if let Err(e) = ctx.say(format!("❌ {error}")).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every slash command the bot registers, in the order shown by Discord.
#[must_use]
pub fn all_commands() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::book(),
        commands::edit(),
        commands::cancel(),
        commands::pay(),
        commands::finalize(),
        commands::agenda(),
        commands::days(),
        commands::clients(),
        commands::client_edit(),
        commands::client_delete(),
        commands::message(),
        commands::settle(),
        commands::debts(),
        commands::history(),
        commands::revenue(),
        commands::ping(),
        commands::help(),
    ]
}

/// Builds the poise framework with every command and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: all_commands(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::GUILD_MESSAGES
        | serenity::GatewayIntents::DIRECT_MESSAGES
        | serenity::GatewayIntents::MESSAGE_CONTENT;

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Discord refuses to register a slash command whose description is longer.
    const MAX_DESCRIPTION: usize = 100;

    #[test]
    fn test_command_descriptions_fit_discord_limit() {
        let commands = all_commands();
        assert_eq!(commands.len(), 17);

        for command in &commands {
            let description = command.description.as_deref().unwrap_or_default();
            assert!(!description.is_empty(), "/{} has no description", command.name);
            assert!(
                description.chars().count() <= MAX_DESCRIPTION,
                "/{} description is {} chars",
                command.name,
                description.chars().count()
            );
        }
    }

    #[test]
    fn test_finalize_is_registered() {
        let names: Vec<String> = all_commands().into_iter().map(|c| c.name).collect();
        for expected in ["book", "finalize", "settle", "revenue"] {
            assert!(names.iter().any(|n| n == expected), "missing /{expected}");
        }
    }
}
