use reqwest::Method;
use serde::Deserialize;
use serenity::all::{ApplicationId, CreateCommand, GuildId};

use crate::server::{
    discord::DiscordClient, error::AppError, service::clear::ClearCommand,
};

/// A command as echoed back by Discord after registration.
#[derive(Debug, Deserialize)]
pub struct RegisteredCommand {
    pub id: String,
    pub name: String,
}

/// Publishes the bot's slash commands.
pub struct CommandRegistrationService<'a> {
    client: &'a DiscordClient,
}

impl<'a> CommandRegistrationService<'a> {
    /// Creates a new CommandRegistrationService with a reference to the Discord client.
    ///
    /// # Arguments
    /// - `client` - Discord REST client authenticated as the bot
    ///
    /// # Returns
    /// - `CommandRegistrationService` - New service instance
    pub fn new(client: &'a DiscordClient) -> Self {
        Self { client }
    }

    /// Definitions of every command the bot answers.
    pub fn definitions() -> Vec<CreateCommand> {
        vec![ClearCommand::definition()]
    }

    /// Overwrites the application's command list with `definitions()`.
    ///
    /// Guild registration takes effect immediately and is meant for development; global
    /// registration can take up to an hour to propagate.
    ///
    /// # Arguments
    /// - `application_id` - Application owning the commands
    /// - `guild_id` - Register for this guild only, or globally when `None`
    ///
    /// # Returns
    /// - `Ok(Vec<RegisteredCommand>)` - Commands as stored by Discord
    /// - `Err(AppError::DiscordErr)` - Discord rejected the definitions
    pub async fn register(
        &self,
        application_id: ApplicationId,
        guild_id: Option<GuildId>,
    ) -> Result<Vec<RegisteredCommand>, AppError> {
        let path = match guild_id {
            Some(guild_id) => format!(
                "/applications/{}/guilds/{}/commands",
                application_id, guild_id
            ),
            None => format!("/applications/{}/commands", application_id),
        };

        let body = serde_json::to_value(Self::definitions())?;
        let registered: Vec<RegisteredCommand> = self
            .client
            .request_json(Method::PUT, &path, Some(&body))
            .await?;

        for command in &registered {
            tracing::info!("Registered /{} ({})", command.name, command.id);
        }

        Ok(registered)
    }
}
