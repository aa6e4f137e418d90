//! The `/clear` slash command: mass message deletion.
//!
//! Discord expects an answer to an interaction within three seconds, while clearing a
//! channel can take minutes. The command therefore validates its input, answers with a
//! deferred acknowledgement straight away, and hands the actual work to a background task
//! that edits the deferred reply as it goes.
//!
//! - `classifier` - Splits a page into bulk-deletable and individually-deletable messages
//! - `engine` - The pagination and deletion loop
//! - `progress` - Edits the deferred reply with human-readable progress

pub mod classifier;
pub mod engine;
pub mod progress;

#[cfg(test)]
mod test;

use serenity::all::{CommandOptionType, CreateCommand, CreateCommandOption, Permissions};
use std::sync::Arc;
use tokio_util::task::TaskTracker;

use crate::{
    model::interaction::{Interaction, InteractionResponse},
    server::{
        discord::DiscordApi,
        error::validation::ValidationError,
        model::clear::{DeletionTarget, Stage},
        service::clear::{
            engine::{ClearPacing, DeletionEngine},
            progress::{InteractionWebhook, ProgressReporter},
        },
    },
};

/// Name the command is registered under.
pub const COMMAND_NAME: &str = "clear";

/// Name of the command's single option.
const AMOUNT_OPTION: &str = "amount";

/// Entry point for `/clear` interactions.
///
/// Each invocation gets its own engine, reporter, and progress state; nothing is shared
/// between runs, including runs against the same channel.
#[derive(Clone)]
pub struct ClearCommand {
    api: Arc<dyn DiscordApi>,
    pacing: ClearPacing,
    tasks: TaskTracker,
}

impl ClearCommand {
    /// Creates the command handler.
    ///
    /// # Arguments
    /// - `api` - Discord API shared by every run
    /// - `pacing` - Delays applied inside each run
    /// - `tasks` - Registry that keeps background runs alive until they finish
    pub fn new(api: Arc<dyn DiscordApi>, pacing: ClearPacing, tasks: TaskTracker) -> Self {
        Self { api, pacing, tasks }
    }

    /// Command definition used when registering with Discord.
    ///
    /// Requires Manage Messages by default and is unavailable in DMs.
    pub fn definition() -> CreateCommand {
        CreateCommand::new(COMMAND_NAME)
            .description("Deletes messages from the channel.")
            .default_member_permissions(Permissions::MANAGE_MESSAGES)
            .dm_permission(false)
            .add_option(
                CreateCommandOption::new(
                    CommandOptionType::String,
                    AMOUNT_OPTION,
                    "Number of messages to delete, or type \"all\" to clear the entire channel.",
                )
                .required(true),
            )
    }

    /// Handles a `/clear` invocation.
    ///
    /// Invalid input is answered immediately with an ephemeral explanation and no network
    /// calls. Valid input schedules a background run and returns a deferred ephemeral
    /// acknowledgement without waiting for it.
    ///
    /// # Arguments
    /// - `interaction` - The command interaction
    ///
    /// # Returns
    /// - `InteractionResponse` - Deferred acknowledgement, or an ephemeral validation reply
    pub fn handle(&self, interaction: &Interaction) -> InteractionResponse {
        let target = match parse_amount(interaction.option_string(AMOUNT_OPTION)) {
            Ok(target) => target,
            Err(e) => {
                tracing::debug!("Rejected /clear input: {:?}", e);
                return InteractionResponse::ephemeral_message(e.to_string());
            }
        };

        let Some(channel_id) = interaction.channel_id else {
            return InteractionResponse::ephemeral_message(
                "This command can only be used in a channel.",
            );
        };

        let webhook = InteractionWebhook {
            application_id: interaction.application_id,
            token: interaction.token.clone(),
        };
        let reporter = ProgressReporter::new(self.api.clone(), webhook, target);
        let engine = DeletionEngine::new(self.api.clone(), reporter.clone(), self.pacing);

        tracing::info!(
            "Starting /clear in channel {} (target: {})",
            channel_id,
            target
        );

        self.tasks.spawn(async move {
            let run = tokio::spawn(async move { engine.run(channel_id, target).await });

            // The engine reports its own failures; this only catches a panic inside it
            if let Err(e) = run.await {
                tracing::error!("Clear run in channel {} panicked: {}", channel_id, e);
                reporter
                    .report(
                        &Stage::Error("The clear run stopped unexpectedly.".to_string()),
                        reporter.last_deleted(),
                    )
                    .await;
            }
        });

        InteractionResponse::deferred_ephemeral()
    }
}

fn parse_amount(raw: Option<String>) -> Result<DeletionTarget, ValidationError> {
    match raw {
        Some(raw) => DeletionTarget::parse(&raw),
        None => Err(ValidationError::MissingAmount),
    }
}
