use serenity::all::InteractionType;

use crate::{
    model::interaction::{Interaction, InteractionResponse},
    server::service::clear::{ClearCommand, COMMAND_NAME as CLEAR},
};

/// Chooses the synchronous answer to an interaction.
pub struct InteractionService<'a> {
    clear: &'a ClearCommand,
}

impl<'a> InteractionService<'a> {
    pub fn new(clear: &'a ClearCommand) -> Self {
        Self { clear }
    }

    /// Answers an interaction.
    ///
    /// Pings are answered with a pong. Commands are dispatched by name; anything else gets
    /// an ephemeral notice.
    ///
    /// # Arguments
    /// - `interaction` - Decoded interaction payload
    ///
    /// # Returns
    /// - `InteractionResponse` - Body for the webhook response
    pub fn handle(&self, interaction: &Interaction) -> InteractionResponse {
        match interaction.kind {
            InteractionType::Ping => InteractionResponse::pong(),
            InteractionType::Command => match interaction.command_name() {
                Some(CLEAR) => self.clear.handle(interaction),
                Some(name) => {
                    tracing::warn!("Received unknown command /{}", name);
                    InteractionResponse::ephemeral_message(format!(
                        "No handler implemented for /{}.",
                        name
                    ))
                }
                None => unsupported(),
            },
            _ => unsupported(),
        }
    }
}

fn unsupported() -> InteractionResponse {
    InteractionResponse::ephemeral_message("Interaction type not supported yet.")
}
