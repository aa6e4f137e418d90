//! Wire shapes for Discord's interactions webhook.
//!
//! Only the fields the bot reads are modelled; everything else in the payload is ignored.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use serenity::all::{ApplicationId, ChannelId, InteractionResponseFlags, InteractionType};

/// `PONG`, the answer to a `PING`.
pub const RESPONSE_PONG: u8 = 1;
/// `CHANNEL_MESSAGE_WITH_SOURCE`, an immediate reply.
pub const RESPONSE_CHANNEL_MESSAGE: u8 = 4;
/// `DEFERRED_CHANNEL_MESSAGE_WITH_SOURCE`, a "thinking..." placeholder to edit later.
pub const RESPONSE_DEFERRED_CHANNEL_MESSAGE: u8 = 5;

/// An interaction delivered to the webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct Interaction {
    #[serde(rename = "type")]
    pub kind: InteractionType,
    pub application_id: ApplicationId,
    #[serde(default)]
    pub token: String,
    pub channel_id: Option<ChannelId>,
    pub data: Option<CommandData>,
}

/// Payload of an application command interaction.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandData {
    pub name: String,
    #[serde(default)]
    pub options: Vec<CommandDataOption>,
}

/// A single option value supplied with a command.
#[derive(Debug, Clone, Deserialize)]
pub struct CommandDataOption {
    pub name: String,
    #[serde(default)]
    pub value: Value,
}

impl Interaction {
    /// Name of the invoked command, if this is a command interaction.
    pub fn command_name(&self) -> Option<&str> {
        self.data.as_ref().map(|data| data.name.as_str())
    }

    /// Value of the named option rendered as a string.
    ///
    /// Numeric values are converted so a command registered with an integer option still
    /// reads the same way. Missing and null options return `None`.
    pub fn option_string(&self, name: &str) -> Option<String> {
        let option = self
            .data
            .as_ref()?
            .options
            .iter()
            .find(|option| option.name == name)?;

        match &option.value {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

/// Response returned synchronously from the webhook endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponse {
    #[serde(rename = "type")]
    pub kind: u8,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<InteractionResponseData>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InteractionResponseData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
}

impl InteractionResponse {
    pub fn pong() -> Self {
        Self {
            kind: RESPONSE_PONG,
            data: None,
        }
    }

    /// An immediate reply visible only to the invoking user.
    pub fn ephemeral_message(content: impl Into<String>) -> Self {
        Self {
            kind: RESPONSE_CHANNEL_MESSAGE,
            data: Some(InteractionResponseData {
                content: Some(content.into()),
                flags: Some(u64::from(InteractionResponseFlags::EPHEMERAL.bits())),
            }),
        }
    }

    /// A deferred acknowledgement whose eventual content is visible only to the invoking
    /// user.
    pub fn deferred_ephemeral() -> Self {
        Self {
            kind: RESPONSE_DEFERRED_CHANNEL_MESSAGE,
            data: Some(InteractionResponseData {
                content: None,
                flags: Some(u64::from(InteractionResponseFlags::EPHEMERAL.bits())),
            }),
        }
    }

    /// Whether this response defers the real reply to a later edit.
    #[cfg(test)]
    pub fn is_deferred(&self) -> bool {
        self.kind == RESPONSE_DEFERRED_CHANNEL_MESSAGE
    }

    /// Content of an immediate reply.
    #[cfg(test)]
    pub fn content(&self) -> Option<&str> {
        self.data.as_ref()?.content.as_deref()
    }
}
