//! Discord REST API access.
//!
//! The clear workflow talks to Discord through the `DiscordApi` trait so the deletion
//! engine and progress reporter can be exercised against an in-memory fake. `DiscordClient`
//! is the production implementation: a thin `reqwest` wrapper that authenticates every call
//! and absorbs rate limiting.
//!
//! # Endpoints
//!
//! - `GET /channels/{channel}/messages` - newest-first history, `limit` <= 100, `before` cursor
//! - `POST /channels/{channel}/messages/bulk-delete` - 2 to 100 ids younger than 14 days
//! - `DELETE /channels/{channel}/messages/{message}` - one message of any age
//! - `PATCH /webhooks/{application}/{token}/messages/@original` - edit a deferred reply

pub mod client;
pub mod rate_limit;

use serenity::all::{ApplicationId, ChannelId, MessageId};
use serenity::async_trait;

use crate::server::{error::discord::DiscordError, model::message::MessagePage};

pub use client::DiscordClient;
pub use rate_limit::RetryPolicy;

/// The subset of the Discord REST API used by the clear workflow.
#[async_trait]
pub trait DiscordApi: Send + Sync {
    /// Fetches up to `limit` messages, newest-first, strictly older than `before` when set.
    async fn fetch_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
        before: Option<MessageId>,
    ) -> Result<MessagePage, DiscordError>;

    /// Deletes 2 to 100 messages younger than 14 days in one call.
    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<(), DiscordError>;

    /// Deletes a single message of any age.
    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DiscordError>;

    /// Replaces the content of an interaction's original (deferred) response.
    async fn edit_original_response(
        &self,
        application_id: ApplicationId,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), DiscordError>;
}
