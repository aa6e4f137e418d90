use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;
use serenity::all::MessageId;

/// A channel message reduced to what the clear workflow needs.
///
/// Deserialized straight from Discord's message objects; every other field is ignored.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub timestamp: DateTime<Utc>,
}

impl MessageRecord {
    /// Time elapsed between the message's creation and `now`.
    ///
    /// Negative when the message claims to be from the future relative to `now`.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }
}

/// One page of channel history, newest-first, at most 100 messages.
pub type MessagePage = Vec<MessageRecord>;
