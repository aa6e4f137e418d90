use chrono::{DateTime, TimeDelta, Utc};
use serenity::all::MessageId;

use crate::server::model::message::MessageRecord;

/// Discord rejects bulk deletes containing any message this old or older (14 days).
pub const BULK_DELETE_MAX_AGE_MS: i64 = 1_209_600_000;

/// A page split by deletion strategy, each side keeping the page's newest-first order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Partition {
    /// Younger than 14 days; eligible for bulk deletion.
    pub recent: Vec<MessageId>,
    /// 14 days or older; must be deleted one at a time.
    pub old: Vec<MessageId>,
}

/// Splits messages into bulk-deletable and individually-deletable sets.
///
/// A message is recent when `now - timestamp` is strictly less than 14 days, so a message
/// exactly on the boundary is old. The result depends only on `messages` and `now`.
///
/// # Arguments
/// - `messages` - Page of messages, newest-first
/// - `now` - Reference instant for computing ages
///
/// # Returns
/// - `Partition` - Ids split into `recent` and `old`
pub fn classify(messages: &[MessageRecord], now: DateTime<Utc>) -> Partition {
    let cutoff = TimeDelta::milliseconds(BULK_DELETE_MAX_AGE_MS);

    messages
        .iter()
        .fold(Partition::default(), |mut partition, message| {
            if message.age(now) < cutoff {
                partition.recent.push(message.id);
            } else {
                partition.old.push(message.id);
            }
            partition
        })
}
