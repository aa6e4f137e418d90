//! Message factory for seeding mock channel history.

use chrono::{DateTime, TimeDelta, Utc};
use serde_json::{json, Value};

use crate::factory::helpers::reserve_ids;

/// Minutes of age given to messages created with `recent()`.
const RECENT_AGE_MINUTES: i64 = 1;

/// Days of age given to messages created with `old()`, comfortably past the 14 day
/// bulk-delete cutoff.
const OLD_AGE_DAYS: i64 = 20;

/// A message stored in the mock channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MockMessage {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
}

impl MockMessage {
    /// Renders the message the way Discord's `GET /channels/{id}/messages` does, reduced to
    /// the fields the bot reads plus a little realistic padding.
    pub fn to_json(&self, channel_id: &str) -> Value {
        json!({
            "id": self.id.to_string(),
            "channel_id": channel_id,
            "content": format!("message {}", self.id),
            "timestamp": self.timestamp.to_rfc3339(),
            "type": 0,
        })
    }

    /// Time elapsed between the message's creation and `now`.
    pub fn age(&self, now: DateTime<Utc>) -> TimeDelta {
        now - self.timestamp
    }
}

/// Factory for building newest-first channel history.
///
/// Messages are appended from newest to oldest in call order, so
/// `MessageFactory::new().recent(3).old(2)` yields three recent messages followed by two that
/// are older than 14 days. Ages never decrease down the list and ids strictly decrease, which
/// matches Discord's snowflake ordering.
///
/// # Example
///
/// ```rust,ignore
/// let messages = MessageFactory::new().recent(250).build();
/// ```
pub struct MessageFactory {
    now: DateTime<Utc>,
    ages: Vec<TimeDelta>,
}

impl MessageFactory {
    /// Creates a factory anchored at the current time.
    pub fn new() -> Self {
        Self {
            now: Utc::now(),
            ages: Vec::new(),
        }
    }

    /// Anchors message timestamps to a fixed instant instead of the current time.
    pub fn now(mut self, now: DateTime<Utc>) -> Self {
        self.now = now;
        self
    }

    /// Appends `count` messages that are eligible for bulk deletion.
    pub fn recent(self, count: usize) -> Self {
        self.aged(count, TimeDelta::minutes(RECENT_AGE_MINUTES))
    }

    /// Appends `count` messages older than the bulk-delete cutoff.
    pub fn old(self, count: usize) -> Self {
        self.aged(count, TimeDelta::days(OLD_AGE_DAYS))
    }

    /// Appends `count` messages at least `age` old.
    ///
    /// Each message is one second older than the previous one so the list stays ordered.
    pub fn aged(mut self, count: usize, age: TimeDelta) -> Self {
        for _ in 0..count {
            let next = match self.ages.last() {
                Some(last) if *last >= age => *last + TimeDelta::seconds(1),
                _ => age,
            };
            self.ages.push(next);
        }
        self
    }

    /// Builds the messages newest-first with unique, strictly decreasing ids.
    pub fn build(self) -> Vec<MockMessage> {
        let count = self.ages.len() as u64;
        let first = reserve_ids(count.max(1));

        self.ages
            .iter()
            .enumerate()
            .map(|(index, age)| MockMessage {
                id: first + count - 1 - index as u64,
                timestamp: self.now - *age,
            })
            .collect()
    }
}

impl Default for MessageFactory {
    fn default() -> Self {
        Self::new()
    }
}
