use reqwest::{Method, StatusCode};
use serde_json::json;
use serenity::all::{ApplicationId, ChannelId, MessageId};
use serenity::async_trait;
use std::{
    collections::{HashMap, HashSet},
    num::NonZeroU64,
    sync::{Arc, Mutex},
};
use tokio::time::Instant;

use crate::{
    model::interaction::Interaction,
    server::{
        discord::DiscordApi,
        error::discord::{DiscordError, UNKNOWN_MESSAGE},
        model::{
            clear::{DeletionTarget, Stage},
            message::{MessagePage, MessageRecord},
        },
        service::clear::{
            engine::{ClearPacing, DeletionEngine},
            progress::{InteractionWebhook, ProgressReporter},
        },
    },
};
use test_utils::factory::message::{MessageFactory, MockMessage};


/// A call received by `FakeDiscord`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Fetch {
        limit: u8,
        before: Option<MessageId>,
    },
    BulkDelete(Vec<MessageId>),
    Delete(MessageId),
    Edit(String),
}

#[derive(Default)]
struct FakeState {
    messages: Vec<MessageRecord>,
    calls: Vec<(Instant, Call)>,
    failing_deletes: HashMap<MessageId, (StatusCode, u64)>,
    deleted_elsewhere: HashSet<MessageId>,
    failing_edits: bool,
    panic_on_fetch: bool,
    panic_on_delete: Option<usize>,
    delete_attempts: usize,
}

/// In-memory stand-in for the Discord API with the same paging and bulk-delete rules.
#[derive(Default)]
pub struct FakeDiscord {
    state: Mutex<FakeState>,
}

impl FakeDiscord {
    /// Seeds the fake with newest-first messages from `MessageFactory`.
    pub fn with_messages(messages: Vec<MockMessage>) -> Self {
        let fake = Self::default();
        fake.lock().messages = messages
            .into_iter()
            .map(|m| MessageRecord {
                id: MessageId::new(m.id),
                timestamp: m.timestamp,
            })
            .collect();
        fake
    }

    /// Makes deleting `id` fail with `status` and Discord error `code`.
    pub fn failing_delete(self, id: MessageId, status: StatusCode, code: u64) -> Self {
        self.lock().failing_deletes.insert(id, (status, code));
        self
    }

    /// Keeps `id` in listings but answers its deletion with Unknown Message, as if another
    /// moderator removed it between the fetch and the delete.
    pub fn deleted_elsewhere(self, id: MessageId) -> Self {
        self.lock().deleted_elsewhere.insert(id);
        self
    }

    /// Makes every progress edit fail.
    pub fn failing_edits(self) -> Self {
        self.lock().failing_edits = true;
        self
    }

    /// Makes the first fetch panic.
    pub fn panicking_fetch(self) -> Self {
        self.lock().panic_on_fetch = true;
        self
    }

    /// Makes the `nth` single-message delete (1-based) panic.
    pub fn panicking_delete(self, nth: usize) -> Self {
        self.lock().panic_on_delete = Some(nth);
        self
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, FakeState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }

    fn record(&self, call: Call) {
        self.lock().calls.push((Instant::now(), call));
    }

    pub fn calls(&self) -> Vec<Call> {
        self.lock().calls.iter().map(|(_, c)| c.clone()).collect()
    }

    pub fn fetches(&self) -> Vec<(u8, Option<MessageId>)> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Fetch { limit, before } => Some((limit, before)),
                _ => None,
            })
            .collect()
    }

    pub fn bulk_deletes(&self) -> Vec<Vec<MessageId>> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::BulkDelete(ids) => Some(ids),
                _ => None,
            })
            .collect()
    }

    pub fn single_deletes(&self) -> Vec<MessageId> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Delete(id) => Some(id),
                _ => None,
            })
            .collect()
    }

    /// Instants at which single-message deletes arrived.
    pub fn single_delete_times(&self) -> Vec<Instant> {
        self.lock()
            .calls
            .iter()
            .filter(|(_, c)| matches!(c, Call::Delete(_)))
            .map(|(at, _)| *at)
            .collect()
    }

    /// Instants at which fetches arrived.
    pub fn fetch_times(&self) -> Vec<Instant> {
        self.lock()
            .calls
            .iter()
            .filter(|(_, c)| matches!(c, Call::Fetch { .. }))
            .map(|(at, _)| *at)
            .collect()
    }

    pub fn edits(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                Call::Edit(content) => Some(content),
                _ => None,
            })
            .collect()
    }

    pub fn remaining(&self) -> Vec<MessageId> {
        self.lock().messages.iter().map(|m| m.id).collect()
    }
}

fn api_error(method: Method, path: String, status: StatusCode, code: u64) -> DiscordError {
    DiscordError::Api {
        method,
        path,
        status,
        body: json!({ "message": "fake failure", "code": code }).to_string(),
    }
}

#[async_trait]
impl DiscordApi for FakeDiscord {
    async fn fetch_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
        before: Option<MessageId>,
    ) -> Result<MessagePage, DiscordError> {
        self.record(Call::Fetch { limit, before });

        let mut state = self.lock();
        if state.panic_on_fetch {
            state.panic_on_fetch = false;
            drop(state);
            panic!("fetch exploded in channel {}", channel_id);
        }

        Ok(state
            .messages
            .iter()
            .filter(|m| before.map_or(true, |before| m.id.get() < before.get()))
            .take(usize::from(limit))
            .cloned()
            .collect())
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<(), DiscordError> {
        self.record(Call::BulkDelete(message_ids.to_vec()));

        if !(2..=100).contains(&message_ids.len()) {
            return Err(api_error(
                Method::POST,
                format!("/channels/{}/messages/bulk-delete", channel_id),
                StatusCode::BAD_REQUEST,
                50035,
            ));
        }

        self.lock()
            .messages
            .retain(|m| !message_ids.contains(&m.id));
        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DiscordError> {
        self.record(Call::Delete(message_id));
        let path = format!("/channels/{}/messages/{}", channel_id, message_id);

        let mut state = self.lock();
        state.delete_attempts += 1;
        if state.panic_on_delete == Some(state.delete_attempts) {
            drop(state);
            panic!("delete of {} exploded in channel {}", message_id, channel_id);
        }

        if let Some((status, code)) = state.failing_deletes.get(&message_id).copied() {
            return Err(api_error(Method::DELETE, path, status, code));
        }

        let before = state.messages.len();
        state.messages.retain(|m| m.id != message_id);
        let removed = state.messages.len() < before;

        if !removed || state.deleted_elsewhere.contains(&message_id) {
            return Err(api_error(
                Method::DELETE,
                path,
                StatusCode::NOT_FOUND,
                UNKNOWN_MESSAGE,
            ));
        }

        Ok(())
    }

    async fn edit_original_response(
        &self,
        _application_id: ApplicationId,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), DiscordError> {
        self.record(Call::Edit(content.to_string()));

        if self.lock().failing_edits {
            return Err(api_error(
                Method::PATCH,
                format!("/webhooks/1/{}/messages/@original", interaction_token),
                StatusCode::UNAUTHORIZED,
                50027,
            ));
        }

        Ok(())
    }
}

pub fn channel() -> ChannelId {
    ChannelId::new(4242)
}

pub fn count(n: u64) -> DeletionTarget {
    DeletionTarget::Count(NonZeroU64::new(n).unwrap())
}

/// Builds an engine over `fake` reporting to a dummy interaction.
pub fn engine(
    fake: &Arc<FakeDiscord>,
    target: DeletionTarget,
    pacing: ClearPacing,
) -> DeletionEngine {
    let api: Arc<dyn DiscordApi> = fake.clone();
    let webhook = InteractionWebhook {
        application_id: ApplicationId::new(1),
        token: "interaction-token".to_string(),
    };
    let reporter = ProgressReporter::new(api.clone(), webhook, target);

    DeletionEngine::new(api, reporter, pacing)
}

/// Builds a `/clear` interaction, with `amount` omitted when `None`.
pub fn clear_interaction(amount: Option<&str>) -> Interaction {
    let options = match amount {
        Some(amount) => json!([{ "name": "amount", "type": 3, "value": amount }]),
        None => json!([]),
    };

    serde_json::from_value(json!({
        "id": "1",
        "type": 2,
        "application_id": "1",
        "token": "interaction-token",
        "channel_id": channel().get().to_string(),
        "data": { "id": "9", "name": "clear", "type": 1, "options": options }
    }))
    .unwrap()
}

pub fn ids(messages: &[MockMessage]) -> Vec<MessageId> {
    messages.iter().map(|m| MessageId::new(m.id)).collect()
}

pub fn recent(n: usize) -> Vec<MockMessage> {
    MessageFactory::new().recent(n).build()
}

pub fn old(n: usize) -> Vec<MockMessage> {
    MessageFactory::new().old(n).build()
}

pub fn is_error(stage: &Stage) -> bool {
    matches!(stage, Stage::Error(_))
}
