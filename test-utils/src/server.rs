//! Mock Discord REST server.
//!
//! Implements the handful of endpoints the bot talks to, enforcing the same constraints
//! Discord does where tests depend on them:
//!
//! - `GET /channels/{channel}/messages` - newest-first pages with `limit` and `before`
//! - `POST /channels/{channel}/messages/bulk-delete` - 2 to 100 ids, all younger than 14 days
//! - `DELETE /channels/{channel}/messages/{message}` - `10008 Unknown Message` when absent
//! - `PATCH /webhooks/{application}/{token}/messages/@original` - records the new content
//! - `PUT /applications/{application}[/guilds/{guild}]/commands` - echoes commands with ids
//!
//! Every request, including rate-limited and failed ones, is recorded in arrival order.

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use chrono::{TimeDelta, Utc};
use serde_json::{json, Value};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Instant,
};

use crate::factory::message::MockMessage;

/// Discord's bulk-delete age limit in days.
const BULK_DELETE_MAX_AGE_DAYS: i64 = 14;

/// A request received by the mock server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Option<Value>,
    pub status: StatusCode,
    pub received_at: Instant,
}

/// A persistent failure returned for every request matching `method` whose path ends with
/// `path_suffix`.
#[derive(Debug, Clone)]
pub struct InjectedFailure {
    pub method: Method,
    pub path_suffix: String,
    pub status: StatusCode,
    pub body: Value,
}

/// Mutable state behind the mock server.
#[derive(Debug, Default)]
pub struct MockDiscord {
    pub messages: Vec<MockMessage>,
    pub requests: Vec<RecordedRequest>,
    pub pending_rate_limits: u32,
    pub retry_after: Value,
    pub failures: Vec<InjectedFailure>,
    pub commands: Vec<Value>,
}

/// Shared handle to the mock server's state.
#[derive(Debug, Clone, Default)]
pub struct MockState {
    inner: Arc<Mutex<MockDiscord>>,
}

impl MockState {
    /// Wraps seeded state for sharing between the server and the test.
    pub fn new(discord: MockDiscord) -> Self {
        Self {
            inner: Arc::new(Mutex::new(discord)),
        }
    }

    /// Locks the state. A panicking handler never leaves the state half-written, so a
    /// poisoned lock is recovered rather than propagated.
    pub fn lock(&self) -> MutexGuard<'_, MockDiscord> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Builds the mock server's router. Routing is done by hand in a single fallback handler so
/// the static `bulk-delete` segment and the dynamic message id segment never compete.
pub fn router(state: MockState) -> Router {
    Router::new().fallback(handle).with_state(state)
}

async fn handle(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let body: Option<Value> = serde_json::from_str(&body).ok();
    let authorization = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);

    let mut discord = state.lock();
    let (status, payload) = discord.respond(&method, &path, &query, body.as_ref());

    discord.requests.push(RecordedRequest {
        method,
        path,
        query,
        authorization,
        body,
        status,
        received_at: Instant::now(),
    });

    match payload {
        Some(payload) => (status, Json(payload)).into_response(),
        None => status.into_response(),
    }
}

impl MockDiscord {
    fn respond(
        &mut self,
        method: &Method,
        path: &str,
        query: &HashMap<String, String>,
        body: Option<&Value>,
    ) -> (StatusCode, Option<Value>) {
        if self.pending_rate_limits > 0 {
            self.pending_rate_limits -= 1;
            return (
                StatusCode::TOO_MANY_REQUESTS,
                Some(json!({
                    "message": "You are being rate limited.",
                    "retry_after": self.retry_after,
                    "global": false,
                })),
            );
        }

        if let Some(failure) = self
            .failures
            .iter()
            .find(|f| f.method == *method && path.ends_with(&f.path_suffix))
        {
            return (failure.status, Some(failure.body.clone()));
        }

        let segments: Vec<&str> = path.trim_matches('/').split('/').collect();

        match (method.as_str(), segments.as_slice()) {
            ("GET", ["channels", channel, "messages"]) => {
                (StatusCode::OK, Some(self.list_messages(channel, query)))
            }
            ("POST", ["channels", _, "messages", "bulk-delete"]) => self.bulk_delete(body),
            ("DELETE", ["channels", _, "messages", message]) => self.delete_message(message),
            ("PATCH", ["webhooks", _, _, "messages", "@original"]) => {
                let content = body
                    .and_then(|b| b.get("content"))
                    .cloned()
                    .unwrap_or(Value::Null);
                (StatusCode::OK, Some(json!({ "id": "1", "content": content })))
            }
            ("PUT", ["applications", _, "commands"])
            | ("PUT", ["applications", _, "guilds", _, "commands"]) => {
                self.register_commands(body)
            }
            _ => (
                StatusCode::NOT_FOUND,
                Some(json!({ "message": "404: Not Found", "code": 0 })),
            ),
        }
    }

    fn list_messages(&self, channel: &str, query: &HashMap<String, String>) -> Value {
        let limit = query
            .get("limit")
            .and_then(|l| l.parse::<usize>().ok())
            .unwrap_or(50)
            .min(100);
        let before = query.get("before").and_then(|b| b.parse::<u64>().ok());

        let page: Vec<Value> = self
            .messages
            .iter()
            .filter(|m| before.map_or(true, |before| m.id < before))
            .take(limit)
            .map(|m| m.to_json(channel))
            .collect();

        Value::Array(page)
    }

    fn bulk_delete(&mut self, body: Option<&Value>) -> (StatusCode, Option<Value>) {
        let ids: Vec<u64> = body
            .and_then(|b| b.get("messages"))
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| match id {
                        Value::String(id) => id.parse().ok(),
                        other => other.as_u64(),
                    })
                    .collect()
            })
            .unwrap_or_default();

        if !(2..=100).contains(&ids.len()) {
            return (
                StatusCode::BAD_REQUEST,
                Some(json!({
                    "message": "Invalid Form Body",
                    "code": 50035,
                })),
            );
        }

        let now = Utc::now();
        let cutoff = TimeDelta::days(BULK_DELETE_MAX_AGE_DAYS);
        let too_old = self
            .messages
            .iter()
            .any(|m| ids.contains(&m.id) && m.age(now) >= cutoff);
        if too_old {
            return (
                StatusCode::BAD_REQUEST,
                Some(json!({
                    "message": "You can only bulk delete messages that are under 14 days old.",
                    "code": 50034,
                })),
            );
        }

        self.messages.retain(|m| !ids.contains(&m.id));
        (StatusCode::NO_CONTENT, None)
    }

    fn delete_message(&mut self, message: &str) -> (StatusCode, Option<Value>) {
        let id = message.parse::<u64>().ok();
        let before = self.messages.len();
        self.messages.retain(|m| Some(m.id) != id);

        if self.messages.len() == before {
            return (
                StatusCode::NOT_FOUND,
                Some(json!({ "message": "Unknown Message", "code": 10008 })),
            );
        }

        (StatusCode::NO_CONTENT, None)
    }

    fn register_commands(&mut self, body: Option<&Value>) -> (StatusCode, Option<Value>) {
        let commands = body.and_then(Value::as_array).cloned().unwrap_or_default();

        let registered: Vec<Value> = commands
            .iter()
            .enumerate()
            .map(|(index, command)| {
                let mut command = command.clone();
                if let Some(object) = command.as_object_mut() {
                    object.insert("id".to_string(), json!((900 + index).to_string()));
                }
                command
            })
            .collect();

        self.commands = registered.clone();
        (StatusCode::OK, Some(Value::Array(registered)))
    }
}
