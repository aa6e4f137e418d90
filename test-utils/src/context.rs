use axum::http::Method;
use serde_json::Value;

use crate::server::{MockState, RecordedRequest};

/// Test context describing a running mock Discord server.
///
/// Point the client under test at `base_url`, run the scenario, then use the accessors to
/// inspect what the server received and what is left in the channel.
pub struct TestContext {
    /// Base URL of the mock server, e.g. `http://127.0.0.1:40123`, with no trailing slash.
    pub base_url: String,

    /// Shared state behind the server.
    pub state: MockState,
}

impl TestContext {
    /// Creates a context for a server already listening at `base_url`.
    pub fn new(base_url: String, state: MockState) -> Self {
        Self { base_url, state }
    }

    /// Every request received so far, in arrival order.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.lock().requests.clone()
    }

    /// Requests with the given method whose path ends with `path_suffix`.
    pub fn requests_matching(&self, method: Method, path_suffix: &str) -> Vec<RecordedRequest> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == method && r.path.ends_with(path_suffix))
            .cloned()
            .collect()
    }

    /// Message list requests, in arrival order.
    pub fn message_fetches(&self) -> Vec<RecordedRequest> {
        self.requests_matching(Method::GET, "/messages")
    }

    /// Id lists sent to the bulk-delete endpoint, in arrival order.
    pub fn bulk_deletes(&self) -> Vec<Vec<String>> {
        self.requests_matching(Method::POST, "/messages/bulk-delete")
            .iter()
            .map(|r| {
                r.body
                    .as_ref()
                    .and_then(|b| b.get("messages"))
                    .and_then(Value::as_array)
                    .map(|ids| {
                        ids.iter()
                            .map(|id| match id {
                                Value::String(id) => id.clone(),
                                other => other.to_string(),
                            })
                            .collect()
                    })
                    .unwrap_or_default()
            })
            .collect()
    }

    /// Message ids targeted by single-message deletes, in arrival order.
    pub fn single_deletes(&self) -> Vec<String> {
        self.state
            .lock()
            .requests
            .iter()
            .filter(|r| r.method == Method::DELETE && r.path.contains("/messages/"))
            .filter_map(|r| r.path.rsplit('/').next().map(str::to_string))
            .collect()
    }

    /// Content of every edit made to an original interaction response, in arrival order.
    pub fn edits(&self) -> Vec<String> {
        self.requests_matching(Method::PATCH, "/messages/@original")
            .iter()
            .filter_map(|r| {
                r.body
                    .as_ref()
                    .and_then(|b| b.get("content"))
                    .and_then(Value::as_str)
                    .map(str::to_string)
            })
            .collect()
    }

    /// Ids of the messages still present in the channel, newest-first.
    pub fn remaining_message_ids(&self) -> Vec<u64> {
        self.state.lock().messages.iter().map(|m| m.id).collect()
    }

    /// Commands stored by the most recent registration request.
    pub fn registered_commands(&self) -> Vec<Value> {
        self.state.lock().commands.clone()
    }
}
