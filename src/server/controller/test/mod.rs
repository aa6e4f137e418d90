use serde_json::{json, Value};
use std::sync::Arc;
use test_utils::{builder::TestBuilder, context::TestContext};
use tokio::net::TcpListener;
use tokio_util::task::TaskTracker;

use crate::server::{
    discord::{DiscordApi, DiscordClient, RetryPolicy},
    router::router,
    service::clear::{engine::ClearPacing, ClearCommand},
    state::AppState,
};

mod interaction;

/// A running copy of the bot's HTTP server wired to a mock Discord API.
pub struct TestApp {
    pub url: String,
    pub tasks: TaskTracker,
    pub discord: TestContext,
    pub http: reqwest::Client,
}

impl TestApp {
    pub async fn spawn(discord: TestContext) -> Self {
        let client = DiscordClient::new(
            reqwest::Client::new(),
            discord.base_url.clone(),
            "test-token",
            RetryPolicy::immediate(),
        );
        let api: Arc<dyn DiscordApi> = Arc::new(client);
        let tasks = TaskTracker::new();
        let clear = ClearCommand::new(api, ClearPacing::immediate(), tasks.clone());
        let app = router().with_state(AppState::new(clear, tasks.clone()));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            url: format!("http://{}", address),
            tasks,
            discord,
            http: reqwest::Client::new(),
        }
    }

    pub async fn empty() -> Self {
        Self::spawn(TestBuilder::new().build().await.unwrap()).await
    }

    pub async fn post_interaction(&self, body: String) -> reqwest::Response {
        self.http
            .post(format!("{}/api/interactions", self.url))
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap()
    }

    pub async fn finish_runs(&self) {
        self.tasks.close();
        self.tasks.wait().await;
    }
}

pub fn clear_payload(amount: &str) -> Value {
    json!({
        "id": "1",
        "type": 2,
        "application_id": "77",
        "token": "interaction-token",
        "channel_id": "4242",
        "data": {
            "id": "9",
            "name": "clear",
            "type": 1,
            "options": [{ "name": "amount", "type": 3, "value": amount }]
        }
    })
}
