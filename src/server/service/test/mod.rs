use serde_json::json;
use serenity::all::{ApplicationId, GuildId};
use std::sync::Arc;
use test_utils::{builder::TestBuilder, context::TestContext};
use tokio_util::task::TaskTracker;

use crate::{
    model::interaction::Interaction,
    server::{
        discord::{DiscordApi, DiscordClient, RetryPolicy},
        service::clear::{engine::ClearPacing, ClearCommand},
    },
};


pub fn client(test: &TestContext) -> DiscordClient {
    DiscordClient::new(
        reqwest::Client::new(),
        test.base_url.clone(),
        "test-token",
        RetryPolicy::immediate(),
    )
}

pub fn clear_command(test: &TestContext, tasks: &TaskTracker) -> ClearCommand {
    let api: Arc<dyn DiscordApi> = Arc::new(client(test));
    ClearCommand::new(api, ClearPacing::immediate(), tasks.clone())
}

pub fn interaction(payload: serde_json::Value) -> Interaction {
    serde_json::from_value(payload).unwrap()
}

pub fn command_interaction(name: &str, options: serde_json::Value) -> Interaction {
    interaction(json!({
        "type": 2,
        "application_id": "77",
        "token": "interaction-token",
        "channel_id": "4242",
        "data": { "name": name, "options": options }
    }))
}
