use reqwest::{header::AUTHORIZATION, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use serenity::all::{ApplicationId, ChannelId, MessageId};
use serenity::async_trait;

use crate::server::{
    discord::{rate_limit::RetryPolicy, DiscordApi},
    error::discord::DiscordError,
    model::message::MessagePage,
};

/// Discord REST client authenticated as the bot.
///
/// Every request carries `Authorization: Bot {token}`. A `429 Too Many Requests` response is
/// retried after the delay chosen by the `RetryPolicy`, indefinitely; any other non-success
/// status fails the call with `DiscordError::Api`.
///
/// The token is supplied once at construction and never leaves the client.
#[derive(Clone)]
pub struct DiscordClient {
    http: reqwest::Client,
    base_url: String,
    authorization: String,
    retry: RetryPolicy,
}

impl DiscordClient {
    /// Creates a new client.
    ///
    /// # Arguments
    /// - `http` - Shared reqwest client
    /// - `base_url` - API root including version, e.g. `https://discord.com/api/v10`
    /// - `token` - Bot token, without the `Bot ` prefix
    /// - `retry` - Delay policy for rate-limited requests
    ///
    /// # Returns
    /// - `DiscordClient` - New client instance
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        token: &str,
        retry: RetryPolicy,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        Self {
            http,
            base_url,
            authorization: format!("Bot {}", token),
            retry,
        }
    }

    /// Sends a request and returns the raw success body.
    ///
    /// Rate-limited attempts are retried with the identical method, path, and body until
    /// Discord accepts the request; the caller only ever observes the final outcome.
    ///
    /// # Arguments
    /// - `method` - HTTP method
    /// - `path` - Path relative to the API root, starting with `/`, including any query
    /// - `body` - Optional JSON body
    ///
    /// # Returns
    /// - `Ok(Vec<u8>)` - Body of the 2xx response (empty for 204)
    /// - `Err(DiscordError::Api)` - Discord answered with a non-2xx status other than 429
    /// - `Err(DiscordError::Transport)` - The request could not be sent or read
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<Vec<u8>, DiscordError> {
        let url = format!("{}{}", self.base_url, path);

        loop {
            let mut request = self
                .http
                .request(method.clone(), &url)
                .header(AUTHORIZATION, &self.authorization);
            if let Some(body) = body {
                request = request.json(body);
            }

            let response = request.send().await?;
            let status = response.status();

            if status == StatusCode::TOO_MANY_REQUESTS {
                let body = response.bytes().await.unwrap_or_default();
                let delay = self.retry.delay_for(&body);

                tracing::warn!(
                    "Hit Discord rate limit on {} {}, retrying after {}ms",
                    method,
                    path,
                    delay.as_millis()
                );

                tokio::time::sleep(delay).await;
                continue;
            }

            let bytes = response.bytes().await?;

            if !status.is_success() {
                return Err(DiscordError::Api {
                    method,
                    path: path.to_string(),
                    status,
                    body: String::from_utf8_lossy(&bytes).into_owned(),
                });
            }

            return Ok(bytes.to_vec());
        }
    }

    /// Sends a request and decodes the JSON success body.
    ///
    /// # Returns
    /// - `Ok(T)` - Decoded response
    /// - `Err(DiscordError::Decode)` - The body did not match `T`
    /// - `Err(DiscordError)` - Any error from `request`
    pub async fn request_json<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<T, DiscordError> {
        let bytes = self.request(method, path, body).await?;

        serde_json::from_slice(&bytes).map_err(|source| DiscordError::Decode {
            path: path.to_string(),
            source,
        })
    }
}

#[async_trait]
impl DiscordApi for DiscordClient {
    async fn fetch_messages(
        &self,
        channel_id: ChannelId,
        limit: u8,
        before: Option<MessageId>,
    ) -> Result<MessagePage, DiscordError> {
        let mut path = format!("/channels/{}/messages?limit={}", channel_id, limit);
        if let Some(before) = before {
            path.push_str(&format!("&before={}", before));
        }

        self.request_json(Method::GET, &path, None).await
    }

    async fn bulk_delete_messages(
        &self,
        channel_id: ChannelId,
        message_ids: &[MessageId],
    ) -> Result<(), DiscordError> {
        let ids: Vec<String> = message_ids.iter().map(|id| id.to_string()).collect();
        let path = format!("/channels/{}/messages/bulk-delete", channel_id);

        self.request(Method::POST, &path, Some(&json!({ "messages": ids })))
            .await?;

        Ok(())
    }

    async fn delete_message(
        &self,
        channel_id: ChannelId,
        message_id: MessageId,
    ) -> Result<(), DiscordError> {
        let path = format!("/channels/{}/messages/{}", channel_id, message_id);

        self.request(Method::DELETE, &path, None).await?;

        Ok(())
    }

    async fn edit_original_response(
        &self,
        application_id: ApplicationId,
        interaction_token: &str,
        content: &str,
    ) -> Result<(), DiscordError> {
        let path = format!(
            "/webhooks/{}/{}/messages/@original",
            application_id, interaction_token
        );

        self.request(Method::PATCH, &path, Some(&json!({ "content": content })))
            .await?;

        Ok(())
    }
}
