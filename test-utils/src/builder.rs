use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use crate::{
    context::TestContext,
    error::TestError,
    factory::message::MockMessage,
    server::{self, InjectedFailure, MockDiscord, MockState},
};

/// Builder for creating test contexts backed by a mock Discord REST server.
///
/// Provides a fluent interface for seeding channel history and scripting failures, then
/// call `build()` to start the server on an ephemeral local port.
///
/// # Example
///
/// ```rust,ignore
/// use test_utils::{builder::TestBuilder, factory::message::MessageFactory};
///
/// let test = TestBuilder::new()
///     .with_messages(MessageFactory::new().recent(5).build())
///     .with_rate_limits(1, 0.5)
///     .build()
///     .await?;
/// ```
pub struct TestBuilder {
    /// Channel history served newest-first by the message list endpoint.
    messages: Vec<MockMessage>,

    /// Number of leading requests answered with `429 Too Many Requests`.
    rate_limits: u32,

    /// Raw `retry_after` value placed in each 429 body.
    ///
    /// Kept as a JSON value so tests can send non-numeric values and exercise the
    /// client's fallback delay.
    retry_after: Value,

    /// Failures returned for every matching request.
    failures: Vec<InjectedFailure>,
}

impl TestBuilder {
    /// Creates a new test builder with an empty channel and no scripted failures.
    ///
    /// # Returns
    /// - New `TestBuilder` instance
    pub fn new() -> Self {
        Self {
            messages: Vec::new(),
            rate_limits: 0,
            retry_after: json!(0),
            failures: Vec::new(),
        }
    }

    /// Adds messages to the mock channel's history.
    ///
    /// Messages must be newest-first, which is what `MessageFactory::build()` produces.
    /// Appending multiple batches keeps them in call order.
    ///
    /// # Arguments
    /// - `messages` - Newest-first messages to append
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_messages(mut self, messages: Vec<MockMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    /// Answers the first `count` requests with a rate-limit response.
    ///
    /// # Arguments
    /// - `count` - Number of requests to rate limit
    /// - `retry_after` - Value of the `retry_after` field, normally seconds as a number
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_rate_limits(mut self, count: u32, retry_after: impl Into<Value>) -> Self {
        self.rate_limits = count;
        self.retry_after = retry_after.into();
        self
    }

    /// Fails every request with `method` whose path ends with `path_suffix`.
    ///
    /// # Arguments
    /// - `method` - HTTP method to match
    /// - `path_suffix` - Suffix of the request path to match, e.g. `/messages/@original`
    /// - `status` - Status code to return
    /// - `body` - JSON error body to return
    ///
    /// # Returns
    /// - `Self` - Builder instance for method chaining
    pub fn with_failure(
        mut self,
        method: Method,
        path_suffix: impl Into<String>,
        status: StatusCode,
        body: Value,
    ) -> Self {
        self.failures.push(InjectedFailure {
            method,
            path_suffix: path_suffix.into(),
            status,
            body,
        });
        self
    }

    /// Starts the mock server and returns a context pointing at it.
    ///
    /// The server runs on a spawned task for the rest of the test's runtime.
    ///
    /// # Returns
    /// - `Ok(TestContext)` - Running server and shared state
    /// - `Err(TestError::Io)` - Failed to bind a local port
    pub async fn build(self) -> Result<TestContext, TestError> {
        let state = MockState::new(MockDiscord {
            messages: self.messages,
            pending_rate_limits: self.rate_limits,
            retry_after: self.retry_after,
            failures: self.failures,
            ..Default::default()
        });

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let address = listener.local_addr()?;

        let app = server::router(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(TestContext::new(format!("http://{}", address), state))
    }
}

impl Default for TestBuilder {
    fn default() -> Self {
        Self::new()
    }
}
