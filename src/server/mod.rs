//! Server-side webhook backend and business logic.
//!
//! The bot runs as an HTTP service that Discord calls for every interaction. It answers
//! synchronously and performs long-running work, such as clearing a channel, on
//! background tasks that talk to Discord's REST API directly.
//!
//! # Architecture
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers and response encoding
//! - **Service Layer** (`service/`) - Interaction dispatch, `/clear`, and command registration
//! - **Discord Layer** (`discord/`) - Rate-limit aware REST client behind the `DiscordApi` trait
//! - **Model Layer** (`model/`) - Domain models for messages and clear runs
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state
//! - **Startup** (`startup`) - Logging, HTTP client, and command registration setup
//! - **Router** (`router`) - Axum route configuration
//!
//! # Request Flow
//!
//! 1. **Router** receives the interaction and routes it to the controller
//! 2. **Controller** decodes the payload and calls the interaction service
//! 3. **Service** answers immediately or schedules a background run and defers
//! 4. **Background run** pages through the channel and edits the deferred reply as it goes

pub mod config;
pub mod controller;
pub mod discord;
pub mod error;
pub mod model;
pub mod router;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
