//! ddtbot Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the ddtbot
//! application. This crate offers a builder pattern for creating test contexts around a mock
//! Discord REST server that runs on an ephemeral local port.
//!
//! # Overview
//!
//! The test utilities consist of these main components:
//! - **TestBuilder**: Fluent builder for seeding channel history and injecting failures
//! - **TestContext**: Running mock server plus accessors for every request it recorded
//! - **MessageFactory**: Newest-first message fixtures with controllable ages
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, factory::message::MessageFactory};
//!
//! #[tokio::test]
//! async fn clears_channel() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_messages(MessageFactory::new().recent(3).build())
//!         .build()
//!         .await?;
//!
//!     // Point a client at `test.base_url` and exercise it...
//!     assert_eq!(test.remaining_message_ids().len(), 3);
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
pub mod server;
