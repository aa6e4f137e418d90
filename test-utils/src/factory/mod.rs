//! Factories for creating Discord fixtures with sensible defaults.
//!
//! Each factory follows the builder pattern used across the test suite: start from `new()`,
//! customise with chained methods, then call `build()`.

pub mod helpers;
pub mod message;
