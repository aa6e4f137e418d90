//! Domain types for the `/clear` command.

use std::{fmt, num::NonZeroU64};

use crate::server::error::validation::ValidationError;

/// Largest page Discord returns from the message list endpoint, which is also the most ids
/// a single bulk delete accepts.
pub const MAX_PAGE_SIZE: u8 = 100;

/// How many messages a clear run should delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    /// Stop after this many messages are removed.
    Count(NonZeroU64),
    /// Keep going until the channel is exhausted.
    All,
}

impl DeletionTarget {
    /// Parses the `amount` option of the command.
    ///
    /// Accepts `all` in any casing, or a decimal integer of at least 1. Surrounding
    /// whitespace is ignored.
    ///
    /// # Arguments
    /// - `raw` - The option value as the user typed it
    ///
    /// # Returns
    /// - `Ok(DeletionTarget)` - Parsed target
    /// - `Err(ValidationError::MissingAmount)` - Value was empty
    /// - `Err(ValidationError::InvalidAmount)` - Value was zero, negative, or not a number
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        let value = raw.trim();

        if value.is_empty() {
            return Err(ValidationError::MissingAmount);
        }

        if value.eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }

        value
            .parse::<u64>()
            .ok()
            .and_then(NonZeroU64::new)
            .map(Self::Count)
            .ok_or_else(|| ValidationError::InvalidAmount(value.to_string()))
    }

    /// Messages still to delete after `deleted` have gone, or `None` when unbounded.
    pub fn remaining(&self, deleted: u64) -> Option<u64> {
        match self {
            Self::Count(target) => Some(target.get().saturating_sub(deleted)),
            Self::All => None,
        }
    }

    /// Whether a run that has deleted `deleted` messages should stop.
    pub fn is_reached(&self, deleted: u64) -> bool {
        self.remaining(deleted) == Some(0)
    }

    /// Page size for the next fetch: `min(100, remaining)`.
    pub fn page_limit(&self, deleted: u64) -> u8 {
        match self.remaining(deleted) {
            Some(remaining) => remaining.min(u64::from(MAX_PAGE_SIZE)) as u8,
            None => MAX_PAGE_SIZE,
        }
    }
}

impl fmt::Display for DeletionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Count(target) => write!(f, "{}", target),
            Self::All => f.write_str("all"),
        }
    }
}

/// Phase of a clear run, used only to pick the progress text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stage {
    Preparing,
    FastDeleting,
    SlowDeleting,
    Done,
    /// The run was aborted; carries the reason shown to the user.
    Error(String),
}

/// Progress of a single clear run.
///
/// Owned and mutated by the deletion engine, read by the progress reporter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressState {
    pub stage: Stage,
    pub deleted: u64,
}

impl ProgressState {
    pub fn new() -> Self {
        Self {
            stage: Stage::Preparing,
            deleted: 0,
        }
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new()
    }
}
