//! Shared helper utilities for factory methods.
//!
//! This module provides common utilities used across all factory modules,
//! such as unique snowflake generation.

/// Counter for generating unique snowflakes in tests.
///
/// Starts well above zero so generated ids look like real Discord snowflakes and never
/// collide with the small literal ids tests sometimes use.
static COUNTER: std::sync::atomic::AtomicU64 =
    std::sync::atomic::AtomicU64::new(1_000_000_000_000_000);

/// Gets the next unique counter value for test data.
///
/// This function provides monotonically increasing values for use in
/// generating unique test identifiers across all factories.
///
/// # Returns
/// - `u64` - Next unique counter value
pub fn next_id() -> u64 {
    COUNTER.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
}

/// Reserves a contiguous block of `count` ids and returns the first one.
///
/// # Arguments
/// - `count` - Number of ids to reserve
///
/// # Returns
/// - `u64` - First id of the reserved block
pub fn reserve_ids(count: u64) -> u64 {
    COUNTER.fetch_add(count, std::sync::atomic::Ordering::SeqCst)
}
