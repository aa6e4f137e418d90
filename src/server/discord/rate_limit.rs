use serde_json::Value;
use std::time::Duration;

/// Delay used when a 429 response does not say how long to wait.
pub const DEFAULT_FALLBACK_DELAY: Duration = Duration::from_millis(1000);

/// How long to wait before retrying a rate-limited request.
///
/// Rate-limited requests are retried without a retry-count cap; this policy only decides
/// the delay between attempts. Discord reports the delay as fractional seconds in the
/// `retry_after` field of the 429 body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Delay applied when `retry_after` is missing, non-numeric, negative, or the body is
    /// not JSON.
    pub fallback_delay: Duration,

    /// Upper bound applied to every delay, server-supplied or fallback.
    pub max_delay: Option<Duration>,
}

impl RetryPolicy {
    /// Policy that retries immediately. Intended for tests.
    pub fn immediate() -> Self {
        Self {
            fallback_delay: Duration::ZERO,
            max_delay: Some(Duration::ZERO),
        }
    }

    /// Computes the delay for a 429 response body.
    ///
    /// # Arguments
    /// - `body` - Raw body of the rate-limit response
    ///
    /// # Returns
    /// - `Duration` - `ceil(retry_after * 1000)` milliseconds, or the fallback, clamped to
    ///   `max_delay`
    pub fn delay_for(&self, body: &[u8]) -> Duration {
        let delay = parse_retry_after(body).unwrap_or(self.fallback_delay);

        match self.max_delay {
            Some(max) => delay.min(max),
            None => delay,
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            fallback_delay: DEFAULT_FALLBACK_DELAY,
            max_delay: None,
        }
    }
}

fn parse_retry_after(body: &[u8]) -> Option<Duration> {
    let value: Value = serde_json::from_slice(body).ok()?;
    let seconds = value.get("retry_after")?.as_f64()?;

    if !seconds.is_finite() || seconds < 0.0 {
        return None;
    }

    Some(Duration::from_millis((seconds * 1000.0).ceil() as u64))
}
