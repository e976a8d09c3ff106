//! Retry-After handling for throttled requests
//!
//! The server answers `429 Too Many Requests` when a key exceeds its rate
//! limit. The `Retry-After` header is either a number of seconds or an
//! HTTP-date.

use std::time::Duration;

use tracing::warn;

/// Default retry-after duration when the header is missing or unparseable
pub const DEFAULT_RETRY_AFTER: Duration = Duration::from_secs(5);

/// Maximum number of retries for 429 responses
pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Longest wait honoured from an HTTP-date header
const MAX_RETRY_AFTER_SECS: u64 = 3600;

/// Parses a `Retry-After` header value, falling back to `default`
pub fn parse_retry_after(value: &str, default: Duration) -> Duration {
    if let Ok(seconds) = value.trim().parse::<u64>() {
        return Duration::from_secs(seconds);
    }

    if let Ok(date) = chrono::DateTime::parse_from_rfc2822(value.trim()) {
        let diff = date.with_timezone(&chrono::Utc) - chrono::Utc::now();
        if let Some(secs) = u64::try_from(diff.num_seconds())
            .ok()
            .filter(|&s| s <= MAX_RETRY_AFTER_SECS)
        {
            return Duration::from_secs(secs);
        }
    }

    warn!(value, "Could not parse Retry-After header, using default");
    default
}
