//! Environment helpers shared by the provider configs.

use std::time::Duration;

const UPSTREAM_TIMEOUT_ENV: &str = "UPSTREAM_TIMEOUT_SECS";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 30;

/// Reads a variable, treating an empty value as unset.
pub fn non_empty(lookup: &impl Fn(&str) -> Option<String>, key: &str) -> Option<String> {
    lookup(key)
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Timeout applied to every outbound provider request. Falls back to the
/// default when unset or unparseable.
pub fn upstream_timeout(lookup: &impl Fn(&str) -> Option<String>) -> Duration {
    let secs = non_empty(lookup, UPSTREAM_TIMEOUT_ENV)
        .and_then(|v| v.parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_UPSTREAM_TIMEOUT_SECS);
    Duration::from_secs(secs)
}
