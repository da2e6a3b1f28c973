//! Client configuration.

use std::env;
use std::time::Duration;

use dynaccess_model::types::ReturnConsumedCapacity;

/// Defaults applied by every [`TableConnection`](crate::TableConnection).
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// `ReturnConsumedCapacity` sent when a call does not choose one.
    pub return_consumed_capacity: ReturnConsumedCapacity,
    /// Longest single sleep of a rate-limited scan.
    pub scan_max_sleep: Duration,
    /// Throttles in a row before a rate-limited scan gives up.
    pub scan_max_consecutive_exceptions: u32,
    /// First backoff after a throttled scan page; doubles on each repeat.
    pub scan_initial_backoff: Duration,
    /// Keep scanning when pages carry no `ConsumedCapacity`.
    pub scan_allow_without_consumed_capacity: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            return_consumed_capacity: ReturnConsumedCapacity::Total,
            scan_max_sleep: Duration::from_millis(10_000),
            scan_max_consecutive_exceptions: 30,
            scan_initial_backoff: Duration::from_millis(100),
            scan_allow_without_consumed_capacity: false,
        }
    }
}

impl ClientConfig {
    /// Create configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `DYNACCESS_RETURN_CONSUMED_CAPACITY` | `TOTAL` |
    /// | `DYNACCESS_SCAN_MAX_SLEEP_MS` | `10000` |
    /// | `DYNACCESS_SCAN_MAX_CONSECUTIVE_EXCEPTIONS` | `30` |
    /// | `DYNACCESS_SCAN_INITIAL_BACKOFF_MS` | `100` |
    /// | `DYNACCESS_SCAN_ALLOW_WITHOUT_CONSUMED_CAPACITY` | `false` |
    ///
    /// Unparsable values keep the default.
    #[must_use]
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(v) = env::var("DYNACCESS_RETURN_CONSUMED_CAPACITY") {
            match v.parse() {
                Ok(level) => config.return_consumed_capacity = level,
                Err(e) => tracing::warn!(error = %e, "ignoring DYNACCESS_RETURN_CONSUMED_CAPACITY"),
            }
        }
        if let Some(ms) = env_u64("DYNACCESS_SCAN_MAX_SLEEP_MS") {
            config.scan_max_sleep = Duration::from_millis(ms);
        }
        if let Some(n) = env_u64("DYNACCESS_SCAN_MAX_CONSECUTIVE_EXCEPTIONS") {
            config.scan_max_consecutive_exceptions = u32::try_from(n).unwrap_or(u32::MAX);
        }
        if let Some(ms) = env_u64("DYNACCESS_SCAN_INITIAL_BACKOFF_MS") {
            config.scan_initial_backoff = Duration::from_millis(ms);
        }
        config.scan_allow_without_consumed_capacity = env_bool(
            "DYNACCESS_SCAN_ALLOW_WITHOUT_CONSUMED_CAPACITY",
            config.scan_allow_without_consumed_capacity,
        );

        config
    }
}

fn env_u64(key: &str) -> Option<u64> {
    env::var(key).ok().and_then(|v| v.trim().parse().ok())
}

fn env_bool(key: &str, default: bool) -> bool {
    env::var(key).map_or(default, |v| parse_bool(&v))
}

fn parse_bool(value: &str) -> bool {
    matches!(
        value.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_create_default_config() {
        let config = ClientConfig::default();
        assert_eq!(
            config.return_consumed_capacity,
            ReturnConsumedCapacity::Total
        );
        assert_eq!(config.scan_max_sleep, Duration::from_secs(10));
        assert_eq!(config.scan_max_consecutive_exceptions, 30);
        assert!(!config.scan_allow_without_consumed_capacity);
    }

    #[test]
    fn test_should_parse_bool_values() {
        assert!(parse_bool("true"));
        assert!(parse_bool("TRUE"));
        assert!(parse_bool("1"));
        assert!(parse_bool("yes"));
        assert!(!parse_bool("false"));
        assert!(!parse_bool("0"));
        assert!(!parse_bool(""));
    }

    #[test]
    fn test_should_load_from_env() {
        let config = ClientConfig::from_env();
        assert!(config.scan_max_consecutive_exceptions > 0);
    }
}
