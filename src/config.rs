use crate::executor::{TransportOptions, DEFAULT_TIMEOUT_MS};
use crate::history::DEFAULT_HISTORY_LIMIT;
use std::env;
use std::time::Duration;

pub struct Config {
    pub port: u16,
    pub request_timeout_ms: u64,
    pub history_limit: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup. Missing or unparsable values
    /// fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            port: lookup("PORT")
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            request_timeout_ms: lookup("REQUEST_TIMEOUT_MS")
                .and_then(|t| t.parse::<u64>().ok())
                .filter(|t| *t > 0)
                .unwrap_or(DEFAULT_TIMEOUT_MS),
            history_limit: lookup("HISTORY_LIMIT")
                .and_then(|l| l.parse::<usize>().ok())
                .filter(|l| *l > 0)
                .unwrap_or(DEFAULT_HISTORY_LIMIT),
        }
    }

    pub fn transport_options(&self) -> TransportOptions {
        TransportOptions {
            timeout: Duration::from_millis(self.request_timeout_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PORT", "8081"),
            ("REQUEST_TIMEOUT_MS", "1500"),
            ("HISTORY_LIMIT", "5"),
        ]);
        assert_eq!(config.port, 8081);
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.transport_options().timeout, Duration::from_millis(1500));
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = config_from(&[
            ("PORT", "not-a-port"),
            ("REQUEST_TIMEOUT_MS", "0"),
            ("HISTORY_LIMIT", "0"),
        ]);
        assert_eq!(config.port, 3000);
        assert_eq!(config.request_timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.history_limit, DEFAULT_HISTORY_LIMIT);
    }
}
