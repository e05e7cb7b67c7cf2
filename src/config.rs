//! Process configuration read from the environment (and `.env`, if present).

use std::env;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

pub const ENV_PREFIX: &str = "CONSOLE_CHARTS_";

#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// Base URL of the console API that serves `/api/tenants/{id}/counters/*`.
    pub counters_base_url: String,
    pub counters_token: Option<String>,
    pub request_timeout: Duration,
    pub log_dir: String,
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            counters_base_url: "http://localhost:3010".to_string(),
            counters_token: None,
            request_timeout: Duration::from_secs(30),
            log_dir: "logs".to_string(),
            log_filter: "info".to_string(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup; missing keys keep
    /// their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| {
            lookup(&format!("{ENV_PREFIX}{name}"))
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            host: get("HOST").unwrap_or(defaults.host),
            port: parse_or(get("PORT"), "PORT", defaults.port),
            counters_base_url: get("COUNTERS_BASE_URL").unwrap_or(defaults.counters_base_url),
            counters_token: get("COUNTERS_TOKEN"),
            request_timeout: Duration::from_secs(parse_or(
                get("REQUEST_TIMEOUT_SECS"),
                "REQUEST_TIMEOUT_SECS",
                defaults.request_timeout.as_secs(),
            )),
            log_dir: get("LOG_DIR").unwrap_or(defaults.log_dir),
            log_filter: get("LOG").unwrap_or(defaults.log_filter),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_or<T: FromStr + Copy>(raw: Option<String>, name: &str, default: T) -> T {
    match raw {
        Some(v) => v.parse().unwrap_or_else(|_| {
            warn!("Invalid {ENV_PREFIX}{name}={v:?}, using default");
            default
        }),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (format!("{ENV_PREFIX}{k}"), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(AppConfig::from_lookup(|_| None), AppConfig::default());
    }

    #[test]
    fn test_reads_prefixed_values() {
        let cfg = AppConfig::from_lookup(lookup(&[
            ("PORT", "9090"),
            ("COUNTERS_BASE_URL", "https://console.example.com"),
            ("COUNTERS_TOKEN", "secret"),
            ("REQUEST_TIMEOUT_SECS", "5"),
        ]));

        assert_eq!(cfg.port, 9090);
        assert_eq!(cfg.counters_base_url, "https://console.example.com");
        assert_eq!(cfg.counters_token.as_deref(), Some("secret"));
        assert_eq!(cfg.request_timeout, Duration::from_secs(5));
        assert_eq!(cfg.bind_addr(), "0.0.0.0:9090");
    }

    #[test]
    fn test_invalid_numbers_fall_back() {
        let cfg = AppConfig::from_lookup(lookup(&[("PORT", "http"), ("REQUEST_TIMEOUT_SECS", "-1")]));
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.request_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_blank_token_is_none() {
        let cfg = AppConfig::from_lookup(lookup(&[("COUNTERS_TOKEN", "  ")]));
        assert_eq!(cfg.counters_token, None);
    }
}
