//! Configuration management for Lambda functions.

use std::env;
use std::time::Duration;

use crate::{Error, Result};

const DEFAULT_ADVICE_API_BASE_URL: &str = "https://api.adviceslip.com";
const DEFAULT_DOG_API_BASE_URL: &str = "https://dog.ceo/api";
const DEFAULT_UPSTREAM_TIMEOUT_SECS: u64 = 5;

/// Deployment mode, controls how much error detail callers see.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    /// Parse an `APP_ENV` value. Anything other than a development alias is production.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Development or production mode
    pub environment: Environment,
    /// Base URL of the Advice Slip API, without trailing slash
    pub advice_api_base_url: String,
    /// Base URL of the Dog CEO API, without trailing slash
    pub dog_api_base_url: String,
    /// Upper bound on a single outbound request
    pub upstream_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: Environment::Production,
            advice_api_base_url: DEFAULT_ADVICE_API_BASE_URL.to_string(),
            dog_api_base_url: DEFAULT_DOG_API_BASE_URL.to_string(),
            upstream_timeout: Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = lookup("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or_default();

        let upstream_timeout = match lookup("UPSTREAM_TIMEOUT_SECS") {
            Some(raw) => parse_timeout(&raw)?,
            None => Duration::from_secs(DEFAULT_UPSTREAM_TIMEOUT_SECS),
        };

        Ok(Self {
            environment,
            advice_api_base_url: base_url(lookup("ADVICE_API_BASE_URL"), DEFAULT_ADVICE_API_BASE_URL),
            dog_api_base_url: base_url(lookup("DOG_API_BASE_URL"), DEFAULT_DOG_API_BASE_URL),
            upstream_timeout,
        })
    }
}

fn parse_timeout(raw: &str) -> Result<Duration> {
    match raw.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(Duration::from_secs(secs)),
        _ => Err(Error::Config(format!(
            "UPSTREAM_TIMEOUT_SECS must be a positive integer, got '{}'",
            raw
        ))),
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim()
        .trim_end_matches('/')
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.advice_api_base_url, "https://api.adviceslip.com");
        assert_eq!(config.dog_api_base_url, "https://dog.ceo/api");
        assert_eq!(config.upstream_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("APP_ENV", "Development"),
            ("UPSTREAM_TIMEOUT_SECS", "2"),
            ("DOG_API_BASE_URL", "http://127.0.0.1:8080/api/"),
        ]))
        .unwrap();
        assert!(config.environment.is_development());
        assert_eq!(config.upstream_timeout, Duration::from_secs(2));
        assert_eq!(config.dog_api_base_url, "http://127.0.0.1:8080/api");
    }

    #[test]
    fn test_invalid_timeout_rejected() {
        for raw in ["0", "soon", "-3"] {
            let err = Config::from_lookup(lookup(&[("UPSTREAM_TIMEOUT_SECS", raw)])).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }
    }

    #[test]
    fn test_unknown_environment_is_production() {
        assert_eq!(Environment::parse("staging"), Environment::Production);
        assert_eq!(Environment::parse(" dev "), Environment::Development);
    }
}
