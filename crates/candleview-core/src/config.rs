//! Gateway configuration.
//!
//! The credential and endpoint are injected at construction. [`GatewayConfig::from_env`]
//! reads the process environment once; nothing is read at call time.

use std::fmt::{Debug, Formatter};
use std::time::Duration;

/// Environment variable holding the upstream credential.
pub const API_KEY_ENV: &str = "ALPHAVANTAGE_API_KEY";
/// Optional override of the upstream endpoint.
pub const BASE_URL_ENV: &str = "CANDLEVIEW_BASE_URL";
/// Optional per-request timeout in milliseconds.
pub const TIMEOUT_MS_ENV: &str = "CANDLEVIEW_TIMEOUT_MS";

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co/query";

/// Upstream API credential. Never printed.
#[derive(Clone, PartialEq, Eq)]
pub struct ApiKey(String);

impl ApiKey {
    /// Returns `None` for blank input.
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl Debug for ApiKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    pub api_key: Option<ApiKey>,
    pub base_url: String,
    pub timeout: Option<Duration>,
    pub user_agent: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: String::from(DEFAULT_BASE_URL),
            timeout: None,
            user_agent: format!("candleview/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl GatewayConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: ApiKey::new(api_key),
            ..Self::default()
        }
    }

    pub fn from_env() -> Self {
        Self::from_env_with(|name| std::env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable lookup.
    ///
    /// Unparseable timeouts are ignored.
    pub fn from_env_with<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self {
            api_key: lookup(API_KEY_ENV).and_then(ApiKey::new),
            ..Self::default()
        };

        if let Some(base_url) = lookup(BASE_URL_ENV).filter(|value| !value.trim().is_empty()) {
            config.base_url = base_url.trim().to_owned();
        }

        config.timeout = lookup(TIMEOUT_MS_ENV)
            .and_then(|value| value.trim().parse::<u64>().ok())
            .filter(|millis| *millis > 0)
            .map(Duration::from_millis);

        config
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = ApiKey::new(api_key);
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}
