//! Form configuration

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Where orders go when nothing else is configured.
pub const DEFAULT_ENDPOINT: &str = "http://localhost:9009/api/order";

/// Environment variable overriding the order endpoint.
pub const ENDPOINT_VAR: &str = "PIZZA_ORDER_URL";

/// Environment variable setting the request timeout in seconds.
pub const TIMEOUT_VAR: &str = "PIZZA_ORDER_TIMEOUT_SECS";

/// Settings for the order client.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use pizza_lib::FormConfig;
///
/// let config = FormConfig::default()
///     .with_endpoint("http://127.0.0.1:8080/api/order")
///     .with_timeout(Duration::from_secs(10));
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormConfig {
    /// URL the order is POSTed to.
    ///
    /// Default: `http://localhost:9009/api/order`
    pub endpoint: String,

    /// Per-request timeout.
    ///
    /// Default: none
    pub timeout: Option<Duration>,

    /// Connection timeout.
    ///
    /// Default: none
    pub connect_timeout: Option<Duration>,
}

impl Default for FormConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: None,
            connect_timeout: None,
        }
    }
}

impl FormConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the order endpoint.
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Loads overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads overrides through `lookup`, starting from the defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(endpoint) = lookup(ENDPOINT_VAR).filter(|v| !v.trim().is_empty()) {
            config.endpoint = endpoint.trim().to_string();
        }

        if let Some(raw) = lookup(TIMEOUT_VAR).filter(|v| !v.trim().is_empty()) {
            let secs: u64 = raw
                .trim()
                .parse()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidTimeout {
                    key: TIMEOUT_VAR,
                    value: raw.clone(),
                })?;
            config.timeout = Some(Duration::from_secs(secs));
        }

        config.validate()?;
        Ok(config)
    }

    /// Checks that the endpoint is an absolute http(s) URL.
    pub fn validate(&self) -> Result<Url, ConfigError> {
        let url = Url::parse(&self.endpoint)
            .map_err(|e| ConfigError::invalid_endpoint(&self.endpoint, e.to_string()))?;

        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ConfigError::invalid_endpoint(
                &self.endpoint,
                format!("unsupported scheme '{}'", other),
            )),
        }
    }
}
