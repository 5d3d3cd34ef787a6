use std::env;
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_url: String,
    pub auth_token: Option<String>,
    pub event_bus_capacity: usize,
    pub http_timeout: Option<Duration>,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_url = lookup("NOTIFICATIONS_API_URL").ok_or(ConfigError::MissingApiUrl)?;

        let auth_token = lookup("NOTIFICATIONS_AUTH_TOKEN").filter(|token| !token.is_empty());

        let event_bus_capacity = match lookup("EVENT_BUS_CAPACITY") {
            Some(raw) => raw
                .parse()
                .ok()
                .filter(|&capacity: &usize| capacity > 0)
                .ok_or(ConfigError::InvalidEventBusCapacity(raw))?,
            None => 1000,
        };

        let http_timeout = match lookup("HTTP_TIMEOUT_SECS") {
            Some(raw) => Some(Duration::from_secs(
                raw.parse().map_err(|_| ConfigError::InvalidTimeout(raw))?,
            )),
            None => None,
        };

        Ok(Config {
            api_url,
            auth_token,
            event_bus_capacity,
            http_timeout,
        })
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("NOTIFICATIONS_API_URL environment variable not set")]
    MissingApiUrl,

    #[error("Invalid EVENT_BUS_CAPACITY: {0}")]
    InvalidEventBusCapacity(String),

    #[error("Invalid HTTP_TIMEOUT_SECS: {0}")]
    InvalidTimeout(String),
}
