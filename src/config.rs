//! Environment configuration.
//!
//! The base API URL and the channel host arrive from the environment;
//! nothing network-facing is hard-coded. Two keys are recognized:
//!
//! - `API_BASE_URL` - REST backend base, default `http://localhost:8000`
//! - `CHANNEL_HOST` - notification channel host, default `localhost:8000`

use std::env;

/// Environment key for the REST backend base URL.
pub const ENV_API_BASE_URL: &str = "API_BASE_URL";
/// Environment key for the notification channel host.
pub const ENV_CHANNEL_HOST: &str = "CHANNEL_HOST";

const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
const DEFAULT_CHANNEL_HOST: &str = "localhost:8000";

/// Resolved endpoint configuration for one session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// REST backend base URL, no trailing slash.
    pub base_url: String,
    /// Host (and optional port) the channel connects to.
    pub channel_host: String,
}

impl ApiConfig {
    /// Creates a configuration from explicit values.
    pub fn new(base_url: impl Into<String>, channel_host: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            channel_host: channel_host.into(),
        }
    }

    /// Reads the configuration from the environment, falling back to the
    /// localhost defaults for any unset key.
    pub fn from_env() -> Self {
        Self::new(
            env::var(ENV_API_BASE_URL).unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()),
            env::var(ENV_CHANNEL_HOST).unwrap_or_else(|_| DEFAULT_CHANNEL_HOST.to_string()),
        )
    }

    /// `GET`/`POST` roster endpoint.
    pub fn surgeries_url(&self) -> String {
        format!("{}/surgeries", self.base_url)
    }

    /// Patient record endpoint.
    pub fn patient_data_url(&self) -> String {
        format!("{}/get_patient_data", self.base_url)
    }

    /// Opaque duration-prediction endpoint.
    pub fn delay_prediction_url(&self) -> String {
        format!("{}/delay_prediction", self.base_url)
    }

    /// Opaque complication-risk endpoint.
    pub fn complication_prediction_url(&self) -> String {
        format!("{}/complication_prediction", self.base_url)
    }

    /// WebSocket URL for the notification channel.
    pub fn channel_url(&self) -> String {
        format!("ws://{}/ws", self.channel_host)
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_API_BASE_URL, DEFAULT_CHANNEL_HOST)
    }
}
