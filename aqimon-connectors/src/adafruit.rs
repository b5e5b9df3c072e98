//! Adafruit IO REST client
//!
//! Creates one datum per call via
//! `POST /api/v2/{username}/feeds/{feed_key}/data` with the account key in
//! the `X-AIO-Key` header. Feeds must already exist on the dashboard; the
//! service answers 404 for unknown feed keys and 401/403 for bad
//! credentials, both of which surface as [`PublishError::Status`].
//!
//! ## Example
//!
//! ```no_run
//! use aqimon_connectors::{AioClient, AioConfig, Publisher};
//!
//! let config = AioConfig::new("username", "aio_XXXX").timeout_secs(10);
//! let mut client = AioClient::new(config)?;
//! client.publish("pm2-5", 12.0)?;
//! # Ok::<(), aqimon_connectors::PublishError>(())
//! ```

use std::time::Duration;

use log::debug;
use serde_json::json;

use crate::{ConnectionStats, PublishError, Publisher};

/// Default API endpoint
pub const DEFAULT_BASE_URL: &str = "https://io.adafruit.com";

/// Adafruit IO connection settings
#[derive(Debug, Clone)]
pub struct AioConfig {
    /// Account username, part of every feed URL
    pub username: String,
    /// Account key sent in the `X-AIO-Key` header
    pub key: String,
    /// API endpoint, overridable for tests and proxies
    pub base_url: String,
    /// Per-request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl AioConfig {
    /// Create a configuration for the public Adafruit IO endpoint
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            key: key.into(),
            base_url: DEFAULT_BASE_URL.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("aqimon/{}", aqimon_core::VERSION),
        }
    }

    /// Override the API endpoint
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the per-request timeout in seconds
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout = Duration::from_secs(secs);
        self
    }
}

/// Adafruit IO REST publisher built on a reused blocking agent
pub struct AioClient {
    config: AioConfig,
    agent: ureq::Agent,
    stats: ConnectionStats,
}

impl AioClient {
    /// Create a client, validating the configuration up front
    pub fn new(config: AioConfig) -> Result<Self, PublishError> {
        if !config.base_url.starts_with("http://") && !config.base_url.starts_with("https://") {
            return Err(PublishError::Config(
                "base URL must start with http:// or https://".into(),
            ));
        }
        if config.username.is_empty() || config.key.is_empty() {
            return Err(PublishError::Config(
                "username and key must be non-empty".into(),
            ));
        }

        let agent = ureq::AgentBuilder::new()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build();

        Ok(Self {
            config,
            agent,
            stats: ConnectionStats::default(),
        })
    }

    /// Data-creation URL for a feed key
    fn feed_url(&self, feed: &str) -> String {
        format!(
            "{}/api/v2/{}/feeds/{}/data",
            self.config.base_url, self.config.username, feed
        )
    }

    fn record_failure(&mut self, err: &PublishError) {
        self.stats.messages_failed += 1;
        self.stats.last_error = Some(err.to_string());
    }
}

impl Publisher for AioClient {
    fn publish(&mut self, feed: &str, value: f64) -> Result<(), PublishError> {
        let url = self.feed_url(feed);
        let body = json!({ "value": value });
        debug!("POST {url} value={value}");

        let response = self
            .agent
            .post(&url)
            .set("X-AIO-Key", &self.config.key)
            .set("Content-Type", "application/json")
            .set("Accept", "application/json")
            .send_string(&body.to_string());

        match response {
            Ok(_) => {
                self.stats.messages_sent += 1;
                Ok(())
            }
            Err(ureq::Error::Status(status, resp)) => {
                let err = PublishError::Status {
                    status,
                    message: resp.into_string().unwrap_or_default(),
                };
                self.record_failure(&err);
                Err(err)
            }
            Err(ureq::Error::Transport(e)) => {
                let err = PublishError::Transport(e.to_string());
                self.record_failure(&err);
                Err(err)
            }
        }
    }

    fn stats(&self) -> ConnectionStats {
        self.stats.clone()
    }
}
