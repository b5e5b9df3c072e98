//! Telemetry delivery for aqimon
//!
//! ## Overview
//!
//! One publisher contract, one concrete backend. The monitor loop talks to
//! the [`Publisher`] trait only; the Adafruit IO REST client in
//! [`adafruit`] is the implementation deployed in practice.
//!
//! ## Why plain HTTP?
//!
//! Adafruit IO exposes both MQTT and REST. For a monitor that submits three
//! values once a minute, a stateless POST per value is the simplest thing
//! that works:
//! - No connection state to maintain across hour-long idle gaps
//! - Firewall-friendly from any home network
//! - One request maps to one feed datum, matching the loop's fan-out
//!
//! The per-request TLS handshake overhead is irrelevant at this rate.
//!
//! ## Failure semantics
//!
//! `publish` makes exactly one attempt. Retry and skip policy belongs to
//! the monitor loop, which knows the process mode; the client's job is to
//! report transport and HTTP-status failures faithfully and keep counters.

use thiserror::Error;

pub mod adafruit;

// Re-export the backend most callers want
pub use adafruit::{AioClient, AioConfig};

/// Telemetry delivery failures
#[derive(Debug, Error)]
pub enum PublishError {
    /// DNS, TCP, or TLS level failure before an HTTP status was received
    #[error("transport error: {0}")]
    Transport(String),

    /// The service answered with a non-success status
    #[error("server error {status}: {message}")]
    Status {
        /// HTTP status code
        status: u16,
        /// Response body, kept for the log line
        message: String,
    },

    /// The client was constructed with unusable settings
    #[error("configuration error: {0}")]
    Config(String),
}

/// Trait for metric publishers
///
/// One call per metric per loop iteration; implementations make a single
/// delivery attempt per call.
pub trait Publisher {
    /// Publish one value to the named feed
    fn publish(&mut self, feed: &str, value: f64) -> Result<(), PublishError>;

    /// Delivery counters accumulated over the life of the publisher
    fn stats(&self) -> ConnectionStats;
}

/// Delivery statistics common to all publishers
#[derive(Debug, Default, Clone)]
pub struct ConnectionStats {
    /// Total values delivered successfully
    pub messages_sent: u64,
    /// Total delivery attempts that failed
    pub messages_failed: u64,
    /// Last error message, if any attempt has failed
    pub last_error: Option<String>,
}
