//! Core types for the aqimon particulate monitor
//!
//! Holds everything that can be exercised without hardware or a network:
//! the [`Sample`] data model, the US-EPA AQI breakpoint conversion, and the
//! [`SensorReader`] contract the concrete serial driver implements.
//!
//! Key constraints:
//! - Pure: no I/O anywhere in this crate
//! - One `Sample` per acquisition, immutable once constructed
//! - Conversion clamps out-of-range inputs instead of failing
//!
//! ```
//! use aqimon_core::{aqi, Sample};
//!
//! let sample = Sample::new(12.0, 20.0)?.with_aqi();
//! assert_eq!(sample.aqi, Some(aqi::to_aqi(12.0, 20.0)));
//! # Ok::<(), aqimon_core::SensorError>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod aqi;
pub mod errors;
pub mod sample;
pub mod traits;

// Public API
pub use errors::{SensorError, SensorResult};
pub use sample::Sample;
pub use traits::SensorReader;

/// Crate version, exposed for user-agent strings and startup logging.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn version_exists() {
        assert!(!VERSION.is_empty());
    }
}
