//! The sensor reader contract
//!
//! Keep it simple - the monitor loop only ever needs one blocking read per
//! iteration plus duty-cycle control for sensors with a limited-life fan.

use crate::errors::SensorResult;
use crate::sample::Sample;

/// Blocking particulate sensor
///
/// `wake` and `sleep` default to no-ops for sensors that are always on;
/// the SDS011 driver overrides them because its fan is rated for roughly
/// 8000 hours and the device supports a sleep mode between polls.
pub trait SensorReader {
    /// Acquire one sample; blocks until the device answers or errors
    fn read(&mut self) -> SensorResult<Sample>;

    /// Power the measuring element up ahead of a read
    fn wake(&mut self) -> SensorResult<()> {
        Ok(())
    }

    /// Power the measuring element down between reads
    fn sleep(&mut self) -> SensorResult<()> {
        Ok(())
    }
}
