//! One measurement epoch
//!
//! A [`Sample`] is created once per sensor acquisition, optionally enriched
//! with a derived AQI value, published, and discarded. It is never stored
//! and never mutated after construction.

use serde::Serialize;
use std::fmt;

use crate::aqi::{self, Category};
use crate::errors::{SensorError, SensorResult};

/// Particulate concentrations from a single acquisition
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Sample {
    /// PM2.5 concentration in µg/m³
    pub pm2_5: f32,
    /// PM10 concentration in µg/m³
    pub pm10: f32,
    /// Derived composite AQI, present after [`Sample::with_aqi`]
    pub aqi: Option<u16>,
}

impl Sample {
    /// Build a sample from raw concentrations, rejecting values no real
    /// sensor can produce (NaN, infinite, negative)
    pub fn new(pm2_5: f32, pm10: f32) -> SensorResult<Self> {
        if !pm2_5.is_finite() || !pm10.is_finite() || pm2_5 < 0.0 || pm10 < 0.0 {
            return Err(SensorError::InvalidValue);
        }
        Ok(Self {
            pm2_5,
            pm10,
            aqi: None,
        })
    }

    /// Derive the composite AQI for this sample
    pub fn with_aqi(self) -> Self {
        Self {
            aqi: Some(aqi::to_aqi(self.pm2_5, self.pm10)),
            ..self
        }
    }
}

impl fmt::Display for Sample {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PM2.5 {:.1} µg/m³, PM10 {:.1} µg/m³", self.pm2_5, self.pm10)?;
        if let Some(index) = self.aqi {
            write!(f, ", AQI {} ({})", index, Category::from_index(index))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_finite_and_negative() {
        assert!(Sample::new(f32::NAN, 10.0).is_err());
        assert!(Sample::new(10.0, f32::INFINITY).is_err());
        assert!(Sample::new(-0.1, 10.0).is_err());
        assert!(Sample::new(10.0, -5.0).is_err());
    }

    #[test]
    fn with_aqi_derives_index() {
        let sample = Sample::new(12.0, 20.0).unwrap();
        assert_eq!(sample.aqi, None);

        let sample = sample.with_aqi();
        assert_eq!(sample.aqi, Some(aqi::to_aqi(12.0, 20.0)));
    }

    #[test]
    fn display_includes_category() {
        let sample = Sample::new(12.0, 20.0).unwrap().with_aqi();
        let text = sample.to_string();
        assert!(text.contains("PM2.5 12.0"));
        assert!(text.contains("Good"), "got: {text}");
    }
}
