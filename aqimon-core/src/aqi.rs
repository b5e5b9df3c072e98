//! US-EPA Air Quality Index conversion
//!
//! ## Background
//!
//! The AQI maps a pollutant concentration onto a 0–500 scale using
//! piecewise-linear interpolation between published breakpoints. For a
//! concentration `C` falling inside the breakpoint band `[C_lo, C_hi]` with
//! index band `[I_lo, I_hi]`:
//!
//! ```text
//! I = (I_hi - I_lo) / (C_hi - C_lo) × (C - C_lo) + I_lo
//! ```
//!
//! The composite AQI for several pollutants is the maximum of the
//! per-pollutant sub-indices. This module carries the 24-hour breakpoint
//! tables for PM2.5 and PM10, the two pollutants an SDS011 reports.
//!
//! ## Input conditioning
//!
//! EPA tables are defined on truncated concentrations: PM2.5 to 0.1 µg/m³,
//! PM10 to whole µg/m³. Inputs are truncated accordingly before lookup, so
//! 12.08 µg/m³ of PM2.5 lands in the 0.0–12.0 band, not the gap between
//! bands.
//!
//! ## Edge cases
//!
//! Inputs below the lowest breakpoint clamp to index 0 and inputs above the
//! highest clamp to [`AQI_MAX`]; conversion never fails. Non-finite inputs
//! compare false against every band and therefore clamp high — callers that
//! care reject them earlier (see [`Sample::new`](crate::Sample::new)).

use std::fmt;

/// Upper bound of the AQI scale
pub const AQI_MAX: u16 = 500;

/// One row of a breakpoint table
struct Breakpoint {
    c_lo: f32,
    c_hi: f32,
    i_lo: u16,
    i_hi: u16,
}

/// PM2.5 24-hour breakpoints (µg/m³), EPA technical assistance document
const PM2_5_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint { c_lo: 0.0, c_hi: 12.0, i_lo: 0, i_hi: 50 },
    Breakpoint { c_lo: 12.1, c_hi: 35.4, i_lo: 51, i_hi: 100 },
    Breakpoint { c_lo: 35.5, c_hi: 55.4, i_lo: 101, i_hi: 150 },
    Breakpoint { c_lo: 55.5, c_hi: 150.4, i_lo: 151, i_hi: 200 },
    Breakpoint { c_lo: 150.5, c_hi: 250.4, i_lo: 201, i_hi: 300 },
    Breakpoint { c_lo: 250.5, c_hi: 350.4, i_lo: 301, i_hi: 400 },
    Breakpoint { c_lo: 350.5, c_hi: 500.4, i_lo: 401, i_hi: 500 },
];

/// PM10 24-hour breakpoints (µg/m³)
const PM10_BREAKPOINTS: [Breakpoint; 7] = [
    Breakpoint { c_lo: 0.0, c_hi: 54.0, i_lo: 0, i_hi: 50 },
    Breakpoint { c_lo: 55.0, c_hi: 154.0, i_lo: 51, i_hi: 100 },
    Breakpoint { c_lo: 155.0, c_hi: 254.0, i_lo: 101, i_hi: 150 },
    Breakpoint { c_lo: 255.0, c_hi: 354.0, i_lo: 151, i_hi: 200 },
    Breakpoint { c_lo: 355.0, c_hi: 424.0, i_lo: 201, i_hi: 300 },
    Breakpoint { c_lo: 425.0, c_hi: 504.0, i_lo: 301, i_hi: 400 },
    Breakpoint { c_lo: 505.0, c_hi: 604.0, i_lo: 401, i_hi: 500 },
];

/// Linear interpolation within one breakpoint band, rounded to an integer
/// index
fn linear(bp: &Breakpoint, c: f32) -> u16 {
    let slope = f32::from(bp.i_hi - bp.i_lo) / (bp.c_hi - bp.c_lo);
    let index = slope * (c - bp.c_lo) + f32::from(bp.i_lo);
    index.round() as u16
}

/// Look up a truncated concentration in a breakpoint table, clamping at
/// both ends of the scale
fn index_for(table: &[Breakpoint], c: f32) -> u16 {
    if c <= table[0].c_lo {
        return table[0].i_lo;
    }
    for bp in table {
        if c <= bp.c_hi {
            return linear(bp, c);
        }
    }
    AQI_MAX
}

/// PM2.5 sub-index for a concentration in µg/m³
pub fn pm2_5_index(concentration: f32) -> u16 {
    // Truncate to 0.1 µg/m³ per EPA practice
    let c = (concentration * 10.0).trunc() / 10.0;
    index_for(&PM2_5_BREAKPOINTS, c)
}

/// PM10 sub-index for a concentration in µg/m³
pub fn pm10_index(concentration: f32) -> u16 {
    index_for(&PM10_BREAKPOINTS, concentration.trunc())
}

/// Composite AQI: the maximum of the PM2.5 and PM10 sub-indices
pub fn to_aqi(pm2_5: f32, pm10: f32) -> u16 {
    pm2_5_index(pm2_5).max(pm10_index(pm10))
}

/// Named EPA category for an index value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// 0–50
    Good,
    /// 51–100
    Moderate,
    /// 101–150
    UnhealthyForSensitiveGroups,
    /// 151–200
    Unhealthy,
    /// 201–300
    VeryUnhealthy,
    /// 301 and above
    Hazardous,
}

impl Category {
    /// Category the given index falls into
    pub fn from_index(index: u16) -> Self {
        match index {
            0..=50 => Category::Good,
            51..=100 => Category::Moderate,
            101..=150 => Category::UnhealthyForSensitiveGroups,
            151..=200 => Category::Unhealthy,
            201..=300 => Category::VeryUnhealthy,
            _ => Category::Hazardous,
        }
    }

    /// EPA display name
    pub fn name(&self) -> &'static str {
        match self {
            Category::Good => "Good",
            Category::Moderate => "Moderate",
            Category::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            Category::Unhealthy => "Unhealthy",
            Category::VeryUnhealthy => "Very Unhealthy",
            Category::Hazardous => "Hazardous",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn pm2_5_band_anchors() {
        assert_eq!(pm2_5_index(0.0), 0);
        assert_eq!(pm2_5_index(12.0), 50);
        assert_eq!(pm2_5_index(12.1), 51);
        assert_eq!(pm2_5_index(35.4), 100);
        assert_eq!(pm2_5_index(500.4), 500);
    }

    #[test]
    fn pm10_band_anchors() {
        assert_eq!(pm10_index(0.0), 0);
        assert_eq!(pm10_index(54.0), 50);
        assert_eq!(pm10_index(55.0), 51);
        assert_eq!(pm10_index(154.0), 100);
        assert_eq!(pm10_index(604.0), 500);
    }

    #[test]
    fn clamps_outside_scale() {
        assert_eq!(pm2_5_index(-3.0), 0);
        assert_eq!(pm2_5_index(9999.0), AQI_MAX);
        assert_eq!(pm10_index(-1.0), 0);
        assert_eq!(pm10_index(9999.0), AQI_MAX);
    }

    #[test]
    fn truncates_before_lookup() {
        // 12.08 truncates to 12.0 and stays in the Good band
        assert_eq!(pm2_5_index(12.08), 50);
        // 54.9 truncates to 54 for PM10
        assert_eq!(pm10_index(54.9), 50);
    }

    #[test]
    fn good_band_reading_maps_to_good() {
        let index = to_aqi(12.0, 20.0);
        assert!(index <= 50, "expected Good band, got {index}");
        assert_eq!(Category::from_index(index), Category::Good);
    }

    #[test]
    fn composite_takes_worse_pollutant() {
        // PM10 well into Moderate, PM2.5 Good
        let index = to_aqi(5.0, 100.0);
        assert_eq!(index, pm10_index(100.0));
        assert!(index > 50);
    }

    #[test]
    fn category_boundaries() {
        assert_eq!(Category::from_index(50), Category::Good);
        assert_eq!(Category::from_index(51), Category::Moderate);
        assert_eq!(Category::from_index(150), Category::UnhealthyForSensitiveGroups);
        assert_eq!(Category::from_index(301), Category::Hazardous);
        assert_eq!(Category::from_index(500), Category::Hazardous);
    }

    proptest! {
        #[test]
        fn index_stays_on_scale(pm2_5 in 0.0f32..600.0, pm10 in 0.0f32..700.0) {
            prop_assert!(to_aqi(pm2_5, pm10) <= AQI_MAX);
        }

        #[test]
        fn conversion_is_deterministic(pm2_5 in 0.0f32..600.0, pm10 in 0.0f32..700.0) {
            prop_assert_eq!(to_aqi(pm2_5, pm10), to_aqi(pm2_5, pm10));
        }

        #[test]
        fn sub_index_is_monotonic(lo in 0.0f32..500.0, delta in 0.0f32..100.0) {
            prop_assert!(pm2_5_index(lo) <= pm2_5_index(lo + delta));
            prop_assert!(pm10_index(lo) <= pm10_index(lo + delta));
        }
    }
}
