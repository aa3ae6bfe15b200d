//! Anemometer counts to wind speed.

use serde::{Deserialize, Serialize};

use crate::error::{Result, StationError};

const KMH_PER_MPH: f64 = 1.609_344;
const MPS_PER_MPH: f64 = 0.447_04;
const KNOTS_PER_MPH: f64 = 0.868_976_241_9;

/// Linear calibration of an anemometer: `mph = counts * cnts_to_mph`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WindCalibration {
    /// Miles per hour per counted pulse.
    pub cnts_to_mph: f64,
}

impl WindCalibration {
    /// Davis 6410 cup anemometer.
    pub const DAVIS_6410: Self = Self { cnts_to_mph: 2.25 };

    pub fn new(cnts_to_mph: f64) -> Result<Self> {
        let calibration = Self { cnts_to_mph };
        calibration.validate()?;
        Ok(calibration)
    }

    pub fn validate(&self) -> Result<()> {
        if !self.cnts_to_mph.is_finite() || self.cnts_to_mph <= 0.0 {
            return Err(StationError::config(format!(
                "counts-to-speed factor must be positive, got {}",
                self.cnts_to_mph
            )));
        }
        Ok(())
    }

    /// Convert a raw pulse count to wind speed in mph.
    pub fn counts_to_speed<T: Into<f64>>(&self, raw_count: T) -> Result<f64> {
        let raw_count = raw_count.into();
        if !raw_count.is_finite() {
            return Err(StationError::invalid_input(format!(
                "count must be a finite number, got {raw_count}"
            )));
        }
        if raw_count < 0.0 {
            return Err(StationError::invalid_input(format!(
                "count cannot be negative, got {raw_count}"
            )));
        }
        Ok(raw_count * self.cnts_to_mph)
    }
}

impl Default for WindCalibration {
    fn default() -> Self {
        Self::DAVIS_6410
    }
}

/// Unit a wind speed can be reported in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpeedUnit {
    #[default]
    Mph,
    Kmh,
    Mps,
    Knots,
}

impl SpeedUnit {
    pub fn as_str(&self) -> &'static str {
        match self {
            SpeedUnit::Mph => "mph",
            SpeedUnit::Kmh => "kmh",
            SpeedUnit::Mps => "mps",
            SpeedUnit::Knots => "knots",
        }
    }

    pub const fn all() -> &'static [SpeedUnit] {
        &[SpeedUnit::Mph, SpeedUnit::Kmh, SpeedUnit::Mps, SpeedUnit::Knots]
    }

    pub fn convert_mph(&self, mph: f64) -> f64 {
        match self {
            SpeedUnit::Mph => mph,
            SpeedUnit::Kmh => mph * KMH_PER_MPH,
            SpeedUnit::Mps => mph * MPS_PER_MPH,
            SpeedUnit::Knots => mph * KNOTS_PER_MPH,
        }
    }
}

impl std::fmt::Display for SpeedUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for SpeedUnit {
    type Error = StationError;

    fn try_from(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "mph" => Ok(SpeedUnit::Mph),
            "kmh" | "km/h" | "kph" => Ok(SpeedUnit::Kmh),
            "mps" | "m/s" => Ok(SpeedUnit::Mps),
            "knots" | "kn" | "kt" => Ok(SpeedUnit::Knots),
            _ => Err(StationError::invalid_input(format!(
                "Unknown speed unit '{value}'. Supported units: mph, kmh, mps, knots."
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_counts_is_calm() {
        assert_eq!(WindCalibration::DAVIS_6410.counts_to_speed(0u32).unwrap(), 0.0);
    }

    #[test]
    fn ten_counts_on_a_davis_6410() {
        assert_eq!(WindCalibration::default().counts_to_speed(10u32).unwrap(), 22.5);
    }

    #[test]
    fn speed_is_monotonic_in_counts() {
        let cal = WindCalibration::DAVIS_6410;
        let mut prev = 0.0;
        for c in 0..500u32 {
            let speed = cal.counts_to_speed(c).unwrap();
            assert!(speed >= prev);
            prev = speed;
        }
    }

    #[test]
    fn negative_count_is_rejected() {
        let err = WindCalibration::DAVIS_6410.counts_to_speed(-1).unwrap_err();
        assert!(matches!(err, StationError::InvalidInput(_)));
    }

    #[test]
    fn non_finite_count_is_rejected() {
        let cal = WindCalibration::DAVIS_6410;
        assert!(matches!(cal.counts_to_speed(f64::NAN), Err(StationError::InvalidInput(_))));
        assert!(matches!(cal.counts_to_speed(f64::INFINITY), Err(StationError::InvalidInput(_))));
    }

    #[test]
    fn alternate_factor_is_used() {
        let cal = WindCalibration::new(1.5).unwrap();
        assert_eq!(cal.counts_to_speed(4u8).unwrap(), 6.0);
    }

    #[test]
    fn factor_must_be_positive() {
        assert!(matches!(WindCalibration::new(0.0), Err(StationError::Config(_))));
        assert!(matches!(WindCalibration::new(-2.25), Err(StationError::Config(_))));
        assert!(matches!(WindCalibration::new(f64::NAN), Err(StationError::Config(_))));
    }

    #[test]
    fn unit_conversions() {
        assert_eq!(SpeedUnit::Mph.convert_mph(10.0), 10.0);
        assert!((SpeedUnit::Kmh.convert_mph(10.0) - 16.09344).abs() < 1e-9);
        assert!((SpeedUnit::Mps.convert_mph(10.0) - 4.4704).abs() < 1e-9);
        assert!((SpeedUnit::Knots.convert_mph(10.0) - 8.689762419).abs() < 1e-9);
    }

    #[test]
    fn speed_unit_as_str_roundtrip() {
        for unit in SpeedUnit::all() {
            let parsed = SpeedUnit::try_from(unit.as_str()).expect("roundtrip should succeed");
            assert_eq!(*unit, parsed);
        }
    }

    #[test]
    fn unknown_speed_unit_error() {
        let err = SpeedUnit::try_from("furlongs").unwrap_err();
        assert!(err.to_string().contains("Unknown speed unit"));
    }
}
