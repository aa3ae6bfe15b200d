use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

use crate::wind::SpeedUnit;

/// A raw anemometer reading taken at a UTC instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub raw_count: f64,
    pub utc: DateTime<Utc>,
}

impl Observation {
    pub fn new(raw_count: impl Into<f64>, utc: DateTime<Utc>) -> Self {
        Self { raw_count: raw_count.into(), utc }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocalizedObservation {
    pub event: String,
    pub observation_time_utc: DateTime<Utc>,
    pub local_time: DateTime<FixedOffset>,
    pub dst_active: bool,
    pub wind_speed: f64,
    pub wind_speed_unit: SpeedUnit,
}
