//! Core library for the weather-station `station` tool.
//!
//! This crate defines:
//! - Station configuration (timezone, DST rules, anemometer calibration)
//! - DST rule evaluation and UTC to local time conversion
//! - Anemometer counts to wind speed conversion
//! - Observation models tying the two together
//!
//! It is used by `station-cli`, but can also be embedded in a logger.

pub mod config;
pub mod dst;
pub mod error;
pub mod local_time;
pub mod model;
pub mod resolver;
pub mod wind;

pub use config::{StationConfig, TimezoneConfig};
pub use dst::{DstRule, DstSchedule, DstTransitions};
pub use error::StationError;
pub use local_time::{LocalClock, LocalTimestamp};
pub use model::{LocalizedObservation, Observation};
pub use resolver::Resolver;
pub use wind::{SpeedUnit, WindCalibration};
