use anyhow::{Context, Result, anyhow};
use chrono::FixedOffset;
use directories::ProjectDirs;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{
    dst::{DstRule, DstSchedule},
    error::StationError,
    wind::WindCalibration,
};

/// Largest UTC offset, in hours, a station may be configured with.
pub const MAX_OFFSET_HOURS: i32 = 14;

/// Timezone and DST settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneConfig {
    /// Standard-time offset from UTC in hours, e.g. -7.
    pub utc_offset_hours: i32,

    pub use_dst: bool,

    /// Added to `utc_offset_hours` while DST is in effect.
    pub dst_offset_hours: i32,

    /// Local wall-clock hour at which both transitions happen.
    pub transition_hour: u32,

    /// Example TOML:
    /// [timezone.dst_start]
    /// month = 3
    /// week = 2
    /// weekday = "Sun"
    pub dst_start: DstRule,

    pub dst_end: DstRule,
}

impl Default for TimezoneConfig {
    fn default() -> Self {
        Self {
            utc_offset_hours: -7,
            use_dst: true,
            dst_offset_hours: 1,
            transition_hour: 2,
            dst_start: DstRule::US_START,
            dst_end: DstRule::US_END,
        }
    }
}

impl TimezoneConfig {
    pub fn validate(&self) -> Result<(), StationError> {
        check_offset("utc_offset_hours", i64::from(self.utc_offset_hours))?;
        check_offset("dst_offset_hours", i64::from(self.dst_offset_hours))?;
        check_offset("utc_offset_hours + dst_offset_hours", self.daylight_offset_hours())?;

        if self.transition_hour > 23 {
            return Err(StationError::config(format!(
                "transition_hour must be 0-23, got {}",
                self.transition_hour
            )));
        }

        self.dst_start.validate()?;
        self.dst_end.validate()?;

        if self.dst_end.month <= self.dst_start.month {
            return Err(StationError::config(format!(
                "DST end ({}) must fall after DST start ({}) within the year",
                self.dst_end, self.dst_start
            )));
        }

        Ok(())
    }

    pub fn daylight_offset_hours(&self) -> i64 {
        i64::from(self.utc_offset_hours) + i64::from(self.dst_offset_hours)
    }

    /// Build the DST schedule for these settings.
    pub fn schedule(&self) -> Result<DstSchedule, StationError> {
        self.validate()?;
        Ok(DstSchedule::new(
            self.use_dst,
            fixed_offset(i64::from(self.utc_offset_hours))?,
            fixed_offset(self.daylight_offset_hours())?,
            self.dst_start,
            self.dst_end,
            self.transition_hour,
        ))
    }
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationConfig {
    /// Tag attached to every published observation.
    pub event_name: String,

    pub timezone: TimezoneConfig,

    /// Example TOML:
    /// [anemometer]
    /// cnts_to_mph = 2.25
    pub anemometer: WindCalibration,
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            event_name: "obs".to_string(),
            timezone: TimezoneConfig::default(),
            anemometer: WindCalibration::DAVIS_6410,
        }
    }
}

impl StationConfig {
    pub fn validate(&self) -> Result<(), StationError> {
        if self.event_name.trim().is_empty() {
            return Err(StationError::config("event_name must not be empty"));
        }
        self.timezone.validate()?;
        self.anemometer.validate()
    }

    /// Parse and validate a TOML document.
    pub fn from_toml_str(contents: &str) -> Result<Self, StationError> {
        let cfg: StationConfig =
            toml::from_str(contents).map_err(|e| StationError::config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")
    }

    /// Load config from the platform config directory, or return defaults if
    /// it doesn't exist yet.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        Self::load_from(&path)
    }

    /// Load config from `path`, or return defaults if there is no file.
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            warn!("No config file at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let cfg = Self::from_toml_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        debug!("Loaded config from {}", path.display());
        Ok(cfg)
    }

    /// Save config to the platform config directory.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;
        self.save_to(&path)
    }

    /// Save config to `path`, creating parent directories as needed.
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate().context("Refusing to save an invalid configuration")?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        fs::write(path, self.to_toml_string()?)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "weather-station", "station")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }
}

fn check_offset(name: &str, hours: i64) -> Result<(), StationError> {
    let max = i64::from(MAX_OFFSET_HOURS);
    if !(-max..=max).contains(&hours) {
        return Err(StationError::config(format!(
            "{name} must be within ±{MAX_OFFSET_HOURS} hours, got {hours}"
        )));
    }
    Ok(())
}

fn fixed_offset(hours: i64) -> Result<FixedOffset, StationError> {
    hours
        .checked_mul(3600)
        .and_then(|secs| i32::try_from(secs).ok())
        .and_then(FixedOffset::east_opt)
        .ok_or_else(|| StationError::config(format!("UTC offset out of range: {hours} hours")))
}
