//! Daylight-saving-time rule evaluation.
//!
//! Rules are expressed as "Nth weekday of a month" (e.g. the second Sunday
//! of March). A transition happens at a fixed local wall-clock hour: the
//! start is read in standard time, the end in daylight time.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeDelta, Utc, Weekday};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StationError};

/// Week-of-month value meaning "the last occurrence in the month".
pub const LAST_WEEK: u8 = 5;

/// Earliest day of March the second Sunday can fall on.
#[deprecated(note = "fixed-day approximation of the DST start; use `DstRule::US_START`")]
pub const APPROX_DST_START_DAY: u32 = 8;

/// Earliest day of November the first Sunday can fall on.
#[deprecated(note = "fixed-day approximation of the DST end; use `DstRule::US_END`")]
pub const APPROX_DST_END_DAY: u32 = 1;

/// A transition rule: `week`-th `weekday` of `month`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DstRule {
    /// Calendar month, 1-12.
    pub month: u32,
    /// Week of month, 1-4, or [`LAST_WEEK`].
    pub week: u8,
    pub weekday: Weekday,
}

impl DstRule {
    /// US start of DST: second Sunday in March.
    pub const US_START: Self = Self::new(3, 2, Weekday::Sun);

    /// US end of DST: first Sunday in November.
    pub const US_END: Self = Self::new(11, 1, Weekday::Sun);

    pub const fn new(month: u32, week: u8, weekday: Weekday) -> Self {
        Self { month, week, weekday }
    }

    pub fn validate(&self) -> Result<()> {
        if !(1..=12).contains(&self.month) {
            return Err(StationError::config(format!(
                "DST rule month must be 1-12, got {}",
                self.month
            )));
        }
        if !(1..=LAST_WEEK).contains(&self.week) {
            return Err(StationError::config(format!(
                "DST rule week must be 1-{LAST_WEEK}, got {}",
                self.week
            )));
        }
        Ok(())
    }

    /// The date this rule selects in `year`.
    pub fn date_in(&self, year: i32) -> Option<NaiveDate> {
        if self.week == LAST_WEEK {
            NaiveDate::from_weekday_of_month_opt(year, self.month, self.weekday, LAST_WEEK)
                .or_else(|| {
                    NaiveDate::from_weekday_of_month_opt(year, self.month, self.weekday, 4)
                })
        } else {
            NaiveDate::from_weekday_of_month_opt(year, self.month, self.weekday, self.week)
        }
    }
}

impl std::fmt::Display for DstRule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let week = match self.week {
            1 => "first",
            2 => "second",
            3 => "third",
            4 => "fourth",
            _ => "last",
        };
        write!(f, "{week} {} of month {}", self.weekday, self.month)
    }
}

/// Start and end of DST for one year, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DstTransitions {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DstTransitions {
    /// Half-open: the start instant is already DST, the end instant is not.
    pub fn contains(&self, utc: DateTime<Utc>) -> bool {
        self.start <= utc && utc < self.end
    }
}

/// Evaluates whether DST is in effect for a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DstSchedule {
    enabled: bool,
    standard: FixedOffset,
    daylight: FixedOffset,
    start: DstRule,
    end: DstRule,
    transition_hour: u32,
}

impl DstSchedule {
    /// Build a schedule. Offsets are the full UTC offsets of standard and
    /// daylight time. Callers are expected to have validated the inputs.
    pub fn new(
        enabled: bool,
        standard: FixedOffset,
        daylight: FixedOffset,
        start: DstRule,
        end: DstRule,
        transition_hour: u32,
    ) -> Self {
        Self { enabled, standard, daylight, start, end, transition_hour }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn standard_offset(&self) -> FixedOffset {
        self.standard
    }

    pub fn daylight_offset(&self) -> FixedOffset {
        self.daylight
    }

    /// Transition instants for `year`, or `None` if a rule does not resolve
    /// to a date that year (year out of chrono's range).
    pub fn transitions(&self, year: i32) -> Option<DstTransitions> {
        let start_local = self.start.date_in(year)?.and_hms_opt(self.transition_hour, 0, 0)?;
        let end_local = self.end.date_in(year)?.and_hms_opt(self.transition_hour, 0, 0)?;

        let start = start_local - offset_delta(self.standard);
        let end = end_local - offset_delta(self.daylight);

        Some(DstTransitions { start: start.and_utc(), end: end.and_utc() })
    }

    /// Whether DST is in effect at `utc`. Always `false` when disabled.
    pub fn is_active(&self, utc: DateTime<Utc>) -> bool {
        if !self.enabled {
            return false;
        }

        // Local standard-time year decides which year's rules apply.
        let year = utc.with_timezone(&self.standard).year();
        let active = self.transitions(year).is_some_and(|t| t.contains(utc));
        debug!("DST at {utc}: {active}");
        active
    }
}

fn offset_delta(offset: FixedOffset) -> TimeDelta {
    TimeDelta::seconds(i64::from(offset.local_minus_utc()))
}
