use chrono::{DateTime, FixedOffset, Utc};

use crate::dst::DstSchedule;

/// A local timestamp: the same instant, carrying the offset that applied.
pub type LocalTimestamp = DateTime<FixedOffset>;

/// Converts UTC instants to station local time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocalClock {
    schedule: DstSchedule,
}

impl LocalClock {
    pub fn new(schedule: DstSchedule) -> Self {
        Self { schedule }
    }

    pub fn schedule(&self) -> &DstSchedule {
        &self.schedule
    }

    pub fn is_dst_active(&self, utc: DateTime<Utc>) -> bool {
        self.schedule.is_active(utc)
    }

    /// Offset in effect at `utc`: standard, or daylight while DST is active.
    pub fn offset_at(&self, utc: DateTime<Utc>) -> FixedOffset {
        if self.schedule.is_active(utc) {
            self.schedule.daylight_offset()
        } else {
            self.schedule.standard_offset()
        }
    }

    pub fn to_local(&self, utc: DateTime<Utc>) -> LocalTimestamp {
        utc.with_timezone(&self.offset_at(utc))
    }
}
