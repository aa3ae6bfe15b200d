//! Combines the local clock and the wind calibration into one entry point.

use chrono::{DateTime, Utc};
use log::debug;

use crate::{
    config::StationConfig,
    dst::DstTransitions,
    error::Result,
    local_time::{LocalClock, LocalTimestamp},
    model::{LocalizedObservation, Observation},
    wind::{SpeedUnit, WindCalibration},
};

/// Resolves raw observations against a frozen station configuration.
///
/// The configuration is validated once in [`Resolver::new`] and can only be
/// read afterwards, so a `Resolver` can be shared freely between threads.
#[derive(Debug, Clone)]
pub struct Resolver {
    config: StationConfig,
    clock: LocalClock,
}

impl Resolver {
    pub fn new(config: StationConfig) -> Result<Self> {
        config.validate()?;
        let clock = LocalClock::new(config.timezone.schedule()?);
        debug!(
            "Resolver ready: event '{}', UTC{:+}, DST {}",
            config.event_name,
            config.timezone.utc_offset_hours,
            if config.timezone.use_dst { "on" } else { "off" }
        );
        Ok(Self { config, clock })
    }

    pub fn config(&self) -> &StationConfig {
        &self.config
    }

    pub fn calibration(&self) -> &WindCalibration {
        &self.config.anemometer
    }

    pub fn is_dst_active(&self, utc: DateTime<Utc>) -> bool {
        self.clock.is_dst_active(utc)
    }

    pub fn to_local_time(&self, utc: DateTime<Utc>) -> LocalTimestamp {
        self.clock.to_local(utc)
    }

    pub fn counts_to_speed(&self, raw_count: impl Into<f64>) -> Result<f64> {
        self.config.anemometer.counts_to_speed(raw_count)
    }

    /// DST transitions for `year`; `None` when DST is disabled.
    pub fn dst_transitions(&self, year: i32) -> Option<DstTransitions> {
        let schedule = self.clock.schedule();
        if !schedule.enabled() {
            return None;
        }
        schedule.transitions(year)
    }

    /// Resolve with the speed reported in mph.
    pub fn resolve(&self, observation: &Observation) -> Result<LocalizedObservation> {
        self.resolve_in(observation, SpeedUnit::Mph)
    }

    pub fn resolve_in(
        &self,
        observation: &Observation,
        unit: SpeedUnit,
    ) -> Result<LocalizedObservation> {
        let mph = self.counts_to_speed(observation.raw_count)?;

        Ok(LocalizedObservation {
            event: self.config.event_name.clone(),
            observation_time_utc: observation.utc,
            local_time: self.to_local_time(observation.utc),
            dst_active: self.is_dst_active(observation.utc),
            wind_speed: unit.convert_mph(mph),
            wind_speed_unit: unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StationError;
    use chrono::{NaiveDate, TimeZone};

    fn resolver() -> Resolver {
        Resolver::new(StationConfig::default()).expect("defaults must be valid")
    }

    #[test]
    fn resolves_summer_observation() {
        let utc = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let obs = resolver().resolve(&Observation::new(10u32, utc)).unwrap();

        assert_eq!(obs.event, "obs");
        assert!(obs.dst_active);
        assert_eq!(obs.wind_speed, 22.5);
        assert_eq!(obs.wind_speed_unit, SpeedUnit::Mph);
        assert_eq!(
            obs.local_time.naive_local(),
            NaiveDate::from_ymd_opt(2024, 7, 4).unwrap().and_hms_opt(6, 0, 0).unwrap()
        );
    }

    #[test]
    fn negative_count_fails_resolution() {
        let utc = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let err = resolver().resolve(&Observation::new(-1, utc)).unwrap_err();
        assert!(matches!(err, StationError::InvalidInput(_)));
    }

    #[test]
    fn resolves_in_other_units() {
        let utc = Utc.with_ymd_and_hms(2024, 1, 10, 0, 0, 0).unwrap();
        let obs = resolver().resolve_in(&Observation::new(10u32, utc), SpeedUnit::Kmh).unwrap();

        assert!(!obs.dst_active);
        assert!((obs.wind_speed - 36.21024).abs() < 1e-9);
        assert_eq!(obs.wind_speed_unit, SpeedUnit::Kmh);
    }

    #[test]
    fn substituted_factor_and_timezone() {
        let mut cfg = StationConfig::default();
        cfg.event_name = "gust".into();
        cfg.timezone.utc_offset_hours = -5;
        cfg.timezone.use_dst = false;
        cfg.anemometer = WindCalibration::new(1.0).unwrap();
        let resolver = Resolver::new(cfg).unwrap();

        let utc = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let obs = resolver.resolve(&Observation::new(7u32, utc)).unwrap();

        assert_eq!(obs.event, "gust");
        assert!(!obs.dst_active);
        assert_eq!(obs.wind_speed, 7.0);
        assert_eq!(obs.local_time.offset().local_minus_utc(), -5 * 3600);
        assert!(resolver.dst_transitions(2024).is_none());
    }

    #[test]
    fn invalid_config_is_rejected_up_front() {
        let mut cfg = StationConfig::default();
        cfg.anemometer.cnts_to_mph = -1.0;
        assert!(matches!(Resolver::new(cfg), Err(StationError::Config(_))));
    }

    #[test]
    fn serializes_as_json() {
        let utc = Utc.with_ymd_and_hms(2024, 7, 4, 12, 0, 0).unwrap();
        let obs = resolver().resolve(&Observation::new(10u32, utc)).unwrap();
        let json = serde_json::to_value(&obs).unwrap();

        assert_eq!(json["event"], "obs");
        assert_eq!(json["local_time"], "2024-07-04T06:00:00-06:00");
        assert_eq!(json["wind_speed_unit"], "mph");
        assert_eq!(json["dst_active"], true);
    }

    #[test]
    fn resolver_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Resolver>();
    }
}
