use anyhow::{Context, Result};
use chrono::{DateTime, Utc, Weekday};
use clap::{Parser, Subcommand};
use inquire::{Confirm, CustomType, Select, Text};
use log::debug;
use std::path::{Path, PathBuf};

use station_core::{
    DstRule, Observation, Resolver, SpeedUnit, StationConfig, WindCalibration, dst::LAST_WEEK,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "station", version, about = "Weather-station time and units resolver")]
pub struct Cli {
    /// Use this config file instead of the platform default.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Resolve a raw count and timestamp into a localized observation (JSON).
    Resolve {
        /// Raw anemometer count.
        #[arg(long, allow_negative_numbers = true)]
        counts: f64,

        /// RFC 3339 timestamp; if absent, means "now".
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,

        #[arg(long, value_parser = parse_unit, default_value = "mph")]
        unit: SpeedUnit,
    },

    /// Show local time and whether DST is in effect.
    LocalTime {
        /// RFC 3339 timestamp; if absent, means "now".
        #[arg(long, value_parser = parse_timestamp)]
        at: Option<DateTime<Utc>>,
    },

    /// Convert a raw anemometer count to wind speed.
    Speed {
        #[arg(allow_negative_numbers = true)]
        counts: f64,

        #[arg(long, value_parser = parse_unit, default_value = "mph")]
        unit: SpeedUnit,
    },

    /// Show DST transitions for a year.
    Dst { year: i32 },

    /// Interactively edit and save the station configuration.
    Configure,

    /// Print the effective configuration.
    Config,
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let path = match self.config {
            Some(path) => path,
            None => StationConfig::config_file_path()?,
        };
        debug!("Using config file {}", path.display());

        match self.command {
            Command::Resolve { counts, at, unit } => {
                let resolver = load_resolver(&path)?;
                let observation = Observation::new(counts, at.unwrap_or_else(Utc::now));
                let localized = resolver.resolve_in(&observation, unit)?;
                println!("{}", serde_json::to_string_pretty(&localized)?);
            }
            Command::LocalTime { at } => {
                let resolver = load_resolver(&path)?;
                let utc = at.unwrap_or_else(Utc::now);
                let local = resolver.to_local_time(utc);
                let dst = if resolver.is_dst_active(utc) { "active" } else { "inactive" };
                println!("UTC:   {}", utc.to_rfc3339());
                println!("Local: {} (DST {dst})", local.to_rfc3339());
            }
            Command::Speed { counts, unit } => {
                let resolver = load_resolver(&path)?;
                let mph = resolver.counts_to_speed(counts)?;
                println!("{:.2} {unit}", unit.convert_mph(mph));
            }
            Command::Dst { year } => {
                let resolver = load_resolver(&path)?;
                let tz = &resolver.config().timezone;
                match resolver.dst_transitions(year) {
                    Some(t) => {
                        let local_start = resolver.to_local_time(t.start);
                        let local_end = resolver.to_local_time(t.end);
                        println!("DST {year}: {} to {}", tz.dst_start, tz.dst_end);
                        println!(
                            "Starts: {} UTC ({} local)",
                            t.start.format("%F %T"),
                            local_start.format("%F %T %:z")
                        );
                        println!(
                            "Ends:   {} UTC ({} local)",
                            t.end.format("%F %T"),
                            local_end.format("%F %T %:z")
                        );
                    }
                    None if !tz.use_dst => println!("DST is disabled in this configuration."),
                    None => println!("No DST transitions can be computed for {year}."),
                }
            }
            Command::Configure => configure(&path)?,
            Command::Config => {
                let cfg = StationConfig::load_from(&path)?;
                println!("# {}", path.display());
                print!("{}", cfg.to_toml_string()?);
            }
        }

        Ok(())
    }
}

fn load_resolver(path: &Path) -> Result<Resolver> {
    let cfg = StationConfig::load_from(path)?;
    Resolver::new(cfg).context("Configuration cannot be used")
}

fn configure(path: &Path) -> Result<()> {
    let mut cfg = StationConfig::load_from(path)?;

    let event_name = Text::new("Event name:").with_default(&cfg.event_name).prompt()?;
    cfg.event_name = event_name;

    cfg.timezone.utc_offset_hours = CustomType::<i32>::new("Standard UTC offset (hours):")
        .with_default(cfg.timezone.utc_offset_hours)
        .with_error_message("Please type a whole number of hours")
        .prompt()?;

    cfg.timezone.use_dst = Confirm::new("Use daylight saving time?")
        .with_default(cfg.timezone.use_dst)
        .prompt()?;

    if cfg.timezone.use_dst {
        cfg.timezone.dst_offset_hours = CustomType::<i32>::new("DST offset (hours):")
            .with_default(cfg.timezone.dst_offset_hours)
            .with_error_message("Please type a whole number of hours")
            .prompt()?;

        cfg.timezone.transition_hour = CustomType::<u32>::new("Transition hour (local, 0-23):")
            .with_default(cfg.timezone.transition_hour)
            .with_error_message("Please type an hour from 0 to 23")
            .prompt()?;

        cfg.timezone.dst_start = prompt_rule("DST start", cfg.timezone.dst_start)?;
        cfg.timezone.dst_end = prompt_rule("DST end", cfg.timezone.dst_end)?;
    }

    let factor = CustomType::<f64>::new("Anemometer factor (mph per count):")
        .with_default(cfg.anemometer.cnts_to_mph)
        .with_error_message("Please type a number")
        .prompt()?;
    cfg.anemometer = WindCalibration::new(factor)?;

    cfg.save_to(path)?;
    println!("Configuration saved to {}", path.display());

    Ok(())
}

const WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

fn prompt_rule(label: &str, current: DstRule) -> Result<DstRule> {
    let month = CustomType::<u32>::new(&format!("{label} month (1-12):"))
        .with_default(current.month)
        .with_error_message("Please type a month number")
        .prompt()?;

    let week = CustomType::<u8>::new(&format!("{label} week of month (1-4, {LAST_WEEK} = last):"))
        .with_default(current.week)
        .with_error_message("Please type a week number")
        .prompt()?;

    let weekday = Select::new(&format!("{label} weekday:"), WEEKDAYS.to_vec())
        .with_starting_cursor(current.weekday.num_days_from_monday() as usize)
        .prompt()?;

    let rule = DstRule::new(month, week, weekday);
    rule.validate()?;
    Ok(rule)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, String> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| format!("expected an RFC 3339 timestamp such as 2024-07-04T12:00:00Z: {e}"))
}

fn parse_unit(value: &str) -> Result<SpeedUnit, String> {
    SpeedUnit::try_from(value).map_err(|e| e.to_string())
}
