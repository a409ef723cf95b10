use std::{env, str::FromStr};

pub const DEFAULT_ARRIVAL_RADIUS_METERS: f64 = 50.0;
pub const DEFAULT_GRACE_SECONDS: u64 = 600;
pub const DEFAULT_START_RADIUS_METERS: f64 = 100.0;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("environment variable {key} has invalid value {value:?}")]
pub struct ConfigError {
    pub key: &'static str,
    pub value: String,
}

/// Thresholds used by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// A sample this close to the last waypoint completes the route.
    pub arrival_radius_m: f64,
    /// Time allowed on top of the route's planned duration.
    pub grace_secs: u64,
    /// How close to the first waypoint a user must be to start.
    pub start_radius_m: f64,
    /// Keep every accumulated sample on the session.
    pub record_positions: bool,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            arrival_radius_m: DEFAULT_ARRIVAL_RADIUS_METERS,
            grace_secs: DEFAULT_GRACE_SECONDS,
            start_radius_m: DEFAULT_START_RADIUS_METERS,
            record_positions: true,
        }
    }
}

impl TrackerConfig {
    /// Reads `ARRIVAL_RADIUS_METERS`, `GRACE_SECONDS` and `START_RADIUS_METERS`.
    /// Unset variables keep their default.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();
        Ok(Self {
            arrival_radius_m: env_radius("ARRIVAL_RADIUS_METERS", defaults.arrival_radius_m)?,
            grace_secs: env_or("GRACE_SECONDS", defaults.grace_secs)?,
            start_radius_m: env_radius("START_RADIUS_METERS", defaults.start_radius_m)?,
            record_positions: defaults.record_positions,
        })
    }
}

pub fn env_or<T: FromStr>(key: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_value(key, &value),
        Err(_) => Ok(default),
    }
}

fn env_radius(key: &'static str, default: f64) -> Result<f64, ConfigError> {
    match env::var(key) {
        Ok(value) => parse_radius(key, &value),
        Err(_) => Ok(default),
    }
}

/// A distance in meters: finite and not negative.
pub(crate) fn parse_radius(key: &'static str, value: &str) -> Result<f64, ConfigError> {
    let radius: f64 = parse_value(key, value)?;
    if !radius.is_finite() || radius < 0.0 {
        return Err(ConfigError {
            key,
            value: value.to_owned(),
        });
    }
    Ok(radius)
}

pub(crate) fn parse_value<T: FromStr>(key: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError {
        key,
        value: value.to_owned(),
    })
}
