use std::time::Duration;

use tracker::{
    config::{env_or, ConfigError},
    TrackerConfig,
};

pub const DEFAULT_TRACKING_LOST_SECONDS: u64 = 60;

#[derive(Debug, Clone, PartialEq)]
pub struct RunnerConfig {
    pub tracker: TrackerConfig,
    /// A run without any position fix for this long is abandoned.
    pub tracking_lost_after: Duration,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            tracker: TrackerConfig::default(),
            tracking_lost_after: Duration::from_secs(DEFAULT_TRACKING_LOST_SECONDS),
        }
    }
}

impl RunnerConfig {
    /// Tracker settings plus `TRACKING_LOST_SECONDS`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            tracker: TrackerConfig::from_env()?,
            tracking_lost_after: Duration::from_secs(env_or(
                "TRACKING_LOST_SECONDS",
                DEFAULT_TRACKING_LOST_SECONDS,
            )?),
        })
    }
}
