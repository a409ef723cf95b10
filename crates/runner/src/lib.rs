pub mod config;
pub mod orchestrator;
pub mod position;
pub mod store;

use std::io;

use tracker::{config::ConfigError, TrackerError};

pub use config::RunnerConfig;
pub use orchestrator::{RunCommand, RunEnd, RunOrchestrator};
pub use position::{ChannelSource, PositionFix, PositionSource, ReplaySource};
pub use store::{InMemoryRouteStore, RouteStore, StoreError};

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("store: {0}")]
    Store(#[from] StoreError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("io: {0}")]
    Io(#[from] io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("replay offset {0} s is not a usable time")]
    InvalidOffset(f64),
    /// The session reported arrival but produced no completion record.
    #[error("arrived session has no completion record")]
    MissingCompletion,
}

pub type RunResult<T> = Result<T, RunError>;
