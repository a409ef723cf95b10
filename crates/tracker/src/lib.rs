pub mod actor;
pub mod config;
pub mod error;
pub mod session;
pub mod tracker;

pub use config::TrackerConfig;
pub use error::TrackerError;
pub use session::{ActivePhase, FinishReason, SampleOutcome, SessionState, TrackingSession};
pub use tracker::RouteTracker;
