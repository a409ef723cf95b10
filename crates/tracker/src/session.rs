use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use model::{
    completion::CompletionRecord, geo_point::GeoPoint, route::PlannedRoute, user::User,
};
use serde::Serialize;
use utility::{geo::METERS_PER_KM, id::Id};

use crate::error::{Result, TrackerError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ActivePhase {
    Running,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FinishReason {
    Reached,
    TimedOut,
    Cancelled,
}

/// Lifecycle of a session. A session starts out `Active(Running)` and
/// `Finished` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SessionState {
    Active(ActivePhase),
    Finished(FinishReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SampleOutcome {
    Continuing,
    Arrived,
    TimedOut,
}

/// One attempt at following a planned route.
#[derive(Debug, Clone)]
pub struct TrackingSession {
    pub(crate) route_id: Id<PlannedRoute>,
    pub(crate) route: Arc<PlannedRoute>,
    pub(crate) state: SessionState,
    pub(crate) distance_covered_m: f64,
    pub(crate) elapsed_secs: f64,
    pub(crate) last_position: Option<GeoPoint>,
    pub(crate) display_position: Option<GeoPoint>,
    pub(crate) recorded_positions: Vec<GeoPoint>,
}

impl TrackingSession {
    pub(crate) fn new(route_id: Id<PlannedRoute>, route: Arc<PlannedRoute>) -> Self {
        Self {
            route_id,
            route,
            state: SessionState::Active(ActivePhase::Running),
            distance_covered_m: 0.0,
            elapsed_secs: 0.0,
            last_position: None,
            display_position: None,
            recorded_positions: Vec::new(),
        }
    }

    pub fn route_id(&self) -> &Id<PlannedRoute> {
        &self.route_id
    }

    pub fn route(&self) -> &PlannedRoute {
        &self.route
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_finished(&self) -> bool {
        matches!(self.state, SessionState::Finished(_))
    }

    pub fn is_paused(&self) -> bool {
        self.state == SessionState::Active(ActivePhase::Paused)
    }

    pub fn distance_covered_m(&self) -> f64 {
        self.distance_covered_m
    }

    pub fn distance_covered_km(&self) -> f64 {
        self.distance_covered_m / METERS_PER_KM
    }

    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed_secs
    }

    /// Last position that counted towards the distance.
    pub fn last_position(&self) -> Option<GeoPoint> {
        self.last_position
    }

    /// Most recent valid sample, including samples taken while paused.
    pub fn display_position(&self) -> Option<GeoPoint> {
        self.display_position
    }

    pub fn recorded_positions(&self) -> &[GeoPoint] {
        &self.recorded_positions
    }

    pub fn remaining_to_target_m(&self) -> Option<f64> {
        self.display_position
            .map(|position| position.distance_m(&self.route.arrival_target()))
    }

    pub(crate) fn ensure_active(&self) -> Result<ActivePhase> {
        match self.state {
            SessionState::Active(phase) => Ok(phase),
            SessionState::Finished(reason) => Err(TrackerError::StaleSession(reason)),
        }
    }

    /// The record to persist for a session that reached its target.
    /// Any other session yields `None`.
    pub fn completion_record(
        &self,
        user_id: Id<User>,
        user_name: impl Into<String>,
        completed_at: DateTime<Utc>,
    ) -> Option<CompletionRecord> {
        if self.state != SessionState::Finished(FinishReason::Reached) {
            return None;
        }
        Some(CompletionRecord {
            route_id: self.route_id.clone(),
            route_name: self.route.name().to_string(),
            user_id,
            user_name: user_name.into(),
            distance_km: self.distance_covered_km(),
            time_taken: Duration::milliseconds((self.elapsed_secs * 1000.0).round() as i64),
            completed_at,
        })
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            route_id: self.route_id.raw(),
            state: self.state,
            distance_covered_km: self.distance_covered_km(),
            elapsed_secs: self.elapsed_secs,
            position: self.display_position,
            remaining_to_target_m: self.remaining_to_target_m(),
        }
    }
}

/// Read only view of a session, e.g. for rendering progress.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub route_id: String,
    pub state: SessionState,
    pub distance_covered_km: f64,
    pub elapsed_secs: f64,
    pub position: Option<GeoPoint>,
    pub remaining_to_target_m: Option<f64>,
}
