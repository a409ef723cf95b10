use std::sync::Arc;

use log::{debug, info, warn};
use model::{geo_point::GeoPoint, route::PlannedRoute, ValidationError};
use utility::id::Id;

use crate::{
    config::TrackerConfig,
    error::Result,
    session::{ActivePhase, FinishReason, SampleOutcome, SessionState, TrackingSession},
};

/// Follows position samples along a planned route and decides when the
/// route is complete.
///
/// The tracker performs no I/O and holds no per-session state, so one
/// instance can drive any number of sessions. Each session must only be fed
/// from one caller at a time, see `actor::spawn_session`.
#[derive(Debug, Clone, Default)]
pub struct RouteTracker {
    config: TrackerConfig,
}

impl RouteTracker {
    pub fn new(config: TrackerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Whether `position` is close enough to the first waypoint to start.
    pub fn can_start(&self, route: &PlannedRoute, position: &GeoPoint) -> bool {
        position.validate().is_ok()
            && position.distance_m(&route.start_point()) <= self.config.start_radius_m
    }

    pub fn start(
        &self,
        route_id: Id<PlannedRoute>,
        route: Arc<PlannedRoute>,
    ) -> TrackingSession {
        info!(
            "starting session on route {} ({:.2} km)",
            route_id,
            route.estimated_distance_km()
        );
        TrackingSession::new(route_id, route)
    }

    /// Feeds one position sample into the session.
    ///
    /// Invalid samples are rejected without touching the session. While
    /// paused, only the displayed position follows the sample.
    pub fn record_sample(
        &self,
        session: &mut TrackingSession,
        position: GeoPoint,
        elapsed_delta_secs: f64,
    ) -> Result<SampleOutcome> {
        let phase = session.ensure_active()?;
        if let Err(why) = position.validate() {
            warn!("route {}: dropping sample, {}", session.route_id, why);
            return Err(why.into());
        }
        if !elapsed_delta_secs.is_finite() || elapsed_delta_secs < 0.0 {
            warn!(
                "route {}: dropping sample with time delta {}",
                session.route_id, elapsed_delta_secs
            );
            return Err(ValidationError::InvalidQuantity("elapsed time").into());
        }

        session.display_position = Some(position);
        if phase == ActivePhase::Paused {
            debug!("route {}: paused, sample at {} not counted", session.route_id, position);
            return Ok(SampleOutcome::Continuing);
        }

        if let Some(last) = session.last_position {
            session.distance_covered_m += last.distance_m(&position);
        }
        session.elapsed_secs += elapsed_delta_secs;
        session.last_position = Some(position);
        if self.config.record_positions {
            session.recorded_positions.push(position);
        }

        let remaining_m = position.distance_m(&session.route.arrival_target());
        debug!(
            "route {}: at {}, covered {:.0} m in {:.0} s, {:.0} m to go",
            session.route_id,
            position,
            session.distance_covered_m,
            session.elapsed_secs,
            remaining_m
        );

        if remaining_m <= self.config.arrival_radius_m {
            session.state = SessionState::Finished(FinishReason::Reached);
            info!(
                "route {}: arrived after {:.2} km",
                session.route_id,
                session.distance_covered_km()
            );
            return Ok(SampleOutcome::Arrived);
        }
        Ok(SampleOutcome::Continuing)
    }

    /// Finishes the session as timed out once `session_secs`, the wall clock
    /// time since the session started, exceeds the planned duration plus
    /// the grace period.
    pub fn check_time_budget(
        &self,
        session: &mut TrackingSession,
        session_secs: f64,
    ) -> Result<SampleOutcome> {
        session.ensure_active()?;
        let budget = session
            .route
            .estimated_duration_secs()
            .saturating_add(self.config.grace_secs) as f64;
        if session_secs > budget {
            session.state = SessionState::Finished(FinishReason::TimedOut);
            info!(
                "route {}: timed out after {:.0} s (budget {:.0} s)",
                session.route_id, session_secs, budget
            );
            return Ok(SampleOutcome::TimedOut);
        }
        Ok(SampleOutcome::Continuing)
    }

    pub fn pause(&self, session: &mut TrackingSession) -> Result<()> {
        if session.ensure_active()? == ActivePhase::Running {
            debug!("route {}: paused", session.route_id);
            session.state = SessionState::Active(ActivePhase::Paused);
        }
        Ok(())
    }

    /// Resumes counting from the last displayed position, so ground covered
    /// while paused is not added to the distance.
    pub fn resume(&self, session: &mut TrackingSession) -> Result<()> {
        if session.ensure_active()? == ActivePhase::Paused {
            debug!("route {}: resumed", session.route_id);
            session.state = SessionState::Active(ActivePhase::Running);
            if session.display_position.is_some() {
                session.last_position = session.display_position;
            }
        }
        Ok(())
    }

    pub fn cancel(&self, session: &mut TrackingSession) -> Result<()> {
        session.ensure_active()?;
        info!("route {}: cancelled", session.route_id);
        session.state = SessionState::Finished(FinishReason::Cancelled);
        Ok(())
    }
}
