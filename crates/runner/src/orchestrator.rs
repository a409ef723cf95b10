use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use model::{
    completion::CompletionRecord,
    geo_point::GeoPoint,
    leaderboard::{running_leaderboard, RunningSummary},
    route::PlannedRoute,
    user::User,
    WithId,
};
use serde::Serialize;
use tokio::{
    sync::mpsc,
    time::{self, Instant},
};
use tracker::{
    actor::{spawn_session, SessionRef},
    session::SessionSnapshot,
    RouteTracker, SampleOutcome, TrackerError,
};
use utility::id::Id;

use crate::{
    config::RunnerConfig,
    position::{PositionFix, PositionSource},
    store::RouteStore,
    RunError, RunResult,
};

/// Requests from the user while a run is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunCommand {
    Pause,
    Resume,
    Cancel,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", content = "session", rename_all = "camelCase")]
pub enum RunEnd {
    Completed(CompletionRecord),
    TimedOut(SessionSnapshot),
    TrackingLost(SessionSnapshot),
    Cancelled(SessionSnapshot),
}

/// Drives one session from a position source until it finishes, and
/// persists the result.
pub struct RunOrchestrator<S: RouteStore> {
    store: Arc<S>,
    tracker: RouteTracker,
    config: RunnerConfig,
}

impl<S: RouteStore> RunOrchestrator<S> {
    pub fn new(store: Arc<S>, config: RunnerConfig) -> Self {
        Self {
            store,
            tracker: RouteTracker::new(config.tracker.clone()),
            config,
        }
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    pub async fn can_start(
        &self,
        route_id: &Id<PlannedRoute>,
        position: &GeoPoint,
    ) -> RunResult<bool> {
        let route = self.store.route(route_id).await?;
        Ok(self.tracker.can_start(&route, position))
    }

    pub async fn leaderboard(&self) -> RunResult<Vec<(usize, RunningSummary)>> {
        let completions = self.store.completions().await?;
        Ok(running_leaderboard(&completions))
    }

    pub async fn run<P: PositionSource>(
        &self,
        route_id: &Id<PlannedRoute>,
        user: &WithId<User>,
        source: &mut P,
        mut commands: mpsc::Receiver<RunCommand>,
    ) -> RunResult<RunEnd> {
        let route = Arc::new(self.store.route(route_id).await?);
        let session = spawn_session(self.tracker.clone(), route_id.clone(), route);

        let mut first_fix_at: Option<DateTime<Utc>> = None;
        let mut previous_fix_at: Option<DateTime<Utc>> = None;
        let mut deadline = Instant::now() + self.config.tracking_lost_after;

        loop {
            tokio::select! {
                fix = time::timeout_at(deadline, source.next_fix()) => {
                    let fix = match fix {
                        Ok(Some(fix)) => fix,
                        Ok(None) | Err(_) => {
                            warn!("route {}: tracking lost", route_id);
                            session.cancel().await?;
                            return Ok(RunEnd::TrackingLost(session.snapshot().await?));
                        }
                    };
                    deadline = Instant::now() + self.config.tracking_lost_after;

                    let delta_secs = previous_fix_at
                        .map(|previous| seconds_between(previous, fix.at))
                        .unwrap_or(0.0);
                    match session.record_sample(fix.position, delta_secs).await {
                        Ok(SampleOutcome::Arrived) => {
                            let record = self.complete(&session, route_id, user, &fix).await?;
                            return Ok(RunEnd::Completed(record));
                        }
                        Ok(_) => {
                            previous_fix_at = Some(fix.at);
                            first_fix_at.get_or_insert(fix.at);
                        }
                        Err(TrackerError::Validation(why)) => {
                            debug!("route {}: skipping fix, {}", route_id, why);
                        }
                        Err(other) => return Err(other.into()),
                    }

                    if let Some(first) = first_fix_at {
                        let outcome = session
                            .check_time_budget(seconds_between(first, fix.at))
                            .await?;
                        if outcome == SampleOutcome::TimedOut {
                            return Ok(RunEnd::TimedOut(session.snapshot().await?));
                        }
                    }
                }
                Some(command) = commands.recv() => {
                    debug!("route {}: {:?} requested", route_id, command);
                    match command {
                        RunCommand::Pause => session.pause().await?,
                        RunCommand::Resume => session.resume().await?,
                        RunCommand::Cancel => {
                            session.cancel().await?;
                            return Ok(RunEnd::Cancelled(session.snapshot().await?));
                        }
                    }
                }
            }
        }
    }

    async fn complete<R: SessionRef + Sync>(
        &self,
        session: &R,
        route_id: &Id<PlannedRoute>,
        user: &WithId<User>,
        fix: &PositionFix,
    ) -> RunResult<CompletionRecord> {
        let record = session
            .completion(user.id.clone(), user.content.display_name.clone(), fix.at)
            .await?
            .ok_or(RunError::MissingCompletion)?;
        self.store.mark_completed(route_id).await?;
        let record_id = self.store.save_completion(record.clone()).await?;
        info!(
            "route {}: completed by {} ({:.2} km), saved as {}",
            route_id,
            user.id,
            record.distance_km,
            record_id
        );
        Ok(record)
    }
}

fn seconds_between(from: DateTime<Utc>, to: DateTime<Utc>) -> f64 {
    (to - from).num_milliseconds() as f64 / 1000.0
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Duration as ChronoDuration;
    use model::route::{RouteName, RouteStatus};
    use tracker::{FinishReason, SessionState};

    use super::*;
    use crate::{
        position::{ChannelSource, ReplaySource},
        store::{InMemoryRouteStore, StoreError},
    };

    fn point(latitude: f64, longitude: f64) -> GeoPoint {
        GeoPoint {
            latitude,
            longitude,
        }
    }

    fn user() -> WithId<User> {
        WithId::new(
            Id::new("u-1".to_owned()),
            User {
                display_name: "Ana".to_owned(),
            },
        )
    }

    fn no_commands() -> mpsc::Receiver<RunCommand> {
        mpsc::channel(1).1
    }

    fn fix(longitude: f64, secs: i64) -> PositionFix {
        PositionFix::new(0.0, longitude, DateTime::<Utc>::UNIX_EPOCH + ChronoDuration::seconds(secs))
    }

    /// A ~1.1 km route along the equator. Planned for 500 s, so with the
    /// default grace period it times out after 1100 s.
    async fn setup(
        config: RunnerConfig,
    ) -> (RunOrchestrator<InMemoryRouteStore>, Id<PlannedRoute>) {
        let store = Arc::new(InMemoryRouteStore::new());
        let name = RouteName::parse("Vuelta Ecuador").unwrap();
        let route = PlannedRoute::new(name, vec![point(0.0, 0.0), point(0.0, 0.01)], None).unwrap();
        let route_id = store.put_route(route).await.unwrap();
        (RunOrchestrator::new(store, config), route_id)
    }

    #[tokio::test]
    async fn test_arrival_persists_completion() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        let mut source = ReplaySource::new([fix(0.0, 0), fix(0.005, 200), fix(0.01, 400)]);

        let end = orchestrator
            .run(&route_id, &user(), &mut source, no_commands())
            .await
            .unwrap();
        let record = match end {
            RunEnd::Completed(record) => record,
            other => panic!("expected completion, got {:?}", other),
        };
        assert_eq!(route_id, record.route_id);
        assert_eq!(400, record.time_taken.num_seconds());
        assert!((record.distance_km - 1.112).abs() < 0.01);

        let store = orchestrator.store();
        assert_eq!(
            RouteStatus::Completed,
            store.route(&route_id).await.unwrap().status()
        );
        assert_eq!(1, store.completions().await.unwrap().len());

        let leaderboard = orchestrator.leaderboard().await.unwrap();
        assert_eq!(1, leaderboard.len());
        assert_eq!("Ana", leaderboard[0].1.name);
    }

    #[tokio::test]
    async fn test_invalid_fix_is_skipped() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        let mut source = ReplaySource::new([
            fix(0.0, 0),
            PositionFix::new(95.0, 0.0, DateTime::<Utc>::UNIX_EPOCH + ChronoDuration::seconds(10)),
            fix(0.01, 300),
        ]);
        let end = orchestrator
            .run(&route_id, &user(), &mut source, no_commands())
            .await
            .unwrap();
        assert!(matches!(end, RunEnd::Completed(_)));
    }

    #[tokio::test]
    async fn test_time_budget_exceeded() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        let mut source = ReplaySource::new([fix(0.0, 0), fix(0.002, 1200), fix(0.01, 1300)]);

        let end = orchestrator
            .run(&route_id, &user(), &mut source, no_commands())
            .await
            .unwrap();
        let snapshot = match end {
            RunEnd::TimedOut(snapshot) => snapshot,
            other => panic!("expected timeout, got {:?}", other),
        };
        assert_eq!(SessionState::Finished(FinishReason::TimedOut), snapshot.state);
        assert_eq!(1, source.remaining());
        assert!(orchestrator.store().completions().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_exhausted_source_is_tracking_lost() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        let mut source = ReplaySource::new([fix(0.0, 0)]);

        let end = orchestrator
            .run(&route_id, &user(), &mut source, no_commands())
            .await
            .unwrap();
        assert!(matches!(end, RunEnd::TrackingLost(_)));
        assert_eq!(
            RouteStatus::NotStarted,
            orchestrator.store().route(&route_id).await.unwrap().status()
        );
    }

    #[tokio::test]
    async fn test_silent_source_is_tracking_lost() {
        let config = RunnerConfig {
            tracking_lost_after: Duration::from_millis(50),
            ..Default::default()
        };
        let (orchestrator, route_id) = setup(config).await;
        let (sender, mut source) = ChannelSource::new(4);
        sender.send(fix(0.0, 0)).await.unwrap();

        let end = orchestrator
            .run(&route_id, &user(), &mut source, no_commands())
            .await
            .unwrap();
        let snapshot = match end {
            RunEnd::TrackingLost(snapshot) => snapshot,
            other => panic!("expected tracking lost, got {:?}", other),
        };
        assert_eq!(Some(point(0.0, 0.0)), snapshot.position);
        drop(sender);
    }

    #[tokio::test]
    async fn test_cancel_command() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        let (_sender, mut source) = ChannelSource::new(4);
        let (commands, receiver) = mpsc::channel(1);
        commands.send(RunCommand::Cancel).await.unwrap();

        let end = orchestrator
            .run(&route_id, &user(), &mut source, receiver)
            .await
            .unwrap();
        let snapshot = match end {
            RunEnd::Cancelled(snapshot) => snapshot,
            other => panic!("expected cancellation, got {:?}", other),
        };
        assert_eq!(SessionState::Finished(FinishReason::Cancelled), snapshot.state);
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (orchestrator, _) = setup(RunnerConfig::default()).await;
        let mut source = ReplaySource::default();
        let result = orchestrator
            .run(&Id::new("nowhere".to_owned()), &user(), &mut source, no_commands())
            .await;
        assert!(matches!(result, Err(RunError::Store(StoreError::NotFound))));
    }

    #[tokio::test]
    async fn test_can_start_near_first_waypoint() {
        let (orchestrator, route_id) = setup(RunnerConfig::default()).await;
        assert!(orchestrator
            .can_start(&route_id, &point(0.0, 0.0005))
            .await
            .unwrap());
        assert!(!orchestrator
            .can_start(&route_id, &point(0.0, 0.005))
            .await
            .unwrap());
    }
}
