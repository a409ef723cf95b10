use std::{any::Any, sync::Arc};

use actors::{
    actor::{Actor, SupervisionStrategy},
    actor_ref::ActorRef,
    handler::{Handler, Message},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use model::{
    completion::CompletionRecord, geo_point::GeoPoint, route::PlannedRoute, user::User,
};
use utility::id::Id;

use crate::{
    error::Result,
    session::{SampleOutcome, SessionSnapshot, TrackingSession},
    tracker::RouteTracker,
};

/// Owns one session, so samples from a timer and from location callbacks
/// are applied one after another.
pub struct SessionActor {
    tracker: RouteTracker,
    session: TrackingSession,
}

impl Actor for SessionActor {
    fn name(&self) -> &str {
        self.session.route_id().raw_ref()
    }

    fn on_fail(&mut self, _error: Box<dyn Any + Send>) -> SupervisionStrategy {
        // a half applied sample can not be trusted, and restarting would
        // silently drop the progress made so far
        SupervisionStrategy::Stop
    }
}

pub struct RecordSample {
    pub position: GeoPoint,
    pub elapsed_delta_secs: f64,
}

impl Message for RecordSample {
    type Response = Result<SampleOutcome>;
}

pub struct CheckTimeBudget {
    pub session_secs: f64,
}

impl Message for CheckTimeBudget {
    type Response = Result<SampleOutcome>;
}

pub struct Pause;

impl Message for Pause {
    type Response = Result<()>;
}

pub struct Resume;

impl Message for Resume {
    type Response = Result<()>;
}

pub struct Cancel;

impl Message for Cancel {
    type Response = Result<()>;
}

pub struct Snapshot;

impl Message for Snapshot {
    type Response = SessionSnapshot;
}

pub struct Completion {
    pub user_id: Id<User>,
    pub user_name: String,
    pub completed_at: DateTime<Utc>,
}

impl Message for Completion {
    type Response = Option<CompletionRecord>;
}

#[async_trait]
impl Handler<RecordSample> for SessionActor {
    async fn handle(&mut self, message: RecordSample) -> Result<SampleOutcome> {
        self.tracker.record_sample(
            &mut self.session,
            message.position,
            message.elapsed_delta_secs,
        )
    }
}

#[async_trait]
impl Handler<CheckTimeBudget> for SessionActor {
    async fn handle(&mut self, message: CheckTimeBudget) -> Result<SampleOutcome> {
        self.tracker
            .check_time_budget(&mut self.session, message.session_secs)
    }
}

#[async_trait]
impl Handler<Pause> for SessionActor {
    async fn handle(&mut self, _: Pause) -> Result<()> {
        self.tracker.pause(&mut self.session)
    }
}

#[async_trait]
impl Handler<Resume> for SessionActor {
    async fn handle(&mut self, _: Resume) -> Result<()> {
        self.tracker.resume(&mut self.session)
    }
}

#[async_trait]
impl Handler<Cancel> for SessionActor {
    async fn handle(&mut self, _: Cancel) -> Result<()> {
        self.tracker.cancel(&mut self.session)
    }
}

#[async_trait]
impl Handler<Snapshot> for SessionActor {
    async fn handle(&mut self, _: Snapshot) -> SessionSnapshot {
        self.session.snapshot()
    }
}

#[async_trait]
impl Handler<Completion> for SessionActor {
    async fn handle(&mut self, message: Completion) -> Option<CompletionRecord> {
        self.session
            .completion_record(message.user_id, message.user_name, message.completed_at)
    }
}

/// Starts a session on `route` and hands it to a new actor.
/// Must be called from within a tokio runtime.
pub fn spawn_session(
    tracker: RouteTracker,
    route_id: Id<PlannedRoute>,
    route: Arc<PlannedRoute>,
) -> ActorRef<SessionActor> {
    actors::run(move || SessionActor {
        session: tracker.start(route_id.clone(), route.clone()),
        tracker: tracker.clone(),
    })
}

#[async_trait]
pub trait SessionRef {
    async fn record_sample(
        &self,
        position: GeoPoint,
        elapsed_delta_secs: f64,
    ) -> Result<SampleOutcome>;
    async fn check_time_budget(&self, session_secs: f64) -> Result<SampleOutcome>;
    async fn pause(&self) -> Result<()>;
    async fn resume(&self) -> Result<()>;
    async fn cancel(&self) -> Result<()>;
    async fn snapshot(&self) -> Result<SessionSnapshot>;
    async fn completion(
        &self,
        user_id: Id<User>,
        user_name: String,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<CompletionRecord>>;
}

#[async_trait]
impl SessionRef for ActorRef<SessionActor> {
    async fn record_sample(
        &self,
        position: GeoPoint,
        elapsed_delta_secs: f64,
    ) -> Result<SampleOutcome> {
        self.ask(RecordSample {
            position,
            elapsed_delta_secs,
        })
        .await?
    }

    async fn check_time_budget(&self, session_secs: f64) -> Result<SampleOutcome> {
        self.ask(CheckTimeBudget { session_secs }).await?
    }

    async fn pause(&self) -> Result<()> {
        self.ask(Pause).await?
    }

    async fn resume(&self) -> Result<()> {
        self.ask(Resume).await?
    }

    async fn cancel(&self) -> Result<()> {
        self.ask(Cancel).await?
    }

    async fn snapshot(&self) -> Result<SessionSnapshot> {
        Ok(self.ask(Snapshot).await?)
    }

    async fn completion(
        &self,
        user_id: Id<User>,
        user_name: String,
        completed_at: DateTime<Utc>,
    ) -> Result<Option<CompletionRecord>> {
        Ok(self
            .ask(Completion {
                user_id,
                user_name,
                completed_at,
            })
            .await?)
    }
}
