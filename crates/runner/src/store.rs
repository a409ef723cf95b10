use std::{error, result};

use async_trait::async_trait;
use indexmap::IndexMap;
use model::{
    completion::CompletionRecord, geo_point::GeoPoint, route::PlannedRoute, WithDistance,
    WithId,
};
use tokio::sync::RwLock;
use utility::id::Id;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Other(Box<dyn error::Error + Send + Sync>),
}

pub type Result<T> = result::Result<T, StoreError>;

/// Where routes and completed runs live. The tracker never writes here
/// itself; the orchestration loop does once a session has finished.
#[async_trait]
pub trait RouteStore: Send + Sync {
    async fn route(&self, id: &Id<PlannedRoute>) -> Result<PlannedRoute>;

    /// Stores a new route under an id derived from its name.
    async fn put_route(&self, route: PlannedRoute) -> Result<Id<PlannedRoute>>;

    /// Routes whose start point lies within `radius_km` of `position`,
    /// closest first.
    async fn routes_near(
        &self,
        position: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<WithDistance<WithId<PlannedRoute>>>>;

    async fn mark_completed(&self, id: &Id<PlannedRoute>) -> Result<()>;

    async fn save_completion(&self, record: CompletionRecord) -> Result<Id<CompletionRecord>>;

    async fn completions(&self) -> Result<Vec<CompletionRecord>>;
}

#[derive(Default)]
pub struct InMemoryRouteStore {
    routes: RwLock<IndexMap<Id<PlannedRoute>, PlannedRoute>>,
    completions: RwLock<Vec<CompletionRecord>>,
}

impl InMemoryRouteStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RouteStore for InMemoryRouteStore {
    async fn route(&self, id: &Id<PlannedRoute>) -> Result<PlannedRoute> {
        self.routes
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or(StoreError::NotFound)
    }

    async fn put_route(&self, route: PlannedRoute) -> Result<Id<PlannedRoute>> {
        let mut routes = self.routes.write().await;
        let base: Id<PlannedRoute> = Id::from_name(route.name().as_str());
        let mut id = base.clone();
        let mut suffix = 2;
        while routes.contains_key(&id) {
            id = Id::new(format!("{}-{}", base, suffix));
            suffix += 1;
        }
        routes.insert(id.clone(), route);
        Ok(id)
    }

    async fn routes_near(
        &self,
        position: &GeoPoint,
        radius_km: f64,
    ) -> Result<Vec<WithDistance<WithId<PlannedRoute>>>> {
        let routes = self.routes.read().await;
        let mut near = routes
            .iter()
            .map(|(id, route)| {
                WithDistance::new(
                    position.distance_km(&route.start_point()),
                    WithId::new(id.clone(), route.clone()),
                )
            })
            .filter(|route| route.distance_km <= radius_km)
            .collect::<Vec<_>>();
        near.sort_by(|a, b| a.distance_km.total_cmp(&b.distance_km));
        Ok(near)
    }

    async fn mark_completed(&self, id: &Id<PlannedRoute>) -> Result<()> {
        let mut routes = self.routes.write().await;
        let route = routes.get_mut(id).ok_or(StoreError::NotFound)?;
        route.mark_completed();
        Ok(())
    }

    async fn save_completion(&self, record: CompletionRecord) -> Result<Id<CompletionRecord>> {
        let mut completions = self.completions.write().await;
        completions.push(record);
        Ok(Id::new(completions.len() as i64))
    }

    async fn completions(&self) -> Result<Vec<CompletionRecord>> {
        Ok(self.completions.read().await.clone())
    }
}
