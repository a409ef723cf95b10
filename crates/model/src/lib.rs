use std::fmt::Debug;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
pub use serde_with;
use utility::id::{HasId, Id};

pub mod completion;
pub mod draft;
pub mod geo_point;
pub mod leaderboard;
pub mod route;
pub mod user;

pub const MIN_ROUTE_POINTS: usize = 2;
pub const MAX_ROUTE_POINTS: usize = 200;
pub const MIN_NAME_LENGTH: usize = 3;
pub const MAX_NAME_LENGTH: usize = 40;

pub trait ExampleData {
    fn example_data() -> Self;
}

/// Rejected input. Raised when authoring routes and again at the tracker
/// boundary, so malformed data never reaches the distance accumulators.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("coordinate ({latitude}, {longitude}) is out of range")]
    InvalidCoordinate { latitude: f64, longitude: f64 },
    #[error("route name {0:?} must be 3-40 letters, digits or spaces")]
    InvalidName(String),
    #[error("a route needs at least 2 points, got {0}")]
    TooFewPoints(usize),
    #[error("a route may have at most 200 points, got {0}")]
    TooManyPoints(usize),
    #[error("{0} must be a finite, non-negative number")]
    InvalidQuantity(&'static str),
    #[error("planned duration of {0} s is outside 60-18000 s")]
    DurationOutOfRange(u64),
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct WithDistance<T> {
    pub distance_km: f64,
    #[serde(flatten)]
    pub content: T,
}

impl<T> WithDistance<T> {
    pub fn new(distance_km: f64, content: T) -> Self {
        Self {
            distance_km,
            content,
        }
    }
}

#[derive(Debug, Clone, Serialize, JsonSchema)]
pub struct WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub id: Id<V>,
    #[serde(flatten)]
    pub content: V,
}

impl<V> WithId<V>
where
    V: HasId,
    V::IdType: Serialize + Debug + Clone,
{
    pub fn new(id: Id<V>, content: V) -> Self {
        Self { id, content }
    }
}
