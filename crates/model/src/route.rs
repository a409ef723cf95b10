use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use utility::{
    geo,
    id::{HasId, Id},
};

use crate::{
    geo_point::GeoPoint, user::User, ExampleData, ValidationError, MAX_NAME_LENGTH,
    MAX_ROUTE_POINTS, MIN_NAME_LENGTH, MIN_ROUTE_POINTS,
};

/// Pace used to derive a planned duration from the route length.
pub const ESTIMATED_PACE_KMH: f64 = 8.0;
pub const MIN_ESTIMATED_DURATION_SECS: u64 = 60;
pub const MAX_ESTIMATED_DURATION_SECS: u64 = 5 * 3600;

pub fn estimate_duration_secs(distance_km: f64) -> u64 {
    if !distance_km.is_finite() || distance_km <= 0.0 {
        return MIN_ESTIMATED_DURATION_SECS;
    }
    let secs = (distance_km / ESTIMATED_PACE_KMH * 3600.0) as u64;
    secs.clamp(MIN_ESTIMATED_DURATION_SECS, MAX_ESTIMATED_DURATION_SECS)
}

fn is_name_char(c: char) -> bool {
    matches!(c,
        'A'..='Z' | 'a'..='z' | '0'..='9' | ' '
        | 'Á' | 'É' | 'Í' | 'Ó' | 'Ú'
        | 'á' | 'é' | 'í' | 'ó' | 'ú'
        | 'ñ' | 'Ñ')
}

/// A validated, trimmed route name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RouteName(String);

impl RouteName {
    pub fn parse(name: &str) -> Result<Self, ValidationError> {
        let trimmed = name.trim();
        let length = trimmed.chars().count();
        if (MIN_NAME_LENGTH..=MAX_NAME_LENGTH).contains(&length)
            && trimmed.chars().all(is_name_char)
        {
            Ok(Self(trimmed.to_owned()))
        } else {
            Err(ValidationError::InvalidName(name.to_owned()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RouteName {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<RouteName> for String {
    fn from(value: RouteName) -> Self {
        value.0
    }
}

impl fmt::Display for RouteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum RouteStatus {
    #[default]
    NotStarted = 0,
    Completed = 1,
}

/// A route authored by tapping points on a map. Only the status changes
/// after creation, and only forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RouteDocument", into = "RouteDocument")]
pub struct PlannedRoute {
    name: RouteName,
    points: Vec<GeoPoint>,
    estimated_distance_km: f64,
    estimated_duration_secs: u64,
    status: RouteStatus,
    author: Option<Id<User>>,
}

impl HasId for PlannedRoute {
    type IdType = String;
}

impl PlannedRoute {
    /// Validates the points and derives the distance and duration estimates.
    pub fn new(
        name: RouteName,
        points: Vec<GeoPoint>,
        author: Option<Id<User>>,
    ) -> Result<Self, ValidationError> {
        validate_points(&points)?;
        let estimated_distance_km = path_distance_km(&points);
        Ok(Self {
            name,
            points,
            estimated_distance_km,
            estimated_duration_secs: estimate_duration_secs(estimated_distance_km),
            status: RouteStatus::NotStarted,
            author,
        })
    }

    pub fn name(&self) -> &RouteName {
        &self.name
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn estimated_distance_km(&self) -> f64 {
        self.estimated_distance_km
    }

    pub fn estimated_duration_secs(&self) -> u64 {
        self.estimated_duration_secs
    }

    pub fn status(&self) -> RouteStatus {
        self.status
    }

    pub fn author(&self) -> Option<&Id<User>> {
        self.author.as_ref()
    }

    pub fn start_point(&self) -> GeoPoint {
        self.points[0]
    }

    /// The terminal waypoint, reaching it completes the route.
    pub fn arrival_target(&self) -> GeoPoint {
        self.points[self.points.len() - 1]
    }

    /// Length of the path through all waypoints, recomputed from the points.
    pub fn path_distance_km(&self) -> f64 {
        path_distance_km(&self.points)
    }

    /// Returns `true` if the status changed.
    pub fn mark_completed(&mut self) -> bool {
        let changed = self.status == RouteStatus::NotStarted;
        self.status = RouteStatus::Completed;
        changed
    }
}

fn path_distance_km(points: &[GeoPoint]) -> f64 {
    geo::path_length(points.iter().map(|p| (p.latitude, p.longitude)))
}

pub(crate) fn validate_points(points: &[GeoPoint]) -> Result<(), ValidationError> {
    if points.len() < MIN_ROUTE_POINTS {
        return Err(ValidationError::TooFewPoints(points.len()));
    }
    if points.len() > MAX_ROUTE_POINTS {
        return Err(ValidationError::TooManyPoints(points.len()));
    }
    points.iter().try_for_each(GeoPoint::validate)
}

/// Storage shape of a route, as kept by the document store.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct RouteDocument {
    pub name: String,
    #[serde(rename = "route")]
    pub points: Vec<GeoPoint>,
    #[serde(rename = "distance")]
    pub estimated_distance_km: f64,
    #[serde(rename = "duration")]
    pub estimated_duration_secs: u64,
    #[serde(default)]
    #[schemars(with = "u8")]
    pub status: RouteStatus,
    #[serde(rename = "userId")]
    pub author: Option<Id<User>>,
}

impl TryFrom<RouteDocument> for PlannedRoute {
    type Error = ValidationError;

    fn try_from(document: RouteDocument) -> Result<Self, Self::Error> {
        validate_points(&document.points)?;
        if !document.estimated_distance_km.is_finite() || document.estimated_distance_km < 0.0
        {
            return Err(ValidationError::InvalidQuantity("distance"));
        }
        let duration_range = MIN_ESTIMATED_DURATION_SECS..=MAX_ESTIMATED_DURATION_SECS;
        if !duration_range.contains(&document.estimated_duration_secs) {
            return Err(ValidationError::DurationOutOfRange(
                document.estimated_duration_secs,
            ));
        }
        Ok(Self {
            name: RouteName::parse(&document.name)?,
            points: document.points,
            estimated_distance_km: document.estimated_distance_km,
            estimated_duration_secs: document.estimated_duration_secs,
            status: document.status,
            author: document.author,
        })
    }
}

impl From<PlannedRoute> for RouteDocument {
    fn from(route: PlannedRoute) -> Self {
        Self {
            name: route.name.into(),
            points: route.points,
            estimated_distance_km: route.estimated_distance_km,
            estimated_duration_secs: route.estimated_duration_secs,
            status: route.status,
            author: route.author,
        }
    }
}

impl JsonSchema for PlannedRoute {
    fn schema_name() -> String {
        "PlannedRoute".to_owned()
    }

    fn json_schema(gen: &mut schemars::gen::SchemaGenerator) -> schemars::schema::Schema {
        RouteDocument::json_schema(gen)
    }
}

impl ExampleData for PlannedRoute {
    fn example_data() -> Self {
        let points = vec![
            GeoPoint {
                latitude: 19.4204,
                longitude: -99.1819,
            },
            GeoPoint {
                latitude: 19.4260,
                longitude: -99.1600,
            },
            GeoPoint {
                latitude: 19.4326,
                longitude: -99.1332,
            },
        ];
        match RouteName::parse("Ruta del Parque 5K")
            .and_then(|name| Self::new(name, points, None))
        {
            Ok(route) => route,
            Err(why) => unreachable!("example route is valid: {why}"),
        }
    }
}
