use utility::id::Id;

use crate::{
    geo_point::GeoPoint,
    route::{estimate_duration_secs, validate_points, PlannedRoute, RouteName},
    user::User,
    ValidationError, MAX_ROUTE_POINTS,
};

/// Points collected while a user taps out a new route on the map.
#[derive(Debug, Clone, Default)]
pub struct RouteDraft {
    points: Vec<GeoPoint>,
}

impl RouteDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a tapped point. Returns `false` when the point was rejected,
    /// either because it is invalid or because the draft is full.
    pub fn push(&mut self, point: GeoPoint) -> bool {
        if self.points.len() >= MAX_ROUTE_POINTS || point.validate().is_err() {
            return false;
        }
        self.points.push(point);
        true
    }

    pub fn undo(&mut self) -> Option<GeoPoint> {
        self.points.pop()
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn distance_km(&self) -> f64 {
        self.points
            .windows(2)
            .map(|pair| pair[0].distance_km(&pair[1]))
            .sum()
    }

    pub fn estimated_duration_secs(&self) -> u64 {
        estimate_duration_secs(self.distance_km())
    }

    /// Validates the name and the points and produces the route to store.
    /// Coordinates are rounded to the stored precision.
    pub fn build(
        &self,
        name: &str,
        author: Option<Id<User>>,
    ) -> Result<PlannedRoute, ValidationError> {
        let name = RouteName::parse(name)?;
        validate_points(&self.points)?;
        let points = self.points.iter().map(GeoPoint::rounded).collect();
        PlannedRoute::new(name, points, author)
    }
}
