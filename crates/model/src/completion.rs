use chrono::{DateTime, Duration, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};
use utility::serde::duration;

use crate::{route::PlannedRoute, user::User, ExampleData};

/// A finished run that reached the end of its route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompletionRecord {
    pub route_id: Id<PlannedRoute>,
    pub route_name: String,
    pub user_id: Id<User>,
    pub user_name: String,
    pub distance_km: f64,
    #[serde(with = "duration")]
    #[schemars(schema_with = "duration::schema")]
    pub time_taken: Duration,
    pub completed_at: DateTime<Utc>,
}

impl HasId for CompletionRecord {
    type IdType = i64;
}

impl ExampleData for CompletionRecord {
    fn example_data() -> Self {
        Self {
            route_id: Id::new("ruta-del-parque-5k".to_owned()),
            route_name: "Ruta del Parque 5K".to_owned(),
            user_id: Id::new("u-1".to_owned()),
            user_name: "Ana".to_owned(),
            distance_km: 5.2,
            time_taken: Duration::seconds(1_930),
            completed_at: DateTime::<Utc>::UNIX_EPOCH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_time_as_hh_mm_ss() {
        let json = serde_json::to_value(CompletionRecord::example_data()).unwrap();
        assert_eq!("00:32:10", json["timeTaken"]);
        assert_eq!("ruta-del-parque-5k", json["routeId"]);
        let back: CompletionRecord = serde_json::from_value(json).unwrap();
        assert_eq!(CompletionRecord::example_data(), back);
    }
}
