use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::HasId;

/// The athlete following a route. Identity itself is owned by the
/// authentication provider; only the display name is kept here.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub display_name: String,
}

impl HasId for User {
    type IdType = String;
}
