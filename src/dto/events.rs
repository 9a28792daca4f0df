use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::Event;

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct EventQuery {
    /// Case-insensitive category match, e.g. `music`.
    pub category: Option<String>,
    /// Free-text search over name and location.
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct EventListResponse {
    pub success: bool,
    pub events: Vec<Event>,
}
