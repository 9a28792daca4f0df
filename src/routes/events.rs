use axum::{Json, extract::Query};

use crate::{
    dto::events::{EventListResponse, EventQuery},
    services::event_service,
};

#[utoipa::path(
    get,
    path = "/api/events",
    params(EventQuery),
    responses(
        (status = 200, description = "Event catalog", body = EventListResponse),
    ),
    tag = "Events"
)]
pub async fn list_events(Query(query): Query<EventQuery>) -> Json<EventListResponse> {
    Json(event_service::list_events(&query))
}
