use axum::{Json, Router, http::StatusCode, routing::get};

use crate::{response::ErrorResponse, state::AppState};

pub mod doc;
pub mod events;
pub mod health;
pub mod tickets;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/tickets", tickets::router())
        .route("/events", get(events::list_events))
        .route("/health", get(health::health_check))
        .method_not_allowed_fallback(method_not_allowed)
}

pub async fn method_not_allowed() -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        Json(ErrorResponse::new("Method Not Allowed")),
    )
}
