use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, post},
};

use crate::{
    dto::tickets::{PurchaseTicketRequest, PurchaseTicketResponse, TicketResponse},
    error::AppResult,
    middleware::json::AppJson,
    response::ErrorResponse,
    routes::method_not_allowed,
    services::ticket_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/purchase", post(purchase_ticket).get(get_ticket_named_purchase))
        .route("/{ticket_id}", get(get_ticket))
        .method_not_allowed_fallback(method_not_allowed)
}

#[utoipa::path(
    post,
    path = "/api/tickets/purchase",
    request_body = PurchaseTicketRequest,
    responses(
        (status = 200, description = "Ticket purchased", body = PurchaseTicketResponse),
        (status = 400, description = "Missing or invalid fields", body = ErrorResponse),
        (status = 500, description = "Ticket could not be generated or saved", body = ErrorResponse),
    ),
    tag = "Tickets"
)]
pub async fn purchase_ticket(
    State(state): State<AppState>,
    AppJson(payload): AppJson<PurchaseTicketRequest>,
) -> AppResult<Json<PurchaseTicketResponse>> {
    let resp = ticket_service::purchase_ticket(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/tickets/{ticket_id}",
    params(
        ("ticket_id" = String, Path, description = "Ticket ID, e.g. TKT-1767225600000-ABCDEFGHI")
    ),
    responses(
        (status = 200, description = "Stored ticket", body = TicketResponse),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
        (status = 500, description = "Database error", body = ErrorResponse),
    ),
    tag = "Tickets"
)]
pub async fn get_ticket(
    State(state): State<AppState>,
    Path(ticket_id): Path<String>,
) -> AppResult<Json<TicketResponse>> {
    let resp = ticket_service::get_ticket(&state, &ticket_id).await?;
    Ok(Json(resp))
}

// The literal `/purchase` route shadows `/{ticket_id}` for that one segment.
async fn get_ticket_named_purchase(
    State(state): State<AppState>,
) -> AppResult<Json<TicketResponse>> {
    let resp = ticket_service::get_ticket(&state, "purchase").await?;
    Ok(Json(resp))
}
