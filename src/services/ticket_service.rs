use chrono::Utc;

use crate::{
    dto::tickets::{PurchaseTicketRequest, PurchaseTicketResponse, TicketResponse},
    error::{AppError, AppResult},
    models::Ticket,
    services::{
        qr::{self, QrPayload},
        ticket_id::generate_ticket_id,
        ticket_store,
    },
    state::AppState,
};

/// Validate, price, encode and persist one purchase.
///
/// The QR image is built before the insert so an encoding failure never
/// leaves a row behind. A ticket id collision aborts the purchase.
pub async fn purchase_ticket(
    state: &AppState,
    payload: PurchaseTicketRequest,
) -> AppResult<PurchaseTicketResponse> {
    let purchase = payload.validate()?;

    let ticket_id = generate_ticket_id();
    let total_amount = state.prices.total(&purchase.event, purchase.quantity)?;
    let created_at = Utc::now();

    let qr_code = qr::encode_data_url(&QrPayload {
        ticket_id: &ticket_id,
        event: &purchase.event,
        num_tickets: purchase.quantity,
        name: &purchase.name,
        email: &purchase.email,
        date: created_at,
    })?;

    let ticket = Ticket {
        ticket_id,
        event: purchase.event,
        num_tickets: purchase.quantity,
        name: purchase.name,
        email: purchase.email,
        phone: purchase.phone,
        address: purchase.address,
        payment_method: purchase.payment_method.into_inner(),
        total_amount,
        qr_code,
        created_at,
    };
    let event = ticket.event.clone();
    let qr_code = ticket.qr_code.clone();

    let ticket_id = ticket_store::insert(&state.orm, ticket).await?;

    tracing::info!(
        ticket_id = %ticket_id,
        event = %event,
        quantity = purchase.quantity,
        total_amount,
        "ticket purchased"
    );

    Ok(PurchaseTicketResponse {
        success: true,
        ticket_id,
        qr_code,
        total_amount,
        message: "Ticket purchased successfully!".to_string(),
    })
}

pub async fn get_ticket(state: &AppState, ticket_id: &str) -> AppResult<TicketResponse> {
    let ticket = ticket_store::find_by_ticket_id(&state.orm, ticket_id).await?;
    let ticket = match ticket {
        Some(t) => t,
        None => return Err(AppError::NotFound("Ticket not found")),
    };
    Ok(TicketResponse {
        success: true,
        ticket,
    })
}
