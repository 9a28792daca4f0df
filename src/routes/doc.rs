use utoipa::{OpenApi, openapi::OpenApi as OpenApiSpec};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        events::EventListResponse,
        tickets::{
            CardDetails, NumTickets, PurchaseTicketRequest, PurchaseTicketResponse, TicketResponse,
        },
    },
    models::{Event, Ticket},
    response::ErrorResponse,
    routes::{events, health, tickets},
};

#[derive(OpenApi)]
#[openapi(
    info(title = "BigEventz API", description = "Ticket purchase and event listing"),
    paths(
        health::health_check,
        events::list_events,
        tickets::purchase_ticket,
        tickets::get_ticket,
    ),
    components(
        schemas(
            Ticket,
            Event,
            NumTickets,
            CardDetails,
            PurchaseTicketRequest,
            PurchaseTicketResponse,
            TicketResponse,
            EventListResponse,
            ErrorResponse,
            health::HealthData,
        )
    ),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Events", description = "Event catalog"),
        (name = "Tickets", description = "Ticket purchase and lookup"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
