use axum::{
    body::Body,
    http::{Method, Request, Response, header},
};
use serde::Deserialize;
use thiserror::Error;
use tower::{Service, ServiceExt};

use crate::dto::tickets::{PurchaseTicketRequest, PurchaseTicketResponse};

const PURCHASE_PATH: &str = "/api/tickets/purchase";
const MAX_RESPONSE_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("request could not be sent: {0}")]
    Send(String),

    #[error("build request: {0}")]
    Request(#[from] axum::http::Error),

    #[error("read response body: {0}")]
    Body(#[from] axum::Error),

    #[error("decode response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PurchaseOutcome {
    Purchased(PurchaseTicketResponse),
    /// The server answered with an error status and this message.
    Rejected { status: u16, message: String },
}

pub trait PurchaseApi {
    fn purchase(
        &self,
        request: &PurchaseTicketRequest,
    ) -> impl Future<Output = Result<PurchaseOutcome, TransportError>>;
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Purchase client over any HTTP `tower::Service`: the application router
/// in-process, or a connection-backed client service.
#[derive(Debug, Clone)]
pub struct ServiceClient<S> {
    service: S,
    base_url: String,
}

impl<S> ServiceClient<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            base_url: String::new(),
        }
    }

    /// Prefix for request URIs, e.g. `http://localhost:3000`.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl<S> PurchaseApi for ServiceClient<S>
where
    S: Service<Request<Body>, Response = Response<Body>> + Clone,
    S::Error: std::fmt::Display,
{
    async fn purchase(
        &self,
        request: &PurchaseTicketRequest,
    ) -> Result<PurchaseOutcome, TransportError> {
        let body = serde_json::to_vec(request)?;
        let req = Request::builder()
            .method(Method::POST)
            .uri(format!("{}{}", self.base_url, PURCHASE_PATH))
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))?;

        let resp = self
            .service
            .clone()
            .oneshot(req)
            .await
            .map_err(|e| TransportError::Send(e.to_string()))?;

        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), MAX_RESPONSE_BYTES).await?;

        if status.is_success() {
            return Ok(PurchaseOutcome::Purchased(serde_json::from_slice(&bytes)?));
        }

        let message = serde_json::from_slice::<ErrorBody>(&bytes)
            .map(|body| body.message)
            .unwrap_or_else(|_| {
                status
                    .canonical_reason()
                    .unwrap_or("Failed to purchase ticket")
                    .to_string()
            });
        Ok(PurchaseOutcome::Rejected {
            status: status.as_u16(),
            message,
        })
    }
}
