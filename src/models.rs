use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A purchased ticket as stored, returned verbatim by the lookup endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Ticket {
    pub ticket_id: String,
    pub event: String,
    pub num_tickets: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: String,
    pub total_amount: i64,
    /// `data:image/png;base64,...`
    pub qr_code: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Event {
    pub id: i32,
    pub name: String,
    pub date: NaiveDate,
    pub location: String,
    pub category: String,
    pub price: i64,
}

/// Payment method named by the buyer. Any non-empty name is accepted; names
/// containing "card" are treated as card payments and need card details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod(String);

impl PaymentMethod {
    pub const CREDIT_CARD: &'static str = "Credit Card";

    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_string()))
    }

    pub fn is_card(&self) -> bool {
        self.0.to_ascii_lowercase().contains("card")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}
