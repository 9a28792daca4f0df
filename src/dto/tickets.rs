use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{PaymentMethod, Ticket},
};

/// `numTickets` arrives as a JSON number or, from HTML forms, a numeric string.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub enum NumTickets {
    Count(i64),
    Text(String),
}

impl NumTickets {
    fn is_blank(&self) -> bool {
        matches!(self, NumTickets::Text(s) if s.trim().is_empty())
    }

    fn quantity(&self) -> Option<i64> {
        let n = match self {
            NumTickets::Count(n) => *n,
            NumTickets::Text(s) => s.trim().parse::<i64>().ok()?,
        };
        (n >= 1).then_some(n)
    }
}

impl From<i64> for NumTickets {
    fn from(n: i64) -> Self {
        NumTickets::Count(n)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CardDetails {
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
}

impl CardDetails {
    fn is_complete(&self) -> bool {
        [
            &self.card_name,
            &self.card_number,
            &self.expiry_date,
            &self.cvv,
        ]
        .into_iter()
        .all(|f| present(f).is_some())
    }
}

/// Raw purchase body. Every field is optional at this stage so that missing
/// values produce the purchase error message instead of a parse failure;
/// unknown fields and wrong types are still rejected by deserialization.
///
/// Card fields may come nested in `cardDetails` or flat at the top level.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PurchaseTicketRequest {
    pub event: Option<String>,
    pub num_tickets: Option<NumTickets>,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub payment_method: Option<String>,
    pub card_details: Option<CardDetails>,
    pub card_name: Option<String>,
    pub card_number: Option<String>,
    pub expiry_date: Option<String>,
    pub cvv: Option<String>,
}

/// A purchase that passed validation. Card data is dropped here; it is never
/// persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketPurchase {
    pub event: String,
    pub quantity: i64,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: PaymentMethod,
}

fn present(field: &Option<String>) -> Option<&str> {
    field.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

impl PurchaseTicketRequest {
    pub fn validate(self) -> Result<TicketPurchase, AppError> {
        let missing = || AppError::BadRequest("Missing required fields".into());

        let event = present(&self.event).ok_or_else(missing)?;
        let num_tickets = self
            .num_tickets
            .as_ref()
            .filter(|n| !n.is_blank())
            .ok_or_else(missing)?;
        let name = present(&self.name).ok_or_else(missing)?;
        let email = present(&self.email).ok_or_else(missing)?;
        let phone = present(&self.phone).ok_or_else(missing)?;
        let payment_method = self
            .payment_method
            .as_deref()
            .and_then(PaymentMethod::parse)
            .ok_or_else(missing)?;

        let quantity = num_tickets
            .quantity()
            .ok_or_else(|| AppError::BadRequest("Invalid number of tickets".into()))?;

        if payment_method.is_card() && !self.card().is_complete() {
            return Err(AppError::BadRequest("Missing card details".into()));
        }

        Ok(TicketPurchase {
            event: event.to_string(),
            quantity,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            address: present(&self.address).unwrap_or_default().to_string(),
            payment_method,
        })
    }

    /// Nested card details win; flat fields fill whatever is absent or blank.
    fn card(&self) -> CardDetails {
        let nested = self.card_details.clone().unwrap_or_default();
        let pick = |nested: Option<String>, flat: &Option<String>| {
            nested
                .filter(|s| !s.trim().is_empty())
                .or_else(|| flat.clone())
        };
        CardDetails {
            card_name: pick(nested.card_name, &self.card_name),
            card_number: pick(nested.card_number, &self.card_number),
            expiry_date: pick(nested.expiry_date, &self.expiry_date),
            cvv: pick(nested.cvv, &self.cvv),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseTicketResponse {
    pub success: bool,
    pub ticket_id: String,
    pub qr_code: String,
    pub total_amount: i64,
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TicketResponse {
    pub success: bool,
    pub ticket: Ticket,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cash_request() -> PurchaseTicketRequest {
        PurchaseTicketRequest {
            event: Some("Summer Music Festival".into()),
            num_tickets: Some(2.into()),
            name: Some("A".into()),
            email: Some("a@b.com".into()),
            phone: Some("123".into()),
            payment_method: Some("Cash".into()),
            ..Default::default()
        }
    }

    fn message(err: AppError) -> String {
        err.to_string()
    }

    #[test]
    fn valid_request_becomes_typed_purchase() {
        let purchase = cash_request().validate().unwrap();
        assert_eq!(purchase.quantity, 2);
        assert_eq!(purchase.address, "");
        assert_eq!(purchase.payment_method.as_str(), "Cash");
    }

    #[test]
    fn blank_required_field_is_missing() {
        let mut req = cash_request();
        req.email = Some("   ".into());
        assert_eq!(message(req.validate().unwrap_err()), "Missing required fields");

        let mut req = cash_request();
        req.num_tickets = Some(NumTickets::Text(String::new()));
        assert_eq!(message(req.validate().unwrap_err()), "Missing required fields");
    }

    #[test]
    fn quantity_accepts_numeric_strings_only() {
        let mut req = cash_request();
        req.num_tickets = Some(NumTickets::Text(" 3 ".into()));
        assert_eq!(req.validate().unwrap().quantity, 3);

        for bad in [NumTickets::Text("two".into()), NumTickets::Count(0), NumTickets::Count(-1)] {
            let mut req = cash_request();
            req.num_tickets = Some(bad);
            assert_eq!(message(req.validate().unwrap_err()), "Invalid number of tickets");
        }
    }

    #[test]
    fn card_payment_needs_every_card_field() {
        let mut req = cash_request();
        req.payment_method = Some("Credit Card".into());
        req.card_details = Some(CardDetails {
            card_name: Some("A".into()),
            card_number: Some("4111111111111111".into()),
            expiry_date: Some("12/99".into()),
            cvv: None,
        });
        assert_eq!(message(req.clone().validate().unwrap_err()), "Missing card details");

        req.cvv = Some("123".into());
        assert!(req.validate().is_ok());
    }

    #[test]
    fn blank_nested_card_field_falls_back_to_flat_field() {
        let mut req = cash_request();
        req.payment_method = Some("Credit Card".into());
        req.card_details = Some(CardDetails {
            card_name: Some(String::new()),
            card_number: Some("4111111111111111".into()),
            expiry_date: Some("12/99".into()),
            cvv: Some("123".into()),
        });
        req.card_name = Some("A".into());
        assert!(req.clone().validate().is_ok());

        req.card_name = Some("  ".into());
        assert_eq!(message(req.validate().unwrap_err()), "Missing card details");
    }
}
