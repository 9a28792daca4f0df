use std::fmt;

use chrono::{Datelike, NaiveDate};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;

use crate::{
    client::api::{PurchaseApi, PurchaseOutcome},
    dto::tickets::{CardDetails, NumTickets, PurchaseTicketRequest},
    models::PaymentMethod,
};

pub const PURCHASE_FALLBACK_ERROR: &str =
    "There was an error purchasing your ticket. Please try again.";

/// Reasons a form is not submitted. Only the first failing rule is reported.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please fill in all required fields.")]
    MissingFields,

    #[error("Please select a payment method.")]
    MissingPaymentMethod,

    #[error("Please complete all card details.")]
    IncompleteCard,

    #[error("Invalid or expired card expiry date.")]
    InvalidExpiry,
}

/// Raw values of the ticket form fields, as typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseForm {
    pub event: String,
    pub quantity: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub payment_method: Option<String>,
    pub card_name: String,
    pub card_number: String,
    pub expiry: String,
    pub cvv: String,
}

impl PurchaseForm {
    /// Run the submit-time checklist and build the request body.
    pub fn validate(&self, today: NaiveDate) -> Result<PurchaseTicketRequest, FormError> {
        let base = [
            &self.event,
            &self.quantity,
            &self.name,
            &self.email,
            &self.phone,
            &self.address,
        ];
        if base.iter().any(|f| f.trim().is_empty()) {
            return Err(FormError::MissingFields);
        }

        let payment_method = self
            .payment_method
            .as_deref()
            .and_then(PaymentMethod::parse)
            .ok_or(FormError::MissingPaymentMethod)?;

        let card_details = if payment_method.is_card() {
            let card = [&self.card_name, &self.card_number, &self.expiry, &self.cvv];
            if card.iter().any(|f| f.trim().is_empty()) {
                return Err(FormError::IncompleteCard);
            }
            if !validate_expiry(&self.expiry, today) {
                return Err(FormError::InvalidExpiry);
            }
            Some(CardDetails {
                card_name: Some(self.card_name.trim().to_string()),
                card_number: Some(self.card_number.trim().to_string()),
                expiry_date: Some(self.expiry.trim().to_string()),
                cvv: Some(self.cvv.trim().to_string()),
            })
        } else {
            None
        };

        Ok(PurchaseTicketRequest {
            event: Some(self.event.trim().to_string()),
            num_tickets: Some(NumTickets::Text(self.quantity.trim().to_string())),
            name: Some(self.name.trim().to_string()),
            email: Some(self.email.trim().to_string()),
            phone: Some(self.phone.trim().to_string()),
            address: Some(self.address.trim().to_string()),
            payment_method: Some(payment_method.into_inner()),
            card_details,
            ..Default::default()
        })
    }

    fn card_last_four(&self) -> Option<String> {
        let digits: Vec<char> = self
            .card_number
            .chars()
            .filter(char::is_ascii_digit)
            .collect();
        if digits.is_empty() {
            return None;
        }
        Some(digits[digits.len().saturating_sub(4)..].iter().collect())
    }
}

/// Card expiry as `MM/YY` or `MM/YYYY`, not before the current month.
///
/// Two-digit years resolve to the year closest to today within a 100-year
/// window (`20` is 2020 in 2026, `05` is 2105 in 2090), so a long-expired
/// card is never mistaken for one a century away.
pub fn validate_expiry(expiry: &str, today: NaiveDate) -> bool {
    lazy_static! {
        static ref EXPIRY_RE: Regex = Regex::new(r"^(\d{1,2})/(\d{2}|\d{4})$").unwrap();
    }
    let Some(caps) = EXPIRY_RE.captures(expiry.trim()) else {
        return false;
    };
    let (Ok(month), Ok(year)) = (caps[1].parse::<u32>(), caps[2].parse::<i32>()) else {
        return false;
    };
    if !(1..=12).contains(&month) {
        return false;
    }

    let current_year = today.year();
    let year = if caps[2].len() == 2 {
        let mut full = current_year / 100 * 100 + year;
        if full < current_year - 50 {
            full += 100;
        } else if full > current_year + 49 {
            full -= 100;
        }
        full
    } else {
        year
    };

    (year, month) >= (current_year, today.month())
}

/// Purchase summary shown after a successful submission.
#[derive(Debug, Clone, PartialEq)]
pub struct TicketReceipt {
    pub ticket_id: String,
    pub event: String,
    pub num_tickets: String,
    pub attendee_name: String,
    pub attendee_email: String,
    pub attendee_phone: String,
    pub payment_method: String,
    pub card_last_four: Option<String>,
    pub total_amount: i64,
    /// `data:` URL of the QR image.
    pub qr_code: String,
}

impl TicketReceipt {
    pub fn masked_card(&self) -> Option<String> {
        self.card_last_four
            .as_ref()
            .map(|last| format!("**** **** **** {last}"))
    }
}

impl fmt::Display for TicketReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Ticket Summary")?;
        writeln!(f, "Event: {}", self.event)?;
        writeln!(f, "Number of Tickets: {}", self.num_tickets)?;
        writeln!(f, "Attendee Name: {}", self.attendee_name)?;
        writeln!(f, "Email: {}", self.attendee_email)?;
        writeln!(f, "Phone: {}", self.attendee_phone)?;
        writeln!(f, "Payment Method: {}", self.payment_method)?;
        if let Some(card) = self.masked_card() {
            writeln!(f, "Card: {card}")?;
        }
        writeln!(f, "Total Amount: £{}", self.total_amount)?;
        write!(f, "Ticket ID: {}", self.ticket_id)
    }
}

/// What the ticket page currently shows.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormView {
    pub error_message: Option<String>,
    pub success_message: Option<String>,
    pub receipt: Option<TicketReceipt>,
}

pub struct PurchaseFormController<A> {
    api: A,
    view: FormView,
}

impl<A: PurchaseApi> PurchaseFormController<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            view: FormView::default(),
        }
    }

    pub fn view(&self) -> &FormView {
        &self.view
    }

    /// Validate and submit. Errors end up in the view's error region and are
    /// never returned to the caller.
    pub async fn submit(&mut self, form: &PurchaseForm, today: NaiveDate) -> &FormView {
        self.view = FormView::default();

        let request = match form.validate(today) {
            Ok(request) => request,
            Err(err) => {
                self.view.error_message = Some(err.to_string());
                return &self.view;
            }
        };

        let resp = match self.api.purchase(&request).await {
            Ok(PurchaseOutcome::Purchased(resp)) if resp.success => resp,
            Ok(PurchaseOutcome::Purchased(resp)) => {
                self.view.error_message = Some(resp.message);
                return &self.view;
            }
            Ok(PurchaseOutcome::Rejected { message, .. }) => {
                self.view.error_message = Some(message);
                return &self.view;
            }
            Err(err) => {
                tracing::warn!(error = %err, "ticket purchase request failed");
                self.view.error_message = Some(PURCHASE_FALLBACK_ERROR.to_string());
                return &self.view;
            }
        };

        let card_last_four = request
            .payment_method
            .as_deref()
            .and_then(PaymentMethod::parse)
            .filter(PaymentMethod::is_card)
            .and_then(|_| form.card_last_four());

        self.view.success_message = Some(format!(
            "Ticket purchased successfully! Your ticket ID is: {}",
            resp.ticket_id
        ));
        self.view.receipt = Some(TicketReceipt {
            ticket_id: resp.ticket_id,
            event: form.event.trim().to_string(),
            num_tickets: form.quantity.trim().to_string(),
            attendee_name: form.name.trim().to_string(),
            attendee_email: form.email.trim().to_string(),
            attendee_phone: form.phone.trim().to_string(),
            payment_method: request.payment_method.unwrap_or_default(),
            card_last_four,
            total_amount: resp.total_amount,
            qr_code: resp.qr_code,
        });
        &self.view
    }
}
