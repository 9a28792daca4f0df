mod common;

use bigeventz::{
    client::{
        api::{PurchaseApi, PurchaseOutcome, ServiceClient, TransportError},
        purchase_form::{PURCHASE_FALLBACK_ERROR, PurchaseForm, PurchaseFormController},
    },
    dto::tickets::PurchaseTicketRequest,
    services::ticket_id::is_ticket_id,
};
use chrono::NaiveDate;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

fn card_form() -> PurchaseForm {
    PurchaseForm {
        event: "Summer Music Festival".into(),
        quantity: "2".into(),
        name: "Ada Lovelace".into(),
        email: "ada@example.com".into(),
        phone: "020 7946 0000".into(),
        address: "1 High Street".into(),
        payment_method: Some("Credit Card".into()),
        card_name: "Ada Lovelace".into(),
        card_number: "4111 1111 1111 4242".into(),
        expiry: "12/2099".into(),
        cvv: "123".into(),
    }
}

#[tokio::test]
async fn successful_submission_renders_a_receipt() -> anyhow::Result<()> {
    let (app, state) = common::setup_app().await?;
    let mut controller = PurchaseFormController::new(ServiceClient::new(app));

    let view = controller.submit(&card_form(), today()).await.clone();

    assert_eq!(view.error_message, None);
    let receipt = view.receipt.expect("receipt");
    assert!(is_ticket_id(&receipt.ticket_id));
    assert_eq!(receipt.total_amount, 100);
    assert_eq!(receipt.masked_card().as_deref(), Some("**** **** **** 4242"));
    assert!(receipt.qr_code.starts_with("data:image/png;base64,"));
    assert!(
        view.success_message
            .expect("success message")
            .ends_with(&receipt.ticket_id)
    );
    assert_eq!(common::ticket_count(&state).await?, 1);
    Ok(())
}

#[tokio::test]
async fn local_validation_failure_sends_nothing() -> anyhow::Result<()> {
    let (app, state) = common::setup_app().await?;
    let mut controller = PurchaseFormController::new(ServiceClient::new(app));

    let mut form = card_form();
    form.expiry = "01/20".into();
    let view = controller.submit(&form, today()).await;

    assert_eq!(
        view.error_message.as_deref(),
        Some("Invalid or expired card expiry date.")
    );
    assert!(view.receipt.is_none());
    assert_eq!(common::ticket_count(&state).await?, 0);
    Ok(())
}

#[tokio::test]
async fn server_rejection_message_is_shown() -> anyhow::Result<()> {
    let (app, _) = common::setup_app().await?;
    let client = ServiceClient::new(app);

    // Bypass the form checks to reach the server-side validation.
    let request = PurchaseTicketRequest {
        event: Some("Summer Music Festival".into()),
        num_tickets: Some(2.into()),
        name: Some("A".into()),
        phone: Some("123".into()),
        payment_method: Some("Cash".into()),
        ..Default::default()
    };
    let outcome = client.purchase(&request).await?;
    assert_eq!(
        outcome,
        PurchaseOutcome::Rejected {
            status: 400,
            message: "Missing required fields".into(),
        }
    );
    Ok(())
}

struct Offline;

impl PurchaseApi for Offline {
    async fn purchase(
        &self,
        _request: &PurchaseTicketRequest,
    ) -> Result<PurchaseOutcome, TransportError> {
        Err(TransportError::Send("connection refused".into()))
    }
}

#[tokio::test]
async fn transport_failure_shows_the_fallback_message() {
    let mut controller = PurchaseFormController::new(Offline);
    let view = controller.submit(&card_form(), today()).await;
    assert_eq!(view.error_message.as_deref(), Some(PURCHASE_FALLBACK_ERROR));
    assert!(view.success_message.is_none());
    assert!(view.receipt.is_none());
}
