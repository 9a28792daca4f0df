#![allow(dead_code)]

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use bigeventz::{
    app::build_app,
    db::{create_pool, run_migrations},
    services::pricing::PriceTable,
    state::AppState,
};
use serde_json::Value;
use tower::ServiceExt;

pub async fn setup_state(prices: PriceTable) -> anyhow::Result<AppState> {
    let pool = create_pool("sqlite::memory:").await?;
    run_migrations(&pool).await?;
    Ok(AppState::new(pool, prices))
}

pub async fn setup_app() -> anyhow::Result<(Router, AppState)> {
    let state = setup_state(PriceTable::default()).await?;
    Ok((build_app(state.clone(), &[]), state))
}

pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> anyhow::Result<(StatusCode, Value)> {
    let mut req = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            req = req.header(header::CONTENT_TYPE, "application/json");
            Body::from(serde_json::to_vec(&json)?)
        }
        None => Body::empty(),
    };
    let resp = app.clone().oneshot(req.body(body)?).await?;
    let status = resp.status();
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await?;
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)?
    };
    Ok((status, json))
}

pub async fn ticket_count(state: &AppState) -> anyhow::Result<i64> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tickets")
        .fetch_one(&state.pool)
        .await?;
    Ok(count)
}
