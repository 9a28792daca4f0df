use std::{collections::HashMap, env};

use anyhow::{Context, bail};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://bigeventz.db?mode=rwc";
pub const DEFAULT_UNIT_PRICE: i64 = 50;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub unit_price: i64,
    pub event_prices: HashMap<String, i64>,
    pub cors_origins: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url =
            env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string());
        let host = env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = match env::var("APP_PORT") {
            Ok(p) => p.parse::<u16>().context("APP_PORT must be a port number")?,
            Err(_) => 3000,
        };
        let unit_price = match env::var("TICKET_UNIT_PRICE") {
            Ok(p) => parse_price(&p).context("TICKET_UNIT_PRICE")?,
            Err(_) => DEFAULT_UNIT_PRICE,
        };
        let event_prices = match env::var("TICKET_EVENT_PRICES") {
            Ok(raw) => parse_event_prices(&raw)?,
            Err(_) => HashMap::new(),
        };
        let cors_origins = env::var("CORS_ALLOWED_ORIGINS")
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|o| !o.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            database_url,
            host,
            port,
            unit_price,
            event_prices,
            cors_origins,
        })
    }
}

fn parse_price(raw: &str) -> anyhow::Result<i64> {
    let price = raw
        .trim()
        .parse::<i64>()
        .with_context(|| format!("invalid price {raw:?}"))?;
    if price < 0 {
        bail!("price must not be negative, got {price}");
    }
    Ok(price)
}

/// Parses `Event Name=75,Other Event=40`.
pub fn parse_event_prices(raw: &str) -> anyhow::Result<HashMap<String, i64>> {
    let mut prices = HashMap::new();
    for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
        let Some((event, price)) = entry.rsplit_once('=') else {
            bail!("TICKET_EVENT_PRICES entry {entry:?} is not `event=price`");
        };
        let event = event.trim();
        if event.is_empty() {
            bail!("TICKET_EVENT_PRICES entry {entry:?} has no event name");
        }
        prices.insert(event.to_string(), parse_price(price)?);
    }
    Ok(prices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_event_price_overrides() {
        let prices =
            parse_event_prices("Tech Innovators Conference=75, London Marathon = 40,").unwrap();
        assert_eq!(prices.len(), 2);
        assert_eq!(prices["Tech Innovators Conference"], 75);
        assert_eq!(prices["London Marathon"], 40);
    }

    #[test]
    fn rejects_malformed_price_entries() {
        assert!(parse_event_prices("no-equals-sign").is_err());
        assert!(parse_event_prices("=10").is_err());
        assert!(parse_event_prices("Gig=cheap").is_err());
        assert!(parse_event_prices("Gig=-5").is_err());
    }
}
