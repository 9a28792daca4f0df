use std::collections::HashMap;

use crate::{config::DEFAULT_UNIT_PRICE, error::AppError};

/// Per-ticket prices. Events without an override use the default unit price.
#[derive(Debug, Clone)]
pub struct PriceTable {
    default_unit_price: i64,
    per_event: HashMap<String, i64>,
}

impl Default for PriceTable {
    fn default() -> Self {
        Self::new(DEFAULT_UNIT_PRICE)
    }
}

impl PriceTable {
    pub fn new(default_unit_price: i64) -> Self {
        Self {
            default_unit_price,
            per_event: HashMap::new(),
        }
    }

    pub fn with_event_prices(mut self, prices: HashMap<String, i64>) -> Self {
        self.per_event.extend(prices);
        self
    }

    pub fn with_price(mut self, event: impl Into<String>, price: i64) -> Self {
        self.per_event.insert(event.into(), price);
        self
    }

    pub fn unit_price(&self, event: &str) -> i64 {
        self.per_event
            .get(event)
            .copied()
            .unwrap_or(self.default_unit_price)
    }

    pub fn total(&self, event: &str, quantity: i64) -> Result<i64, AppError> {
        if quantity < 1 {
            return Err(AppError::BadRequest("Invalid number of tickets".into()));
        }
        self.unit_price(event)
            .checked_mul(quantity)
            .ok_or_else(|| AppError::BadRequest("Invalid number of tickets".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_is_quantity_times_default_price() {
        let prices = PriceTable::default();
        assert_eq!(prices.total("Summer Music Festival", 2).unwrap(), 100);
        assert_eq!(prices.total("Anything", 1).unwrap(), 50);
    }

    #[test]
    fn registered_event_price_overrides_default() {
        let prices = PriceTable::default().with_price("Tech Innovators Conference", 75);
        assert_eq!(prices.total("Tech Innovators Conference", 3).unwrap(), 225);
        assert_eq!(prices.total("London Marathon", 3).unwrap(), 150);
    }

    #[test]
    fn rejects_non_positive_and_overflowing_quantities() {
        let prices = PriceTable::default();
        assert!(matches!(prices.total("x", 0), Err(AppError::BadRequest(_))));
        assert!(matches!(prices.total("x", -4), Err(AppError::BadRequest(_))));
        assert!(matches!(prices.total("x", i64::MAX), Err(AppError::BadRequest(_))));
    }
}
