use std::collections::HashMap;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;

/// Vehicle ids that have a price, inclusive.
pub const PRICED_VEHICLES: std::ops::RangeInclusive<i64> = 1..=19;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub currency: String,
    pub price: f64,
    pub vehicle_id: i64,
}

#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    #[error("Cannot find price for Vehicle {0}")]
    NotFound(i64),
}

/// Fixed price table, generated once at startup.
#[derive(Debug, Clone)]
pub struct PricingService {
    prices: HashMap<i64, Price>,
}

impl PricingService {
    pub fn random() -> Self {
        let mut rng = rand::thread_rng();
        let prices = PRICED_VEHICLES
            .map(|id| (id, Price { currency: "USD".into(), price: random_amount(&mut rng), vehicle_id: id }))
            .collect();
        Self { prices }
    }

    pub fn from_prices(prices: impl IntoIterator<Item = Price>) -> Self {
        Self { prices: prices.into_iter().map(|p| (p.vehicle_id, p)).collect() }
    }

    pub fn price(&self, vehicle_id: i64) -> Result<Price, PriceError> {
        self.prices.get(&vehicle_id).cloned().ok_or(PriceError::NotFound(vehicle_id))
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Amount in [10000, 50000), two decimals.
fn random_amount(rng: &mut impl Rng) -> f64 {
    let cents: u64 = rng.gen_range(1_000_000..5_000_000);
    cents as f64 / 100.0
}
