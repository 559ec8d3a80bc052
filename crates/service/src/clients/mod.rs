//! Outbound collaborators that decorate a car response.
//!
//! Both clients are plain request/response wrappers over reqwest: one timeout,
//! no retries, no caching.

use thiserror::Error;

pub mod price;
pub mod maps;

pub use maps::{Address, HttpMapsClient, MapsClient};
pub use price::{HttpPriceClient, PriceClient};

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("network error: {0}")]
    Network(String),
    #[error("unexpected status {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
}

pub(crate) fn http_client(timeout: std::time::Duration) -> Result<reqwest::Client, ClientError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| ClientError::Network(e.to_string()))
}

/// Canned collaborators for tests and doc examples
pub mod mock {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::{Address, ClientError, MapsClient, PriceClient};

    /// Answers every lookup with `price`, or fails when it is `None`.
    #[derive(Default)]
    pub struct StubPriceClient {
        pub price: Option<String>,
        calls: AtomicUsize,
    }

    impl StubPriceClient {
        pub fn with_price(price: impl Into<String>) -> Self {
            Self { price: Some(price.into()), calls: AtomicUsize::new(0) }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl PriceClient for StubPriceClient {
        async fn price_for(&self, _vehicle_id: i64) -> Result<String, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.price.clone().ok_or(ClientError::Status(503))
        }
    }

    /// Answers every lookup with `address`, or fails when it is `None`.
    #[derive(Default)]
    pub struct StubMapsClient {
        pub address: Option<Address>,
        calls: AtomicUsize,
    }

    impl StubMapsClient {
        pub fn with_address(address: Address) -> Self {
            Self { address: Some(address), calls: AtomicUsize::new(0) }
        }

        pub fn failing() -> Self {
            Self::default()
        }

        pub fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl MapsClient for StubMapsClient {
        async fn address_for(&self, _lat: f64, _lon: f64) -> Result<Address, ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.address.clone().ok_or(ClientError::Status(503))
        }
    }
}
