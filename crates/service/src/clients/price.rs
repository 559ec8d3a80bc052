use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use super::{http_client, ClientError};

/// Looks up the current price of a vehicle, formatted for display.
#[async_trait]
pub trait PriceClient: Send + Sync {
    async fn price_for(&self, vehicle_id: i64) -> Result<String, ClientError>;
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PriceBody {
    currency: String,
    price: f64,
}

/// Client for the pricing service's `/services/price` endpoint.
pub struct HttpPriceClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPriceClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self { http: http_client(timeout)?, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl PriceClient for HttpPriceClient {
    async fn price_for(&self, vehicle_id: i64) -> Result<String, ClientError> {
        let url = format!("{}/services/price", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("vehicleId", vehicle_id)])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status().as_u16()));
        }
        let body = resp.json::<PriceBody>().await.map_err(|e| ClientError::Parse(e.to_string()))?;
        debug!(vehicle_id, currency = %body.currency, price = body.price, "price lookup");
        Ok(format!("{} {:.2}", body.currency, body.price))
    }
}
