use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::{http_client, ClientError};

/// Reverse-geocoded address as returned by the maps service.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub zip: Option<String>,
}

#[async_trait]
pub trait MapsClient: Send + Sync {
    async fn address_for(&self, lat: f64, lon: f64) -> Result<Address, ClientError>;
}

/// Client for the maps service's `/maps?lat=&lon=` endpoint.
pub struct HttpMapsClient {
    http: reqwest::Client,
    base_url: String,
}

impl HttpMapsClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ClientError> {
        Ok(Self { http: http_client(timeout)?, base_url: base_url.trim_end_matches('/').to_string() })
    }
}

#[async_trait]
impl MapsClient for HttpMapsClient {
    async fn address_for(&self, lat: f64, lon: f64) -> Result<Address, ClientError> {
        let url = format!("{}/maps", self.base_url);
        let resp = self
            .http
            .get(&url)
            .query(&[("lat", lat), ("lon", lon)])
            .send()
            .await
            .map_err(|e| ClientError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(ClientError::Status(resp.status().as_u16()));
        }
        resp.json::<Address>().await.map_err(|e| ClientError::Parse(e.to_string()))
    }
}
