use std::sync::Arc;

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer},
};
use tracing::{info, Level};

use common::{metrics::{metrics_handler, PRICE_LOOKUPS_TOTAL}, types::Health};

use crate::prices::{Price, PriceError, PricingService};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceQuery {
    pub vehicle_id: i64,
}

#[derive(Debug)]
pub struct PriceApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
}

impl IntoResponse for PriceApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": self.error,
            "message": self.message,
            "status": self.status.as_u16(),
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<PriceError> for PriceApiError {
    fn from(e: PriceError) -> Self {
        Self { status: StatusCode::NOT_FOUND, error: "Price Not Found", message: e.to_string() }
    }
}

pub async fn health() -> Json<Health> {
    Json(Health { status: "ok" })
}

pub async fn get_price(
    State(prices): State<Arc<PricingService>>,
    query: Result<Query<PriceQuery>, QueryRejection>,
) -> Result<Json<Price>, PriceApiError> {
    let Query(q) = query.map_err(|e| {
        PRICE_LOOKUPS_TOTAL.with_label_values(&["invalid"]).inc();
        PriceApiError { status: StatusCode::BAD_REQUEST, error: "Bad Request", message: e.body_text() }
    })?;
    match prices.price(q.vehicle_id) {
        Ok(p) => {
            PRICE_LOOKUPS_TOTAL.with_label_values(&["hit"]).inc();
            info!(vehicle_id = q.vehicle_id, price = p.price, "price_lookup");
            Ok(Json(p))
        }
        Err(e) => {
            PRICE_LOOKUPS_TOTAL.with_label_values(&["miss"]).inc();
            info!(vehicle_id = q.vehicle_id, "price_lookup_miss");
            Err(e.into())
        }
    }
}

pub fn build_router(prices: Arc<PricingService>, cors: CorsLayer) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/metrics", get(metrics_handler))
        .route("/services/price", get(get_price))
        .with_state(prices)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
