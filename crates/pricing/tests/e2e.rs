use std::net::SocketAddr;
use std::sync::Arc;

use reqwest::StatusCode as HttpStatusCode;
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use pricing::prices::{Price, PricingService};
use pricing::routes;

async fn start_server() -> anyhow::Result<String> {
    let prices = PricingService::from_prices(
        (1..=19).map(|id| Price { currency: "USD".into(), price: 10_000.0 + id as f64, vehicle_id: id }),
    );
    let app = routes::build_router(Arc::new(prices), CorsLayer::very_permissive());
    let listener = TcpListener::bind((std::net::Ipv4Addr::LOCALHOST, 0)).await?;
    let addr: SocketAddr = listener.local_addr()?;
    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await { eprintln!("server error: {}", e); }
    });
    Ok(format!("http://{}", addr))
}

#[tokio::test]
async fn e2e_known_vehicle_has_usd_price() -> anyhow::Result<()> {
    let base = start_server().await?;
    let res = reqwest::get(format!("{base}/services/price?vehicleId=1")).await?;
    assert_eq!(res.status(), HttpStatusCode::OK);
    let body = res.json::<Value>().await?;
    assert_eq!(body["currency"], "USD");
    assert_eq!(body["vehicleId"], 1);
    assert_eq!(body["price"], 10001.0);
    Ok(())
}

#[tokio::test]
async fn e2e_unknown_vehicles_are_404() -> anyhow::Result<()> {
    let base = start_server().await?;
    for id in [0, 20] {
        let res = reqwest::get(format!("{base}/services/price?vehicleId={id}")).await?;
        assert_eq!(res.status(), HttpStatusCode::NOT_FOUND);
        let body = res.json::<Value>().await?;
        assert_eq!(body["error"], "Price Not Found");
        assert_eq!(body["status"], 404);
    }
    Ok(())
}

#[tokio::test]
async fn e2e_missing_or_invalid_vehicle_id_is_400() -> anyhow::Result<()> {
    let base = start_server().await?;
    let res = reqwest::get(format!("{base}/services/price")).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    let res = reqwest::get(format!("{base}/services/price?vehicleId=abc")).await?;
    assert_eq!(res.status(), HttpStatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn e2e_health_and_metrics() -> anyhow::Result<()> {
    let base = start_server().await?;
    let body = reqwest::get(format!("{base}/health")).await?.json::<Value>().await?;
    assert_eq!(body["status"], "ok");

    reqwest::get(format!("{base}/services/price?vehicleId=2")).await?;
    let metrics = reqwest::get(format!("{base}/metrics")).await?.text().await?;
    assert!(metrics.contains("pricing_lookups_total"));
    Ok(())
}
