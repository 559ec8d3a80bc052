use std::{net::SocketAddr, sync::Arc, time::Duration};

use common::discovery::{self, RegistrySettings};
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::prices::PricingService;
use crate::routes;

pub const SERVICE_NAME: &str = "pricing-service";

fn registry_settings(cfg: &AppConfig, port: u16) -> Option<RegistrySettings> {
    cfg.registry.enabled.then(|| RegistrySettings {
        url: cfg.registry.url.clone(),
        app: SERVICE_NAME.to_string(),
        host: cfg.registry.instance_host.clone().unwrap_or_else(|| cfg.pricing.host.clone()),
        port,
        heartbeat: Duration::from_secs(cfg.registry.heartbeat_secs),
        timeout: Duration::from_secs(cfg.clients.timeout_secs),
    })
}

/// Serve the price table until Ctrl+C, registered with the registry when enabled.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let prices = Arc::new(PricingService::random());
    info!(count = prices.len(), "price table generated");
    let app = routes::build_router(prices, CorsLayer::very_permissive());

    let addr: SocketAddr = format!("{}:{}", cfg.pricing.host, cfg.pricing.port).parse()?;
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(%local, "starting pricing service");

    let registration = match registry_settings(&cfg, local.port()) {
        Some(settings) => match discovery::announce(&settings) {
            Ok(registration) => Some(registration),
            Err(e) => {
                warn!(url = %settings.url, error = %e, "service registry client unavailable");
                None
            }
        },
        None => None,
    };

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    if let Some((client, heartbeat)) = registration {
        discovery::withdraw(&client, heartbeat).await;
    }
    info!("pricing service stopped");
    Ok(())
}
