use std::{net::SocketAddr, sync::Arc, time::Duration};

use axum::Router;
use common::discovery::{self, RegistrySettings};
use configs::AppConfig;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::errors::StartupError;
use crate::routes::{self, ServerState};
use service::{
    car::{repo::seaorm::SeaOrmCarRepository, CarService},
    clients::{HttpMapsClient, HttpPriceClient},
};

pub const SERVICE_NAME: &str = "vehicles-api";

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    format!("{}:{}", cfg.server.host, cfg.server.port)
        .parse()
        .map_err(|e| StartupError::InvalidConfig(format!("bind address: {e}")).into())
}

/// Registry settings for a service bound at `host:port`, when enabled.
pub fn registry_settings(cfg: &AppConfig, app: &str, host: &str, port: u16) -> Option<RegistrySettings> {
    if !cfg.registry.enabled {
        return None;
    }
    Some(RegistrySettings {
        url: cfg.registry.url.clone(),
        app: app.to_string(),
        host: cfg.registry.instance_host.clone().unwrap_or_else(|| host.to_string()),
        port,
        heartbeat: Duration::from_secs(cfg.registry.heartbeat_secs),
        timeout: Duration::from_secs(cfg.clients.timeout_secs),
    })
}

/// Wire the car service against the configured database and collaborators.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<ServerState> {
    let db = models::db::connect_and_migrate(&cfg.database).await?;
    let timeout = Duration::from_secs(cfg.clients.timeout_secs);
    let prices = HttpPriceClient::new(&cfg.clients.pricing_url, timeout).map_err(StartupError::from)?;
    let maps = HttpMapsClient::new(&cfg.clients.maps_url, timeout).map_err(StartupError::from)?;
    info!(pricing = %cfg.clients.pricing_url, maps = %cfg.clients.maps_url, "collaborators configured");

    let cars = CarService::new(Arc::new(SeaOrmCarRepository::new(db)), Arc::new(prices), Arc::new(maps));
    Ok(ServerState { cars: Arc::new(cars), public_url: cfg.server.public_url.clone() })
}

/// Public entry: build the app and serve until Ctrl+C.
pub async fn run(cfg: AppConfig) -> anyhow::Result<()> {
    let state = build_state(&cfg).await?;
    let app: Router = routes::build_router(state, build_cors());

    let addr = bind_addr(&cfg)?;
    let listener = TcpListener::bind(addr).await?;
    let local = listener.local_addr()?;
    info!(%local, "starting vehicles api");

    let registration = match registry_settings(&cfg, SERVICE_NAME, &cfg.server.host, local.port()) {
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
    info!("vehicles api stopped");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_disabled_by_default() {
        assert!(registry_settings(&AppConfig::default(), SERVICE_NAME, "127.0.0.1", 8080).is_none());
    }

    #[test]
    fn registry_settings_prefer_instance_host() {
        let mut cfg = AppConfig::default();
        cfg.registry.enabled = true;
        cfg.registry.instance_host = Some("cars.internal".into());
        let s = registry_settings(&cfg, SERVICE_NAME, "0.0.0.0", 8080).unwrap();
        assert_eq!(s.host, "cars.internal");
        assert_eq!(s.app, "vehicles-api");
        assert_eq!(s.heartbeat, Duration::from_secs(30));
        assert_eq!(s.timeout, Duration::from_secs(cfg.clients.timeout_secs));
    }
}
