//! Service registry client
//!
//! Registers a service instance with a Eureka-compatible registry and keeps the
//! lease alive. Nothing here exchanges data with the business endpoints; other
//! services only use the registry to find this instance's address.

use std::{
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::Duration,
};

use serde::Serialize;
use thiserror::Error;
use tokio::{task::JoinHandle, time::MissedTickBehavior};
use tracing::{info, warn};

use crate::metrics::REGISTRY_FAILURES_TOTAL;

#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("network error: {0}")]
    Network(String),
    #[error("registry responded with status {0}")]
    Status(u16),
    #[error("instance is not registered")]
    NotRegistered,
    #[error("client build error: {0}")]
    Client(String),
}

/// Where and as what an instance registers.
#[derive(Debug, Clone)]
pub struct RegistrySettings {
    /// Registry base URL, e.g. `http://localhost:8761/eureka`.
    pub url: String,
    /// Logical service name, e.g. `pricing-service`.
    pub app: String,
    pub host: String,
    pub port: u16,
    pub heartbeat: Duration,
    /// Bound on each registry request.
    pub timeout: Duration,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InstanceInfo {
    pub instance_id: String,
    pub host_name: String,
    pub app: String,
    pub ip_addr: String,
    pub vip_address: String,
    pub status: String,
    pub port: PortInfo,
    pub health_check_url: String,
    pub status_page_url: String,
    pub data_center_info: DataCenterInfo,
}

#[derive(Debug, Clone, Serialize)]
pub struct PortInfo {
    #[serde(rename = "$")]
    pub number: u16,
    #[serde(rename = "@enabled")]
    pub enabled: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DataCenterInfo {
    #[serde(rename = "@class")]
    pub class: String,
    pub name: String,
}

#[derive(Serialize)]
struct InstanceEnvelope<'a> {
    instance: &'a InstanceInfo,
}

impl InstanceInfo {
    pub fn from_settings(s: &RegistrySettings) -> Self {
        let base = format!("http://{}:{}", s.host, s.port);
        Self {
            instance_id: format!("{}:{}:{}", s.host, s.app, s.port),
            host_name: s.host.clone(),
            app: s.app.to_ascii_uppercase(),
            ip_addr: s.host.clone(),
            vip_address: s.app.clone(),
            status: "UP".into(),
            port: PortInfo { number: s.port, enabled: "true".into() },
            health_check_url: format!("{base}/health"),
            status_page_url: format!("{base}/health"),
            data_center_info: DataCenterInfo {
                class: "com.netflix.appinfo.InstanceInfo$DefaultDataCenterInfo".into(),
                name: "MyOwn".into(),
            },
        }
    }
}

pub struct RegistryClient {
    http: reqwest::Client,
    base_url: String,
    heartbeat: Duration,
    instance: InstanceInfo,
    registered: AtomicBool,
}

impl RegistryClient {
    pub fn new(settings: &RegistrySettings) -> Result<Self, RegistryError> {
        let http = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| RegistryError::Client(e.to_string()))?;
        Ok(Self {
            http,
            base_url: settings.url.trim_end_matches('/').to_string(),
            heartbeat: settings.heartbeat,
            instance: InstanceInfo::from_settings(settings),
            registered: AtomicBool::new(false),
        })
    }

    pub fn instance(&self) -> &InstanceInfo {
        &self.instance
    }

    /// Whether the last registration succeeded and the lease was not lost since.
    pub fn is_registered(&self) -> bool {
        self.registered.load(Ordering::Acquire)
    }

    fn app_url(&self) -> String {
        format!("{}/apps/{}", self.base_url, self.instance.app)
    }

    fn instance_url(&self) -> String {
        format!("{}/{}", self.app_url(), self.instance.instance_id)
    }

    pub async fn register(&self) -> Result<(), RegistryError> {
        let resp = self
            .http
            .post(self.app_url())
            .json(&InstanceEnvelope { instance: &self.instance })
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RegistryError::Status(resp.status().as_u16()));
        }
        self.registered.store(true, Ordering::Release);
        info!(app = %self.instance.app, instance_id = %self.instance.instance_id, "registered with service registry");
        Ok(())
    }

    /// Renew the lease. A 404 means the registry forgot us.
    pub async fn heartbeat(&self) -> Result<(), RegistryError> {
        let resp = self
            .http
            .put(self.instance_url())
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        match resp.status() {
            s if s.is_success() => Ok(()),
            reqwest::StatusCode::NOT_FOUND => {
                self.registered.store(false, Ordering::Release);
                Err(RegistryError::NotRegistered)
            }
            s => Err(RegistryError::Status(s.as_u16())),
        }
    }

    pub async fn deregister(&self) -> Result<(), RegistryError> {
        let resp = self
            .http
            .delete(self.instance_url())
            .send()
            .await
            .map_err(|e| RegistryError::Network(e.to_string()))?;
        if !resp.status().is_success() {
            return Err(RegistryError::Status(resp.status().as_u16()));
        }
        self.registered.store(false, Ordering::Release);
        info!(app = %self.instance.app, instance_id = %self.instance.instance_id, "deregistered from service registry");
        Ok(())
    }

    /// One registry round: register while unregistered, otherwise renew.
    async fn keep_alive(&self) {
        if !self.is_registered() {
            if let Err(e) = self.register().await {
                REGISTRY_FAILURES_TOTAL.with_label_values(&["register"]).inc();
                warn!(app = %self.instance.app, error = %e, "service registration failed");
            }
            return;
        }
        match self.heartbeat().await {
            Ok(()) => {}
            Err(RegistryError::NotRegistered) => {
                warn!(app = %self.instance.app, "lease lost, registering again");
                if let Err(e) = self.register().await {
                    REGISTRY_FAILURES_TOTAL.with_label_values(&["register"]).inc();
                    warn!(error = %e, "re-registration failed");
                }
            }
            Err(e) => {
                REGISTRY_FAILURES_TOTAL.with_label_values(&["heartbeat"]).inc();
                warn!(error = %e, "registry heartbeat failed");
            }
        }
    }

    /// Register, then renew the lease every `heartbeat` until the handle is
    /// aborted. A failed registration is retried on the next tick.
    pub fn spawn_heartbeat(self: Arc<Self>) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(self.heartbeat);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                self.keep_alive().await;
            }
        })
    }
}

/// Start registration in the background and return at once, so serving never
/// waits on the registry. Only a client that cannot be built is an error.
pub fn announce(settings: &RegistrySettings) -> Result<(Arc<RegistryClient>, JoinHandle<()>), RegistryError> {
    let client = Arc::new(RegistryClient::new(settings)?);
    let handle = Arc::clone(&client).spawn_heartbeat();
    Ok((client, handle))
}

/// Stop the heartbeat and drop the lease if one is held.
pub async fn withdraw(client: &RegistryClient, heartbeat: JoinHandle<()>) {
    heartbeat.abort();
    if !client.is_registered() {
        return;
    }
    if let Err(e) = client.deregister().await {
        REGISTRY_FAILURES_TOTAL.with_label_values(&["deregister"]).inc();
        warn!(error = %e, "deregistration failed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use tokio::net::TcpListener;

    fn settings(url: String) -> RegistrySettings {
        RegistrySettings {
            url,
            app: "pricing-service".into(),
            host: "127.0.0.1".into(),
            port: 8082,
            heartbeat: Duration::from_secs(30),
            timeout: Duration::from_secs(5),
        }
    }

    async fn wait_registered(client: &RegistryClient) -> bool {
        for _ in 0..100 {
            if client.is_registered() {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        client.is_registered()
    }

    #[test]
    fn instance_document_uses_upper_case_app() {
        let info = InstanceInfo::from_settings(&settings("http://r/eureka".into()));
        assert_eq!(info.app, "PRICING-SERVICE");
        assert_eq!(info.instance_id, "127.0.0.1:pricing-service:8082");
        let json = serde_json::to_value(&info).unwrap();
        assert_eq!(json["port"]["$"], 8082);
        assert_eq!(json["healthCheckUrl"], "http://127.0.0.1:8082/health");
    }

    #[tokio::test]
    async fn register_posts_instance_envelope() {
        let server = MockServer::start_async().await;
        let m = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/eureka/apps/PRICING-SERVICE")
                    .json_body_partial(r#"{"instance":{"app":"PRICING-SERVICE","status":"UP"}}"#);
                then.status(204);
            })
            .await;
        let client = RegistryClient::new(&settings(server.url("/eureka"))).unwrap();
        assert!(!client.is_registered());
        client.register().await.unwrap();
        assert!(client.is_registered());
        m.assert_async().await;
    }

    #[tokio::test]
    async fn heartbeat_reports_lost_lease() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/eureka/apps/PRICING-SERVICE/127.0.0.1:pricing-service:8082");
                then.status(404);
            })
            .await;
        let client = RegistryClient::new(&settings(server.url("/eureka"))).unwrap();
        let err = client.heartbeat().await.unwrap_err();
        assert!(matches!(err, RegistryError::NotRegistered));
        assert!(!client.is_registered());
    }

    #[tokio::test]
    async fn silent_registry_times_out() {
        // accepts connections and never answers
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let silent = tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((stream, _)) = listener.accept().await {
                held.push(stream);
            }
        });

        let mut s = settings(format!("http://{addr}/eureka"));
        s.timeout = Duration::from_millis(200);
        let client = RegistryClient::new(&s).unwrap();

        let register = tokio::time::timeout(Duration::from_secs(5), client.register()).await;
        assert!(matches!(register, Ok(Err(RegistryError::Network(_)))));
        let deregister = tokio::time::timeout(Duration::from_secs(5), client.deregister()).await;
        assert!(matches!(deregister, Ok(Err(RegistryError::Network(_)))));
        assert!(!client.is_registered());
        silent.abort();
    }

    #[tokio::test]
    async fn failed_first_registration_is_retried() {
        let server = MockServer::start_async().await;
        let down = server
            .mock_async(|when, then| {
                when.method(POST).path("/eureka/apps/PRICING-SERVICE");
                then.status(503);
            })
            .await;

        let mut s = settings(server.url("/eureka"));
        s.heartbeat = Duration::from_millis(50);
        let (client, heartbeat) = announce(&s).unwrap();

        for _ in 0..100 {
            if down.hits_async().await >= 1 {
                break;
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        assert!(down.hits_async().await >= 1);
        assert!(!client.is_registered());

        down.delete_async().await;
        let up = server
            .mock_async(|when, then| {
                when.method(POST).path("/eureka/apps/PRICING-SERVICE");
                then.status(204);
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(PUT).path("/eureka/apps/PRICING-SERVICE/127.0.0.1:pricing-service:8082");
                then.status(200);
            })
            .await;

        assert!(wait_registered(&client).await);
        assert!(up.hits_async().await >= 1);
        heartbeat.abort();
    }

    #[tokio::test]
    async fn withdraw_deletes_instance_once_registered() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/eureka/apps/PRICING-SERVICE");
                then.status(204);
            })
            .await;
        let m = server
            .mock_async(|when, then| {
                when.method(DELETE).path("/eureka/apps/PRICING-SERVICE/127.0.0.1:pricing-service:8082");
                then.status(200);
            })
            .await;
        let (client, heartbeat) = announce(&settings(server.url("/eureka"))).unwrap();
        assert!(wait_registered(&client).await);

        withdraw(&client, heartbeat).await;
        m.assert_async().await;
        assert!(!client.is_registered());
    }
}
