use anyhow::Result;
use serde::Deserialize;
use anyhow::anyhow;

#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub clients: ClientsConfig,
    #[serde(default)]
    pub pricing: PricingConfig,
    #[serde(default)]
    pub registry: RegistryConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub worker_threads: Option<usize>,
    /// Absolute base used for hypermedia links, e.g. `https://cars.example.com`.
    #[serde(default)]
    pub public_url: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8080, worker_threads: Some(4), public_url: None }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub url: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_idle_timeout")]
    pub idle_timeout_secs: u64,
    #[serde(default = "default_max_lifetime")]
    pub max_lifetime_secs: u64,
    #[serde(default = "default_acquire_timeout")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub sqlx_logging: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connect_timeout_secs: default_connect_timeout(),
            idle_timeout_secs: default_idle_timeout(),
            max_lifetime_secs: default_max_lifetime(),
            acquire_timeout_secs: default_acquire_timeout(),
            sqlx_logging: false,
        }
    }
}

fn default_max_connections() -> u32 { 10 }
fn default_min_connections() -> u32 { 2 }
fn default_connect_timeout() -> u64 { 30 }
fn default_idle_timeout() -> u64 { 600 }
fn default_max_lifetime() -> u64 { 3600 }
fn default_acquire_timeout() -> u64 { 30 }

/// Outbound collaborators used to enrich car responses.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientsConfig {
    #[serde(default = "default_pricing_url")]
    pub pricing_url: String,
    #[serde(default = "default_maps_url")]
    pub maps_url: String,
    #[serde(default = "default_client_timeout")]
    pub timeout_secs: u64,
}

impl Default for ClientsConfig {
    fn default() -> Self {
        Self { pricing_url: default_pricing_url(), maps_url: default_maps_url(), timeout_secs: default_client_timeout() }
    }
}

fn default_pricing_url() -> String { "http://localhost:8082".into() }
fn default_maps_url() -> String { "http://localhost:9191".into() }
fn default_client_timeout() -> u64 { 5 }

/// Bind address of the pricing service.
#[derive(Debug, Clone, Deserialize)]
pub struct PricingConfig {
    pub host: String,
    pub port: u16,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self { host: "127.0.0.1".into(), port: 8082 }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct RegistryConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_registry_url")]
    pub url: String,
    /// Host name advertised to the registry; defaults to the bind host.
    #[serde(default)]
    pub instance_host: Option<String>,
    #[serde(default = "default_heartbeat")]
    pub heartbeat_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { enabled: false, url: default_registry_url(), instance_host: None, heartbeat_secs: default_heartbeat() }
    }
}

fn default_registry_url() -> String { "http://localhost:8761/eureka".into() }
fn default_heartbeat() -> u64 { 30 }

pub fn load_default() -> Result<AppConfig> {
    let path = std::env::var("CONFIG_PATH").unwrap_or_else(|_| "config.toml".to_string());
    load_from_file(&path)
}

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let content = std::fs::read_to_string(path)?;
    load_from_str(&content)
}

pub fn load_from_str(content: &str) -> Result<AppConfig> {
    let cfg: AppConfig = toml::from_str(content)?;
    Ok(cfg)
}

impl AppConfig {
    pub fn load_and_validate() -> Result<Self> {
        let mut cfg = load_default()?;
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    /// Config file when present, otherwise defaults filled from the environment.
    pub fn load_or_env() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.normalize_and_validate()?;
        Ok(cfg)
    }

    pub fn normalize_and_validate(&mut self) -> Result<()> {
        self.server.normalize_from_env();
        self.server.normalize()?;
        self.database.normalize_from_env();
        self.database.validate()?;
        self.clients.normalize_from_env();
        self.clients.validate()?;
        self.registry.normalize_from_env();
        Ok(())
    }

    /// Subset used by the pricing service, which has no database or outbound clients.
    pub fn load_for_pricing() -> Result<Self> {
        let mut cfg = load_default().unwrap_or_default();
        cfg.server.normalize_from_env();
        cfg.server.normalize()?;
        cfg.pricing.normalize_from_env();
        cfg.pricing.validate()?;
        cfg.registry.normalize_from_env();
        Ok(cfg)
    }
}

impl ServerConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("SERVER_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("SERVER_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
        if let Some(w) = std::env::var("TOKIO_WORKER_THREADS").ok().and_then(|v| v.parse::<usize>().ok()) {
            self.worker_threads = Some(w);
        }
    }

    fn normalize(&mut self) -> Result<()> {
        if self.host.trim().is_empty() {
            self.host = "127.0.0.1".to_string();
        }
        if self.port == 0 {
            return Err(anyhow!("server.port must be within 1..=65535"));
        }
        match self.worker_threads {
            Some(0) | None => self.worker_threads = Some(4),
            Some(_) => {}
        }
        if let Some(url) = &self.public_url {
            let trimmed = url.trim().trim_end_matches('/');
            self.public_url = if trimmed.is_empty() { None } else { Some(trimmed.to_string()) };
        }
        Ok(())
    }
}

impl DatabaseConfig {
    pub fn normalize_from_env(&mut self) {
        // TOML wins; DATABASE_URL only fills a missing url
        if self.url.trim().is_empty() {
            if let Ok(url) = std::env::var("DATABASE_URL") {
                self.url = url;
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.url.trim().is_empty() {
            return Err(anyhow!("database.url is empty; set it in config.toml or DATABASE_URL"));
        }
        let lower = self.url.to_lowercase();
        if !(lower.starts_with("postgresql://") || lower.starts_with("postgres://") || lower.starts_with("sqlite:")) {
            return Err(anyhow!("database.url must start with postgres://, postgresql:// or sqlite:"));
        }
        if self.min_connections == 0 {
            return Err(anyhow!("database.min_connections must be >= 1"));
        }
        if self.max_connections < self.min_connections {
            return Err(anyhow!("database.max_connections must be >= min_connections"));
        }
        if self.connect_timeout_secs == 0 || self.acquire_timeout_secs == 0 {
            return Err(anyhow!("database timeouts must be positive seconds"));
        }
        Ok(())
    }
}

impl ClientsConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("PRICING_URL") {
            self.pricing_url = url;
        }
        if let Ok(url) = std::env::var("MAPS_URL") {
            self.maps_url = url;
        }
        self.pricing_url = self.pricing_url.trim_end_matches('/').to_string();
        self.maps_url = self.maps_url.trim_end_matches('/').to_string();
    }

    fn validate(&self) -> Result<()> {
        for (name, url) in [("clients.pricing_url", &self.pricing_url), ("clients.maps_url", &self.maps_url)] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(anyhow!("{name} must start with http(s)"));
            }
        }
        if self.timeout_secs == 0 {
            return Err(anyhow!("clients.timeout_secs must be positive"));
        }
        Ok(())
    }
}

impl PricingConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(host) = std::env::var("PRICING_HOST") {
            self.host = host;
        }
        if let Some(port) = std::env::var("PRICING_PORT").ok().and_then(|p| p.parse::<u16>().ok()) {
            self.port = port;
        }
    }

    fn validate(&self) -> Result<()> {
        if self.host.trim().is_empty() {
            return Err(anyhow!("pricing.host must not be empty"));
        }
        if self.port == 0 {
            return Err(anyhow!("pricing.port must be within 1..=65535"));
        }
        Ok(())
    }
}

impl RegistryConfig {
    fn normalize_from_env(&mut self) {
        if let Ok(url) = std::env::var("REGISTRY_URL") {
            self.url = url;
            self.enabled = true;
        }
        if self.heartbeat_secs == 0 {
            self.heartbeat_secs = default_heartbeat();
        }
    }
}
