use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PORT: u16 = 3000;
const DEFAULT_STATIC_DIR: &str = "static";
const DEFAULT_METRICS_TIMEOUT_SECS: u64 = 3;

/// Server settings read from the environment (and `.env`)
#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// Directory served for every path not matched by a route
    pub static_dir: String,
    /// Base URL of the external play counter; `None` keeps counts in memory
    pub metrics_url: Option<String>,
    pub metrics_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            static_dir: DEFAULT_STATIC_DIR.to_string(),
            metrics_url: None,
            metrics_timeout: Duration::from_secs(DEFAULT_METRICS_TIMEOUT_SECS),
        }
    }
}

/// Trimmed value of `key`, or `None` if unset or blank
fn env_value(key: &str) -> Option<String> {
    std::env::var(key).ok().and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

/// Parse `key`, warning and returning `None` if the value is malformed
fn env_parsed<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env_value(key)?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={:?}, using default", key, raw);
            None
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let config = Self {
            bind_addr: env_parsed("BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: env_parsed("PORT").unwrap_or(defaults.port),
            static_dir: env_value("STATIC_DIR").unwrap_or(defaults.static_dir),
            metrics_url: env_value("METRICS_URL"),
            metrics_timeout: env_parsed("METRICS_TIMEOUT_SECS")
                .map(Duration::from_secs)
                .unwrap_or(defaults.metrics_timeout),
        };

        tracing::info!(
            bind_addr = %config.bind_addr,
            port = config.port,
            static_dir = %config.static_dir,
            metrics = config.metrics_url.as_deref().unwrap_or("in-memory"),
            "Server config loaded"
        );
        config
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}
