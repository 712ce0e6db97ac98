use serde::Deserialize;
use std::time::Duration;

/// Process-wide configuration.
///
/// Loaded from a YAML file named by the `COURIER_CONFIG` environment variable,
/// falling back to built-in defaults. `LISTEN` overrides the server bind
/// address either way.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub client: ClientConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address the listener binds to
    pub listen_addr: String,

    /// Seconds to wait for the next request line before closing an idle
    /// connection
    pub read_timeout_secs: u64,

    /// Seconds granted to in-flight connections during shutdown before they
    /// are forcibly cancelled
    pub shutdown_grace_secs: u64,

    /// Maximum number of connections handled concurrently; further accepts
    /// queue until a slot frees up
    pub max_connections: usize,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub host: String,
    pub port: u16,

    /// Redirect hops followed before a request fails
    pub max_redirects: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            client: ClientConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".to_string(),
            read_timeout_secs: 30,
            shutdown_grace_secs: 5,
            max_connections: 64,
        }
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 8080,
            max_redirects: 5,
        }
    }
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        let mut cfg = match std::env::var("COURIER_CONFIG") {
            Ok(path) => {
                let text = std::fs::read_to_string(&path)?;
                serde_yaml::from_str(&text)?
            }
            Err(_) => Self::default(),
        };

        if let Ok(addr) = std::env::var("LISTEN") {
            cfg.server.listen_addr = addr;
        }

        Ok(cfg)
    }
}

impl ServerConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}
