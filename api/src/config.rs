//! Server Configuration

use serde::{Deserialize, Serialize};

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind_addr: String,
    /// Listening port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "0.0.0.0".into(),
            port: 5000,
        }
    }
}

impl ServerConfig {
    /// Load from a JSON file
    pub fn load(path: &str) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))
    }

    /// File named by `CONFIG_PATH` (if any), then `BIND_ADDR` / `PORT` overrides.
    pub fn from_env() -> Self {
        let base = match std::env::var("CONFIG_PATH") {
            Ok(path) => Self::load(&path).unwrap_or_else(|e| {
                tracing::warn!(%path, error = %e, "config not loaded, using defaults");
                Self::default()
            }),
            Err(_) => Self::default(),
        };
        base.with_overrides(
            std::env::var("BIND_ADDR").ok().as_deref(),
            std::env::var("PORT").ok().as_deref(),
        )
    }

    /// Applies overrides; an unparsable port is ignored with a warning.
    pub fn with_overrides(mut self, bind_addr: Option<&str>, port: Option<&str>) -> Self {
        if let Some(addr) = bind_addr.filter(|a| !a.is_empty()) {
            self.bind_addr = addr.to_string();
        }
        if let Some(port) = port {
            match port.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!(%port, "ignoring invalid PORT"),
            }
        }
        self
    }

    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}
