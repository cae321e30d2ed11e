//! HTTP server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};

/// HTTP listener settings.
///
/// # Example
///
/// ```toml
/// [server]
/// host = "127.0.0.1"
/// port = 8080
/// cors = false
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Interface to bind.
    pub host: String,
    /// Port to bind. The `PORT` environment variable overrides it.
    pub port: u16,
    /// Attach a permissive CORS layer so browser front-ends can call the API.
    pub cors: bool,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            cors: true,
        }
    }
}

impl FileServerConfig {
    /// `host:port` string for binding.
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_defaults() {
        let config = FileServerConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:5000");
        assert!(config.cors);
    }

    #[test]
    fn test_server_partial_override() {
        let config: super::super::FileConfig = toml::from_str("[server]\nport = 8080\n").unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "0.0.0.0");
    }
}
