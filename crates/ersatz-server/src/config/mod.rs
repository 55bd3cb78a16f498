//! Startup configuration for ersatz.
//!
//! The server config file is optional YAML:
//!
//! ```yaml
//! listen:
//!   host: 0.0.0.0
//!   port: 3000
//! metrics:
//!   port: 9090
//!   enabled: true
//! routes: ./routes.json
//! ```

mod listen;
mod routes;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub use listen::{ListenConfig, MetricsConfig};
pub use routes::{load_routes, parse_routes_json, parse_routes_yaml};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("Unsupported config format for {0} (expected .json, .yaml or .yml)")]
    UnsupportedFormat(PathBuf),
}

impl ConfigError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default)]
    pub listen: ListenConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
    /// Routes file, resolved relative to the working directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub routes: Option<PathBuf>,
}

impl ServerConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&contents)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(contents)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_yaml("{}").unwrap();
        assert_eq!(config.listen.host, "0.0.0.0");
        assert_eq!(config.listen.port, 3000);
        assert_eq!(config.metrics.port, 9090);
        assert!(config.metrics.enabled);
        assert!(config.routes.is_none());
    }

    #[test]
    fn test_partial_sections() {
        let config = ServerConfig::from_yaml(
            r#"
listen:
  port: 4000
metrics:
  enabled: false
routes: mocks/routes.yaml
"#,
        )
        .unwrap();
        assert_eq!(config.listen.host, "0.0.0.0");
        assert_eq!(config.listen.port, 4000);
        assert!(!config.metrics.enabled);
        assert_eq!(config.metrics.port, 9090);
        assert_eq!(config.routes, Some(PathBuf::from("mocks/routes.yaml")));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "listen:\n  host: 127.0.0.1\n  port: 4010").unwrap();

        let config = ServerConfig::from_file(file.path()).unwrap();
        assert_eq!(config.listen.host, "127.0.0.1");
        assert_eq!(config.listen.port, 4010);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            ServerConfig::from_yaml("listen: [1, 2"),
            Err(ConfigError::Yaml(_))
        ));
        assert!(matches!(
            ServerConfig::from_yaml("listen:\n  port: not-a-port"),
            Err(ConfigError::Yaml(_))
        ));
    }
}
