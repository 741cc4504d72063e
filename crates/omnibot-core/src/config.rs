use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Hosts treated as local development origins. Fallback payloads are never
/// substituted when the client runs against one of these.
pub const LOCAL_DEV_HOSTS: [&str; 2] = ["localhost", "127.0.0.1"];

/// Top-level application configuration, loaded from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub client: ClientConfig,
    pub server: ServerConfig,
    pub repl: ReplConfig,
}

impl AppConfig {
    /// Load configuration from the default path (~/.config/omnibot/config.toml),
    /// falling back to defaults if the file doesn't exist.
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        Ok(config)
    }

    /// Write current configuration to the given path, creating parent directories.
    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("omnibot")
            .join("config.toml")
    }

    /// Data directory for REPL history.
    pub fn data_dir() -> PathBuf {
        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("omnibot")
    }
}

/// Backend client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Base URL of the backend API, including the `/api` prefix.
    pub api_base: String,
    /// Per-request cancellation timeout in seconds.
    pub timeout_secs: u64,
    /// Host the client considers itself served from. Defaults to the host of
    /// `api_base` when unset.
    pub origin_host: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_base: "http://localhost:8000/api".into(),
            timeout_secs: 15,
            origin_host: None,
        }
    }
}

impl ClientConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolve the effective origin host.
    pub fn resolved_origin_host(&self) -> String {
        if let Some(host) = &self.origin_host {
            return host.to_lowercase();
        }
        url::Url::parse(&self.api_base)
            .ok()
            .and_then(|u| u.host_str().map(|h| h.to_lowercase()))
            .unwrap_or_else(|| "localhost".into())
    }

    /// Whether failed requests should be answered with canned demo payloads.
    pub fn fallback_enabled(&self) -> bool {
        !is_local_dev_host(&self.resolved_origin_host())
    }
}

pub fn is_local_dev_host(host: &str) -> bool {
    LOCAL_DEV_HOSTS.contains(&host)
}

/// Demo server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address.
    pub host: String,
    /// Port.
    pub port: u16,
    /// Enable permissive CORS.
    pub cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            cors: true,
        }
    }
}

/// Interactive shell configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplConfig {
    /// Persist line-editor history between runs.
    pub history: bool,
}

impl Default for ReplConfig {
    fn default() -> Self {
        Self { history: true }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_serializes() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("localhost:8000/api"));
        assert!(toml_str.contains("timeout_secs = 15"));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: AppConfig = toml::from_str("[client]\ntimeout_secs = 3\n").unwrap();
        assert_eq!(config.client.timeout_secs, 3);
        assert_eq!(config.client.api_base, "http://localhost:8000/api");
        assert_eq!(config.server.port, 8000);
        assert!(config.repl.history);
    }

    #[test]
    fn test_save_and_load_from_path() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("nested").join("config.toml");

        let mut config = AppConfig::default();
        config.client.origin_host = Some("omnibot.example.com".into());
        config.save_to(&path).unwrap();

        let loaded = AppConfig::load_from(&path).unwrap();
        assert_eq!(loaded.client.origin_host.as_deref(), Some("omnibot.example.com"));
    }

    #[test]
    fn test_origin_host_from_api_base() {
        let client = ClientConfig {
            api_base: "https://OmniBot.example.com/api".into(),
            ..Default::default()
        };
        assert_eq!(client.resolved_origin_host(), "omnibot.example.com");
        assert!(client.fallback_enabled());
    }

    #[test]
    fn test_local_hosts_disable_fallback() {
        assert!(!ClientConfig::default().fallback_enabled());

        let client = ClientConfig {
            api_base: "http://127.0.0.1:9000/api".into(),
            ..Default::default()
        };
        assert!(!client.fallback_enabled());
    }

    #[test]
    fn test_origin_host_override_wins() {
        let client = ClientConfig {
            api_base: "http://127.0.0.1:9000/api".into(),
            origin_host: Some("demo.example.org".into()),
            ..Default::default()
        };
        assert!(client.fallback_enabled());
    }
}
