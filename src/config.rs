use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::Deserialize;

use crate::capture::CaptureOptions;
use crate::{Result, SpcError};

/// Service configuration: defaults mirror the development setup (local
/// frontend on port 3000, backend on 8000), overridable via a TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub capture: CaptureConfig,
    pub figma: FigmaConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed by CORS; the frontend only.
    pub allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8000,
            allowed_origins: vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CaptureConfig {
    pub node_command: String,
    pub headless: bool,
    pub navigation_timeout_secs: u64,
    pub network_idle_timeout_secs: u64,
    pub process_timeout_secs: u64,
    pub max_concurrent_sessions: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            node_command: "node".to_string(),
            headless: true,
            navigation_timeout_secs: 30,
            network_idle_timeout_secs: 10,
            process_timeout_secs: 45,
            max_concurrent_sessions: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FigmaConfig {
    pub api_base_url: String,
}

impl Default for FigmaConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://api.figma.com/v1".to_string(),
        }
    }
}

impl Config {
    /// Load config from a TOML file, or return defaults when no path is given.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let text = fs::read_to_string(path).map_err(|e| {
                    SpcError::Config(format!("Failed to read config {}: {}", path.display(), e))
                })?;
                toml::from_str(&text).map_err(|e| {
                    SpcError::Config(format!("Invalid config ({}): {}", path.display(), e))
                })?
            }
            None => Self::default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.server.allowed_origins.is_empty() {
            return Err(SpcError::Config(
                "At least one allowed CORS origin is required".to_string(),
            ));
        }
        if self.capture.navigation_timeout_secs == 0 || self.capture.process_timeout_secs == 0 {
            return Err(SpcError::Config(
                "Capture timeouts must be positive".to_string(),
            ));
        }
        Ok(())
    }

    pub fn capture_options(&self) -> CaptureOptions {
        CaptureOptions {
            node_command: self.capture.node_command.clone(),
            headless: self.capture.headless,
            navigation_timeout: Duration::from_secs(self.capture.navigation_timeout_secs),
            network_idle_timeout: Duration::from_secs(self.capture.network_idle_timeout_secs),
            process_timeout: Duration::from_secs(self.capture.process_timeout_secs),
            max_concurrent_sessions: self.capture.max_concurrent_sessions,
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_values_match_expected() {
        let cfg = Config::default();

        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8000);
        assert_eq!(cfg.server.allowed_origins.len(), 2);
        assert_eq!(cfg.capture.node_command, "node");
        assert!(cfg.capture.headless);
        assert_eq!(cfg.capture.navigation_timeout_secs, 30);
        assert_eq!(cfg.capture.network_idle_timeout_secs, 10);
        assert_eq!(cfg.capture.process_timeout_secs, 45);
        assert_eq!(cfg.figma.api_base_url, "https://api.figma.com/v1");
        assert_eq!(cfg.bind_addr(), "127.0.0.1:8000");
    }

    #[test]
    fn load_without_path_returns_defaults() {
        let cfg = Config::load(None).unwrap();
        assert_eq!(cfg.server.port, 8000);
    }

    #[test]
    fn load_parses_partial_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[server]\nport = 9100\n\n[capture]\nprocess_timeout_secs = 60"
        )
        .unwrap();

        let cfg = Config::load(Some(file.path())).unwrap();
        assert_eq!(cfg.server.port, 9100);
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.capture.process_timeout_secs, 60);
        assert_eq!(cfg.capture.navigation_timeout_secs, 30);
    }

    #[test]
    fn load_rejects_malformed_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = oops").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, SpcError::Config(_)));
    }

    #[test]
    fn empty_origins_are_rejected() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[server]\nallowed_origins = []").unwrap();

        let err = Config::load(Some(file.path())).unwrap_err();
        assert!(err.to_string().contains("origin"));
    }

    #[test]
    fn capture_options_mirror_config() {
        let cfg = Config::default();
        let opts = cfg.capture_options();
        assert_eq!(opts.node_command, "node");
        assert_eq!(opts.navigation_timeout, Duration::from_secs(30));
        assert_eq!(opts.network_idle_timeout, Duration::from_secs(10));
        assert_eq!(opts.process_timeout, Duration::from_secs(45));
        assert_eq!(opts.max_concurrent_sessions, 1);
    }
}
