//! Desk configuration.
//!
//! Settings are read from `desk.toml` in the working directory unless another
//! path is given. Every key is optional; a missing file yields the defaults.

use serde::{Deserialize, Serialize};
use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur when loading or parsing configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the configuration file as valid TOML.
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The default engine is not one of the selectable engines.
    #[error("Default engine '{0}' is not listed in engines")]
    UnknownDefaultEngine(String),
}

/// Main desk configuration structure.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq, Eq)]
pub struct DeskConfig {
    /// Address the HTTP server binds to.
    #[serde(default = "default_bind")]
    pub bind: IpAddr,
    /// Port the HTTP server listens on.
    #[serde(default = "default_port")]
    pub port: u16,
    /// Engine service that answers move-suggestion requests.
    #[serde(default = "default_upstream_url")]
    pub upstream_url: String,
    /// Engines a session may choose from.
    #[serde(default = "default_engines")]
    pub engines: Vec<String>,
    /// Engine selected for new sessions.
    #[serde(default = "default_engine")]
    pub default_engine: String,
    /// Search depth sent with suggestion requests; omitted when unset.
    #[serde(default)]
    pub depth: Option<u32>,
}

fn default_bind() -> IpAddr {
    IpAddr::V4(Ipv4Addr::LOCALHOST)
}

fn default_port() -> u16 {
    3000
}

fn default_upstream_url() -> String {
    "http://127.0.0.1:8000/bestmove".to_string()
}

fn default_engines() -> Vec<String> {
    ["stockfish", "0.3.0", "0.2.1", "0.2.0"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_engine() -> String {
    "stockfish".to_string()
}

impl Default for DeskConfig {
    fn default() -> Self {
        DeskConfig {
            bind: default_bind(),
            port: default_port(),
            upstream_url: default_upstream_url(),
            engines: default_engines(),
            default_engine: default_engine(),
            depth: None,
        }
    }
}

impl DeskConfig {
    /// Default configuration file location.
    pub fn config_path() -> PathBuf {
        PathBuf::from("desk.toml")
    }

    /// Loads configuration from `path`, or the defaults if the file does not
    /// exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
    /// [`ConfigError::ParseError`] if it is not valid TOML, and
    /// [`ConfigError::UnknownDefaultEngine`] if the default engine is not
    /// selectable.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::from_toml_str(&content)
        } else {
            Ok(Self::default())
        }
    }

    /// Parses and validates configuration from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: DeskConfig = toml::from_str(content)?;
        if !config.has_engine(&config.default_engine) {
            return Err(ConfigError::UnknownDefaultEngine(config.default_engine));
        }
        Ok(config)
    }

    /// Returns true if `name` is a selectable engine.
    pub fn has_engine(&self, name: &str) -> bool {
        self.engines.iter().any(|e| e == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        let config = DeskConfig::from_toml_str("").unwrap();
        assert_eq!(config, DeskConfig::default());
        assert_eq!(config.port, 3000);
        assert_eq!(config.default_engine, "stockfish");
        assert_eq!(config.engines.len(), 4);
        assert_eq!(config.depth, None);
    }

    #[test]
    fn overrides_are_applied() {
        let config = DeskConfig::from_toml_str(
            r#"
            bind = "0.0.0.0"
            port = 8080
            upstream_url = "https://engine.example/bestmove"
            engines = ["stockfish", "0.3.0"]
            default_engine = "0.3.0"
            depth = 12
            "#,
        )
        .unwrap();

        assert_eq!(config.bind, IpAddr::V4(Ipv4Addr::UNSPECIFIED));
        assert_eq!(config.port, 8080);
        assert_eq!(config.upstream_url, "https://engine.example/bestmove");
        assert_eq!(config.default_engine, "0.3.0");
        assert_eq!(config.depth, Some(12));
        assert!(config.has_engine("stockfish"));
        assert!(!config.has_engine("0.2.0"));
    }

    #[test]
    fn default_engine_must_be_listed() {
        let err = DeskConfig::from_toml_str(
            r#"
            engines = ["stockfish"]
            default_engine = "0.2.1"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::UnknownDefaultEngine(name) if name == "0.2.1"));
    }

    #[test]
    fn invalid_toml_is_a_parse_error() {
        let err = DeskConfig::from_toml_str("port = \"eighty\"").unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn missing_file_gives_defaults() {
        let config = DeskConfig::load(Path::new("definitely/not/here/desk.toml")).unwrap();
        assert_eq!(config, DeskConfig::default());
    }

    #[test]
    fn config_path_is_desk_toml() {
        assert_eq!(DeskConfig::config_path(), PathBuf::from("desk.toml"));
    }
}
