//! Configuration for the `shelf` binary.
//!
//! Values come from command-line flags and an optional TOML file. A flag that is
//! given wins over the file, and the file wins over the built-in defaults.

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use serde::Deserialize;
use shelf_http::codec::DEFAULT_MAX_REQUEST_BYTES;
use shelf_http::connection::ConnectionConfig;
use thiserror::Error;

pub const DEFAULT_LISTEN: &str = "0.0.0.0:4221";
pub const DEFAULT_MAX_CONNECTIONS: usize = 1024;
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Command-line arguments
#[derive(Parser, Debug, Default)]
#[command(name = "shelf", version, about = "A tiny HTTP/1.1 file and echo server", long_about = None)]
pub struct CliArgs {
    /// Path to TOML configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Directory served under /files/
    #[arg(long)]
    pub directory: Option<PathBuf>,

    /// Address to bind to [default: 0.0.0.0:4221]
    #[arg(short, long)]
    pub listen: Option<String>,

    /// Maximum number of connections served at once [default: 1024]
    #[arg(long)]
    pub max_connections: Option<usize>,

    /// Byte budget for one request, header and body together [default: 1024]
    #[arg(long)]
    pub max_request_bytes: Option<usize>,

    /// Seconds a peer has to send its request [default: 10]
    #[arg(long, value_name = "SECS")]
    pub read_timeout: Option<u64>,

    /// Seconds allowed for writing the response [default: 10]
    #[arg(long, value_name = "SECS")]
    pub write_timeout: Option<u64>,

    /// Log level (trace, debug, info, warn, error) [default: info]
    #[arg(long)]
    pub log_level: Option<String>,
}

/// TOML configuration file structure
#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerSection,
    #[serde(default)]
    pub storage: StorageSection,
    #[serde(default)]
    pub logging: LoggingSection,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerSection {
    pub listen: String,
    pub max_connections: usize,
    pub max_request_bytes: usize,
    pub read_timeout_secs: u64,
    pub write_timeout_secs: u64,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: DEFAULT_LISTEN.to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            max_request_bytes: DEFAULT_MAX_REQUEST_BYTES,
            read_timeout_secs: DEFAULT_TIMEOUT_SECS,
            write_timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct StorageSection {
    pub directory: Option<PathBuf>,
}

#[derive(Debug, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingSection {
    pub level: String,
}

impl Default for LoggingSection {
    fn default() -> Self {
        Self { level: DEFAULT_LOG_LEVEL.to_string() }
    }
}

/// Resolved configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen: String,
    pub directory: Option<PathBuf>,
    pub max_connections: usize,
    pub max_request_bytes: usize,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self::merge(CliArgs::default(), TomlConfig::default())
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{}': {source}", .path.display())]
    FileRead { path: PathBuf, source: std::io::Error },

    #[error("failed to parse config file '{}': {source}", .path.display())]
    TomlParse { path: PathBuf, source: toml::de::Error },

    #[error("invalid configuration: {0}")]
    Invalid(String),
}

impl Config {
    /// Loads configuration from the process arguments and the optional TOML file.
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_args(CliArgs::parse())
    }

    pub fn from_args(cli: CliArgs) -> Result<Self, ConfigError> {
        let toml_config = match cli.config.as_ref() {
            Some(path) => {
                let contents = std::fs::read_to_string(path)
                    .map_err(|source| ConfigError::FileRead { path: path.clone(), source })?;
                toml::from_str(&contents).map_err(|source| ConfigError::TomlParse { path: path.clone(), source })?
            }
            None => TomlConfig::default(),
        };

        let config = Self::merge(cli, toml_config);
        config.validate()?;
        Ok(config)
    }

    fn merge(cli: CliArgs, file: TomlConfig) -> Self {
        Config {
            listen: cli.listen.unwrap_or(file.server.listen),
            directory: cli.directory.or(file.storage.directory),
            max_connections: cli.max_connections.unwrap_or(file.server.max_connections),
            max_request_bytes: cli.max_request_bytes.unwrap_or(file.server.max_request_bytes),
            read_timeout: Duration::from_secs(cli.read_timeout.unwrap_or(file.server.read_timeout_secs)),
            write_timeout: Duration::from_secs(cli.write_timeout.unwrap_or(file.server.write_timeout_secs)),
            log_level: cli.log_level.unwrap_or(file.logging.level),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let zero = [
            ("max_connections", self.max_connections == 0),
            ("max_request_bytes", self.max_request_bytes == 0),
            ("read_timeout", self.read_timeout.is_zero()),
            ("write_timeout", self.write_timeout.is_zero()),
        ];
        match zero.iter().find(|(_, is_zero)| *is_zero) {
            Some((name, _)) => Err(ConfigError::Invalid(format!("{name} must be greater than zero"))),
            None => Ok(()),
        }
    }

    pub fn connection_config(&self) -> ConnectionConfig {
        ConnectionConfig {
            max_request_bytes: self.max_request_bytes,
            read_timeout: self.read_timeout,
            write_timeout: self.write_timeout,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    #[test]
    fn defaults() {
        let config = Config::from_args(CliArgs::parse_from(["shelf"])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.listen, "0.0.0.0:4221");
        assert_eq!(config.directory, None);
        assert_eq!(config.connection_config(), ConnectionConfig::default());
        assert_eq!(config.max_connections, 1024);
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn parse_toml() {
        let file: TomlConfig = toml::from_str(indoc! {r#"
            [server]
            listen = "127.0.0.1:8080"
            max_request_bytes = 4096

            [storage]
            directory = "/srv/files"
        "#})
        .unwrap();

        assert_eq!(file.server.listen, "127.0.0.1:8080");
        assert_eq!(file.server.max_request_bytes, 4096);
        assert_eq!(file.server.max_connections, DEFAULT_MAX_CONNECTIONS);
        assert_eq!(file.storage.directory, Some(PathBuf::from("/srv/files")));
        assert_eq!(file.logging.level, "info");
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let result = toml::from_str::<TomlConfig>(indoc! {r#"
            [server]
            port = 4221
        "#});

        assert!(result.is_err());
    }

    #[test]
    fn cli_overrides_file() {
        let file: TomlConfig = toml::from_str(indoc! {r#"
            [server]
            listen = "127.0.0.1:8080"
            read_timeout_secs = 30

            [logging]
            level = "debug"
        "#})
        .unwrap();
        let cli = CliArgs::parse_from(["shelf", "--listen", "127.0.0.1:9000", "--directory", "/tmp/shelf"]);

        let config = Config::merge(cli, file);

        assert_eq!(config.listen, "127.0.0.1:9000");
        assert_eq!(config.directory, Some(PathBuf::from("/tmp/shelf")));
        assert_eq!(config.read_timeout, Duration::from_secs(30));
        assert_eq!(config.write_timeout, Duration::from_secs(10));
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn zero_limits_are_invalid() {
        let cli = CliArgs::parse_from(["shelf", "--max-request-bytes", "0"]);

        assert!(matches!(Config::from_args(cli), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn missing_config_file() {
        let cli = CliArgs::parse_from(["shelf", "-c", "/nonexistent/shelf.toml"]);

        assert!(matches!(Config::from_args(cli), Err(ConfigError::FileRead { .. })));
    }
}
