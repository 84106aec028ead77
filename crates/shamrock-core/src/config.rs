//! Configuration loading and typed config structures for the Help Ireland
//! service.
//!
//! The canonical configuration lives in `help-ireland.yaml` at the project
//! root. Every section and field has a default, so an empty file (or no
//! file at all) yields a working local setup: in-memory store, Gemini judge
//! disabled until an API key is supplied.

use std::path::Path;

use serde::Deserialize;
use shamrock_progression::ProgressionConfig;
use shamrock_verify::VerifyConfig;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file from disk.
    #[error("failed to read config file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse YAML content.
    #[error("failed to parse config YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        source: serde_yml::Error,
    },

    /// An environment override held an unusable value.
    #[error("invalid environment override: {0}")]
    Env(String),
}

impl From<serde_yml::Error> for ConfigError {
    fn from(source: serde_yml::Error) -> Self {
        Self::Yaml { source }
    }
}

/// Top-level service configuration, mirroring `help-ireland.yaml`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Persistence settings.
    #[serde(default)]
    pub store: StoreConfig,

    /// Rules engine thresholds and mission settings.
    #[serde(default)]
    pub progression: ProgressionConfig,

    /// Image judge and witness settings.
    #[serde(default)]
    pub verification: VerifyConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from a YAML file at the given path.
    ///
    /// Environment variables override YAML values:
    /// - `DRAGONFLY_URL` overrides `store.dragonfly_url`
    /// - `HELP_IRELAND_PORT` overrides `server.port`
    /// - `GEMINI_API_KEY`, `GEMINI_MODEL`, `WITNESS_EXPIRY_HOURS` override
    ///   the `verification` section
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::parse(&contents)
    }

    /// Parse configuration from a YAML string, then apply environment
    /// overrides.
    pub fn parse(yaml: &str) -> Result<Self, ConfigError> {
        let mut config = Self::parse_without_env(yaml)?;
        config.apply_env_overrides()?;
        Ok(config)
    }

    /// Parse configuration from a YAML string, ignoring the environment.
    pub fn parse_without_env(yaml: &str) -> Result<Self, ConfigError> {
        // An empty document parses to unit, not to a mapping.
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yml::from_str(yaml)?)
    }

    /// Override values with environment variables when set.
    pub fn apply_env_overrides(&mut self) -> Result<(), ConfigError> {
        if let Ok(val) = std::env::var("DRAGONFLY_URL") {
            self.store.dragonfly_url = Some(val);
        }
        if let Ok(val) = std::env::var("HELP_IRELAND_PORT") {
            self.server.port = val
                .parse()
                .map_err(|e| ConfigError::Env(format!("HELP_IRELAND_PORT: {e}")))?;
        }
        self.verification
            .apply_env_overrides()
            .map_err(|e| ConfigError::Env(e.to_string()))
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ServerConfig {
    /// Address to bind.
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

/// Persistence configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct StoreConfig {
    /// Dragonfly (Redis-compatible) URL. Unset means in-memory storage.
    #[serde(default)]
    pub dragonfly_url: Option<String>,

    /// Key the local profile is stored under.
    #[serde(default = "default_profile_key")]
    pub profile_key: String,

    /// Messages kept per chat room.
    #[serde(default = "default_max_room_messages")]
    pub max_room_messages: usize,

    /// Messages returned when a room's history is listed.
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,

    /// Seed an empty peer pool with the demo community.
    #[serde(default = "default_true")]
    pub seed_demo_peers: bool,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            dragonfly_url: None,
            profile_key: default_profile_key(),
            max_room_messages: default_max_room_messages(),
            history_limit: default_history_limit(),
            seed_demo_peers: true,
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (trace, debug, info, warn, error). `RUST_LOG` wins.
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_owned()
}

const fn default_port() -> u16 {
    8080
}

fn default_profile_key() -> String {
    "help-ireland-profile-v4".to_owned()
}

const fn default_max_room_messages() -> usize {
    500
}

const fn default_history_limit() -> usize {
    100
}

const fn default_true() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_owned()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use shamrock_types::LeaderboardScope;
    use shamrock_verify::JudgeBackendType;

    use super::*;

    #[test]
    fn default_config_is_local() {
        let config = AppConfig::default();
        assert_eq!(config.server.port, 8080);
        assert!(config.store.dragonfly_url.is_none());
        assert_eq!(config.store.profile_key, "help-ireland-profile-v4");
        assert_eq!(config.progression.sage_actions, 50);
        assert_eq!(config.verification.witness_expiry_hours, 24);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn parse_full_yaml() {
        let yaml = r#"
server:
  host: "127.0.0.1"
  port: 9000

store:
  dragonfly_url: "redis://localhost:6379"
  profile_key: "aoife"
  max_room_messages: 50
  history_limit: 20
  seed_demo_peers: false

progression:
  leaderboard_scope: county
  mission_golden_reward: 3

verification:
  judge:
    backend: stub
  witness_expiry_hours: 6

logging:
  level: debug
  json: true
"#;
        let config = AppConfig::parse_without_env(yaml).unwrap();
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.store.dragonfly_url.as_deref(), Some("redis://localhost:6379"));
        assert_eq!(config.store.profile_key, "aoife");
        assert!(!config.store.seed_demo_peers);
        assert_eq!(config.progression.leaderboard_scope, LeaderboardScope::County);
        assert_eq!(config.progression.mission_golden_reward, 3);
        assert_eq!(config.progression.sage_actions, 50);
        assert_eq!(config.verification.judge.backend, JudgeBackendType::Stub);
        assert_eq!(config.verification.witness_expiry_hours, 6);
        assert!(config.logging.json);
    }

    #[test]
    fn parse_minimal_yaml() {
        let config = AppConfig::parse_without_env("server:\n  port: 3000\n").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.store.history_limit, 100);
    }

    #[test]
    fn parse_empty_yaml() {
        let config = AppConfig::parse_without_env("");
        assert!(config.is_ok());
    }

    #[test]
    fn invalid_yaml_is_an_error() {
        let result = AppConfig::parse_without_env("server: [unclosed");
        assert!(matches!(result, Err(ConfigError::Yaml { .. })));
    }

    #[test]
    fn shipped_config_matches_defaults() {
        let config = AppConfig::parse_without_env(include_str!("../../../help-ireland.yaml"));
        assert_eq!(config.ok(), Some(AppConfig::default()));
    }
}
