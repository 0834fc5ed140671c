//! # Configuration Management
//!
//! Centralized configuration for the multiaddr library.
//!
//! Covers the protocol table the codecs consult and how the library's
//! `tracing` output is rendered.
//!
//! ## Configuration Sources
//! - TOML files via `from_file()`
//! - Direct instantiation with defaults
//! - Environment variable overrides via `from_env()`
//!
//! ## Protocol Table
//! ```toml
//! [registry]
//! include_builtin = true
//!
//! [[registry.protocols]]
//! code = 999
//! size = -1
//! name = "custom"
//! aliases = ["custom-legacy"]
//! ```

use crate::error::{MultiaddrError, Result};
use crate::protocol::{self, ProtocolEntry, Registry};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::Level;

/// Main configuration structure that contains all configurable settings
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct MultiaddrConfig {
    /// Protocol table configuration
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MultiaddrConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)
            .map_err(|e| MultiaddrError::ConfigError(format!("Failed to open config file: {e}")))?;

        let mut contents = String::new();
        file.read_to_string(&mut contents)
            .map_err(|e| MultiaddrError::ConfigError(format!("Failed to read config file: {e}")))?;

        Self::from_toml(&contents)
    }

    /// Load configuration from TOML string
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str::<Self>(content)
            .map_err(|e| MultiaddrError::ConfigError(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(level) = std::env::var("MULTIADDR_LOG_LEVEL") {
            config.logging.log_level = level.parse::<Level>().map_err(|_| {
                MultiaddrError::ConfigError(format!("Invalid MULTIADDR_LOG_LEVEL: {level}"))
            })?;
        }

        if let Ok(name) = std::env::var("MULTIADDR_APP_NAME") {
            config.logging.app_name = name;
        }

        if let Ok(json) = std::env::var("MULTIADDR_LOG_JSON") {
            if let Ok(val) = json.parse::<bool>() {
                config.logging.json_format = val;
            }
        }

        Ok(config)
    }

    /// Apply overrides to the default configuration
    pub fn default_with_overrides<F>(mutator: F) -> Self
    where
        F: FnOnce(&mut Self),
    {
        let mut config = Self::default();
        mutator(&mut config);
        config
    }

    /// Generate example configuration file content
    pub fn example_config() -> String {
        let example = Self::default_with_overrides(|config| {
            config.registry.protocols.push(ProtocolEntry {
                code: 999,
                size: -1,
                name: "custom".to_string(),
                resolvable: false,
                path: false,
                format: None,
                aliases: Vec::new(),
            });
        });
        toml::to_string_pretty(&example)
            .unwrap_or_else(|_| String::from("# Failed to generate example config"))
    }

    /// Save configuration to a file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MultiaddrError::ConfigError(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, content)
            .map_err(|e| MultiaddrError::ConfigError(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Build the protocol registry this configuration describes
    pub fn build_registry(&self) -> Result<Registry> {
        self.registry.build()
    }

    /// Build the registry and install it process-wide
    ///
    /// Must run before the first multiaddr is parsed.
    pub fn install_registry(&self) -> Result<()> {
        protocol::install(self.build_registry()?)
    }

    /// Validate the configuration for common issues and misconfigurations
    ///
    /// Returns a list of validation errors. Empty list means configuration is valid.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        errors.extend(self.registry.validate());
        errors.extend(self.logging.validate());

        errors
    }

    /// Validate and return Result - convenience method
    pub fn validate_strict(&self) -> Result<()> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(())
        } else {
            Err(MultiaddrError::ConfigError(format!(
                "Configuration validation failed:\n  - {}",
                errors.join("\n  - ")
            )))
        }
    }
}

/// Protocol table configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RegistryConfig {
    /// Start from the built-in protocol table
    #[serde(default = "default_include_builtin")]
    pub include_builtin: bool,

    /// Additional protocol rows
    #[serde(default)]
    pub protocols: Vec<ProtocolEntry>,
}

fn default_include_builtin() -> bool {
    true
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            include_builtin: true,
            protocols: Vec::new(),
        }
    }
}

impl RegistryConfig {
    /// Build a registry from the configured rows
    pub fn build(&self) -> Result<Registry> {
        let mut registry = if self.include_builtin {
            Registry::builtin()
        } else {
            Registry::new()
        };
        registry.extend_entries(&self.protocols)?;
        Ok(registry)
    }

    /// Validate protocol table configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if !self.include_builtin && self.protocols.is_empty() {
            errors.push("Protocol table is empty: enable include_builtin or add protocols".to_string());
        }

        let mut codes = HashSet::new();
        let mut names = HashSet::new();
        for entry in &self.protocols {
            if entry.name.is_empty() {
                errors.push(format!("Protocol {} has an empty name", entry.code));
            }
            for name in std::iter::once(&entry.name).chain(&entry.aliases) {
                if name.contains('/') {
                    errors.push(format!("Protocol name '{name}' cannot contain '/'"));
                }
                if !name.is_empty() && !names.insert(name.as_str()) {
                    errors.push(format!("Duplicate protocol name in table: '{name}'"));
                }
            }
            if !codes.insert(entry.code) {
                errors.push(format!("Duplicate protocol code in table: {}", entry.code));
            }
            if entry.size > 0 && entry.size % 8 != 0 {
                errors.push(format!(
                    "Protocol '{}' size {} is not a whole number of bytes",
                    entry.name, entry.size
                ));
            }
            if entry.path && entry.size != protocol::VARIABLE_SIZE {
                errors.push(format!(
                    "Path protocol '{}' must be variable-size (size = {})",
                    entry.name,
                    protocol::VARIABLE_SIZE
                ));
            }
            if let Err(e) = entry.to_protocol() {
                errors.push(e.to_string());
            }
        }

        // Collisions with the built-in table only show up once rows are combined.
        if errors.is_empty() {
            if let Err(e) = self.build() {
                errors.push(e.to_string());
            }
        }

        errors
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoggingConfig {
    /// Application name for logs
    pub app_name: String,

    /// Log level
    #[serde(with = "log_level_serde")]
    pub log_level: Level,

    /// Whether to use JSON formatting for logs
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            app_name: String::from("multiaddr"),
            log_level: Level::INFO,
            json_format: false,
        }
    }
}

impl LoggingConfig {
    /// Validate logging configuration
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.app_name.is_empty() {
            errors.push("Application name cannot be empty".to_string());
        } else if self.app_name.len() > 64 {
            errors.push(format!(
                "Application name too long: {} characters (maximum: 64)",
                self.app_name.len()
            ));
        }

        errors
    }
}

/// Helper module for tracing::Level serialization/deserialization
mod log_level_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::str::FromStr;
    use tracing::Level;

    pub fn serialize<S>(level: &Level, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let level_str = match *level {
            Level::TRACE => "trace",
            Level::DEBUG => "debug",
            Level::INFO => "info",
            Level::WARN => "warn",
            Level::ERROR => "error",
        };
        level_str.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Level, D::Error>
    where
        D: Deserializer<'de>,
    {
        let level_str = String::deserialize(deserializer)?;
        Level::from_str(&level_str)
            .map_err(|_| serde::de::Error::custom(format!("Invalid log level: {level_str}")))
    }
}
