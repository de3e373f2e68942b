/*!
 * Configuration support for the coverage matrix library
 *
 * Provides runtime configuration for engine policy (address scope, gap
 * policy tables) and I/O behavior (skip-invalid parsing, progress bars).
 */

use std::path::{Path, PathBuf};
use serde::{Deserialize, Serialize};

use crate::gaps::GapPolicy;

/// Which address rows participate in geographic joins
///
/// The registry does not consistently distinguish primary from billing
/// addresses, so joining on every row can place a hospital in cities it does
/// not clinically serve. `All` reproduces the registry's own behavior;
/// `PrimaryOnly` restricts the city index and matrix to primary locations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AddressScope {
    #[default]
    All,
    PrimaryOnly,
}

/// Global configuration for the coverage matrix library
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatrixConfig {
    /// Which address rows feed the city index and matrix joins
    #[serde(default)]
    pub address_scope: AddressScope,

    /// Whether to skip invalid records during parsing instead of failing
    #[serde(default = "default_skip_invalid_records")]
    pub skip_invalid_records: bool,

    /// Whether to validate CSV headers against the expected extract schema
    #[serde(default = "default_validate_headers")]
    pub validate_headers: bool,

    /// Whether to show progress bars during long loads
    #[serde(default = "default_enable_progress_bar")]
    pub enable_progress_bar: bool,

    /// Default export format
    #[serde(default)]
    pub default_export_format: crate::ExportFormat,

    /// Planning policy tables for gap recommendations
    #[serde(default)]
    pub gap_policy: GapPolicy,
}

// Default value functions for serde
fn default_skip_invalid_records() -> bool {
    true
}

fn default_validate_headers() -> bool {
    true
}

fn default_enable_progress_bar() -> bool {
    true
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            address_scope: AddressScope::All,
            skip_invalid_records: default_skip_invalid_records(),
            validate_headers: default_validate_headers(),
            enable_progress_bar: default_enable_progress_bar(),
            default_export_format: crate::ExportFormat::Json,
            gap_policy: GapPolicy::default(),
        }
    }
}

impl MatrixConfig {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from environment variables
    ///
    /// Supported environment variables:
    /// - `SPECMATRIX_ADDRESS_SCOPE`: "all" or "primary_only"
    /// - `SPECMATRIX_SKIP_INVALID`: "true" or "false"
    /// - `SPECMATRIX_VALIDATE_HEADERS`: "true" or "false"
    /// - `SPECMATRIX_PROGRESS_BAR`: "true" or "false"
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(val) = std::env::var("SPECMATRIX_ADDRESS_SCOPE") {
            config.address_scope = match val.to_lowercase().as_str() {
                "primary_only" | "primary" => AddressScope::PrimaryOnly,
                _ => AddressScope::All,
            };
        }

        if let Ok(val) = std::env::var("SPECMATRIX_SKIP_INVALID") {
            config.skip_invalid_records = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("SPECMATRIX_VALIDATE_HEADERS") {
            config.validate_headers = val.to_lowercase() == "true";
        }

        if let Ok(val) = std::env::var("SPECMATRIX_PROGRESS_BAR") {
            config.enable_progress_bar = val.to_lowercase() == "true";
        }

        config
    }

    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        let config: Self = toml::from_str(&contents)
            .map_err(|e| crate::MatrixError::Configuration {
                message: format!("Failed to parse config file: {}", e),
                suggestion: Some("Check that the file is valid TOML format".to_string()),
            })?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> crate::Result<()> {
        let contents = toml::to_string_pretty(self)
            .map_err(|e| crate::MatrixError::Configuration {
                message: format!("Failed to serialize config: {}", e),
                suggestion: None,
            })?;
        std::fs::write(path, contents)?;
        Ok(())
    }

    /// Get the default configuration file path
    ///
    /// Returns `~/.config/specmatrix/config.toml` on Unix-like systems
    /// or `%APPDATA%\specmatrix\config.toml` on Windows
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "specmatrix")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from the default location, environment, or defaults
    ///
    /// Priority order:
    /// 1. Default config file (if exists)
    /// 2. Environment variables
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Some(config_path) = Self::default_config_path() {
            if config_path.exists() {
                if let Ok(config) = Self::from_file(&config_path) {
                    return config;
                }
            }
        }

        Self::from_env()
    }

    /// Configuration restricting geographic joins to primary locations
    pub fn primary_only() -> Self {
        Self {
            address_scope: AddressScope::PrimaryOnly,
            ..Self::default()
        }
    }
}

// Global configuration support
use std::sync::RwLock;

lazy_static::lazy_static! {
    static ref GLOBAL_CONFIG: RwLock<Option<MatrixConfig>> = RwLock::new(None);
}

/// Set the global configuration
pub fn set_global_config(config: MatrixConfig) {
    *GLOBAL_CONFIG.write().unwrap() = Some(config);
}

/// Get the global configuration (or default if not set)
pub fn global_config() -> MatrixConfig {
    GLOBAL_CONFIG.read().unwrap()
        .as_ref()
        .cloned()
        .unwrap_or_else(MatrixConfig::load)
}

/// Clear the global configuration
pub fn clear_global_config() {
    *GLOBAL_CONFIG.write().unwrap() = None;
}

/// Builder for customizing configuration
pub struct ConfigBuilder {
    config: MatrixConfig,
}

impl ConfigBuilder {
    /// Start building a new configuration
    pub fn new() -> Self {
        Self {
            config: MatrixConfig::default(),
        }
    }

    /// Set the address scope for geographic joins
    pub fn address_scope(mut self, scope: AddressScope) -> Self {
        self.config.address_scope = scope;
        self
    }

    /// Set skip invalid records
    pub fn skip_invalid_records(mut self, skip: bool) -> Self {
        self.config.skip_invalid_records = skip;
        self
    }

    /// Set header validation
    pub fn validate_headers(mut self, validate: bool) -> Self {
        self.config.validate_headers = validate;
        self
    }

    /// Set progress bar enabled
    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.config.enable_progress_bar = enabled;
        self
    }

    /// Replace the gap planning policy
    pub fn gap_policy(mut self, policy: GapPolicy) -> Self {
        self.config.gap_policy = policy;
        self
    }

    /// Build the configuration
    pub fn build(self) -> MatrixConfig {
        self.config
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = MatrixConfig::default();
        assert_eq!(config.address_scope, AddressScope::All);
        assert!(config.skip_invalid_records);
        assert!(config.validate_headers);
    }

    #[test]
    fn test_config_builder() {
        let config = ConfigBuilder::new()
            .address_scope(AddressScope::PrimaryOnly)
            .skip_invalid_records(false)
            .progress_bar(false)
            .build();

        assert_eq!(config.address_scope, AddressScope::PrimaryOnly);
        assert!(!config.skip_invalid_records);
        assert!(!config.enable_progress_bar);
    }

    #[test]
    fn test_config_toml_round_trip() {
        let config = MatrixConfig::primary_only();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: MatrixConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.address_scope, AddressScope::PrimaryOnly);
    }

    #[test]
    fn test_partial_toml_uses_defaults() {
        let parsed: MatrixConfig = toml::from_str("address_scope = \"primary_only\"").unwrap();
        assert_eq!(parsed.address_scope, AddressScope::PrimaryOnly);
        assert!(parsed.skip_invalid_records);
        assert_eq!(parsed.gap_policy.demand_multiplier("General Medicine"), 0.8);
    }
}
