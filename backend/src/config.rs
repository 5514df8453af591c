//! Configuration management for the landed-cost server
//!
//! Supports hierarchical configuration loading:
//! 1. Default values in code
//! 2. Configuration files (development.toml, production.toml)
//! 3. Environment variable overrides with LCS_ prefix

use config::{ConfigError, Environment, File};
use rust_decimal::Decimal;
use serde::Deserialize;

/// Main application configuration
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Current environment (development, production)
    pub environment: String,

    /// Server configuration
    pub server: ServerConfig,

    /// Ledger writer configuration
    pub ledger: LedgerConfig,

    /// Shadow audit configuration
    pub audit: AuditConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    /// Server port
    pub port: u16,

    /// Server host
    pub host: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LedgerConfig {
    /// Capacity of the bounded single-writer queue
    pub queue_capacity: usize,

    /// Weight bags are cut at when a lot is purchased
    pub standard_bag_kg: Decimal,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuditConfig {
    /// Absolute tolerance for audit comparisons
    pub tolerance: Decimal,

    /// Run a full audit sweep after every committed write
    pub after_every_write: bool,
}

impl Config {
    /// Load configuration from files and environment variables
    pub fn load() -> Result<Self, ConfigError> {
        let environment = std::env::var("LCS_ENVIRONMENT").unwrap_or_else(|_| "development".into());

        let config = config::Config::builder()
            // Start with default values
            .set_default("environment", environment.clone())?
            .set_default("server.port", 3000)?
            .set_default("server.host", "0.0.0.0")?
            .set_default("ledger.queue_capacity", 256)?
            .set_default("ledger.standard_bag_kg", shared::STANDARD_BAG_KG.to_string())?
            .set_default("audit.tolerance", shared::AUDIT_TOLERANCE.to_string())?
            .set_default("audit.after_every_write", false)?
            // Load environment-specific config file
            .add_source(File::with_name(&format!("config/{}", environment)).required(false))
            // Override with environment variables (LCS_ prefix)
            .add_source(
                Environment::with_prefix("LCS")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            host: "0.0.0.0".to_string(),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 256,
            standard_bag_kg: Decimal::from(shared::STANDARD_BAG_KG),
        }
    }
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            tolerance: shared::AUDIT_TOLERANCE,
            after_every_write: false,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            environment: "development".to_string(),
            server: ServerConfig::default(),
            ledger: LedgerConfig::default(),
            audit: AuditConfig::default(),
        }
    }
}
