//! Configuration types for the tollgate access token issuer.
//!
//! Configuration is loaded from a YAML file (tollgate.yaml) that names the
//! CDN distribution domain, a default token lifetime, and the membership
//! tiers with their signing key sources.
//!
//! # Configuration File
//!
//! ```yaml
//! domain: cdn.example.com
//! default_ttl_seconds: 3600
//! tiers:
//!   basic:
//!     private_key_file: keys/basic.pem
//!     key_pair_id: K1BASICEXAMPLE
//!   premium:
//!     private_key_env: TOLLGATE_PREMIUM_KEY
//!     key_pair_id: K3PREMIUMEXAMPLE
//! ```

pub mod tier;

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::Path;

pub use tier::TierConfig;

/// Complete tollgate configuration loaded from a file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TollgateConfig {
    /// CDN distribution domain the issued policies are scoped to.
    pub domain: String,

    /// Token lifetime applied when the caller does not pass one.
    #[serde(default = "default_ttl_seconds")]
    pub default_ttl_seconds: u64,

    /// Membership tiers and their signing key configuration.
    #[serde(default)]
    pub tiers: HashMap<String, TierConfig>,
}

fn default_ttl_seconds() -> u64 {
    3600
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl TollgateConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Check that the configuration is complete enough to issue tokens.
    ///
    /// Rejects an empty domain, an empty tier set, tiers without a key-pair
    /// id, and tiers with neither a key file nor a key env var configured.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.domain.trim().is_empty() {
            return Err(ConfigError::Config("domain must not be empty".to_string()));
        }

        if self.tiers.is_empty() {
            return Err(ConfigError::Config(
                "at least one tier must be configured".to_string(),
            ));
        }

        for (tier, tier_config) in &self.tiers {
            if tier_config.key_pair_id.trim().is_empty() {
                return Err(ConfigError::Config(format!(
                    "tier '{}' has an empty key_pair_id",
                    tier
                )));
            }
            if tier_config.private_key_env.is_none() && tier_config.private_key_file.is_none() {
                return Err(ConfigError::Config(format!(
                    "tier '{}' has neither private_key_env nor private_key_file",
                    tier
                )));
            }
        }

        Ok(())
    }

    /// Get a tier's configuration by name.
    pub fn tier(&self, name: &str) -> Option<&TierConfig> {
        self.tiers.get(name)
    }
}
