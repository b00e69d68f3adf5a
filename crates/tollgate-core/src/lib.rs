// Configuration types shared across the tollgate crates
pub mod config;

// Re-export commonly used config types for convenience
pub use config::{ConfigError, TierConfig, TollgateConfig};
