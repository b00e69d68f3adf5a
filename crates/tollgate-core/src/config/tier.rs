//! Per-tier signing key configuration.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Signing key configuration for a single membership tier.
///
/// Exactly one key pair exists per tier. The private key is referenced here
/// by source (env var or PEM file) and loaded once at startup; the key-pair
/// id is the public identifier the edge uses to select the verification key.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TierConfig {
    /// Environment variable containing the private key (PEM).
    #[serde(default)]
    pub private_key_env: Option<String>,

    /// Path to the private key file (PEM).
    #[serde(default)]
    pub private_key_file: Option<PathBuf>,

    /// Public key-pair identifier carried alongside issued tokens.
    pub key_pair_id: String,
}

impl TierConfig {
    /// Resolve the private key PEM from environment or file.
    ///
    /// The environment variable wins when both are set. Relative file paths
    /// are resolved against `base_dir` (normally the directory containing
    /// the config file). Returns `Ok(None)` when neither source resolves.
    pub fn resolve_private_key_pem(
        &self,
        base_dir: &Path,
    ) -> Result<Option<String>, std::io::Error> {
        // Try environment variable first
        if let Some(env_var) = &self.private_key_env {
            if let Ok(pem) = std::env::var(env_var) {
                return Ok(Some(pem));
            }
        }

        // Try file path
        if let Some(path) = &self.private_key_file {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                base_dir.join(path)
            };
            if path.exists() {
                let pem = std::fs::read_to_string(path)?;
                return Ok(Some(pem));
            }
        }

        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn resolves_key_from_relative_file() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("keys")).unwrap();
        fs::write(dir.path().join("keys/basic.pem"), "PEM CONTENT").unwrap();

        let tier = TierConfig {
            private_key_env: None,
            private_key_file: Some(PathBuf::from("keys/basic.pem")),
            key_pair_id: "K1BASICEXAMPLE".to_string(),
        };

        let pem = tier.resolve_private_key_pem(dir.path()).unwrap();
        assert_eq!(pem.as_deref(), Some("PEM CONTENT"));
    }

    #[test]
    fn missing_sources_resolve_to_none() {
        let dir = tempdir().unwrap();

        let tier = TierConfig {
            private_key_env: Some("TOLLGATE_TEST_KEY_THAT_IS_NOT_SET".to_string()),
            private_key_file: Some(PathBuf::from("keys/absent.pem")),
            key_pair_id: "K1BASICEXAMPLE".to_string(),
        };

        assert!(tier.resolve_private_key_pem(dir.path()).unwrap().is_none());
    }
}
