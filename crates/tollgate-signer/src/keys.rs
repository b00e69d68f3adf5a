//! Signing key material and the per-tier key registry.

use crate::error::SignerError;
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::SigningKey;
use rsa::pkcs8::DecodePrivateKey;
use rsa::RsaPrivateKey;
use sha1::Sha1;
use std::collections::HashMap;
use std::path::Path;
use tollgate_core::TollgateConfig;

/// Signing key material for one membership tier.
///
/// Pairs an RSA private key with the public key-pair identifier the edge
/// uses to pick the matching verification key. Immutable once constructed;
/// the registry owns it and lends out shared references.
#[derive(Debug)]
pub struct KeyMaterial {
    signing_key: SigningKey<Sha1>,
    key_pair_id: String,
}

impl KeyMaterial {
    /// Create key material from an already-parsed private key.
    pub fn new(private_key: RsaPrivateKey, key_pair_id: impl Into<String>) -> Self {
        Self {
            signing_key: SigningKey::new(private_key),
            key_pair_id: key_pair_id.into(),
        }
    }

    /// Parse key material from a PEM string.
    ///
    /// Accepts both PKCS#1 (`BEGIN RSA PRIVATE KEY`) and PKCS#8
    /// (`BEGIN PRIVATE KEY`) encodings.
    pub fn from_pem(pem: &str, key_pair_id: impl Into<String>) -> Result<Self, SignerError> {
        let private_key = match RsaPrivateKey::from_pkcs1_pem(pem) {
            Ok(key) => key,
            Err(_) => RsaPrivateKey::from_pkcs8_pem(pem)
                .map_err(|e| SignerError::InvalidPrivateKey(e.to_string()))?,
        };
        Ok(Self::new(private_key, key_pair_id))
    }

    /// Load key material from a PEM file.
    pub fn from_pem_file(
        path: &Path,
        key_pair_id: impl Into<String>,
    ) -> Result<Self, SignerError> {
        let pem = std::fs::read_to_string(path)?;
        Self::from_pem(pem.trim(), key_pair_id)
    }

    /// The public key-pair identifier carried alongside issued tokens.
    pub fn key_pair_id(&self) -> &str {
        &self.key_pair_id
    }

    pub(crate) fn signing_key(&self) -> &SigningKey<Sha1> {
        &self.signing_key
    }
}

/// Read-only mapping from membership tier to its signing key material.
///
/// Populated once at startup and never mutated afterwards, so lookups are
/// safe from any number of threads without locking.
#[derive(Debug, Default)]
pub struct KeyRegistry {
    tiers: HashMap<String, KeyMaterial>,
}

impl KeyRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add key material for a tier, replacing any existing entry.
    pub fn register(&mut self, tier: impl Into<String>, key: KeyMaterial) {
        self.tiers.insert(tier.into(), key);
    }

    /// Look up the key material for a tier.
    pub fn resolve(&self, tier: &str) -> Result<&KeyMaterial, SignerError> {
        self.tiers.get(tier).ok_or_else(|| SignerError::UnknownTier {
            tier: tier.to_string(),
        })
    }

    /// Configured tier names, in no particular order.
    pub fn tiers(&self) -> impl Iterator<Item = &str> {
        self.tiers.keys().map(String::as_str)
    }

    /// Build a registry from configuration, loading each tier's key PEM.
    ///
    /// Relative key file paths are resolved against `base_dir` (normally the
    /// directory containing the config file). Fails on the first tier whose
    /// key cannot be resolved or parsed; a registry is either complete or
    /// not built at all.
    pub fn from_config(config: &TollgateConfig, base_dir: &Path) -> Result<Self, SignerError> {
        let mut registry = Self::new();

        for (tier, tier_config) in &config.tiers {
            let pem = tier_config.resolve_private_key_pem(base_dir)?.ok_or_else(|| {
                SignerError::MissingKeyMaterial {
                    tier: tier.clone(),
                    reason: "neither private_key_env nor private_key_file resolved".to_string(),
                }
            })?;
            let key = KeyMaterial::from_pem(pem.trim(), &tier_config.key_pair_id)?;

            tracing::debug!(
                tier = %tier,
                key_pair_id = %tier_config.key_pair_id,
                "loaded signing key"
            );
            registry.register(tier, key);
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::TEST_PRIVATE_KEY_PEM;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn registry_resolves_registered_tiers() {
        let mut registry = KeyRegistry::new();
        registry.register(
            "standard",
            KeyMaterial::from_pem(TEST_PRIVATE_KEY_PEM, "K2STANDARDEXAMPLE").unwrap(),
        );

        let key = registry.resolve("standard").unwrap();
        assert_eq!(key.key_pair_id(), "K2STANDARDEXAMPLE");
    }

    #[test]
    fn unknown_tier_is_rejected() {
        let mut registry = KeyRegistry::new();
        registry.register(
            "basic",
            KeyMaterial::from_pem(TEST_PRIVATE_KEY_PEM, "K1BASICEXAMPLE").unwrap(),
        );

        let err = registry.resolve("gold").unwrap_err();
        assert!(matches!(err, SignerError::UnknownTier { tier } if tier == "gold"));
    }

    #[test]
    fn malformed_pem_is_rejected() {
        let err = KeyMaterial::from_pem("not a pem at all", "K1BASICEXAMPLE").unwrap_err();
        assert!(matches!(err, SignerError::InvalidPrivateKey(_)));
    }

    #[test]
    fn loads_key_from_pem_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("standard.pem");
        fs::write(&path, TEST_PRIVATE_KEY_PEM).unwrap();

        let key = KeyMaterial::from_pem_file(&path, "K2STANDARDEXAMPLE").unwrap();
        assert_eq!(key.key_pair_id(), "K2STANDARDEXAMPLE");
    }

    #[test]
    fn builds_registry_from_config() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join("basic.pem"), TEST_PRIVATE_KEY_PEM).unwrap();

        let config = TollgateConfig::from_yaml(
            r#"
domain: cdn.example.com
tiers:
  basic:
    private_key_file: basic.pem
    key_pair_id: K1BASICEXAMPLE
"#,
        )
        .unwrap();

        let registry = KeyRegistry::from_config(&config, dir.path()).unwrap();
        assert_eq!(
            registry.resolve("basic").unwrap().key_pair_id(),
            "K1BASICEXAMPLE"
        );
        assert_eq!(registry.tiers().count(), 1);
    }

    #[test]
    fn registry_from_config_fails_on_missing_key_file() {
        let dir = tempdir().unwrap();

        let config = TollgateConfig::from_yaml(
            r#"
domain: cdn.example.com
tiers:
  basic:
    private_key_file: absent.pem
    key_pair_id: K1BASICEXAMPLE
"#,
        )
        .unwrap();

        let err = KeyRegistry::from_config(&config, dir.path()).unwrap_err();
        assert!(matches!(err, SignerError::MissingKeyMaterial { tier, .. } if tier == "basic"));
    }
}
