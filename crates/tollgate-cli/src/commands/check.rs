//! `tollgate check` command implementation.
//!
//! Validates the configuration and loads every tier's key material, so
//! broken key files or missing env vars surface before tokens are requested.

use anyhow::Context;
use std::path::{Path, PathBuf};
use tollgate_core::{TierConfig, TollgateConfig};
use tollgate_signer::KeyMaterial;

/// Run all configuration and key checks.
pub fn run(config_path: &Path) -> anyhow::Result<()> {
    println!("Checking tollgate configuration: {}", config_path.display());
    println!();

    let config = TollgateConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    config.validate()?;

    let base_dir = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));

    let mut tiers: Vec<_> = config.tiers.iter().collect();
    tiers.sort_by(|a, b| a.0.cmp(b.0));

    let mut failures = 0usize;
    for (tier, tier_config) in tiers {
        match probe_tier(tier_config, &base_dir) {
            Ok(()) => println!("  ✔ {tier:<12} key-pair id {}", tier_config.key_pair_id),
            Err(err) => {
                failures += 1;
                println!("  ✖ {tier:<12} {err:#}");
            }
        }
    }

    println!();
    if failures > 0 {
        anyhow::bail!("{} tier(s) failed the key check", failures);
    }

    println!("✔ All tiers loaded signing keys.");
    Ok(())
}

fn probe_tier(tier_config: &TierConfig, base_dir: &Path) -> anyhow::Result<()> {
    let pem = tier_config
        .resolve_private_key_pem(base_dir)?
        .ok_or_else(|| anyhow::anyhow!("no key material resolved (env or file)"))?;
    KeyMaterial::from_pem(pem.trim(), &tier_config.key_pair_id)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::write_project;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn passes_on_a_complete_project() {
        let dir = tempdir().unwrap();
        let config_path = write_project(dir.path());

        run(&config_path).unwrap();
    }

    #[test]
    fn fails_when_a_key_file_is_garbage() {
        let dir = tempdir().unwrap();
        let config_path = write_project(dir.path());
        fs::write(dir.path().join("keys/standard.pem"), "not a key").unwrap();

        assert!(run(&config_path).is_err());
    }

    #[test]
    fn fails_when_the_config_is_incomplete() {
        let dir = tempdir().unwrap();
        let config_path = dir.path().join("tollgate.yaml");
        fs::write(&config_path, "domain: cdn.example.com\n").unwrap();

        assert!(run(&config_path).is_err());
    }
}
