//! `tollgate mint` command implementation.

use anyhow::Context;
use chrono::Utc;
use std::fs;
use std::path::{Path, PathBuf};
use tollgate_core::TollgateConfig;
use tollgate_signer::{issue_token, KeyRegistry};

/// Mint a signed access token using the configured tier keys.
pub fn run(
    config_path: &Path,
    tier: &str,
    resource_path: &str,
    ttl: Option<u64>,
    source_ip: Option<&str>,
    cookies: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let config = TollgateConfig::from_file(config_path)
        .with_context(|| format!("Failed to load config: {}", config_path.display()))?;
    config.validate()?;

    let base_dir = config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."));
    let registry = KeyRegistry::from_config(&config, &base_dir)?;

    let ttl_seconds = ttl.unwrap_or(config.default_ttl_seconds);
    let now = Utc::now().timestamp() as u64;

    let token = issue_token(
        &registry,
        tier,
        &config.domain,
        resource_path,
        ttl_seconds,
        now,
        source_ip,
    )?;

    if cookies {
        // Same attribute set the edge documents for signed cookies.
        for (name, value) in token.cookie_pairs() {
            println!(
                "{name}={value}; Domain={}; Path={}; Secure; HttpOnly",
                config.domain, resource_path
            );
        }
        return Ok(());
    }

    let json = serde_json::to_string_pretty(&token)?;
    if let Some(output_path) = output {
        fs::write(&output_path, &json)?;
        println!("✔ Token written to: {}", output_path.display());
        println!("  Tier:        {tier}");
        println!("  Key pair id: {}", token.key_pair_id);
        println!("  Expires in:  {ttl_seconds}s");
    } else {
        println!("{json}");
    }

    Ok(())
}
