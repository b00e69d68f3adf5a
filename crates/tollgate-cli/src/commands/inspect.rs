//! `tollgate inspect` command implementation.

use anyhow::Context;
use tollgate_signer::{decode_component, AccessPolicy};

/// Decode an encoded policy component and print its contents.
///
/// This only reverses the transport encoding; it does not verify the
/// signature (verification happens at the edge, against the public half of
/// the key pair named by the token's key-pair id).
pub fn run(encoded_policy: &str) -> anyhow::Result<()> {
    let bytes = decode_component(encoded_policy).context("Failed to decode policy")?;
    let policy = AccessPolicy::from_canonical_bytes(&bytes)?;

    let document: serde_json::Value =
        serde_json::from_slice(&bytes).context("Decoded policy is not valid JSON")?;
    println!("{}", serde_json::to_string_pretty(&document)?);
    println!();
    println!("Resource:   {}", policy.resource_url());
    println!("Expires at: {} (epoch seconds)", policy.expires_at_epoch_seconds());
    match policy.source_ip() {
        Some(ip) => println!("Source IP:  {ip}"),
        None => println!("Source IP:  (unrestricted)"),
    }

    Ok(())
}
