//! Error types for the signer crate.

use thiserror::Error;

/// Errors that can occur during token issuance.
#[derive(Debug, Error)]
pub enum SignerError {
    /// Tier is not present in the configured key registry.
    #[error("unknown membership tier: {tier}")]
    UnknownTier { tier: String },

    /// Caller-supplied policy input was missing or malformed.
    #[error("invalid policy input: {0}")]
    InvalidPolicyInput(String),

    /// Failed to parse private key material.
    #[error("failed to parse private key: {0}")]
    InvalidPrivateKey(String),

    /// A configured tier resolved no usable key source.
    #[error("no key material for tier '{tier}': {reason}")]
    MissingKeyMaterial { tier: String, reason: String },

    /// The signing primitive rejected the key or input.
    #[error("failed to sign policy: {0}")]
    Signing(String),

    /// Failed to serialize or parse a policy document.
    #[error("policy serialization error: {0}")]
    Serialization(String),

    /// Failed to decode an encoded token component.
    #[error("failed to decode token component: {0}")]
    Decoding(String),

    /// IO error (reading key files).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
