//! # tollgate-signer
//!
//! Token issuance for the tollgate CDN access gate.
//!
//! This crate provides functionality for:
//! - Resolving per-tier RSA signing key material
//! - Building canonical access policy documents
//! - Signing policies and encoding them into cookie-safe tokens
//!
//! ## Issuance pipeline
//!
//! [`KeyRegistry`] resolves a membership tier to its key material,
//! [`AccessPolicy::build`] constructs the policy, and [`TokenSigner`] signs
//! the canonical bytes and encodes the result. [`issue_token`] composes the
//! three steps into the single operation most callers want.
//!
//! The whole pipeline is pure, synchronous CPU work: the current time is an
//! explicit input, key material is loaded once up front and only ever lent
//! out by reference, and nothing is retained after a token is handed back.
//! Concurrent issuance therefore needs no coordination at all.

pub mod error;
pub mod keys;
pub mod policy;
pub mod token;

pub use error::SignerError;
pub use keys::{KeyMaterial, KeyRegistry};
pub use policy::AccessPolicy;
pub use token::{
    decode_component, encode_component, issue_token, SignedToken, TokenSigner,
    KEY_PAIR_ID_COOKIE, POLICY_COOKIE, SIGNATURE_COOKIE,
};

#[cfg(test)]
pub(crate) mod testutil;
