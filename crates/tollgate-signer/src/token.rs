//! Token signing and transport-safe encoding.

use crate::error::SignerError;
use crate::keys::{KeyMaterial, KeyRegistry};
use crate::policy::AccessPolicy;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use rsa::signature::{SignatureEncoding, Signer};
use serde::Serialize;

/// Cookie name for the encoded policy.
pub const POLICY_COOKIE: &str = "CloudFront-Policy";
/// Cookie name for the encoded signature.
pub const SIGNATURE_COOKIE: &str = "CloudFront-Signature";
/// Cookie name for the key-pair identifier.
pub const KEY_PAIR_ID_COOKIE: &str = "CloudFront-Key-Pair-Id";

/// An issued access token.
///
/// Output-only: once handed to the caller nothing here is tracked further.
/// Serialized field names match the cookie names the edge expects, and
/// `key_pair_id` always identifies the key pair whose private half produced
/// `signature`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SignedToken {
    /// Canonical policy bytes, transport-encoded.
    #[serde(rename = "CloudFront-Policy")]
    pub policy: String,

    /// RSA signature over the canonical policy bytes, transport-encoded.
    #[serde(rename = "CloudFront-Signature")]
    pub signature: String,

    /// Public identifier of the signing key pair.
    #[serde(rename = "CloudFront-Key-Pair-Id")]
    pub key_pair_id: String,
}

impl SignedToken {
    /// Cookie (name, value) pairs in the order the edge documents them.
    pub fn cookie_pairs(&self) -> [(&'static str, &str); 3] {
        [
            (POLICY_COOKIE, self.policy.as_str()),
            (SIGNATURE_COOKIE, self.signature.as_str()),
            (KEY_PAIR_ID_COOKIE, self.key_pair_id.as_str()),
        ]
    }
}

/// Signs access policies with one tier's key material.
///
/// Borrows the key from the registry for the duration of the request; key
/// material is never copied out of the registry.
pub struct TokenSigner<'k> {
    key: &'k KeyMaterial,
}

impl<'k> TokenSigner<'k> {
    /// Create a signer borrowing the tier's key material.
    pub fn new(key: &'k KeyMaterial) -> Self {
        Self { key }
    }

    /// Sign a policy and encode the result into a transport-safe token.
    ///
    /// The signature is RSA PKCS#1 v1.5 over the canonical policy bytes with
    /// a SHA-1 digest. SHA-1 is what the edge's verifier accepts; it is a
    /// compatibility requirement, not a strength choice, and the same caveat
    /// applies anywhere this scheme is reused.
    pub fn issue(&self, policy: &AccessPolicy) -> Result<SignedToken, SignerError> {
        let canonical = policy.to_canonical_bytes()?;

        let signature = self
            .key
            .signing_key()
            .try_sign(&canonical)
            .map_err(|e| SignerError::Signing(e.to_string()))?;

        Ok(SignedToken {
            policy: encode_component(&canonical),
            signature: encode_component(&signature.to_vec()),
            key_pair_id: self.key.key_pair_id().to_string(),
        })
    }
}

/// Encode bytes with the URL/cookie-safe base64 variant the edge expects:
/// standard base64 with `+` replaced by `-`, `/` replaced by `_`, and
/// trailing `=` padding stripped.
pub fn encode_component(bytes: &[u8]) -> String {
    URL_SAFE_NO_PAD.encode(bytes)
}

/// Inverse of [`encode_component`].
pub fn decode_component(encoded: &str) -> Result<Vec<u8>, SignerError> {
    URL_SAFE_NO_PAD
        .decode(encoded)
        .map_err(|e| SignerError::Decoding(e.to_string()))
}

/// Issue a token authorizing `resource_path` under `domain` for
/// `ttl_seconds` from `now_epoch_seconds`, signed with `tier`'s key and
/// optionally pinned to `source_ip`.
///
/// Resolution, policy construction and signing either all succeed or the
/// whole issuance fails; no partial token is ever returned.
pub fn issue_token(
    registry: &KeyRegistry,
    tier: &str,
    domain: &str,
    resource_path: &str,
    ttl_seconds: u64,
    now_epoch_seconds: u64,
    source_ip: Option<&str>,
) -> Result<SignedToken, SignerError> {
    let key = registry.resolve(tier)?;
    let policy = AccessPolicy::build(
        domain,
        resource_path,
        ttl_seconds,
        now_epoch_seconds,
        source_ip,
    )?;
    let token = TokenSigner::new(key).issue(&policy)?;

    tracing::debug!(
        tier = %tier,
        key_pair_id = %token.key_pair_id,
        expires_at = policy.expires_at_epoch_seconds(),
        "issued access token"
    );

    Ok(token)
}
