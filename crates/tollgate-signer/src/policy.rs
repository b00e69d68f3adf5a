//! Canonical access policy construction.
//!
//! A policy authorizes fetching everything under a resource path until an
//! expiry instant, optionally restricted to a single source IP. The policy
//! is signed over its serialized bytes, so the serialization is part of the
//! contract: field order is fixed, whitespace is never emitted, and optional
//! conditions are omitted entirely rather than written as null.

use crate::error::SignerError;
use serde::{Deserialize, Serialize};

/// An access policy for a resource subtree on the CDN edge.
///
/// Built fresh per issuance request and never mutated afterwards. The
/// resource scope carries a trailing `/*`: a token minted for `/videos/1`
/// admits every object under `/videos/1/`, not only an exact match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessPolicy {
    resource_url: String,
    expires_at: u64,
    source_ip: Option<String>,
}

impl AccessPolicy {
    /// Build a policy expiring `ttl_seconds` after `now_epoch_seconds`.
    ///
    /// The current time is an explicit input, keeping issuance a pure
    /// function of its arguments. An empty `source_ip` is treated as absent.
    pub fn build(
        domain: &str,
        resource_path: &str,
        ttl_seconds: u64,
        now_epoch_seconds: u64,
        source_ip: Option<&str>,
    ) -> Result<Self, SignerError> {
        if domain.trim().is_empty() {
            return Err(SignerError::InvalidPolicyInput(
                "domain must not be empty".to_string(),
            ));
        }
        if resource_path.trim().is_empty() {
            return Err(SignerError::InvalidPolicyInput(
                "resource path must not be empty".to_string(),
            ));
        }

        let expires_at = now_epoch_seconds.checked_add(ttl_seconds).ok_or_else(|| {
            SignerError::InvalidPolicyInput("expiry overflows epoch seconds".to_string())
        })?;

        let source_ip = source_ip
            .filter(|ip| !ip.is_empty())
            .map(str::to_string);

        Ok(Self {
            resource_url: format!("https://{domain}{resource_path}/*"),
            expires_at,
            source_ip,
        })
    }

    /// The full resource URL the policy grants, wildcard suffix included.
    pub fn resource_url(&self) -> &str {
        &self.resource_url
    }

    /// Expiry instant in Unix epoch seconds.
    pub fn expires_at_epoch_seconds(&self) -> u64 {
        self.expires_at
    }

    /// Source IP restriction, if any.
    pub fn source_ip(&self) -> Option<&str> {
        self.source_ip.as_deref()
    }

    /// Serialize to the canonical byte form the signature covers.
    ///
    /// Two policies with identical fields always produce identical bytes;
    /// the edge verifies the signature over these exact bytes, not over any
    /// semantically equivalent rendering.
    pub fn to_canonical_bytes(&self) -> Result<Vec<u8>, SignerError> {
        let document = PolicyDocument {
            statement: vec![PolicyStatement {
                resource: self.resource_url.clone(),
                condition: PolicyCondition {
                    date_less_than: EpochTimeBound {
                        epoch_time: self.expires_at,
                    },
                    ip_address: self
                        .source_ip
                        .clone()
                        .map(|ip| SourceIpMatch { source_ip: ip }),
                },
            }],
        };

        serde_json::to_vec(&document).map_err(|e| SignerError::Serialization(e.to_string()))
    }

    /// Parse a policy back out of its canonical bytes.
    pub fn from_canonical_bytes(bytes: &[u8]) -> Result<Self, SignerError> {
        let document: PolicyDocument = serde_json::from_slice(bytes)
            .map_err(|e| SignerError::Serialization(e.to_string()))?;

        let statement = document.statement.into_iter().next().ok_or_else(|| {
            SignerError::Serialization("policy document has no statement".to_string())
        })?;

        Ok(Self {
            resource_url: statement.resource,
            expires_at: statement.condition.date_less_than.epoch_time,
            source_ip: statement.condition.ip_address.map(|ip| ip.source_ip),
        })
    }
}

// Wire shape of the canonical policy document. Declaration order is
// serialization order; do not reorder fields.

#[derive(Serialize, Deserialize)]
struct PolicyDocument {
    #[serde(rename = "Statement")]
    statement: Vec<PolicyStatement>,
}

#[derive(Serialize, Deserialize)]
struct PolicyStatement {
    #[serde(rename = "Resource")]
    resource: String,
    #[serde(rename = "Condition")]
    condition: PolicyCondition,
}

#[derive(Serialize, Deserialize)]
struct PolicyCondition {
    #[serde(rename = "DateLessThan")]
    date_less_than: EpochTimeBound,
    #[serde(rename = "IpAddress", default, skip_serializing_if = "Option::is_none")]
    ip_address: Option<SourceIpMatch>,
}

#[derive(Serialize, Deserialize)]
struct EpochTimeBound {
    #[serde(rename = "AWS:EpochTime")]
    epoch_time: u64,
}

#[derive(Serialize, Deserialize)]
struct SourceIpMatch {
    #[serde(rename = "AWS:SourceIp")]
    source_ip: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_bytes_match_expected_document() {
        let policy =
            AccessPolicy::build("cdn.example.com", "/videos/1", 3600, 1_700_000_000, None)
                .unwrap();

        assert_eq!(policy.resource_url(), "https://cdn.example.com/videos/1/*");
        assert_eq!(policy.expires_at_epoch_seconds(), 1_700_003_600);
        assert_eq!(policy.source_ip(), None);

        let bytes = policy.to_canonical_bytes().unwrap();
        assert_eq!(
            String::from_utf8(bytes).unwrap(),
            r#"{"Statement":[{"Resource":"https://cdn.example.com/videos/1/*","Condition":{"DateLessThan":{"AWS:EpochTime":1700003600}}}]}"#
        );
    }

    #[test]
    fn source_ip_adds_condition_and_changes_bytes() {
        let without = AccessPolicy::build(
            "cdn.example.com",
            "/videos/1",
            3600,
            1_700_000_000,
            None,
        )
        .unwrap();
        let with = AccessPolicy::build(
            "cdn.example.com",
            "/videos/1",
            3600,
            1_700_000_000,
            Some("203.0.113.5"),
        )
        .unwrap();

        let with_bytes = with.to_canonical_bytes().unwrap();
        assert_ne!(without.to_canonical_bytes().unwrap(), with_bytes);
        assert_eq!(
            String::from_utf8(with_bytes).unwrap(),
            r#"{"Statement":[{"Resource":"https://cdn.example.com/videos/1/*","Condition":{"DateLessThan":{"AWS:EpochTime":1700003600},"IpAddress":{"AWS:SourceIp":"203.0.113.5"}}}]}"#
        );
    }

    #[test]
    fn empty_source_ip_is_treated_as_absent() {
        let policy = AccessPolicy::build(
            "cdn.example.com",
            "/videos/1",
            3600,
            1_700_000_000,
            Some(""),
        )
        .unwrap();

        assert_eq!(policy.source_ip(), None);
    }

    #[test]
    fn identical_inputs_produce_identical_bytes() {
        let a = AccessPolicy::build("cdn.example.com", "/a/b", 60, 1_700_000_000, Some("10.0.0.1"))
            .unwrap();
        let b = AccessPolicy::build("cdn.example.com", "/a/b", 60, 1_700_000_000, Some("10.0.0.1"))
            .unwrap();

        assert_eq!(
            a.to_canonical_bytes().unwrap(),
            b.to_canonical_bytes().unwrap()
        );
    }

    #[test]
    fn canonical_bytes_round_trip() {
        let policy = AccessPolicy::build(
            "cdn.example.com",
            "/videos/1",
            3600,
            1_700_000_000,
            Some("203.0.113.5"),
        )
        .unwrap();

        let bytes = policy.to_canonical_bytes().unwrap();
        let parsed = AccessPolicy::from_canonical_bytes(&bytes).unwrap();
        assert_eq!(parsed, policy);
    }

    #[test]
    fn empty_inputs_are_rejected() {
        let err = AccessPolicy::build("cdn.example.com", "", 3600, 1_700_000_000, None)
            .unwrap_err();
        assert!(matches!(err, SignerError::InvalidPolicyInput(_)));

        let err = AccessPolicy::build("", "/videos/1", 3600, 1_700_000_000, None).unwrap_err();
        assert!(matches!(err, SignerError::InvalidPolicyInput(_)));
    }

    #[test]
    fn expiry_overflow_is_rejected() {
        let err =
            AccessPolicy::build("cdn.example.com", "/videos/1", u64::MAX, 2, None).unwrap_err();
        assert!(matches!(err, SignerError::InvalidPolicyInput(_)));
    }
}
