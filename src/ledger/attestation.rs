// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verifier attestations and the anti-replay registry.
//!
//! An attestation is an opaque, externally-signed claim that a proposed
//! transaction was validated off-path by the TEE verifier. This service does
//! NOT re-verify the signature, timestamp, or metadata; that logic belongs
//! to the external verifier's contract. The only local check is
//! uniqueness of the identifier.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Serde adapter encoding byte blobs as base64 strings over JSON.
mod base64_blob {
    use base64ct::{Base64, Encoding};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&Base64::encode_string(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        Base64::decode_vec(&encoded).map_err(serde::de::Error::custom)
    }
}

/// A pre-verified attestation issued by the external TEE verifier.
///
/// Every field except `identifier` is carried opaquely and copied verbatim
/// into the proof record. Immutable once constructed.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
pub struct Attestation {
    /// Hash of the transaction the verifier attested to (uninterpreted).
    pub transaction_hash: String,
    /// Verifier signature blob, base64 over the wire.
    #[serde(with = "base64_blob")]
    #[schema(value_type = String)]
    pub signature: Vec<u8>,
    /// Verifier public key blob, base64 over the wire.
    #[serde(with = "base64_blob")]
    #[schema(value_type = String)]
    pub verifier_public_key: Vec<u8>,
    /// Timestamp asserted by the verifier (not validated locally).
    pub verifier_timestamp: u64,
    /// Anti-replay nonce. The one field this service interprets.
    pub identifier: u64,
    /// Opaque metadata blob, base64 over the wire.
    #[serde(with = "base64_blob")]
    #[schema(value_type = String)]
    pub metadata: Vec<u8>,
}

/// Process-wide registry of consumed attestation identifiers.
///
/// Insertion-only: once an identifier is consumed it stays consumed for the
/// lifetime of the registry. Replay protection is permanent, not time-boxed.
#[derive(Debug, Default)]
pub struct AttestationRegistry {
    consumed: HashSet<u64>,
    next_identifier: u64,
}

impl AttestationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the attestation may still be used for settlement.
    ///
    /// This is the entirety of local verification: no signature, timestamp,
    /// or metadata validation happens here.
    pub fn verify(&self, attestation: &Attestation) -> bool {
        !self.consumed.contains(&attestation.identifier)
    }

    /// Consume an identifier.
    ///
    /// Called if and only if the attestation is accepted for settlement, and
    /// strictly before the financial mutation becomes observable.
    pub fn mark_used(&mut self, identifier: u64) {
        self.consumed.insert(identifier);
    }

    /// Mint a syntactically valid, never-colliding identifier.
    ///
    /// For integration harnesses that do not yet hold a real verifier-issued
    /// identifier; not a substitute for the verifier's assignment.
    pub fn mint_fresh_identifier(&mut self) -> u64 {
        self.next_identifier += 1;
        self.next_identifier
    }

    /// Number of identifiers consumed so far.
    pub fn consumed_count(&self) -> usize {
        self.consumed.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    pub(crate) fn attestation(identifier: u64) -> Attestation {
        Attestation {
            transaction_hash: format!("0xhash{identifier}"),
            signature: vec![1, 2, 3],
            verifier_public_key: vec![4, 5, 6],
            verifier_timestamp: 1_700_000_000,
            identifier,
            metadata: Vec::new(),
        }
    }

    #[test]
    fn replay_is_permanent() {
        let mut registry = AttestationRegistry::new();
        let att = attestation(7);

        assert!(registry.verify(&att));
        registry.mark_used(att.identifier);
        for _ in 0..3 {
            assert!(!registry.verify(&att));
        }
    }

    #[test]
    fn minted_identifiers_are_monotonic() {
        let mut registry = AttestationRegistry::new();
        let a = registry.mint_fresh_identifier();
        let b = registry.mint_fresh_identifier();
        let c = registry.mint_fresh_identifier();
        assert!(a < b && b < c);
    }

    #[test]
    fn blobs_round_trip_as_base64() {
        let att = attestation(1);
        let json = serde_json::to_value(&att).unwrap();
        // Byte fields serialize as strings, not arrays.
        assert!(json["signature"].is_string());
        let back: Attestation = serde_json::from_value(json).unwrap();
        assert_eq!(back, att);
    }
}
