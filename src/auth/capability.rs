// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! The administrative capability.
//!
//! Modeled as a capability, not a role: [`AdminCapability`] cannot be
//! constructed outside this module, so any code holding one necessarily went
//! through [`AdminSecret::verify`]. Engine operations take the token by
//! reference and perform no further authorization of their own.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Domain separator for capability digests.
const CAPABILITY_CONTEXT: &[u8] = b"relational-ledger/admin-capability/v1";

/// Proof that the caller presented the configured administrative credential.
///
/// Possession is necessary and sufficient authorization for freeze/unfreeze,
/// KYC verification, and fee vault withdrawal.
#[derive(Debug, Clone, Copy)]
pub struct AdminCapability {
    _proof: (),
}

impl AdminCapability {
    #[cfg(test)]
    pub(crate) fn for_tests() -> Self {
        Self { _proof: () }
    }
}

/// The configured administrative credential, held by [`crate::state::AppState`].
#[derive(Clone)]
pub struct AdminSecret {
    credential: Vec<u8>,
}

impl AdminSecret {
    pub fn new(credential: impl Into<String>) -> Self {
        Self {
            credential: credential.into().into_bytes(),
        }
    }

    /// Check a presented credential and mint the capability on a match.
    ///
    /// Both sides are pushed through a keyed digest first, so the byte
    /// comparison happens over unpredictable values rather than the
    /// credential itself.
    pub fn verify(&self, presented: &str) -> Option<AdminCapability> {
        let expected = digest(&self.credential);
        let got = digest(presented.as_bytes());
        (expected == got).then_some(AdminCapability { _proof: () })
    }
}

impl std::fmt::Debug for AdminSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The credential never appears in logs.
        f.debug_struct("AdminSecret").finish_non_exhaustive()
    }
}

fn digest(credential: &[u8]) -> [u8; 32] {
    let mut mac = <HmacSha256 as Mac>::new_from_slice(credential)
        .unwrap_or_else(|_| unreachable!("HMAC accepts keys of any length"));
    mac.update(CAPABILITY_CONTEXT);
    mac.finalize().into_bytes().into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_credential_mints_capability() {
        let secret = AdminSecret::new("s3cret");
        assert!(secret.verify("s3cret").is_some());
    }

    #[test]
    fn mismatched_credential_rejected() {
        let secret = AdminSecret::new("s3cret");
        assert!(secret.verify("s3cret ").is_none());
        assert!(secret.verify("").is_none());
        assert!(secret.verify("S3CRET").is_none());
    }

    #[test]
    fn debug_never_leaks_credential() {
        let secret = AdminSecret::new("s3cret");
        let rendered = format!("{secret:?}");
        assert!(!rendered.contains("s3cret"));
    }
}
