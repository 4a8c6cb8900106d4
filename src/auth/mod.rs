// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Caller identity and the administrative capability.
//!
//! Two credentials exist in this service:
//!
//! - **Identity** - the caller's user id, asserted by the authenticating
//!   front proxy (the RA-TLS terminator in the enclave deployment) via the
//!   `x-user-id` header. The proxy is trusted; this service never sees raw
//!   end-user credentials.
//! - **Administrative capability** - an unforgeable bearer credential gating
//!   freeze/unfreeze, KYC verification, and fee vault withdrawal. Possession
//!   is necessary and sufficient; there is no role hierarchy.

pub mod capability;
pub mod error;
pub mod extractor;

pub use capability::{AdminCapability, AdminSecret};
pub use error::AuthError;
pub use extractor::{AdminAuth, Identity};
