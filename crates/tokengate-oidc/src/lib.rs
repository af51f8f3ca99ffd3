// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OIDC ID token validation for tokengate.
//!
//! Given a bearer token and an issuer's discovery URL, [`TokenValidator`]
//! fetches the discovery document, fetches the JWKS it points at, picks the
//! key named by the token's `kid` and verifies the token with RS256. The
//! issuer must equal the discovery URL and the audience must equal the last
//! path segment of that URL.
//!
//! Nothing is cached: every call repeats discovery and the JWKS fetch, so a
//! rotated key is never trusted past its removal from the JWKS.

pub mod discovery;
pub mod error;
pub mod jwks;
pub mod validator;

#[cfg(feature = "test-support")]
pub mod testing;

pub use discovery::{well_known_url, ProviderMetadata};
pub use error::ValidationError;
pub use jwks::{Jwk, JwkSet};
pub use validator::{audience_for, TokenValidator};
