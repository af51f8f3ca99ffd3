// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Reasons a token can be rejected.
//!
//! These never leave the crate through [`crate::TokenValidator::validate`],
//! which collapses every one of them to `None`. They exist so the reason can
//! be logged.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ValidationError {
	#[error("token is empty")]
	EmptyToken,

	#[error("OIDC discovery at {url} failed: {message}")]
	Discovery { url: String, message: String },

	#[error("discovery document does not declare a jwks_uri")]
	MissingJwksUri,

	#[error("JWKS fetch from {url} failed: {message}")]
	JwksFetch { url: String, message: String },

	#[error("JWKS endpoint {url} returned status {status}")]
	JwksStatus { url: String, status: u16 },

	#[error("token could not be decoded: {0}")]
	MalformedToken(#[source] jsonwebtoken::errors::Error),

	#[error("JWKS document is malformed: {0}")]
	MalformedJwks(String),

	#[error("no JWKS key matches kid {kid:?}")]
	KeyNotFound { kid: Option<String> },

	#[error("JWKS key {kid} is not a usable RSA key: {message}")]
	KeyConversion { kid: String, message: String },

	#[error("token verification failed: {0}")]
	Verification(#[source] jsonwebtoken::errors::Error),
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_error_display() {
		let err = ValidationError::JwksStatus {
			url: "https://issuer.example/jwks".to_string(),
			status: 404,
		};
		assert_eq!(
			err.to_string(),
			"JWKS endpoint https://issuer.example/jwks returned status 404"
		);

		let err = ValidationError::KeyNotFound {
			kid: Some("abc".to_string()),
		};
		assert_eq!(err.to_string(), "no JWKS key matches kid Some(\"abc\")");
	}
}
