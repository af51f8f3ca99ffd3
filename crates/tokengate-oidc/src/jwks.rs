// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! JWKS (JSON Web Key Set) parsing and key selection.

use jsonwebtoken::DecodingKey;
use serde::Deserialize;

use crate::error::ValidationError;

/// A single published key. Only RSA keys can be turned into a verifier.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct Jwk {
	pub kty: String,
	#[serde(default)]
	pub kid: Option<String>,
	#[serde(default)]
	pub alg: Option<String>,
	#[serde(default, rename = "use")]
	pub use_: Option<String>,
	#[serde(default)]
	pub n: Option<String>,
	#[serde(default)]
	pub e: Option<String>,
}

/// A key set in which every key carries a non-empty `kid`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JwkSet {
	keys: Vec<Jwk>,
}

#[derive(Deserialize)]
struct RawJwkSet {
	keys: Vec<Jwk>,
}

impl JwkSet {
	/// Parse a JWKS body.
	///
	/// A body without a `keys` array, or with any key lacking a `kid`, is
	/// rejected as a whole: such an endpoint cannot be matched reliably.
	pub fn parse(body: &[u8]) -> Result<Self, ValidationError> {
		let raw: RawJwkSet = serde_json::from_slice(body)
			.map_err(|e| ValidationError::MalformedJwks(e.to_string()))?;

		if let Some(position) = raw
			.keys
			.iter()
			.position(|k| k.kid.as_deref().map_or(true, str::is_empty))
		{
			return Err(ValidationError::MalformedJwks(format!(
				"key at index {position} has no kid"
			)));
		}

		Ok(Self { keys: raw.keys })
	}

	pub fn keys(&self) -> &[Jwk] {
		&self.keys
	}

	/// Find the key whose `kid` equals `kid`.
	pub fn find(&self, kid: &str) -> Option<&Jwk> {
		self.keys.iter().find(|k| k.kid.as_deref() == Some(kid))
	}
}

impl Jwk {
	/// Build an RS256 verification key from the RSA modulus and exponent.
	pub fn to_decoding_key(&self) -> Result<DecodingKey, ValidationError> {
		let kid = self.kid.clone().unwrap_or_default();
		let conversion_error = |message: String| ValidationError::KeyConversion {
			kid: kid.clone(),
			message,
		};

		if self.kty != "RSA" {
			return Err(conversion_error(format!("unsupported key type {}", self.kty)));
		}

		let n = self
			.n
			.as_deref()
			.ok_or_else(|| conversion_error("missing modulus".to_string()))?;
		let e = self
			.e
			.as_deref()
			.ok_or_else(|| conversion_error("missing exponent".to_string()))?;

		DecodingKey::from_rsa_components(n, e).map_err(|err| conversion_error(err.to_string()))
	}
}
