// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Discovery-backed ID token validation.

use std::time::Duration;

use jsonwebtoken::{decode, decode_header, Algorithm, Validation};
use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use crate::discovery::discover;
use crate::error::ValidationError;
use crate::jwks::JwkSet;

/// Validates bearer ID tokens against an issuer's published keys.
///
/// Cheap to clone; clones share the underlying HTTP connection pool.
#[derive(Debug, Clone)]
pub struct TokenValidator {
	client: Client,
}

impl TokenValidator {
	pub fn new(client: Client) -> Self {
		Self { client }
	}

	/// Create a validator whose outbound calls time out after `timeout`.
	pub fn with_timeout(timeout: Duration) -> Result<Self, reqwest::Error> {
		Ok(Self::new(tokengate_common_http::build_client(timeout)?))
	}

	/// Validate `token` against the issuer at `discovery_url`.
	///
	/// Returns the verified claims, or `None` if any step fails. Callers
	/// cannot tell which step failed; the reason is logged at debug level.
	#[instrument(skip(self, token))]
	pub async fn validate<C: DeserializeOwned>(
		&self,
		token: &str,
		discovery_url: &str,
	) -> Option<C> {
		match self.try_validate(token, discovery_url).await {
			Ok(claims) => Some(claims),
			Err(e) => {
				debug!(error = %e, "rejected OIDC token");
				None
			}
		}
	}

	/// Same as [`TokenValidator::validate`] but keeps the rejection reason.
	pub async fn try_validate<C: DeserializeOwned>(
		&self,
		token: &str,
		discovery_url: &str,
	) -> Result<C, ValidationError> {
		if token.is_empty() {
			return Err(ValidationError::EmptyToken);
		}

		let metadata = discover(&self.client, discovery_url).await?;
		let jwks_uri = metadata.jwks_uri.ok_or(ValidationError::MissingJwksUri)?;

		let jwks_body = self.fetch_jwks(&jwks_uri).await?;

		let header = decode_header(token).map_err(ValidationError::MalformedToken)?;

		let jwks = JwkSet::parse(&jwks_body)?;
		let jwk = header
			.kid
			.as_deref()
			.and_then(|kid| jwks.find(kid))
			.ok_or_else(|| ValidationError::KeyNotFound {
				kid: header.kid.clone(),
			})?;

		let key = jwk.to_decoding_key()?;
		let validation = validation_for(discovery_url);

		let data = decode::<C>(token, &key, &validation).map_err(ValidationError::Verification)?;
		debug!(kid = ?header.kid, "verified OIDC token");
		Ok(data.claims)
	}

	async fn fetch_jwks(&self, jwks_uri: &str) -> Result<Vec<u8>, ValidationError> {
		let fetch_error = |message: String| ValidationError::JwksFetch {
			url: jwks_uri.to_string(),
			message,
		};

		let response = self
			.client
			.get(jwks_uri)
			.send()
			.await
			.map_err(|e| fetch_error(e.to_string()))?;

		if !response.status().is_success() {
			return Err(ValidationError::JwksStatus {
				url: jwks_uri.to_string(),
				status: response.status().as_u16(),
			});
		}

		let body = response
			.bytes()
			.await
			.map_err(|e| fetch_error(e.to_string()))?;
		Ok(body.to_vec())
	}
}

/// Audience a token for `discovery_url` must carry: the URL's last path segment.
pub fn audience_for(discovery_url: &str) -> &str {
	let trimmed = discovery_url.trim_end_matches('/');
	trimmed.rsplit('/').next().unwrap_or(trimmed)
}

fn validation_for(discovery_url: &str) -> Validation {
	let mut validation = Validation::new(Algorithm::RS256);
	validation.algorithms = vec![Algorithm::RS256];
	validation.leeway = 0;
	validation.set_issuer(&[discovery_url]);
	validation.set_audience(&[audience_for(discovery_url)]);
	validation.set_required_spec_claims(&["exp", "iss", "aud"]);
	validation
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_audience_is_last_segment() {
		assert_eq!(audience_for("https://oidc.circleci.com/org/1234"), "1234");
		assert_eq!(audience_for("https://oidc.circleci.com/org/1234/"), "1234");
		assert_eq!(
			audience_for("https://token.actions.githubusercontent.com"),
			"token.actions.githubusercontent.com"
		);
	}

	#[test]
	fn test_validation_pins_rs256() {
		let validation = validation_for("https://issuer.example/org/abc");
		assert_eq!(validation.algorithms, vec![Algorithm::RS256]);
		assert!(validation.validate_exp);
		assert_eq!(validation.leeway, 0);
	}

	#[tokio::test]
	async fn test_empty_token_short_circuits() {
		let validator = TokenValidator::new(Client::new());
		// An unroutable URL proves no request is attempted.
		let result = validator
			.try_validate::<serde_json::Value>("", "http://0.0.0.0:1/never")
			.await;
		assert!(matches!(result, Err(ValidationError::EmptyToken)));
	}
}
