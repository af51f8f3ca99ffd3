// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! App JWTs for authenticating as a GitHub App.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::error::GithubAppError;

/// GitHub rejects app JWTs living longer than ten minutes.
const JWT_LIFETIME: Duration = Duration::from_secs(9 * 60);

/// Back-dating for clock drift between us and GitHub.
const CLOCK_SKEW: Duration = Duration::from_secs(60);

#[derive(Debug, Serialize, Deserialize)]
struct Claims {
	iat: u64,
	exp: u64,
	/// GitHub App ID.
	iss: String,
}

/// Sign an app JWT with the app's PEM-encoded RSA private key.
#[instrument(skip(private_key_pem))]
pub fn generate_app_jwt(app_id: u64, private_key_pem: &str) -> Result<String, GithubAppError> {
	let now = SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map_err(|e| GithubAppError::Jwt(format!("System time error: {e}")))?;

	let claims = Claims {
		iat: now.saturating_sub(CLOCK_SKEW).as_secs(),
		exp: (now + JWT_LIFETIME).as_secs(),
		iss: app_id.to_string(),
	};

	let encoding_key = EncodingKey::from_rsa_pem(private_key_pem.as_bytes())
		.map_err(|e| GithubAppError::Jwt(format!("Invalid RSA private key: {e}")))?;

	let token = encode(&Header::new(Algorithm::RS256), &claims, &encoding_key)
		.map_err(|e| GithubAppError::Jwt(format!("Failed to encode JWT: {e}")))?;

	debug!(app_id, exp = claims.exp, "generated GitHub App JWT");
	Ok(token)
}
