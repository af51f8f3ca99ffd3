// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! OIDC discovery document fetching.

use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::error::ValidationError;

const WELL_KNOWN_PATH: &str = "/.well-known/openid-configuration";

/// The subset of the discovery document the validator needs.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ProviderMetadata {
	pub issuer: String,
	#[serde(default)]
	pub jwks_uri: Option<String>,
	#[serde(default)]
	pub id_token_signing_alg_values_supported: Option<Vec<String>>,
}

/// Location of the discovery document for an issuer URL.
///
/// URLs that already point into `.well-known` are used as given.
pub fn well_known_url(discovery_url: &str) -> String {
	if discovery_url.contains("/.well-known/") {
		return discovery_url.to_string();
	}
	format!("{}{WELL_KNOWN_PATH}", discovery_url.trim_end_matches('/'))
}

/// Fetch and parse the discovery document for `discovery_url`.
#[instrument(skip(client))]
pub async fn discover(
	client: &Client,
	discovery_url: &str,
) -> Result<ProviderMetadata, ValidationError> {
	let url = well_known_url(discovery_url);
	let discovery_error = |message: String| ValidationError::Discovery {
		url: url.clone(),
		message,
	};

	let response = client
		.get(&url)
		.send()
		.await
		.map_err(|e| discovery_error(e.to_string()))?;

	let status = response.status();
	if !status.is_success() {
		return Err(discovery_error(format!("unexpected status {}", status.as_u16())));
	}

	let metadata: ProviderMetadata = response
		.json()
		.await
		.map_err(|e| discovery_error(format!("invalid discovery document: {e}")))?;

	debug!(issuer = %metadata.issuer, jwks_uri = ?metadata.jwks_uri, "discovered OIDC issuer");
	Ok(metadata)
}
