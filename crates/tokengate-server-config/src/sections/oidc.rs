// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity platform endpoints and outbound HTTP settings.

use serde::{Deserialize, Serialize};

const DEFAULT_CIRCLECI_BASE_URL: &str = "https://oidc.circleci.com/org";
const DEFAULT_GITHUB_ACTIONS_ISSUER_URL: &str = "https://token.actions.githubusercontent.com";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OidcConfig {
	/// CircleCI issuer base; the organization id is appended per tenant.
	pub circleci_base_url: String,
	pub github_actions_issuer_url: String,
	/// Timeout for discovery and JWKS fetches.
	pub http_timeout_secs: u64,
}

impl Default for OidcConfig {
	fn default() -> Self {
		Self {
			circleci_base_url: DEFAULT_CIRCLECI_BASE_URL.to_string(),
			github_actions_issuer_url: DEFAULT_GITHUB_ACTIONS_ISSUER_URL.to_string(),
			http_timeout_secs: DEFAULT_HTTP_TIMEOUT_SECS,
		}
	}
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct OidcConfigLayer {
	#[serde(default)]
	pub circleci_base_url: Option<String>,
	#[serde(default)]
	pub github_actions_issuer_url: Option<String>,
	#[serde(default)]
	pub http_timeout_secs: Option<u64>,
}

impl OidcConfigLayer {
	pub fn merge(&mut self, other: Self) {
		if other.circleci_base_url.is_some() {
			self.circleci_base_url = other.circleci_base_url;
		}
		if other.github_actions_issuer_url.is_some() {
			self.github_actions_issuer_url = other.github_actions_issuer_url;
		}
		if other.http_timeout_secs.is_some() {
			self.http_timeout_secs = other.http_timeout_secs;
		}
	}

	pub fn finalize(self) -> OidcConfig {
		let defaults = OidcConfig::default();
		OidcConfig {
			circleci_base_url: self.circleci_base_url.unwrap_or(defaults.circleci_base_url),
			github_actions_issuer_url: self
				.github_actions_issuer_url
				.unwrap_or(defaults.github_actions_issuer_url),
			http_timeout_secs: self.http_timeout_secs.unwrap_or(defaults.http_timeout_secs),
		}
	}
}
