// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub API request and response types.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokengate_common_secret::SecretString;

/// An installation of the app on an account.
#[derive(Debug, Clone, Deserialize)]
pub struct Installation {
	pub id: u64,
	#[serde(default)]
	pub account: Option<InstallationAccount>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InstallationAccount {
	pub login: String,
	pub id: u64,
}

/// Body of `POST /app/installations/{id}/access_tokens`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallationTokenRequest {
	/// Repository names (without owner) the token is limited to.
	#[serde(skip_serializing_if = "Vec::is_empty")]
	pub repositories: Vec<String>,

	/// Permission name to `read` / `write` / `admin`.
	#[serde(skip_serializing_if = "BTreeMap::is_empty")]
	pub permissions: BTreeMap<String, String>,
}

/// An installation access token.
#[derive(Debug, Deserialize)]
pub struct InstallationToken {
	pub token: SecretString,
	pub expires_at: DateTime<Utc>,
	#[serde(default)]
	pub permissions: BTreeMap<String, String>,
	#[serde(default)]
	pub repository_selection: Option<String>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_token_request_serialization() {
		let request = InstallationTokenRequest {
			repositories: vec!["widgets".to_string()],
			permissions: BTreeMap::from([("contents".to_string(), "read".to_string())]),
		};
		assert_eq!(
			serde_json::to_value(&request).unwrap(),
			serde_json::json!({"repositories": ["widgets"], "permissions": {"contents": "read"}})
		);
		assert_eq!(
			serde_json::to_value(InstallationTokenRequest::default()).unwrap(),
			serde_json::json!({})
		);
	}

	#[test]
	fn test_token_debug_is_redacted() {
		let token: InstallationToken = serde_json::from_value(serde_json::json!({
			"token": "ghs_abc123",
			"expires_at": "2030-01-01T00:00:00Z",
			"permissions": {"contents": "read"},
			"repository_selection": "selected",
		}))
		.unwrap();
		assert_eq!(token.token.expose(), "ghs_abc123");
		assert!(!format!("{token:?}").contains("ghs_abc123"));
	}
}
