// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Verified token claims, per platform.
//!
//! Only `sub` is required. Filter claims that are missing or not strings
//! deserialize as absent, so a verified token still selects its tenant and
//! simply authorizes nothing.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Claims every platform's token carries.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct BaseClaims {
	pub sub: String,
}

/// CircleCI job token claims.
///
/// `sub` has the form `org/<org-id>/project/<project-id>/user/<user-id>`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CircleCiClaims {
	pub sub: String,

	#[serde(
		rename = "oidc.circleci.com/project-id",
		default,
		deserialize_with = "lenient_string"
	)]
	pub project_id: Option<String>,

	/// CircleCI documents at most one context id, but has been observed to
	/// send `null` here. Entries that are not strings are kept as `None` so
	/// positions are preserved.
	#[serde(
		rename = "oidc.circleci.com/context-ids",
		default,
		deserialize_with = "lenient_string_list"
	)]
	pub context_ids: Option<Vec<Option<String>>>,
}

impl CircleCiClaims {
	/// The first context id, the only one that takes part in filtering.
	pub fn context_id(&self) -> Option<&str> {
		self.context_ids
			.as_deref()
			.and_then(|ids| ids.first())
			.and_then(|id| id.as_deref())
	}
}

/// GitHub Actions job token claims.
///
/// `sub` has the form `repo:<owner>/<repo>:environment:<env>` or similar.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GithubActionsClaims {
	pub sub: String,

	/// Deployment environment of the job, if any.
	#[serde(default, deserialize_with = "lenient_string")]
	pub environment: Option<String>,

	#[serde(default, deserialize_with = "lenient_string")]
	pub repository_id: Option<String>,

	#[serde(default, deserialize_with = "lenient_string")]
	pub repository_owner_id: Option<String>,
}

fn string_value(value: Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s),
		_ => None,
	}
}

fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(Option::<Value>::deserialize(deserializer)?.and_then(string_value))
}

fn lenient_string_list<'de, D>(deserializer: D) -> Result<Option<Vec<Option<String>>>, D::Error>
where
	D: Deserializer<'de>,
{
	Ok(match Option::<Value>::deserialize(deserializer)? {
		Some(Value::Array(items)) => Some(items.into_iter().map(string_value).collect()),
		_ => None,
	})
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn test_circleci_null_context_ids() {
		let claims: CircleCiClaims = serde_json::from_value(json!({
			"sub": "org/o/project/p/user/u",
			"oidc.circleci.com/project-id": "p",
			"oidc.circleci.com/context-ids": null,
		}))
		.unwrap();
		assert!(claims.context_ids.is_none());
		assert_eq!(claims.project_id.as_deref(), Some("p"));
	}

	#[test]
	fn test_circleci_missing_context_ids() {
		let claims: CircleCiClaims = serde_json::from_value(json!({
			"sub": "s",
			"oidc.circleci.com/project-id": "p",
		}))
		.unwrap();
		assert!(claims.context_ids.is_none());
		assert!(claims.context_id().is_none());
	}

	#[test]
	fn test_circleci_missing_project_id() {
		let claims: CircleCiClaims = serde_json::from_value(json!({
			"sub": "s",
			"oidc.circleci.com/context-ids": ["C"],
		}))
		.unwrap();
		assert!(claims.project_id.is_none());
		assert_eq!(claims.context_id(), Some("C"));
	}

	#[test]
	fn test_circleci_non_string_context_ids() {
		let claims: CircleCiClaims = serde_json::from_value(json!({
			"sub": "s",
			"oidc.circleci.com/project-id": 12,
			"oidc.circleci.com/context-ids": [null, "C"],
		}))
		.unwrap();
		assert!(claims.project_id.is_none());
		assert_eq!(claims.context_ids, Some(vec![None, Some("C".to_string())]));
		assert!(claims.context_id().is_none());

		let claims: CircleCiClaims = serde_json::from_value(json!({
			"sub": "s",
			"oidc.circleci.com/context-ids": "C",
		}))
		.unwrap();
		assert!(claims.context_ids.is_none());
	}

	#[test]
	fn test_github_claims() {
		let claims: GithubActionsClaims = serde_json::from_value(json!({
			"sub": "repo:acme/widgets:environment:prod",
			"environment": "prod",
			"repository_id": "42",
			"repository_owner_id": "7",
			"ref": "refs/heads/main",
		}))
		.unwrap();
		assert_eq!(claims.environment.as_deref(), Some("prod"));
		assert_eq!(claims.repository_id.as_deref(), Some("42"));
		assert_eq!(claims.repository_owner_id.as_deref(), Some("7"));
	}

	#[test]
	fn test_github_claims_without_environment_or_repository() {
		let claims: GithubActionsClaims = serde_json::from_value(json!({
			"sub": "repo:acme/widgets:ref:refs/heads/main",
			"environment": null,
		}))
		.unwrap();
		assert!(claims.environment.is_none());
		assert!(claims.repository_id.is_none());
		assert!(claims.repository_owner_id.is_none());
	}

	#[test]
	fn test_sub_is_required() {
		let claims = json!({"repository_id": "42"});
		assert!(serde_json::from_value::<GithubActionsClaims>(claims).is_err());
	}
}
