// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Per-platform token handling.
//!
//! Each supported identity platform knows where its issuer lives, how to
//! validate a token for a tenant, and how to filter the tenant's bindings
//! against the verified claims. The set of platforms is closed; the
//! dispatcher picks a handler by matching on [`crate::TenantConfig`].

mod circleci;
mod github_actions;
mod invalid;

pub use circleci::CircleCiHandler;
pub use github_actions::GithubActionsHandler;
pub use invalid::InvalidHandler;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tokengate_oidc::TokenValidator;

use crate::config::WILDCARD;
use crate::dispatch::AuthorizedProviders;

/// Default CircleCI issuer base; the organization id is appended.
pub const DEFAULT_CIRCLECI_BASE_URL: &str = "https://oidc.circleci.com/org";

/// Default GitHub Actions issuer.
pub const DEFAULT_GITHUB_ACTIONS_ISSUER_URL: &str = "https://token.actions.githubusercontent.com";

/// Issuer locations for the supported platforms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformEndpoints {
	pub circleci_base_url: String,
	pub github_actions_issuer_url: String,
}

impl Default for PlatformEndpoints {
	fn default() -> Self {
		Self {
			circleci_base_url: DEFAULT_CIRCLECI_BASE_URL.to_string(),
			github_actions_issuer_url: DEFAULT_GITHUB_ACTIONS_ISSUER_URL.to_string(),
		}
	}
}

/// Discovery, validation and authorization for one identity platform.
#[async_trait]
pub trait PlatformHandler: Send + Sync {
	type Config: Send + Sync;
	type Claims: DeserializeOwned + Send + Sync;

	/// Issuer URL to validate `token` against, or `None` to skip this tenant
	/// without any network traffic.
	fn discovery_url_for_token(&self, config: &Self::Config, token: &str) -> Option<String>;

	/// Verify `token` and apply any platform checks against `config`.
	async fn validate_token(
		&self,
		validator: &TokenValidator,
		config: &Self::Config,
		token: &str,
		discovery_url: &str,
	) -> Option<Self::Claims>;

	/// Narrow the tenant's bindings to those `claims` authorize.
	fn filter_secret_providers(&self, config: &Self::Config, claims: &Self::Claims)
		-> AuthorizedProviders;
}

/// Treat empty claim values as absent.
fn present(value: Option<&str>) -> Option<&str> {
	value.filter(|v| !v.is_empty())
}

/// A wildcard-capable dimension: passes if the filter holds [`WILDCARD`], or
/// the claim value is present and listed.
fn dimension_allows(filter: &[String], value: Option<&str>) -> bool {
	if filter.iter().any(|f| f == WILDCARD) {
		return true;
	}
	match present(value) {
		Some(value) => filter.iter().any(|f| f == value),
		None => false,
	}
}

/// An exact dimension: the claim value must be present and listed.
fn dimension_contains(filter: &[String], value: Option<&str>) -> bool {
	present(value).is_some_and(|value| filter.iter().any(|f| f == value))
}
