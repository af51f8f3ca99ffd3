// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub Actions job tokens.
//!
//! Every GitHub Actions token in the world is signed by the same issuer, so a
//! valid signature says nothing about which organization the job belongs to.
//! The owner id claim must match the tenant's organization id both at
//! validation time and again when filtering.

use async_trait::async_trait;
use tokengate_oidc::TokenValidator;
use tracing::{debug, warn};

use super::{
	dimension_allows, dimension_contains, PlatformHandler, DEFAULT_GITHUB_ACTIONS_ISSUER_URL,
};
use crate::claims::GithubActionsClaims;
use crate::config::GithubActionsTenant;
use crate::dispatch::AuthorizedProviders;

#[derive(Debug, Clone)]
pub struct GithubActionsHandler {
	issuer_url: String,
}

impl GithubActionsHandler {
	/// Use a non-default issuer, e.g. `https://<ghes-host>/_services/token`.
	pub fn new(issuer_url: impl Into<String>) -> Self {
		Self {
			issuer_url: issuer_url.into(),
		}
	}
}

impl Default for GithubActionsHandler {
	fn default() -> Self {
		Self::new(DEFAULT_GITHUB_ACTIONS_ISSUER_URL)
	}
}

fn owner_matches(config: &GithubActionsTenant, claims: &GithubActionsClaims) -> bool {
	claims
		.repository_owner_id
		.as_deref()
		.is_some_and(|owner| !owner.is_empty() && owner == config.organization_id)
}

#[async_trait]
impl PlatformHandler for GithubActionsHandler {
	type Config = GithubActionsTenant;
	type Claims = GithubActionsClaims;

	fn discovery_url_for_token(
		&self,
		_config: &GithubActionsTenant,
		_token: &str,
	) -> Option<String> {
		Some(self.issuer_url.clone())
	}

	async fn validate_token(
		&self,
		validator: &TokenValidator,
		config: &GithubActionsTenant,
		token: &str,
		discovery_url: &str,
	) -> Option<GithubActionsClaims> {
		let claims: GithubActionsClaims = validator.validate(token, discovery_url).await?;
		if !owner_matches(config, &claims) {
			debug!(
				organization_id = %config.organization_id,
				repository_owner_id = ?claims.repository_owner_id,
				"GitHub Actions token belongs to another organization"
			);
			return None;
		}
		Some(claims)
	}

	fn filter_secret_providers(
		&self,
		config: &GithubActionsTenant,
		claims: &GithubActionsClaims,
	) -> AuthorizedProviders {
		if !owner_matches(config, claims) {
			warn!(
				organization_id = %config.organization_id,
				"refusing to filter bindings for a token from another organization"
			);
			return AuthorizedProviders::new(claims.sub.clone(), Vec::new());
		}

		let environment = claims.environment.as_deref();
		let repository_id = claims.repository_id.as_deref();
		let providers = config
			.secrets
			.iter()
			.filter(|binding| dimension_contains(&binding.filters.repository_ids, repository_id))
			.filter(|binding| dimension_allows(&binding.filters.environments, environment))
			.map(|binding| binding.provider.clone())
			.collect::<Vec<_>>();

		debug!(
			repository_id = ?repository_id,
			environment = ?environment,
			authorized = providers.len(),
			configured = config.secrets.len(),
			"filtered GitHub Actions secret bindings"
		);

		AuthorizedProviders::new(claims.sub.clone(), providers)
	}
}
