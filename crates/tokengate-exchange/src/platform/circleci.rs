// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! CircleCI job tokens.

use async_trait::async_trait;
use tokengate_oidc::TokenValidator;
use tracing::debug;

use super::{dimension_allows, dimension_contains, PlatformHandler, DEFAULT_CIRCLECI_BASE_URL};
use crate::claims::CircleCiClaims;
use crate::config::CircleCiTenant;
use crate::dispatch::AuthorizedProviders;

/// Handles tenants whose tokens are issued by `oidc.circleci.com/org/<org-id>`.
#[derive(Debug, Clone)]
pub struct CircleCiHandler {
	base_url: String,
}

impl CircleCiHandler {
	pub fn new(base_url: impl Into<String>) -> Self {
		Self {
			base_url: base_url.into(),
		}
	}
}

impl Default for CircleCiHandler {
	fn default() -> Self {
		Self::new(DEFAULT_CIRCLECI_BASE_URL)
	}
}

#[async_trait]
impl PlatformHandler for CircleCiHandler {
	type Config = CircleCiTenant;
	type Claims = CircleCiClaims;

	fn discovery_url_for_token(&self, config: &CircleCiTenant, _token: &str) -> Option<String> {
		Some(format!(
			"{}/{}",
			self.base_url.trim_end_matches('/'),
			config.organization_id
		))
	}

	async fn validate_token(
		&self,
		validator: &TokenValidator,
		_config: &CircleCiTenant,
		token: &str,
		discovery_url: &str,
	) -> Option<CircleCiClaims> {
		validator.validate(token, discovery_url).await
	}

	fn filter_secret_providers(
		&self,
		config: &CircleCiTenant,
		claims: &CircleCiClaims,
	) -> AuthorizedProviders {
		// A null context list means no contexts, never "any context".
		let context_id = claims.context_id();
		let project_id = claims.project_id.as_deref();

		let providers = config
			.secrets
			.iter()
			.filter(|binding| dimension_contains(&binding.filters.project_ids, project_id))
			.filter(|binding| dimension_allows(&binding.filters.context_ids, context_id))
			.map(|binding| binding.provider.clone())
			.collect::<Vec<_>>();

		debug!(
			project_id = ?project_id,
			context_id = ?context_id,
			authorized = providers.len(),
			configured = config.secrets.len(),
			"filtered CircleCI secret bindings"
		);

		AuthorizedProviders::new(claims.sub.clone(), providers)
	}
}
