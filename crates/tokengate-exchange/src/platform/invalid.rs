// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tenants on an unrecognized platform: never resolved, never authorized.

use async_trait::async_trait;
use tokengate_oidc::TokenValidator;

use super::PlatformHandler;
use crate::claims::BaseClaims;
use crate::config::InvalidTenant;
use crate::dispatch::AuthorizedProviders;

#[derive(Debug, Clone, Copy, Default)]
pub struct InvalidHandler;

#[async_trait]
impl PlatformHandler for InvalidHandler {
	type Config = InvalidTenant;
	type Claims = BaseClaims;

	fn discovery_url_for_token(&self, _config: &InvalidTenant, _token: &str) -> Option<String> {
		None
	}

	async fn validate_token(
		&self,
		_validator: &TokenValidator,
		_config: &InvalidTenant,
		_token: &str,
		_discovery_url: &str,
	) -> Option<BaseClaims> {
		None
	}

	fn filter_secret_providers(
		&self,
		_config: &InvalidTenant,
		claims: &BaseClaims,
	) -> AuthorizedProviders {
		AuthorizedProviders::new(claims.sub.clone(), Vec::new())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn tenant() -> InvalidTenant {
		InvalidTenant {
			organization_id: "whatever".to_string(),
		}
	}

	#[test]
	fn test_never_resolves_discovery_url() {
		assert!(InvalidHandler
			.discovery_url_for_token(&tenant(), "any-token")
			.is_none());
	}

	#[tokio::test]
	async fn test_never_validates() {
		let validator = TokenValidator::new(reqwest::Client::new());
		let claims = InvalidHandler
			.validate_token(&validator, &tenant(), "token", "https://issuer.example")
			.await;
		assert!(claims.is_none());
	}

	#[test]
	fn test_authorizes_nothing() {
		let claims = BaseClaims {
			sub: "someone".to_string(),
		};
		let authorized = InvalidHandler.filter_secret_providers(&tenant(), &claims);
		assert!(authorized.providers.is_empty());
		assert_eq!(authorized.subject, "someone");
	}
}
