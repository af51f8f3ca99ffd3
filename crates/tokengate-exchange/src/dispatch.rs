// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tenant dispatch: find the tenant a token belongs to.

use std::fmt;

use tokengate_oidc::TokenValidator;
use tracing::{debug, info, instrument};

use crate::aggregate::resolve_secrets;
use crate::config::TenantConfig;
use crate::error::{ExchangeError, ExchangeResult};
use crate::platform::{
	CircleCiHandler, GithubActionsHandler, InvalidHandler, PlatformEndpoints, PlatformHandler,
};
use crate::provider::{ProviderFactory, SecretMap};

/// The verified subject of a token and the providers its claims authorize.
///
/// `providers` may be empty: a valid token that matches no binding still
/// authenticates.
#[derive(Clone)]
pub struct AuthorizedProviders {
	pub subject: String,
	pub providers: Vec<ProviderFactory>,
}

impl AuthorizedProviders {
	pub fn new(subject: impl Into<String>, providers: Vec<ProviderFactory>) -> Self {
		Self {
			subject: subject.into(),
			providers,
		}
	}
}

impl fmt::Debug for AuthorizedProviders {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("AuthorizedProviders")
			.field("subject", &self.subject)
			.field("providers", &self.providers.len())
			.finish()
	}
}

/// Result of a successful exchange.
#[derive(Debug)]
pub struct ExchangeOutcome {
	pub subject: String,
	pub secrets: SecretMap,
}

/// Routes a token to the handler for each configured tenant.
#[derive(Debug, Clone)]
pub struct ExchangeDispatcher {
	validator: TokenValidator,
	circleci: CircleCiHandler,
	github_actions: GithubActionsHandler,
	invalid: InvalidHandler,
}

impl ExchangeDispatcher {
	/// Dispatcher against the public CircleCI and GitHub Actions issuers.
	pub fn new(validator: TokenValidator) -> Self {
		Self::with_endpoints(validator, PlatformEndpoints::default())
	}

	pub fn with_endpoints(validator: TokenValidator, endpoints: PlatformEndpoints) -> Self {
		Self {
			validator,
			circleci: CircleCiHandler::new(endpoints.circleci_base_url),
			github_actions: GithubActionsHandler::new(endpoints.github_actions_issuer_url),
			invalid: InvalidHandler,
		}
	}

	/// Try each tenant in order; the first whose handler validates the token
	/// decides the authorized providers.
	///
	/// Returns `None` when no tenant accepts the token.
	#[instrument(skip_all, fields(tenants = tenants.len()))]
	pub async fn dispatch(
		&self,
		tenants: &[TenantConfig],
		token: &str,
	) -> Option<AuthorizedProviders> {
		for tenant in tenants {
			let authorized = match tenant {
				TenantConfig::CircleCi(config) => {
					self.providers_for_config(&self.circleci, config, token).await
				}
				TenantConfig::GithubActions(config) => {
					self.providers_for_config(&self.github_actions, config, token)
						.await
				}
				TenantConfig::Invalid(config) => {
					self.providers_for_config(&self.invalid, config, token).await
				}
			};

			match authorized {
				Some(authorized) => {
					info!(
						tenant = %tenant,
						subject = %authorized.subject,
						providers = authorized.providers.len(),
						"validated token from subject"
					);
					return Some(authorized);
				}
				None => debug!(tenant = %tenant, "tenant did not accept token"),
			}
		}
		None
	}

	async fn providers_for_config<H: PlatformHandler>(
		&self,
		handler: &H,
		config: &H::Config,
		token: &str,
	) -> Option<AuthorizedProviders> {
		let discovery_url = handler.discovery_url_for_token(config, token)?;
		let claims = handler
			.validate_token(&self.validator, config, token, &discovery_url)
			.await?;
		Some(handler.filter_secret_providers(config, &claims))
	}

	/// Dispatch `token` and resolve the authorized providers into secrets.
	pub async fn exchange(
		&self,
		tenants: &[TenantConfig],
		token: &str,
	) -> ExchangeResult<ExchangeOutcome> {
		let authorized = self
			.dispatch(tenants, token)
			.await
			.ok_or(ExchangeError::Unauthenticated)?;
		let secrets = resolve_secrets(&authorized.providers).await?;
		Ok(ExchangeOutcome {
			subject: authorized.subject,
			secrets,
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::config::InvalidTenant;

	fn dispatcher() -> ExchangeDispatcher {
		ExchangeDispatcher::new(TokenValidator::new(reqwest::Client::new()))
	}

	#[tokio::test]
	async fn test_no_tenants_rejects() {
		assert!(dispatcher().dispatch(&[], "token").await.is_none());
	}

	#[tokio::test]
	async fn test_invalid_tenants_reject() {
		let tenants = vec![
			TenantConfig::Invalid(InvalidTenant {
				organization_id: "a".to_string(),
			}),
			TenantConfig::Invalid(InvalidTenant {
				organization_id: "b".to_string(),
			}),
		];
		let err = dispatcher().exchange(&tenants, "token").await.unwrap_err();
		assert!(matches!(err, ExchangeError::Unauthenticated));
	}

	#[test]
	fn test_authorized_providers_debug_hides_factories() {
		let authorized = AuthorizedProviders::new("sub", Vec::new());
		assert_eq!(
			format!("{authorized:?}"),
			"AuthorizedProviders { subject: \"sub\", providers: 0 }"
		);
	}
}
