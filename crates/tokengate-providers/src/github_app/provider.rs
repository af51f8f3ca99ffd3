// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokengate_exchange::{LoadedContent, ProviderError, SecretMap, SecretProvider};
use tracing::{info, instrument};

use super::client::GithubAppClient;

/// Secret name used when none is configured.
pub const DEFAULT_TOKEN_SECRET_NAME: &str = "GITHUB_TOKEN";

/// Issues an installation token for one repository as a single secret.
#[derive(Debug, Clone)]
pub struct GithubAppTokenProvider {
	client: Arc<GithubAppClient>,
	owner: String,
	repo: String,
	permissions: BTreeMap<String, String>,
	secret_name: String,
}

impl GithubAppTokenProvider {
	pub fn new(
		client: Arc<GithubAppClient>,
		owner: impl Into<String>,
		repo: impl Into<String>,
		permissions: BTreeMap<String, String>,
	) -> Self {
		Self {
			client,
			owner: owner.into(),
			repo: repo.into(),
			permissions,
			secret_name: DEFAULT_TOKEN_SECRET_NAME.to_string(),
		}
	}

	pub fn with_secret_name(mut self, secret_name: impl Into<String>) -> Self {
		self.secret_name = secret_name.into();
		self
	}
}

#[async_trait]
impl SecretProvider for GithubAppTokenProvider {
	fn loadable_content_key(&self) -> String {
		format!("github-installation::{}/{}", self.owner, self.repo)
	}

	async fn load_content(&self) -> Result<LoadedContent, ProviderError> {
		Ok(LoadedContent::none())
	}

	#[instrument(skip_all, fields(owner = %self.owner, repo = %self.repo))]
	async fn provide_secrets(&self, _content: &LoadedContent) -> Result<SecretMap, ProviderError> {
		let token = self
			.client
			.token_for_repository(&self.owner, &self.repo, &self.permissions)
			.await
			.map_err(|e| e.for_repository(&self.owner, &self.repo))?;

		info!(
			secret_name = %self.secret_name,
			expires_at = %token.expires_at,
			"issued GitHub installation token"
		);
		Ok(SecretMap::from([(self.secret_name.clone(), token.token)]))
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::github_app::client::tests::{client_for, mount_installation};
	use crate::GithubAppError;

	use serde_json::json;
	use wiremock::matchers::{method, path};
	use wiremock::{Mock, MockServer, ResponseTemplate};

	fn provider(server: &MockServer, repo: &str) -> GithubAppTokenProvider {
		GithubAppTokenProvider::new(
			Arc::new(client_for(server)),
			"acme",
			repo,
			BTreeMap::from([("contents".to_string(), "read".to_string())]),
		)
	}

	#[test]
	fn test_content_key() {
		let key = GithubAppTokenProvider::new(
			Arc::new(
				GithubAppClient::new(
					crate::GithubAppConfig::new(1, "pem".into()).unwrap(),
				)
				.unwrap(),
			),
			"acme",
			"widgets",
			BTreeMap::new(),
		)
		.loadable_content_key();
		assert_eq!(key, "github-installation::acme/widgets");
	}

	#[tokio::test]
	async fn test_provides_token_under_configured_name() {
		let server = MockServer::start().await;
		mount_installation(&server, "acme", "widgets", 5).await;
		Mock::given(method("POST"))
			.and(path("/app/installations/5/access_tokens"))
			.respond_with(ResponseTemplate::new(201).set_body_json(json!({
				"token": "ghs_issued",
				"expires_at": "2030-01-01T00:00:00Z",
			})))
			.mount(&server)
			.await;

		let secrets = provider(&server, "widgets")
			.provide_secrets(&LoadedContent::none())
			.await
			.unwrap();
		assert_eq!(secrets["GITHUB_TOKEN"].expose(), "ghs_issued");

		let secrets = provider(&server, "widgets")
			.with_secret_name("DEPLOY_TOKEN")
			.provide_secrets(&LoadedContent::none())
			.await
			.unwrap();
		assert_eq!(
			secrets.keys().collect::<Vec<_>>(),
			vec!["DEPLOY_TOKEN"]
		);
	}

	#[tokio::test]
	async fn test_failure_is_provider_error() {
		let server = MockServer::start().await;
		let err = provider(&server, "gone")
			.provide_secrets(&LoadedContent::none())
			.await
			.unwrap_err();
		assert!(err.to_string().contains("acme/gone"));

		let ProviderError::Other(inner) = &err else {
			panic!("expected a wrapped GitHub App error, got {err:?}");
		};
		assert!(matches!(
			inner.downcast_ref::<GithubAppError>(),
			Some(GithubAppError::RepositoryToken { source, .. })
				if matches!(**source, GithubAppError::InstallationNotFound { .. })
		));
	}
}
