// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Minimal GitHub App API client.

use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use urlencoding::encode;

use super::config::GithubAppConfig;
use super::error::GithubAppError;
use super::jwt::generate_app_jwt;
use super::types::{Installation, InstallationToken, InstallationTokenRequest};

const GITHUB_API_VERSION: &str = "2022-11-28";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

#[derive(Debug, Clone)]
pub struct GithubAppClient {
	config: GithubAppConfig,
	http: Client,
}

impl GithubAppClient {
	pub fn new(config: GithubAppConfig) -> Result<Self, GithubAppError> {
		let http = tokengate_common_http::build_client(tokengate_common_http::DEFAULT_TIMEOUT)?;
		Ok(Self::with_http_client(config, http))
	}

	pub fn with_http_client(config: GithubAppConfig, http: Client) -> Self {
		Self { config, http }
	}

	pub fn config(&self) -> &GithubAppConfig {
		&self.config
	}

	fn app_request(&self, builder: RequestBuilder) -> Result<RequestBuilder, GithubAppError> {
		let jwt = generate_app_jwt(self.config.app_id(), self.config.private_key_pem())?;
		Ok(builder
			.bearer_auth(jwt)
			.header(reqwest::header::ACCEPT, GITHUB_ACCEPT)
			.header("X-GitHub-Api-Version", GITHUB_API_VERSION))
	}

	/// `GET /repos/{owner}/{repo}/installation`
	#[instrument(skip(self))]
	pub async fn get_repository_installation(
		&self,
		owner: &str,
		repo: &str,
	) -> Result<Installation, GithubAppError> {
		let url = self.config.api_url(&format!(
			"repos/{}/{}/installation",
			encode(owner),
			encode(repo)
		));
		let response = self.app_request(self.http.get(&url))?.send().await?;

		if response.status() == StatusCode::NOT_FOUND {
			return Err(GithubAppError::installation_not_found(owner, repo));
		}
		let installation: Installation = parse_response(response).await?;
		debug!(installation_id = installation.id, "found repository installation");
		Ok(installation)
	}

	/// `POST /app/installations/{id}/access_tokens`
	#[instrument(skip(self, request))]
	pub async fn create_installation_token(
		&self,
		installation_id: u64,
		request: &InstallationTokenRequest,
	) -> Result<InstallationToken, GithubAppError> {
		let url = self
			.config
			.api_url(&format!("app/installations/{installation_id}/access_tokens"));
		let response = self
			.app_request(self.http.post(&url))?
			.json(request)
			.send()
			.await?;

		let token: InstallationToken = parse_response(response).await?;
		debug!(
			expires_at = %token.expires_at,
			repository_selection = ?token.repository_selection,
			"created installation token"
		);
		Ok(token)
	}

	/// An installation token usable only on `owner/repo`.
	pub async fn token_for_repository(
		&self,
		owner: &str,
		repo: &str,
		permissions: &std::collections::BTreeMap<String, String>,
	) -> Result<InstallationToken, GithubAppError> {
		let installation = self.get_repository_installation(owner, repo).await?;
		let request = InstallationTokenRequest {
			repositories: vec![repo.to_string()],
			permissions: permissions.clone(),
		};
		self.create_installation_token(installation.id, &request)
			.await
	}
}

async fn parse_response<T: DeserializeOwned>(response: Response) -> Result<T, GithubAppError> {
	let status = response.status();
	if status.is_success() {
		return response
			.json::<T>()
			.await
			.map_err(|e| GithubAppError::InvalidResponse(e.to_string()));
	}

	let rate_limited = response
		.headers()
		.get("x-ratelimit-remaining")
		.is_some_and(|v| v == "0");
	let message = response.text().await.unwrap_or_default();

	Err(match status {
		StatusCode::UNAUTHORIZED => GithubAppError::Unauthorized,
		StatusCode::TOO_MANY_REQUESTS => GithubAppError::RateLimited,
		StatusCode::FORBIDDEN if rate_limited => GithubAppError::RateLimited,
		StatusCode::FORBIDDEN => GithubAppError::Forbidden,
		_ => GithubAppError::api_error(status.as_u16(), message),
	})
}
