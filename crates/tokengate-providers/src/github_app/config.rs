// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Configuration for the GitHub App client.

use reqwest::Url;
use tokengate_common_secret::SecretString;

use super::error::GithubAppError;

const DEFAULT_BASE_URL: &str = "https://api.github.com";

/// GitHub App credentials and API location.
///
/// The private key is held as a [`SecretString`] so it never reaches logs.
#[derive(Clone)]
pub struct GithubAppConfig {
	/// GitHub App numeric ID
	app_id: u64,

	/// PEM-encoded RSA private key for JWT signing
	private_key_pem: SecretString,

	/// Base URL for GitHub API (validated HTTPS, parsed)
	base_url: Url,
}

impl std::fmt::Debug for GithubAppConfig {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("GithubAppConfig")
			.field("app_id", &self.app_id)
			.field("private_key_pem", &self.private_key_pem)
			.field("base_url", &self.base_url.as_str())
			.finish()
	}
}

impl GithubAppConfig {
	/// Validate a base URL.
	///
	/// Requirements:
	/// - Must be a valid URL
	/// - Must use HTTPS scheme
	/// - Must have a host, and not a loopback one
	pub fn validate_base_url(raw: &str) -> Result<Url, GithubAppError> {
		let url = Url::parse(raw)
			.map_err(|e| GithubAppError::Config(format!("Invalid GitHub base URL '{raw}': {e}")))?;

		if url.scheme() != "https" {
			return Err(GithubAppError::Config(format!(
				"GitHub base URL must use https, got '{}'",
				url.scheme()
			)));
		}

		let host = url
			.host_str()
			.ok_or_else(|| {
				GithubAppError::Config("GitHub base URL must include a host".to_string())
			})?;

		if host == "localhost" || host == "127.0.0.1" || host == "[::1]" {
			return Err(GithubAppError::Config(
				"GitHub base URL must not be localhost".to_string(),
			));
		}

		Ok(url)
	}

	/// Configuration against api.github.com.
	///
	/// Fails if the private key is empty.
	pub fn new(app_id: u64, private_key_pem: SecretString) -> Result<Self, GithubAppError> {
		if private_key_pem.expose().trim().is_empty() {
			return Err(GithubAppError::Config(format!(
				"private key for GitHub App {app_id} is empty"
			)));
		}
		Ok(Self {
			app_id,
			private_key_pem,
			base_url: Self::validate_base_url(DEFAULT_BASE_URL)?,
		})
	}

	/// Point at GitHub Enterprise Server, e.g. `https://github.example.com/api/v3`.
	pub fn with_base_url(mut self, url: &str) -> Result<Self, GithubAppError> {
		self.base_url = Self::validate_base_url(url)?;
		Ok(self)
	}

	/// Skip base URL validation. Local fake servers only.
	#[cfg(test)]
	pub(crate) fn with_unchecked_base_url(mut self, url: &str) -> Self {
		self.base_url = Url::parse(url).unwrap();
		self
	}

	pub fn app_id(&self) -> u64 {
		self.app_id
	}

	pub(crate) fn private_key_pem(&self) -> &str {
		self.private_key_pem.expose()
	}

	pub fn base_url(&self) -> &Url {
		&self.base_url
	}

	/// `path` joined onto the base URL, keeping any base path such as `/api/v3`.
	pub(crate) fn api_url(&self, path: &str) -> String {
		format!(
			"{}/{}",
			self.base_url.as_str().trim_end_matches('/'),
			path.trim_start_matches('/')
		)
	}
}
