// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the GitHub App client.

use thiserror::Error;
use tokengate_exchange::ProviderError;

/// Errors that can occur when talking to the GitHub App API.
#[derive(Debug, Error)]
pub enum GithubAppError {
	/// Network-level error during HTTP communication.
	#[error("Network error: {0}")]
	Network(#[source] reqwest::Error),

	/// Request timed out.
	#[error("Request timed out")]
	Timeout,

	/// Invalid app id or private key.
	#[error("Unauthorized or invalid app configuration")]
	Unauthorized,

	/// The app lacks a permission it asked for.
	#[error("Forbidden or insufficient permissions")]
	Forbidden,

	#[error("Rate limit exceeded")]
	RateLimited,

	/// GitHub API returned an error.
	#[error("GitHub API error: {status} - {message}")]
	ApiError { status: u16, message: String },

	/// Invalid or unparseable response.
	#[error("Invalid response from GitHub: {0}")]
	InvalidResponse(String),

	#[error("Configuration error: {0}")]
	Config(String),

	/// JWT signing/encoding error.
	#[error("JWT error: {0}")]
	Jwt(String),

	/// The app is not installed on the repository.
	#[error("GitHub App not installed for {owner}/{repo}")]
	InstallationNotFound { owner: String, repo: String },

	/// Issuing a token for a configured repository failed.
	#[error("failed to generate GitHub token for repo \"{owner}/{repo}\": {source}")]
	RepositoryToken {
		owner: String,
		repo: String,
		#[source]
		source: Box<GithubAppError>,
	},
}

impl From<reqwest::Error> for GithubAppError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() {
			Self::Timeout
		} else {
			Self::Network(e)
		}
	}
}

impl GithubAppError {
	/// Create an API error from status code and message.
	pub fn api_error(status: u16, message: impl Into<String>) -> Self {
		Self::ApiError {
			status,
			message: message.into(),
		}
	}

	pub fn installation_not_found(owner: impl Into<String>, repo: impl Into<String>) -> Self {
		Self::InstallationNotFound {
			owner: owner.into(),
			repo: repo.into(),
		}
	}

	/// Attach the repository a token was requested for.
	pub fn for_repository(self, owner: impl Into<String>, repo: impl Into<String>) -> Self {
		Self::RepositoryToken {
			owner: owner.into(),
			repo: repo.into(),
			source: Box::new(self),
		}
	}
}

impl From<GithubAppError> for ProviderError {
	fn from(e: GithubAppError) -> Self {
		ProviderError::other(e)
	}
}
