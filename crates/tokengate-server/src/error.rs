// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Server error types and HTTP response conversions.

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use tokengate_exchange::{ExchangeError, ProviderError};
use tokengate_providers::GithubAppError;

use crate::format::RenderError;

/// Errors raised while serving an exchange request.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
	/// Neither the body nor the `x-oidc-token` header carried a token.
	#[error("Missing token")]
	MissingToken,

	#[error(transparent)]
	Exchange(#[from] ExchangeError),

	/// The secrets cannot be expressed in the requested format.
	#[error(transparent)]
	Render(#[from] RenderError),
}

/// Error response body.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
	pub error: String,
	pub message: String,
}

impl ErrorResponse {
	fn new(error: &str, message: &str) -> Self {
		Self {
			error: error.to_string(),
			message: message.to_string(),
		}
	}
}

impl IntoResponse for ServerError {
	fn into_response(self) -> Response {
		match &self {
			ServerError::MissingToken => (StatusCode::BAD_REQUEST, "Missing token").into_response(),
			ServerError::Exchange(ExchangeError::Unauthenticated) => {
				tracing::warn!("token did not match any configured organization");
				StatusCode::UNAUTHORIZED.into_response()
			}
			ServerError::Exchange(e) => {
				tracing::error!(error = %e, "secret exchange failed");
				(
					StatusCode::INTERNAL_SERVER_ERROR,
					Json(ErrorResponse::new(
						"internal_error",
						"An internal error occurred",
					)),
				)
					.into_response()
			}
			ServerError::Render(e) => {
				tracing::error!(error = %e, "cannot render secrets in requested format");
				StatusCode::UNPROCESSABLE_ENTITY.into_response()
			}
		}
	}
}

/// Errors that stop the server from starting.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
	#[error("configuration error: {0}")]
	Config(#[from] tokengate_server_config::ConfigError),

	#[error("failed to build HTTP client: {0}")]
	HttpClient(#[from] reqwest::Error),

	#[error("tenant {tenant} binding {binding}: {source}")]
	Provider {
		tenant: usize,
		binding: usize,
		#[source]
		source: ProviderError,
	},

	/// A GitHub App key that configuration loading should have resolved.
	#[error("tenant {tenant} binding {binding}: GitHub App private key was not resolved")]
	UnresolvedKey { tenant: usize, binding: usize },

	#[error("tenant {tenant} binding {binding}: {source}")]
	GithubApp {
		tenant: usize,
		binding: usize,
		#[source]
		source: GithubAppError,
	},
}
