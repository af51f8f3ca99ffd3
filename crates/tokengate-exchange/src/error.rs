// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the exchange pipeline.

use thiserror::Error;

/// Result type alias for exchange operations.
pub type ExchangeResult<T> = Result<T, ExchangeError>;

/// Failures the exchange pipeline reports to its caller.
///
/// Validation failures of every kind collapse into [`ExchangeError::Unauthenticated`]
/// so callers cannot learn which check rejected a token.
#[derive(Debug, Error)]
pub enum ExchangeError {
	/// No configured tenant both resolved and validated the token.
	#[error("token did not validate against any configured tenant")]
	Unauthenticated,

	/// Two authorized providers produced the same secret name.
	#[error("two secret providers provided the same secret key: \"{name}\"")]
	KeyCollision { name: String },

	/// A provider failed to load shared content.
	#[error("failed to load content for \"{key}\": {source}")]
	ContentLoadFailed {
		key: String,
		#[source]
		source: ProviderError,
	},

	/// A provider failed to produce its secrets.
	#[error("secret provider for \"{key}\" failed: {source}")]
	SecretProductionFailed {
		key: String,
		#[source]
		source: ProviderError,
	},
}

/// Errors raised by [`crate::SecretProvider`] implementations.
#[derive(Debug, Error)]
pub enum ProviderError {
	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),

	#[error("invalid JSON content: {0}")]
	Json(#[from] serde_json::Error),

	/// The loaded content is not of the type the provider expects. Happens
	/// when two provider kinds share a content key.
	#[error("content for \"{key}\" has an unexpected type")]
	ContentType { key: String },

	#[error("{0}")]
	Failed(String),

	#[error(transparent)]
	Other(Box<dyn std::error::Error + Send + Sync>),
}

impl ProviderError {
	pub fn failed(message: impl Into<String>) -> Self {
		Self::Failed(message.into())
	}

	pub fn other(err: impl std::error::Error + Send + Sync + 'static) -> Self {
		Self::Other(Box::new(err))
	}
}
