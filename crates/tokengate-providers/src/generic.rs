// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secrets produced by an arbitrary async closure.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use futures::future::BoxFuture;
use tokengate_exchange::{LoadedContent, ProviderError, SecretMap, SecretProvider};

/// Content key shared by every generic provider. They load nothing.
pub const GENERIC_CONTENT_KEY: &str = "generic-secret-no-content";

type SecretsFn =
	Arc<dyn Fn() -> BoxFuture<'static, Result<SecretMap, ProviderError>> + Send + Sync>;

#[derive(Clone)]
pub struct GenericSecretProvider {
	get_secrets: SecretsFn,
}

impl GenericSecretProvider {
	pub fn new<F, Fut>(get_secrets: F) -> Self
	where
		F: Fn() -> Fut + Send + Sync + 'static,
		Fut: std::future::Future<Output = Result<SecretMap, ProviderError>> + Send + 'static,
	{
		Self {
			get_secrets: Arc::new(move || Box::pin(get_secrets())),
		}
	}
}

impl fmt::Debug for GenericSecretProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("GenericSecretProvider").finish_non_exhaustive()
	}
}

#[async_trait]
impl SecretProvider for GenericSecretProvider {
	fn loadable_content_key(&self) -> String {
		GENERIC_CONTENT_KEY.to_string()
	}

	async fn load_content(&self) -> Result<LoadedContent, ProviderError> {
		Ok(LoadedContent::none())
	}

	async fn provide_secrets(&self, _content: &LoadedContent) -> Result<SecretMap, ProviderError> {
		(self.get_secrets)().await
	}
}
