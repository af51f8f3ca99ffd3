// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secrets copied from the server's own environment.

use std::collections::BTreeMap;
use std::env;

use async_trait::async_trait;
use tokengate_common_secret::SecretString;
use tokengate_exchange::{LoadedContent, ProviderError, SecretMap, SecretProvider};

pub const ENV_CONTENT_KEY: &str = "env-secret-no-content";

/// Hands out secret `name` with the value of variable `vars[name]`.
///
/// Variables are read when secrets are produced, not at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSecretProvider {
	vars: BTreeMap<String, String>,
}

impl EnvSecretProvider {
	pub fn new(vars: BTreeMap<String, String>) -> Self {
		Self { vars }
	}
}

#[async_trait]
impl SecretProvider for EnvSecretProvider {
	fn loadable_content_key(&self) -> String {
		ENV_CONTENT_KEY.to_string()
	}

	async fn load_content(&self) -> Result<LoadedContent, ProviderError> {
		Ok(LoadedContent::none())
	}

	async fn provide_secrets(&self, _content: &LoadedContent) -> Result<SecretMap, ProviderError> {
		self.vars
			.iter()
			.map(|(name, var)| match env::var(var) {
				Ok(value) => Ok((name.clone(), SecretString::from(value))),
				Err(_) => Err(ProviderError::failed(format!(
					"environment variable {var} for secret {name} is not set"
				))),
			})
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[tokio::test]
	async fn test_reads_variables() {
		env::set_var("TOKENGATE_TEST_ENV_PROVIDER_VALUE", "from-env");
		let provider = EnvSecretProvider::new(BTreeMap::from([(
			"DEPLOY_KEY".to_string(),
			"TOKENGATE_TEST_ENV_PROVIDER_VALUE".to_string(),
		)]));
		let secrets = provider.provide_secrets(&LoadedContent::none()).await.unwrap();
		assert_eq!(secrets["DEPLOY_KEY"].expose(), "from-env");
		env::remove_var("TOKENGATE_TEST_ENV_PROVIDER_VALUE");
	}

	#[tokio::test]
	async fn test_missing_variable_fails() {
		let provider = EnvSecretProvider::new(BTreeMap::from([(
			"DEPLOY_KEY".to_string(),
			"TOKENGATE_TEST_ENV_PROVIDER_ABSENT".to_string(),
		)]));
		let err = provider
			.provide_secrets(&LoadedContent::none())
			.await
			.unwrap_err();
		assert!(err.to_string().contains("TOKENGATE_TEST_ENV_PROVIDER_ABSENT"));
		assert!(!err.to_string().contains("from-env"));
	}
}
