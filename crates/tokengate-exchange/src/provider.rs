// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The secret provider contract.

use std::any::Any;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tokengate_common_secret::SecretString;

use crate::error::ProviderError;

/// Secret name to secret value.
pub type SecretMap = BTreeMap<String, SecretString>;

/// Content key for providers that need no shared content.
pub const NO_CONTENT_KEY: &str = "no-content";

/// Builds a fresh provider instance for one request.
pub type ProviderFactory = Arc<dyn Fn() -> Box<dyn SecretProvider> + Send + Sync>;

/// Wrap a closure as a [`ProviderFactory`].
pub fn provider_factory<F, P>(factory: F) -> ProviderFactory
where
	F: Fn() -> P + Send + Sync + 'static,
	P: SecretProvider + 'static,
{
	Arc::new(move || Box::new(factory()) as Box<dyn SecretProvider>)
}

/// A pluggable source of secrets.
///
/// Providers that can share an expensive load (reading the same file, say)
/// return the same [`SecretProvider::loadable_content_key`]; the pipeline
/// then calls [`SecretProvider::load_content`] once for all of them and hands
/// the result to each provider's [`SecretProvider::provide_secrets`].
#[async_trait]
pub trait SecretProvider: Send + Sync {
	/// Stable cache key for this provider's content.
	fn loadable_content_key(&self) -> String;

	/// Load the content shared by every provider with the same key.
	async fn load_content(&self) -> Result<LoadedContent, ProviderError>;

	/// Turn loaded content into secrets. Must not mutate the content.
	async fn provide_secrets(&self, content: &LoadedContent) -> Result<SecretMap, ProviderError>;
}

/// Type-erased content produced by [`SecretProvider::load_content`].
#[derive(Clone, Default)]
pub struct LoadedContent {
	inner: Option<Arc<dyn Any + Send + Sync>>,
}

impl LoadedContent {
	/// Content for providers that load nothing.
	pub fn none() -> Self {
		Self { inner: None }
	}

	pub fn new<T: Any + Send + Sync>(value: T) -> Self {
		Self {
			inner: Some(Arc::new(value)),
		}
	}

	pub fn is_none(&self) -> bool {
		self.inner.is_none()
	}

	/// Borrow the content as `T`, if that is what it holds.
	pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
		self.inner.as_deref().and_then(|v| v.downcast_ref::<T>())
	}
}

impl fmt::Debug for LoadedContent {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("LoadedContent")
			.field("loaded", &self.inner.is_some())
			.finish()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_downcast() {
		let content = LoadedContent::new(serde_json::json!({"a": 1}));
		assert!(content.downcast_ref::<serde_json::Value>().is_some());
		assert!(content.downcast_ref::<String>().is_none());
		assert!(!content.is_none());
	}

	#[test]
	fn test_none_content() {
		let content = LoadedContent::none();
		assert!(content.is_none());
		assert!(content.downcast_ref::<()>().is_none());
		assert_eq!(format!("{content:?}"), "LoadedContent { loaded: false }");
	}

	struct Fixed;

	#[async_trait]
	impl SecretProvider for Fixed {
		fn loadable_content_key(&self) -> String {
			NO_CONTENT_KEY.to_string()
		}

		async fn load_content(&self) -> Result<LoadedContent, ProviderError> {
			Ok(LoadedContent::none())
		}

		async fn provide_secrets(&self, _: &LoadedContent) -> Result<SecretMap, ProviderError> {
			Ok(SecretMap::from([("A".to_string(), SecretString::from("1"))]))
		}
	}

	#[tokio::test]
	async fn test_provider_factory_builds_fresh_instances() {
		let factory = provider_factory(|| Fixed);
		let first = factory();
		let second = factory();
		assert_eq!(first.loadable_content_key(), second.loadable_content_key());
		let secrets = first.provide_secrets(&LoadedContent::none()).await.unwrap();
		assert_eq!(secrets["A"].expose(), "1");
	}
}
