// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret provider dispatch and aggregation.
//!
//! Runs in two barriers. First every distinct content key is loaded
//! concurrently; then every provider produces its secrets concurrently. The
//! first failure in either phase fails the request and drops the sibling
//! operations still in flight. No partial result is ever returned.

use std::collections::{HashMap, HashSet};

use futures::future::try_join_all;
use tracing::{debug, instrument};

use crate::error::{ExchangeError, ExchangeResult};
use crate::provider::{LoadedContent, ProviderFactory, SecretMap, SecretProvider};

/// Content loaded for one request, keyed by content key.
///
/// Lives only as long as the request that built it.
#[derive(Debug, Default)]
pub struct ContentCache {
	entries: HashMap<String, LoadedContent>,
}

impl ContentCache {
	/// Load content for every distinct key among `providers`.
	///
	/// The first provider to declare a key is the one whose
	/// [`SecretProvider::load_content`] runs for it.
	pub async fn load(providers: &[Box<dyn SecretProvider>]) -> ExchangeResult<Self> {
		let mut seen = HashSet::new();
		let loaders = providers
			.iter()
			.map(|provider| (provider.loadable_content_key(), provider))
			.filter(|(key, _)| seen.insert(key.clone()))
			.map(|(key, provider)| async move {
				match provider.load_content().await {
					Ok(content) => Ok((key, content)),
					Err(source) => Err(ExchangeError::ContentLoadFailed { key, source }),
				}
			})
			.collect::<Vec<_>>();

		debug!(distinct_keys = loaders.len(), "loading shared provider content");
		let entries = try_join_all(loaders).await?.into_iter().collect();
		Ok(Self { entries })
	}

	pub fn get(&self, key: &str) -> Option<&LoadedContent> {
		self.entries.get(key)
	}

	pub fn len(&self) -> usize {
		self.entries.len()
	}

	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}
}

/// Run every provider built by `factories` and merge their secrets.
///
/// Fails with [`ExchangeError::KeyCollision`] if two providers produce the
/// same secret name.
#[instrument(skip_all, fields(providers = factories.len()))]
pub async fn resolve_secrets(factories: &[ProviderFactory]) -> ExchangeResult<SecretMap> {
	let providers: Vec<Box<dyn SecretProvider>> =
		factories.iter().map(|factory| factory()).collect();

	let cache = ContentCache::load(&providers).await?;

	let empty = LoadedContent::none();
	let productions = providers.iter().map(|provider| {
		let key = provider.loadable_content_key();
		let content = cache.get(&key).unwrap_or(&empty);
		async move {
			provider
				.provide_secrets(content)
				.await
				.map_err(|source| ExchangeError::SecretProductionFailed { key, source })
		}
	});
	let produced = try_join_all(productions).await?;

	merge_secrets(produced)
}

/// Merge per-provider results in provider order, refusing duplicate names.
pub(crate) fn merge_secrets(produced: Vec<SecretMap>) -> ExchangeResult<SecretMap> {
	let mut merged = SecretMap::new();
	for secrets in produced {
		for (name, value) in secrets {
			if merged.contains_key(&name) {
				return Err(ExchangeError::KeyCollision { name });
			}
			merged.insert(name, value);
		}
	}
	Ok(merged)
}
