// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secrets read from a JSON file on the server.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokengate_common_secret::SecretString;
use tokengate_exchange::{LoadedContent, ProviderError, SecretMap, SecretProvider};
use tracing::{debug, instrument};

/// Maps the parsed file to secrets.
pub type FileTransform = Arc<dyn Fn(&Value) -> Result<SecretMap, ProviderError> + Send + Sync>;

/// Reads `path` once per request and hands the parsed JSON to a transform.
///
/// Every provider for the same path shares one read.
#[derive(Clone)]
pub struct FileSecretProvider {
	path: PathBuf,
	transform: FileTransform,
}

impl FileSecretProvider {
	/// Fails if `path` is not absolute.
	pub fn new<F>(path: impl Into<PathBuf>, transform: F) -> Result<Self, ProviderError>
	where
		F: Fn(&Value) -> Result<SecretMap, ProviderError> + Send + Sync + 'static,
	{
		let path = path.into();
		if !path.is_absolute() {
			return Err(ProviderError::failed(format!(
				"path in FileSecretProvider must be absolute: {}",
				path.display()
			)));
		}
		Ok(Self {
			path,
			transform: Arc::new(transform),
		})
	}

	pub fn path(&self) -> &Path {
		&self.path
	}
}

impl fmt::Debug for FileSecretProvider {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("FileSecretProvider")
			.field("path", &self.path)
			.finish_non_exhaustive()
	}
}

#[async_trait]
impl SecretProvider for FileSecretProvider {
	fn loadable_content_key(&self) -> String {
		format!("file-secret::{}", self.path.display())
	}

	#[instrument(skip(self), fields(path = %self.path.display()))]
	async fn load_content(&self) -> Result<LoadedContent, ProviderError> {
		let raw = tokio::fs::read(&self.path).await?;
		let document: Value = serde_json::from_slice(&raw)?;
		debug!(bytes = raw.len(), "loaded secret file");
		Ok(LoadedContent::new(document))
	}

	async fn provide_secrets(&self, content: &LoadedContent) -> Result<SecretMap, ProviderError> {
		let document = content
			.downcast_ref::<Value>()
			.ok_or_else(|| ProviderError::ContentType {
				key: self.loadable_content_key(),
			})?;
		(self.transform)(document)
	}
}

/// A transform that looks up each secret by JSON pointer (RFC 6901).
///
/// String values are used as-is; numbers and booleans are rendered as JSON.
/// A missing pointer, or one that lands on an object, array or null, fails.
pub fn json_pointer_transform(
	pointers: BTreeMap<String, String>,
) -> impl Fn(&Value) -> Result<SecretMap, ProviderError> + Send + Sync + 'static {
	move |document: &Value| {
		pointers
			.iter()
			.map(|(name, pointer)| {
				let value = match document.pointer(pointer) {
					Some(Value::String(s)) => s.clone(),
					Some(v @ (Value::Number(_) | Value::Bool(_))) => v.to_string(),
					Some(_) => {
						return Err(ProviderError::failed(format!(
							"value at \"{pointer}\" for secret {name} is not a scalar"
						)))
					}
					None => {
						return Err(ProviderError::failed(format!(
							"no value at \"{pointer}\" for secret {name}"
						)))
					}
				};
				Ok((name.clone(), SecretString::from(value)))
			})
			.collect()
	}
}
