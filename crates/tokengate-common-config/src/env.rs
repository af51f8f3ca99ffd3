// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret loading from environment variables.
//!
//! A secret named `FOO` is read from `FOO_FILE` (a path whose contents are the
//! secret) when that variable is set, otherwise from `FOO` itself. The file
//! form is what container orchestrators mount.

use std::path::PathBuf;

use thiserror::Error;
use tokengate_common_secret::SecretString;

/// Errors while loading a secret from the environment.
#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("{var} points at {path} which could not be read: {source}")]
	FileRead {
		var: String,
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("both {name} and {name}_FILE are set; use only one")]
	Ambiguous { name: String },
}

/// Error for secrets that must be present.
#[derive(Debug, Error)]
pub enum RequiredSecretError {
	#[error("{0} is not set")]
	Missing(String),

	#[error(transparent)]
	Env(#[from] SecretEnvError),
}

/// Load an optional secret from `name` or `name_FILE`.
///
/// Trailing newlines are stripped from file contents.
pub fn load_secret_env(name: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{name}_FILE");
	let direct = std::env::var(name).ok();
	let file = std::env::var(&file_var).ok().filter(|s| !s.is_empty());

	match (direct, file) {
		(Some(_), Some(_)) => Err(SecretEnvError::Ambiguous {
			name: name.to_string(),
		}),
		(None, Some(path)) => {
			let path = PathBuf::from(path);
			let contents =
				std::fs::read_to_string(&path).map_err(|source| SecretEnvError::FileRead {
					var: file_var,
					path,
					source,
				})?;
			Ok(Some(SecretString::new(
				contents.trim_end_matches(['\r', '\n']).to_string(),
			)))
		}
		(Some(value), None) => Ok(Some(SecretString::new(value))),
		(None, None) => Ok(None),
	}
}

/// Load a secret that must be present.
pub fn require_secret_env(name: &str) -> Result<SecretString, RequiredSecretError> {
	load_secret_env(name)?.ok_or_else(|| RequiredSecretError::Missing(name.to_string()))
}
