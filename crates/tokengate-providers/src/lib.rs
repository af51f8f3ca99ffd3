// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Secret providers for tokengate.
//!
//! Each type here implements [`tokengate_exchange::SecretProvider`]:
//!
//! - [`FileSecretProvider`] reads a JSON document from disk and maps it to
//!   secrets. Providers pointing at the same file share one read.
//! - [`GenericSecretProvider`] runs an async closure.
//! - [`EnvSecretProvider`] copies variables from the server's environment.
//! - [`GithubAppTokenProvider`] mints a GitHub App installation token narrowed
//!   to one repository.

pub mod env;
pub mod file;
pub mod generic;
pub mod github_app;

pub use env::{EnvSecretProvider, ENV_CONTENT_KEY};
pub use file::{json_pointer_transform, FileSecretProvider, FileTransform};
pub use generic::{GenericSecretProvider, GENERIC_CONTENT_KEY};
pub use github_app::{
	GithubAppClient, GithubAppConfig, GithubAppError, GithubAppTokenProvider, Installation,
	InstallationToken, InstallationTokenRequest, DEFAULT_TOKEN_SECRET_NAME,
};
