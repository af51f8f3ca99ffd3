// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! GitHub App installation tokens.
//!
//! The provider authenticates as a GitHub App, finds the app's installation
//! on the target repository, and asks for an installation token scoped to
//! that one repository and the configured permissions.

mod client;
mod config;
mod error;
mod jwt;
mod provider;
mod types;

pub use client::GithubAppClient;
pub use config::GithubAppConfig;
pub use error::GithubAppError;
pub use jwt::generate_app_jwt;
pub use provider::{GithubAppTokenProvider, DEFAULT_TOKEN_SECRET_NAME};
pub use types::{Installation, InstallationAccount, InstallationToken, InstallationTokenRequest};
