// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! The tokengate exchange pipeline.
//!
//! A caller presents an OIDC ID token. The [`ExchangeDispatcher`] walks the
//! configured tenants in order and asks each tenant's platform handler to
//! validate the token and filter the tenant's secret bindings down to the ones
//! the token's claims authorize. The first tenant that validates the token
//! wins. The authorized providers are then run by [`resolve_secrets`], which
//! loads shared content once per content key and merges every provider's
//! output into one map, failing on duplicate secret names.

pub mod aggregate;
pub mod claims;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod platform;
pub mod provider;

pub use aggregate::{resolve_secrets, ContentCache};
pub use claims::{BaseClaims, CircleCiClaims, GithubActionsClaims};
pub use config::{
	CircleCiFilter, CircleCiTenant, GithubActionsFilter, GithubActionsTenant, InvalidTenant,
	Platform, SecretBinding, TenantConfig, WILDCARD,
};
pub use dispatch::{AuthorizedProviders, ExchangeDispatcher, ExchangeOutcome};
pub use error::{ExchangeError, ProviderError};
pub use platform::{
	CircleCiHandler, GithubActionsHandler, InvalidHandler, PlatformEndpoints, PlatformHandler,
};
pub use provider::{
	provider_factory, LoadedContent, ProviderFactory, SecretMap, SecretProvider, NO_CONTENT_KEY,
};
