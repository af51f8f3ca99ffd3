// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod logging;
mod oidc;
mod tenants;

pub use http::{HttpConfig, HttpConfigLayer};
pub use logging::{LogFormat, LoggingConfig, LoggingConfigLayer};
pub use oidc::{OidcConfig, OidcConfigLayer};
pub use tenants::{BindingSpec, GithubAppKeySource, PlatformKind, ProviderSpec, TenantSpec};
