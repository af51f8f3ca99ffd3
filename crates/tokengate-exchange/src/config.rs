// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tenant configuration: which organizations on which platforms may exchange
//! tokens, and under what claims each secret binding applies.
//!
//! Built once at startup and never mutated.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::provider::ProviderFactory;

/// Filter value that disables a context or environment check.
pub const WILDCARD: &str = "*";

/// Identity platforms a tenant can be configured for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Platform {
	#[serde(rename = "circleci")]
	CircleCi,
	GithubActions,
	Invalid,
}

impl Platform {
	pub fn as_str(&self) -> &'static str {
		match self {
			Platform::CircleCi => "circleci",
			Platform::GithubActions => "github-actions",
			Platform::Invalid => "invalid",
		}
	}
}

impl fmt::Display for Platform {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// One secret provider and the claims under which it may be handed out.
#[derive(Clone)]
pub struct SecretBinding<F> {
	pub provider: ProviderFactory,
	pub filters: F,
}

impl<F> SecretBinding<F> {
	pub fn new(provider: ProviderFactory, filters: F) -> Self {
		Self { provider, filters }
	}
}

impl<F: fmt::Debug> fmt::Debug for SecretBinding<F> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SecretBinding")
			.field("filters", &self.filters)
			.finish_non_exhaustive()
	}
}

/// CircleCI binding filter: project ids, and context ids or [`WILDCARD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircleCiFilter {
	pub project_ids: Vec<String>,
	pub context_ids: Vec<String>,
}

/// GitHub Actions binding filter: repository ids, and environments or [`WILDCARD`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GithubActionsFilter {
	pub repository_ids: Vec<String>,
	pub environments: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct CircleCiTenant {
	pub organization_id: String,
	pub secrets: Vec<SecretBinding<CircleCiFilter>>,
}

#[derive(Debug, Clone)]
pub struct GithubActionsTenant {
	/// Numeric id of the GitHub organization, as carried in `repository_owner_id`.
	pub organization_id: String,
	pub secrets: Vec<SecretBinding<GithubActionsFilter>>,
}

/// A tenant on an unrecognized platform. Never authorizes anything.
#[derive(Debug, Clone)]
pub struct InvalidTenant {
	pub organization_id: String,
}

/// One organization/platform pairing. Tenants are tried in configured order.
#[derive(Debug, Clone)]
pub enum TenantConfig {
	CircleCi(CircleCiTenant),
	GithubActions(GithubActionsTenant),
	Invalid(InvalidTenant),
}

impl TenantConfig {
	pub fn platform(&self) -> Platform {
		match self {
			TenantConfig::CircleCi(_) => Platform::CircleCi,
			TenantConfig::GithubActions(_) => Platform::GithubActions,
			TenantConfig::Invalid(_) => Platform::Invalid,
		}
	}

	pub fn organization_id(&self) -> &str {
		match self {
			TenantConfig::CircleCi(t) => &t.organization_id,
			TenantConfig::GithubActions(t) => &t.organization_id,
			TenantConfig::Invalid(t) => &t.organization_id,
		}
	}

	pub fn binding_count(&self) -> usize {
		match self {
			TenantConfig::CircleCi(t) => t.secrets.len(),
			TenantConfig::GithubActions(t) => t.secrets.len(),
			TenantConfig::Invalid(_) => 0,
		}
	}
}

impl fmt::Display for TenantConfig {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{}/{}", self.platform(), self.organization_id())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_platform_serde_names() {
		let parsed: Vec<Platform> =
			serde_json::from_str(r#"["circleci","github-actions","invalid"]"#).unwrap();
		assert_eq!(
			parsed,
			vec![Platform::CircleCi, Platform::GithubActions, Platform::Invalid]
		);
		for platform in parsed {
			assert_eq!(
				serde_json::to_string(&platform).unwrap(),
				format!("\"{}\"", platform.as_str())
			);
		}
	}

	#[test]
	fn test_tenant_display() {
		let tenant = TenantConfig::Invalid(InvalidTenant {
			organization_id: "org-1".to_string(),
		});
		assert_eq!(tenant.to_string(), "invalid/org-1");
		assert_eq!(tenant.binding_count(), 0);
	}
}
