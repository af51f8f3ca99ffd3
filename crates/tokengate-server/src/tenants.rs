// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Turns configured tenants into the exchange pipeline's tenant model.

use std::sync::Arc;

use tokengate_exchange::{
	provider_factory, CircleCiFilter, CircleCiTenant, GithubActionsFilter, GithubActionsTenant,
	InvalidTenant, ProviderFactory, SecretBinding, TenantConfig,
};
use tokengate_providers::{
	json_pointer_transform, EnvSecretProvider, FileSecretProvider, GithubAppClient,
	GithubAppConfig, GithubAppTokenProvider,
};
use tokengate_server_config::{BindingSpec, PlatformKind, ProviderSpec, TenantSpec};
use tracing::info;

use crate::error::StartupError;

/// Build tenants in configured order. Provider state that can be shared
/// (parsed file transforms, GitHub App clients) is built once here; each
/// request still gets fresh provider instances from the factories.
pub fn build_tenants(specs: &[TenantSpec]) -> Result<Vec<TenantConfig>, StartupError> {
	let tenants = specs
		.iter()
		.enumerate()
		.map(|(index, spec)| build_tenant(index, spec))
		.collect::<Result<Vec<_>, _>>()?;

	for tenant in &tenants {
		info!(tenant = %tenant, bindings = tenant.binding_count(), "configured tenant");
	}
	Ok(tenants)
}

fn build_tenant(index: usize, spec: &TenantSpec) -> Result<TenantConfig, StartupError> {
	let organization_id = spec.organization_id.clone();
	Ok(match spec.platform {
		PlatformKind::CircleCi => TenantConfig::CircleCi(CircleCiTenant {
			organization_id,
			secrets: bindings(index, &spec.secrets, |binding| CircleCiFilter {
				project_ids: binding.project_ids.clone(),
				context_ids: binding.context_ids.clone(),
			})?,
		}),
		PlatformKind::GithubActions => TenantConfig::GithubActions(GithubActionsTenant {
			organization_id,
			secrets: bindings(index, &spec.secrets, |binding| GithubActionsFilter {
				repository_ids: binding.repository_ids.clone(),
				environments: binding.environments.clone(),
			})?,
		}),
		PlatformKind::Invalid => TenantConfig::Invalid(InvalidTenant { organization_id }),
	})
}

fn bindings<F>(
	tenant: usize,
	specs: &[BindingSpec],
	filters: impl Fn(&BindingSpec) -> F,
) -> Result<Vec<SecretBinding<F>>, StartupError> {
	specs
		.iter()
		.enumerate()
		.map(|(binding, spec)| {
			let provider = build_provider(tenant, binding, &spec.provider)?;
			Ok(SecretBinding::new(provider, filters(spec)))
		})
		.collect()
}

fn build_provider(
	tenant: usize,
	binding: usize,
	spec: &ProviderSpec,
) -> Result<ProviderFactory, StartupError> {
	match spec {
		ProviderSpec::File { path, secrets } => {
			let template = FileSecretProvider::new(path, json_pointer_transform(secrets.clone()))
				.map_err(|source| StartupError::Provider {
					tenant,
					binding,
					source,
				})?;
			Ok(provider_factory(move || template.clone()))
		}
		ProviderSpec::Env { secrets } => {
			let vars = secrets.clone();
			Ok(provider_factory(move || EnvSecretProvider::new(vars.clone())))
		}
		ProviderSpec::GithubApp {
			app_id,
			key,
			base_url,
			owner,
			repo,
			permissions,
			secret_name,
		} => {
			let github_app = |source| StartupError::GithubApp {
				tenant,
				binding,
				source,
			};
			// Resolved to `private_key` when the configuration was finalized.
			let pem = key
				.private_key
				.clone()
				.ok_or(StartupError::UnresolvedKey { tenant, binding })?;
			let mut config = GithubAppConfig::new(*app_id, pem).map_err(github_app)?;
			if let Some(base_url) = base_url {
				config = config.with_base_url(base_url).map_err(github_app)?;
			}
			let client = Arc::new(GithubAppClient::new(config).map_err(github_app)?);

			let mut template = GithubAppTokenProvider::new(
				client,
				owner.clone(),
				repo.clone(),
				permissions.clone(),
			);
			if let Some(name) = secret_name {
				template = template.with_secret_name(name.clone());
			}
			Ok(provider_factory(move || template.clone()))
		}
	}
}
