// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the tokengate server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Tenant and secret binding declarations, validated when loaded
//! - Consistent environment variable naming (`TOKENGATE_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use tokengate_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}", config.socket_addr());
//! ```

pub mod error;
pub mod layer;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use sections::*;
pub use sources::{
	ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource, SYSTEM_CONFIG_PATH,
};

use std::path::PathBuf;

use tracing::{debug, info};

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub logging: LoggingConfig,
	pub oidc: OidcConfig,
	/// Tried in this order for every exchange.
	pub tenants: Vec<TenantSpec>,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`TOKENGATE_SERVER_*`)
/// 2. Config file (`/etc/tokengate/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(config_path: impl Into<PathBuf>) -> Result<ServerConfig, ConfigError> {
	load_from(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only. No tenants are configured.
pub fn load_config_from_env() -> Result<ServerConfig, ConfigError> {
	load_from(vec![Box::new(EnvSource)])
}

fn load_from(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		let layer = source.load()?;
		merged.merge(layer);
	}

	finalize(merged)
}

/// Finalize configuration layer into resolved config.
pub fn finalize(layer: ServerConfigLayer) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let logging = layer.logging.unwrap_or_default().finalize();
	let oidc = layer.oidc.unwrap_or_default().finalize();
	let mut tenants = layer.tenants.unwrap_or_default();

	validate_config(&oidc, &mut tenants)?;

	info!(
		host = %http.host,
		port = http.port,
		log_format = ?logging.format,
		circleci_base_url = %oidc.circleci_base_url,
		github_actions_issuer_url = %oidc.github_actions_issuer_url,
		tenants = tenants.len(),
		bindings = tenants.iter().map(|t| t.secrets.len()).sum::<usize>(),
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		logging,
		oidc,
		tenants,
	})
}

/// Validate cross-field configuration rules.
fn validate_config(oidc: &OidcConfig, tenants: &mut [TenantSpec]) -> Result<(), ConfigError> {
	if oidc.http_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"oidc.http_timeout_secs must be greater than zero".to_string(),
		));
	}

	for (index, tenant) in tenants.iter_mut().enumerate() {
		tenant.validate(index)?;
	}

	Ok(())
}
