// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Application state and router.

use std::sync::Arc;
use std::time::Duration;

use axum::{
	routing::{get, post},
	Router,
};
use tokengate_exchange::{ExchangeDispatcher, PlatformEndpoints, TenantConfig};
use tokengate_oidc::TokenValidator;
use tokengate_server_config::ServerConfig;

use crate::error::StartupError;
use crate::routes;
use crate::tenants::build_tenants;

/// Shared state for every request. Read-only after startup.
#[derive(Debug, Clone)]
pub struct AppState {
	pub dispatcher: ExchangeDispatcher,
	pub tenants: Arc<Vec<TenantConfig>>,
}

impl AppState {
	pub fn new(dispatcher: ExchangeDispatcher, tenants: Vec<TenantConfig>) -> Self {
		Self {
			dispatcher,
			tenants: Arc::new(tenants),
		}
	}
}

/// Build the application state from loaded configuration.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, StartupError> {
	let timeout = Duration::from_secs(config.oidc.http_timeout_secs);
	let validator = TokenValidator::with_timeout(timeout)?;
	let dispatcher = ExchangeDispatcher::with_endpoints(
		validator,
		PlatformEndpoints {
			circleci_base_url: config.oidc.circleci_base_url.clone(),
			github_actions_issuer_url: config.oidc.github_actions_issuer_url.clone(),
		},
	);
	let tenants = build_tenants(&config.tenants)?;
	if tenants.is_empty() {
		tracing::warn!("no tenants configured; every exchange will be rejected");
	}
	Ok(AppState::new(dispatcher, tenants))
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/healthcheck", get(routes::health::health_check))
		.route("/exchange", post(routes::exchange::exchange_token))
		.with_state(state)
}
