// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Token-for-secrets exchange handler.
//!
//! `POST /exchange[?format=shell|powershell]`
//!
//! The token is read from a JSON body (`{"token": "..."}`) or, failing that,
//! from the `x-oidc-token` header.

use axum::{
	body::Bytes,
	extract::{Query, State},
	http::{header, HeaderMap},
	response::{IntoResponse, Response},
	Json,
};
use serde::Deserialize;
use tracing::{info, instrument};

use crate::api::AppState;
use crate::error::ServerError;
use crate::format::{exposed, render_statements, ResponseFormat};

pub const TOKEN_HEADER: &str = "x-oidc-token";

#[derive(Debug, Deserialize)]
pub struct ExchangeRequest {
	pub token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ExchangeQuery {
	pub format: Option<String>,
}

/// Pull the token from the body, then the header. Empty counts as absent.
fn extract_token(headers: &HeaderMap, body: &[u8]) -> Option<String> {
	let from_body = serde_json::from_slice::<ExchangeRequest>(body)
		.ok()
		.and_then(|request| request.token);
	let from_header = || {
		headers
			.get(TOKEN_HEADER)
			.and_then(|value| value.to_str().ok())
			.map(str::to_string)
	};

	from_body
		.filter(|token| !token.is_empty())
		.or_else(from_header)
		.filter(|token| !token.is_empty())
}

/// POST /exchange
#[instrument(skip_all)]
pub async fn exchange_token(
	State(state): State<AppState>,
	Query(query): Query<ExchangeQuery>,
	headers: HeaderMap,
	body: Bytes,
) -> Result<Response, ServerError> {
	info!("received secret exchange request");
	let token = extract_token(&headers, &body).ok_or(ServerError::MissingToken)?;

	let outcome = state.dispatcher.exchange(&state.tenants, &token).await?;
	info!(
		subject = %outcome.subject,
		secrets = ?outcome.secrets.keys().collect::<Vec<_>>(),
		"responding to secret exchange request"
	);

	let format = ResponseFormat::from_query(query.format.as_deref());
	if format.is_shell() {
		let statements = render_statements(&outcome.secrets, format)?;
		return Ok((
			[(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
			statements,
		)
			.into_response());
	}
	Ok(Json(exposed(&outcome.secrets)).into_response())
}
