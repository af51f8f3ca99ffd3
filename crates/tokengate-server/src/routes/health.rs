// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Liveness HTTP handler.

use axum::{response::IntoResponse, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub alive: bool,
}

/// GET /healthcheck
pub async fn health_check() -> impl IntoResponse {
	Json(HealthResponse { alive: true })
}
