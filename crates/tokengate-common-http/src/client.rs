// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Timeout applied by [`build_client`] when the caller has no opinion.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a new HTTP client builder with the standard tokengate User-Agent.
///
/// Use this when you need to customize the client further.
///
/// # Example
/// ```ignore
/// let client = tokengate_common_http::builder()
///     .timeout(Duration::from_secs(30))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder().user_agent(user_agent())
}

/// Creates a new HTTP client with the given timeout and the standard User-Agent.
pub fn build_client(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder().timeout(timeout).build()
}

/// Returns the standard tokengate User-Agent string.
///
/// Format: `tokengate/{version}`
pub fn user_agent() -> String {
	format!("tokengate/{}", env!("CARGO_PKG_VERSION"))
}
