// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for tokengate.
//!
//! Every outbound call (OIDC discovery, JWKS fetch, GitHub API) goes through a
//! client built here so they all carry the same User-Agent. No retry helpers
//! live here: the exchange pipeline never retries.

mod client;

pub use client::{build_client, builder, user_agent, DEFAULT_TIMEOUT};
