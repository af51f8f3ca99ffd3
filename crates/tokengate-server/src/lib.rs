// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Tokengate HTTP server.
//!
//! Accepts an OIDC ID token from a CI job on `POST /exchange` and answers
//! with the secrets the token's claims are authorized for, as JSON or as
//! shell/PowerShell statements.

pub mod api;
pub mod error;
pub mod format;
pub mod routes;
pub mod tenants;

pub use api::{create_app_state, create_router, AppState};
pub use error::{ServerError, StartupError};
pub use format::{ResponseFormat, RenderError};
pub use tenants::build_tenants;
