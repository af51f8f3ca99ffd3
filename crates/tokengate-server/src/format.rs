// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Response rendering for exchanged secrets.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use regex::Regex;
use tokengate_exchange::SecretMap;

static SHELL_NAME_REGEX: LazyLock<Regex> =
	LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_]+$").unwrap());

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
	#[error("secret name \"{name}\" is not a valid shell variable name")]
	InvalidName { name: String },
}

/// How the `/exchange` response body is written.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ResponseFormat {
	#[default]
	Json,
	/// `export NAME="value"` lines.
	Shell,
	/// `$env:NAME = "value"` lines.
	PowerShell,
}

impl ResponseFormat {
	/// Map the `format` query parameter. Anything unrecognized means JSON.
	pub fn from_query(format: Option<&str>) -> Self {
		match format {
			Some("shell") => ResponseFormat::Shell,
			Some("powershell") => ResponseFormat::PowerShell,
			_ => ResponseFormat::Json,
		}
	}

	pub fn is_shell(&self) -> bool {
		!matches!(self, ResponseFormat::Json)
	}
}

/// Whether `name` can be used as a shell or PowerShell variable name.
pub fn is_shell_variable_name(name: &str) -> bool {
	SHELL_NAME_REGEX.is_match(name)
}

/// Render `secrets` as statements for `format`, one per line, values quoted as
/// JSON strings. Fails if any name is not a valid variable name.
pub fn render_statements(
	secrets: &SecretMap,
	format: ResponseFormat,
) -> Result<String, RenderError> {
	if let Some(name) = secrets.keys().find(|name| !is_shell_variable_name(name)) {
		return Err(RenderError::InvalidName { name: name.clone() });
	}

	let mut out = String::new();
	for (name, value) in secrets {
		let quoted = quote(value.expose());
		match format {
			ResponseFormat::PowerShell => out.push_str(&format!("$env:{name} = {quoted}\n")),
			_ => out.push_str(&format!("export {name}={quoted}\n")),
		}
	}
	Ok(out)
}

/// The secret map with values exposed, for the JSON response body.
pub fn exposed(secrets: &SecretMap) -> BTreeMap<&str, &str> {
	secrets
		.iter()
		.map(|(name, value)| (name.as_str(), value.expose().as_str()))
		.collect()
}

fn quote(value: &str) -> String {
	serde_json::Value::String(value.to_string()).to_string()
}
