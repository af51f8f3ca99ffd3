// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration, merged across sources.

use serde::Deserialize;

use crate::sections::{HttpConfigLayer, LoggingConfigLayer, OidcConfigLayer, TenantSpec};

/// One source's view of the configuration. Unset fields defer to lower
/// precedence sources.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
	#[serde(default)]
	pub oidc: Option<OidcConfigLayer>,
	/// Replaced wholesale, never merged entry by entry.
	#[serde(default)]
	pub tenants: Option<Vec<TenantSpec>>,
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
		merge_section(&mut self.oidc, other.oidc, OidcConfigLayer::merge);
		if other.tenants.is_some() {
			self.tenants = other.tenants;
		}
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		(_, None) => {}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_merge_sections() {
		let mut base: ServerConfigLayer = toml::from_str(
			r#"
			[http]
			host = "127.0.0.1"
			port = 9000
			"#,
		)
		.unwrap();
		let overlay = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				host: None,
				port: Some(7000),
			}),
			..Default::default()
		};
		base.merge(overlay);
		let http = base.http.unwrap();
		assert_eq!(http.host.as_deref(), Some("127.0.0.1"));
		assert_eq!(http.port, Some(7000));
	}

	#[test]
	fn test_tenants_replaced_not_merged() {
		let mut base: ServerConfigLayer = toml::from_str(
			r#"
			[[tenants]]
			platform = "circleci"
			organization_id = "a"

			[[tenants]]
			platform = "circleci"
			organization_id = "b"
			"#,
		)
		.unwrap();
		base.merge(ServerConfigLayer::default());
		assert_eq!(base.tenants.as_ref().map(Vec::len), Some(2));

		let overlay: ServerConfigLayer = toml::from_str(
			r#"
			[[tenants]]
			platform = "github-actions"
			organization_id = "c"
			"#,
		)
		.unwrap();
		base.merge(overlay);
		let tenants = base.tenants.unwrap();
		assert_eq!(tenants.len(), 1);
		assert_eq!(tenants[0].organization_id, "c");
	}
}
