// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! A fake OIDC issuer for tests.
//!
//! Serves discovery documents and JWKS from a local [`MockServer`] and signs
//! tokens with RSA keys generated once per test binary.

use std::sync::OnceLock;
use std::time::{SystemTime, UNIX_EPOCH};

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use rsa::pkcs8::{EncodePrivateKey, LineEnding};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// `kid` under which the issuer key is published.
pub const TEST_KID: &str = "test-key";

/// An RSA key pair usable for signing test tokens.
pub struct TestKey {
	encoding: EncodingKey,
	n: String,
	e: String,
}

impl TestKey {
	fn generate() -> Self {
		let mut rng = rand::thread_rng();
		let private_key = RsaPrivateKey::new(&mut rng, 2048).expect("generate RSA key");
		let pem = private_key
			.to_pkcs8_pem(LineEnding::LF)
			.expect("encode RSA key as PEM");
		let encoding = EncodingKey::from_rsa_pem(pem.as_bytes()).expect("load RSA PEM");
		let public_key = private_key.to_public_key();
		Self {
			encoding,
			n: URL_SAFE_NO_PAD.encode(public_key.n().to_bytes_be()),
			e: URL_SAFE_NO_PAD.encode(public_key.e().to_bytes_be()),
		}
	}

	/// The public half as a JWK carrying `kid`.
	pub fn jwk(&self, kid: &str) -> Value {
		json!({
			"kty": "RSA",
			"use": "sig",
			"alg": "RS256",
			"kid": kid,
			"n": self.n,
			"e": self.e,
		})
	}

	/// Sign `claims` with the given header `kid` and algorithm.
	pub fn sign(&self, claims: &Value, kid: &str, algorithm: Algorithm) -> String {
		let mut header = Header::new(algorithm);
		header.kid = Some(kid.to_string());
		encode(&header, claims, &self.encoding).expect("sign test token")
	}
}

/// The key the fake issuer publishes.
pub fn issuer_key() -> &'static TestKey {
	static KEY: OnceLock<TestKey> = OnceLock::new();
	KEY.get_or_init(TestKey::generate)
}

/// A key the fake issuer knows nothing about.
pub fn rogue_key() -> &'static TestKey {
	static KEY: OnceLock<TestKey> = OnceLock::new();
	KEY.get_or_init(TestKey::generate)
}

/// Seconds since the epoch.
pub fn now() -> u64 {
	SystemTime::now()
		.duration_since(UNIX_EPOCH)
		.map(|d| d.as_secs())
		.unwrap_or_default()
}

/// A local OIDC issuer.
pub struct FakeIssuer {
	server: MockServer,
}

impl FakeIssuer {
	pub async fn start() -> Self {
		Self {
			server: MockServer::start().await,
		}
	}

	/// Base URI of the server, without trailing slash.
	pub fn uri(&self) -> String {
		self.server.uri()
	}

	/// Discovery URL for an issuer rooted at `issuer_path` (e.g. `/org/abc`).
	pub fn discovery_url(&self, issuer_path: &str) -> String {
		format!("{}{}", self.uri(), issuer_path)
	}

	/// Publish a well-formed issuer at `issuer_path` whose JWKS holds the issuer key.
	pub async fn publish(&self, issuer_path: &str) {
		self.publish_with_jwks(issuer_path, json!({ "keys": [issuer_key().jwk(TEST_KID)] }))
			.await;
	}

	/// Publish an issuer at `issuer_path` whose JWKS endpoint serves `jwks`.
	pub async fn publish_with_jwks(&self, issuer_path: &str, jwks: Value) {
		let jwks_path = format!("{issuer_path}/.well-known/jwks-pub.json");
		self.publish_discovery(issuer_path, true).await;
		Mock::given(method("GET"))
			.and(path(jwks_path))
			.respond_with(ResponseTemplate::new(200).set_body_json(jwks))
			.mount(&self.server)
			.await;
	}

	/// Publish only a discovery document; its JWKS endpoint is never mounted.
	pub async fn publish_without_jwks_endpoint(&self, issuer_path: &str) {
		self.publish_discovery(issuer_path, true).await;
	}

	/// Publish a discovery document that lacks `jwks_uri`.
	pub async fn publish_without_jwks_uri(&self, issuer_path: &str) {
		self.publish_discovery(issuer_path, false).await;
	}

	async fn publish_discovery(&self, issuer_path: &str, with_jwks_uri: bool) {
		let issuer = self.discovery_url(issuer_path);
		let mut document = json!({
			"issuer": issuer,
			"response_types_supported": ["id_token"],
			"subject_types_supported": ["public", "pairwise"],
			"scopes_supported": ["openid"],
			"id_token_signing_alg_values_supported": ["RS256"],
		});
		if with_jwks_uri {
			document["jwks_uri"] = json!(format!("{issuer}/.well-known/jwks-pub.json"));
		}

		Mock::given(method("GET"))
			.and(path(format!("{issuer_path}/.well-known/openid-configuration")))
			.respond_with(ResponseTemplate::new(200).set_body_json(document))
			.mount(&self.server)
			.await;
	}

	/// Requests the server has received so far.
	pub async fn request_count(&self) -> usize {
		self.server
			.received_requests()
			.await
			.map(|r| r.len())
			.unwrap_or_default()
	}
}
