// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Validation against a local fake issuer.
//!
//! Covers every rejection path (discovery, JWKS, kid, signature, algorithm,
//! audience, issuer, expiry) and the happy path.

use jsonwebtoken::Algorithm;
use serde_json::{json, Value};
use tokengate_oidc::testing::{issuer_key, now, rogue_key, FakeIssuer, TEST_KID};
use tokengate_oidc::{TokenValidator, ValidationError};

const ORG_ID: &str = "0b8a1f8e-0d0a-4d5e-9a53-3c1f2f7c9d11";
const PROJECT_ID: &str = "6c1e8f8a-31b1-4f34-8d43-2a3b7f0a9e22";
const CONTEXT_ID: &str = "f5d2b7a4-9c3e-4b1d-8e6f-1a2b3c4d5e33";

struct Fixture {
	issuer: FakeIssuer,
	validator: TokenValidator,
}

impl Fixture {
	async fn new() -> Self {
		let issuer = FakeIssuer::start().await;
		issuer.publish(&format!("/org/{ORG_ID}")).await;
		issuer.publish_without_jwks_uri("/no-metadata").await;
		issuer
			.publish_with_jwks("/org/bad-keys", json!({ "keys": "foo-lol" }))
			.await;
		issuer.publish_without_jwks_endpoint("/org/no-jwks").await;
		Self {
			issuer,
			validator: TokenValidator::new(reqwest::Client::new()),
		}
	}

	fn org_url(&self) -> String {
		self.issuer.discovery_url(&format!("/org/{ORG_ID}"))
	}

	fn claims(&self) -> Value {
		json!({
			"sub": format!("org/{ORG_ID}/project/{PROJECT_ID}/user/u-1"),
			"oidc.circleci.com/project-id": PROJECT_ID,
			"oidc.circleci.com/context-ids": [CONTEXT_ID],
			"iss": self.org_url(),
			"aud": ORG_ID,
			"iat": now(),
			"exp": now() + 60,
		})
	}

	async fn validate(&self, token: &str, url: &str) -> Result<Value, ValidationError> {
		self.validator.try_validate::<Value>(token, url).await
	}
}

#[tokio::test]
async fn empty_token_makes_no_requests() {
	let fixture = Fixture::new().await;
	let result = fixture.validator.validate::<Value>("", &fixture.org_url()).await;
	assert!(result.is_none());
	assert_eq!(fixture.issuer.request_count().await, 0);
}

#[tokio::test]
async fn unknown_discovery_url_is_rejected() {
	let fixture = Fixture::new().await;
	let url = fixture.issuer.discovery_url("/bad");
	let err = fixture.validate("token", &url).await.unwrap_err();
	assert!(matches!(err, ValidationError::Discovery { .. }));
}

#[tokio::test]
async fn unreachable_discovery_url_is_rejected() {
	let validator = TokenValidator::new(reqwest::Client::new());
	let result = validator
		.validate::<Value>("token", "http://127.0.0.1:9/org/nowhere")
		.await;
	assert!(result.is_none());
}

#[tokio::test]
async fn discovery_without_jwks_uri_is_rejected() {
	let fixture = Fixture::new().await;
	let url = fixture.issuer.discovery_url("/no-metadata");
	let err = fixture.validate("token", &url).await.unwrap_err();
	assert!(matches!(err, ValidationError::MissingJwksUri));
}

#[tokio::test]
async fn missing_jwks_endpoint_is_rejected() {
	let fixture = Fixture::new().await;
	let url = fixture.issuer.discovery_url("/org/no-jwks");
	let err = fixture.validate("token", &url).await.unwrap_err();
	assert!(matches!(err, ValidationError::JwksStatus { status: 404, .. }));
}

#[tokio::test]
async fn malformed_token_is_rejected() {
	let fixture = Fixture::new().await;
	let err = fixture.validate("token", &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::MalformedToken(_)));
}

#[tokio::test]
async fn malformed_keys_response_is_rejected() {
	let fixture = Fixture::new().await;
	let token = issuer_key().sign(&fixture.claims(), TEST_KID, Algorithm::RS256);
	let url = fixture.issuer.discovery_url("/org/bad-keys");
	let err = fixture.validate(&token, &url).await.unwrap_err();
	assert!(matches!(err, ValidationError::MalformedJwks(_)));
}

#[tokio::test]
async fn mismatching_kid_is_rejected() {
	let fixture = Fixture::new().await;
	let token = issuer_key().sign(&fixture.claims(), "bad-kid", Algorithm::RS256);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::KeyNotFound { .. }));
}

#[tokio::test]
async fn token_signed_by_another_key_is_rejected() {
	let fixture = Fixture::new().await;
	let token = rogue_key().sign(&fixture.claims(), TEST_KID, Algorithm::RS256);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::Verification(_)));
}

#[tokio::test]
async fn wrong_algorithm_is_rejected() {
	let fixture = Fixture::new().await;
	let token = issuer_key().sign(&fixture.claims(), TEST_KID, Algorithm::RS512);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::Verification(_)));
}

#[tokio::test]
async fn wrong_audience_is_rejected() {
	let fixture = Fixture::new().await;
	let mut claims = fixture.claims();
	claims["aud"] = json!("some-other-org");
	let token = issuer_key().sign(&claims, TEST_KID, Algorithm::RS256);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::Verification(_)));
}

#[tokio::test]
async fn wrong_issuer_is_rejected() {
	let fixture = Fixture::new().await;
	let mut claims = fixture.claims();
	claims["iss"] = json!(fixture.issuer.discovery_url("/org/someone-else"));
	let token = issuer_key().sign(&claims, TEST_KID, Algorithm::RS256);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::Verification(_)));
}

#[tokio::test]
async fn expired_token_is_rejected() {
	let fixture = Fixture::new().await;
	let mut claims = fixture.claims();
	claims["iat"] = json!(now() - 600);
	claims["exp"] = json!(now() - 300);
	let token = issuer_key().sign(&claims, TEST_KID, Algorithm::RS256);
	let err = fixture.validate(&token, &fixture.org_url()).await.unwrap_err();
	assert!(matches!(err, ValidationError::Verification(_)));
}

#[tokio::test]
async fn token_without_expiry_is_rejected() {
	let fixture = Fixture::new().await;
	let mut claims = fixture.claims();
	claims.as_object_mut().unwrap().remove("exp");
	let token = issuer_key().sign(&claims, TEST_KID, Algorithm::RS256);
	assert!(fixture.validate(&token, &fixture.org_url()).await.is_err());
}

#[tokio::test]
async fn valid_token_returns_claims() {
	let fixture = Fixture::new().await;
	let claims = fixture.claims();
	let token = issuer_key().sign(&claims, TEST_KID, Algorithm::RS256);
	let validated = fixture
		.validator
		.validate::<Value>(&token, &fixture.org_url())
		.await
		.expect("token should validate");
	assert_eq!(validated, claims);
}

#[tokio::test]
async fn validation_is_repeatable() {
	let fixture = Fixture::new().await;
	let token = issuer_key().sign(&fixture.claims(), TEST_KID, Algorithm::RS256);
	let first = fixture.validator.validate::<Value>(&token, &fixture.org_url()).await;
	let second = fixture.validator.validate::<Value>(&token, &fixture.org_url()).await;
	assert!(first.is_some());
	assert_eq!(first, second);
	// Two discovery + two JWKS fetches: nothing is cached between calls.
	assert_eq!(fixture.issuer.request_count().await, 4);
}

#[tokio::test]
async fn typed_claims_that_do_not_match_are_rejected() {
	#[derive(Debug, serde::Deserialize)]
	#[allow(dead_code)]
	struct NeedsRepository {
		repository_id: String,
	}

	let fixture = Fixture::new().await;
	let token = issuer_key().sign(&fixture.claims(), TEST_KID, Algorithm::RS256);
	let result = fixture
		.validator
		.validate::<NeedsRepository>(&token, &fixture.org_url())
		.await;
	assert!(result.is_none());
}
