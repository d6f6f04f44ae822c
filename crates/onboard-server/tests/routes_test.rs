// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use onboard_common_secret::SecretString;
use onboard_server::{create_app_state, create_router};
use onboard_server_config::ServerConfig;
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const ADMIN: &str = "/admin/realms/tenants";

fn app(server: &MockServer) -> Router {
	let mut config = ServerConfig::default();
	config.keycloak.url = server.uri();
	config.keycloak.realm = "tenants".to_string();
	config.keycloak.admin_password = SecretString::from("admin-password");
	config.keycloak.request_timeout_secs = 5;
	create_router(create_app_state(&config).unwrap())
}

async fn mount_token(server: &MockServer) {
	Mock::given(method("POST"))
		.and(path("/realms/tenants/protocol/openid-connect/token"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"access_token": "admin-token",
			"expires_in": 300
		})))
		.mount(server)
		.await;
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
	let builder = Request::builder().method(method).uri(uri);
	let request = match body {
		Some(body) => builder
			.header("content-type", "application/json")
			.body(Body::from(body.to_string()))
			.unwrap(),
		None => builder.body(Body::empty()).unwrap(),
	};

	let response = app.oneshot(request).await.unwrap();
	let status = response.status();
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	let value = if bytes.is_empty() {
		Value::Null
	} else {
		serde_json::from_slice(&bytes).unwrap()
	};
	(status, value)
}

#[tokio::test]
async fn health_reports_ok() {
	let server = MockServer::start().await;
	let (status, body) = send(app(&server), Method::GET, "/health", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body["status"], "ok");
	assert!(body["version"].is_string());
}

#[tokio::test]
async fn invalid_email_is_rejected_before_any_upstream_call() {
	let server = MockServer::start().await;
	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user",
		Some(json!({"email": "not-an-email", "password": "Temp#1234"})),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["success"], false);
	assert_eq!(body["message"], "Invalid email format");
	assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
	let server = MockServer::start().await;
	let request = Request::builder()
		.method(Method::POST)
		.uri("/api/user")
		.header("content-type", "application/json")
		.body(Body::from("{not json"))
		.unwrap();

	let response = app(&server).oneshot(request).await.unwrap();
	assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn token_failure_is_internal_error() {
	let server = MockServer::start().await;
	Mock::given(method("POST"))
		.and(path("/realms/tenants/protocol/openid-connect/token"))
		.respond_with(ResponseTemplate::new(401).set_body_json(json!({
			"error": "invalid_grant",
			"error_description": "Invalid user credentials"
		})))
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user",
		Some(json!({"email": "alice@acme.com", "password": "Temp#1234"})),
	)
	.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["success"], false);
}

#[tokio::test]
async fn first_user_of_new_tenant_becomes_owner() {
	let server = MockServer::start().await;
	mount_token(&server).await;

	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations")))
		.and(query_param("search", "acme"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.up_to_n_times(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations")))
		.and(query_param("search", "acme"))
		.respond_with(
			ResponseTemplate::new(200).set_body_json(json!([{"id": "org-1", "name": "acme"}])),
		)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations")))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/organizations")))
		.respond_with(ResponseTemplate::new(201))
		.expect(1)
		.mount(&server)
		.await;

	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/clients")))
		.and(query_param("clientId", "client-acme"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/clients")))
		.respond_with(ResponseTemplate::new(201).insert_header(
			"Location",
			format!("{}{ADMIN}/clients/c-uuid", server.uri()).as_str(),
		))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/clients/c-uuid/client-secret")))
		.respond_with(
			ResponseTemplate::new(200)
				.set_body_json(json!({"type": "secret", "value": "client-secret-value"})),
		)
		.mount(&server)
		.await;
	for (name, id) in [("owner", "r-owner"), ("developer", "r-dev"), ("reader", "r-reader")] {
		Mock::given(method("GET"))
			.and(path(format!("{ADMIN}/clients/c-uuid/roles/{name}")))
			.respond_with(ResponseTemplate::new(200).set_body_json(json!({
				"id": id,
				"name": name,
				"description": null
			})))
			.mount(&server)
			.await;
	}

	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/users")))
		.and(query_param("email", "alice@acme.com"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/users")))
		.and(body_string_contains("\"emailVerified\":true"))
		.respond_with(ResponseTemplate::new(201).insert_header(
			"Location",
			format!("{}{ADMIN}/users/u-1", server.uri()).as_str(),
		))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/users/u-1")))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!({
			"id": "u-1",
			"username": "alice@acme.com",
			"email": "alice@acme.com",
			"firstName": "Alice",
			"lastName": "Smith",
			"enabled": true,
			"emailVerified": true
		})))
		.mount(&server)
		.await;

	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/organizations/org-1/members")))
		.respond_with(ResponseTemplate::new(201))
		.expect(1)
		.mount(&server)
		.await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/users/u-1/role-mappings/clients/c-uuid")))
		.and(body_string_contains("r-owner"))
		.respond_with(ResponseTemplate::new(204))
		.expect(1)
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user",
		Some(json!({
			"email": "alice@acme.com",
			"firstName": "Alice",
			"lastName": "Smith",
			"password": "Temp#1234"
		})),
	)
	.await;

	assert_eq!(status, StatusCode::CREATED);
	assert_eq!(body["success"], true);
	assert_eq!(body["organization"]["id"], "org-1");
	assert_eq!(body["organization"]["existedBefore"], false);
	assert_eq!(body["organization"]["invited"], false);
	assert_eq!(body["client"]["clientUUID"], "c-uuid");
	assert_eq!(body["client"]["clientId"], "client-acme");
	assert_eq!(
		body["clientRoles"]["roles"][0]["description"],
		"Organization owner with full access"
	);
	assert_eq!(body["user"]["id"], "u-1");
	assert_eq!(body["user"]["isOwner"], true);

	let rendered = body.to_string();
	assert!(!rendered.contains("client-secret-value"));
	assert!(!rendered.contains("Temp#1234"));
}

#[tokio::test]
async fn disabled_organizations_feature_is_bad_request() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations")))
		.respond_with(ResponseTemplate::new(404))
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user",
		Some(json!({"email": "alice@acme.com", "password": "Temp#1234"})),
	)
	.await;

	assert_eq!(status, StatusCode::BAD_REQUEST);
	assert_eq!(body["message"], "Organizations feature is not enabled");
}

#[tokio::test]
async fn is_exists_reports_existing_user() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/users")))
		.and(query_param("email", "alice@acme.com"))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([
			{"id": "u-1", "username": "alice@acme.com", "email": "alice@acme.com"}
		])))
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user/is-exists",
		Some(json!({"email": "alice@acme.com"})),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"success": true, "message": "User exists"}));
}

#[tokio::test]
async fn rejected_role_assignment_is_internal_error() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/users/u-1/role-mappings/clients/c-1")))
		.respond_with(ResponseTemplate::new(404).set_body_json(json!({
			"error": "Role not found"
		})))
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user/assign-client-role",
		Some(json!({
			"userId": "u-1",
			"clientUUID": "c-1",
			"roles": [{"id": "r-1", "name": "owner"}]
		})),
	)
	.await;

	assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
	assert_eq!(body["success"], false);
	assert!(body["message"].as_str().unwrap().contains("Role not found"));
}

#[tokio::test]
async fn successful_role_assignment() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("POST"))
		.and(path(format!("{ADMIN}/users/u-1/role-mappings/clients/c-1")))
		.respond_with(ResponseTemplate::new(204))
		.mount(&server)
		.await;

	let (status, body) = send(
		app(&server),
		Method::POST,
		"/api/user/assign-client-role",
		Some(json!({
			"userId": "u-1",
			"clientUUID": "c-1",
			"roles": [{"id": "r-1", "name": "owner"}]
		})),
	)
	.await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body, json!({"success": true, "message": "Role assigned successfully"}));
}

#[tokio::test]
async fn lists_organizations() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations")))
		.respond_with(ResponseTemplate::new(200).set_body_json(json!([
			{"id": "org-1", "name": "acme", "alias": "acme", "enabled": true,
			 "domains": [{"name": "acme.com", "verified": false}]}
		])))
		.mount(&server)
		.await;

	let (status, body) = send(app(&server), Method::GET, "/api/organizations", None).await;

	assert_eq!(status, StatusCode::OK);
	assert_eq!(body[0]["name"], "acme");
	assert_eq!(body[0]["domains"][0]["name"], "acme.com");
}

#[tokio::test]
async fn unknown_organization_is_not_found() {
	let server = MockServer::start().await;
	mount_token(&server).await;
	Mock::given(method("GET"))
		.and(path(format!("{ADMIN}/organizations/missing/members")))
		.respond_with(ResponseTemplate::new(404))
		.mount(&server)
		.await;

	let (status, body) = send(app(&server), Method::GET, "/api/organization/missing", None).await;

	assert_eq!(status, StatusCode::NOT_FOUND);
	assert_eq!(body["success"], false);
}
