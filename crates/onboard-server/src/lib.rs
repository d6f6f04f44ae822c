// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP surface of the onboard provisioning server.

pub mod error;
pub mod routes;
pub mod version;

use std::sync::Arc;
use std::time::Duration;

use axum::routing::{get, post};
use axum::Router;
use onboard_keycloak::{
	AdminCredentials, AdminTokenProvider, ClientUrls, KeycloakAdminClient, KeycloakAdminConfig,
	KeycloakError,
};
use onboard_provisioning::ProvisioningService;
use onboard_server_config::ServerConfig;

pub use error::ApiError;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
	pub provisioning: ProvisioningService,
}

/// Wire the token provider and admin client from configuration.
pub fn create_app_state(config: &ServerConfig) -> Result<AppState, KeycloakError> {
	let keycloak = &config.keycloak;
	let timeout = Duration::from_secs(keycloak.request_timeout_secs);

	let tokens = AdminTokenProvider::new(
		&keycloak.url,
		&keycloak.realm,
		AdminCredentials {
			client_id: keycloak.client_id.clone(),
			username: keycloak.admin_username.clone(),
			password: keycloak.admin_password.clone(),
		},
		timeout,
	)?;

	let admin = KeycloakAdminClient::new(KeycloakAdminConfig {
		base_url: keycloak.url.clone(),
		realm: keycloak.realm.clone(),
		request_timeout: timeout,
		client_urls: ClientUrls {
			public_base_url: config.http.base_url.clone(),
			extra_redirect_uris: keycloak.extra_redirect_uris.clone(),
			extra_web_origins: keycloak.extra_web_origins.clone(),
		},
	})?;

	Ok(AppState {
		provisioning: ProvisioningService::new(Arc::new(tokens), Arc::new(admin)),
	})
}

pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/api/user", post(routes::users::create_user))
		.route("/api/user/is-exists", post(routes::users::check_user_exists))
		.route(
			"/api/user/assign-client-role",
			post(routes::users::assign_client_role),
		)
		.route(
			"/api/organizations",
			get(routes::organizations::list_organizations),
		)
		.route(
			"/api/organization/{id}",
			get(routes::organizations::get_organization_members),
		)
		.with_state(state)
}
