// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Identity provider (Keycloak admin API) configuration section.

use onboard_common_secret::SecretString;
use serde::Deserialize;

const DEFAULT_URL: &str = "http://localhost:8080";
const DEFAULT_REALM: &str = "master";
const DEFAULT_ADMIN_USERNAME: &str = "admin";
const DEFAULT_ADMIN_PASSWORD: &str = "admin";
const DEFAULT_CLIENT_ID: &str = "admin-cli";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;

/// Keycloak admin configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct KeycloakConfig {
	/// Server root, without the `/admin` or `/realms` suffix.
	pub url: String,
	pub realm: String,
	pub admin_username: String,
	pub admin_password: SecretString,
	/// Client used for the password grant, normally `admin-cli`.
	pub client_id: String,
	pub request_timeout_secs: u64,
	/// Redirect URIs added to every provisioned client on top of the ones
	/// derived from the public base URL.
	pub extra_redirect_uris: Vec<String>,
	pub extra_web_origins: Vec<String>,
}

impl Default for KeycloakConfig {
	fn default() -> Self {
		KeycloakConfigLayer::default().finalize(None)
	}
}

/// Keycloak configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KeycloakConfigLayer {
	#[serde(default)]
	pub url: Option<String>,
	#[serde(default)]
	pub realm: Option<String>,
	#[serde(default)]
	pub admin_username: Option<String>,
	#[serde(default)]
	pub admin_password: Option<SecretString>,
	#[serde(default)]
	pub client_id: Option<String>,
	#[serde(default)]
	pub request_timeout_secs: Option<u64>,
	#[serde(default)]
	pub extra_redirect_uris: Option<Vec<String>>,
	#[serde(default)]
	pub extra_web_origins: Option<Vec<String>>,
}

impl KeycloakConfigLayer {
	pub fn merge(&mut self, other: KeycloakConfigLayer) {
		if other.url.is_some() {
			self.url = other.url;
		}
		if other.realm.is_some() {
			self.realm = other.realm;
		}
		if other.admin_username.is_some() {
			self.admin_username = other.admin_username;
		}
		if other.admin_password.is_some() {
			self.admin_password = other.admin_password;
		}
		if other.client_id.is_some() {
			self.client_id = other.client_id;
		}
		if other.request_timeout_secs.is_some() {
			self.request_timeout_secs = other.request_timeout_secs;
		}
		if other.extra_redirect_uris.is_some() {
			self.extra_redirect_uris = other.extra_redirect_uris;
		}
		if other.extra_web_origins.is_some() {
			self.extra_web_origins = other.extra_web_origins;
		}
	}

	/// Resolve the layer. A password loaded from the environment (including
	/// `*_FILE`) wins over one from the config file.
	pub fn finalize(self, env_password: Option<SecretString>) -> KeycloakConfig {
		KeycloakConfig {
			url: self
				.url
				.map(|url| url.trim_end_matches('/').to_string())
				.unwrap_or_else(|| DEFAULT_URL.to_string()),
			realm: self.realm.unwrap_or_else(|| DEFAULT_REALM.to_string()),
			admin_username: self
				.admin_username
				.unwrap_or_else(|| DEFAULT_ADMIN_USERNAME.to_string()),
			admin_password: env_password
				.or(self.admin_password)
				.unwrap_or_else(|| SecretString::from(DEFAULT_ADMIN_PASSWORD)),
			client_id: self
				.client_id
				.unwrap_or_else(|| DEFAULT_CLIENT_ID.to_string()),
			request_timeout_secs: self
				.request_timeout_secs
				.unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
			extra_redirect_uris: self.extra_redirect_uris.unwrap_or_default(),
			extra_web_origins: self.extra_web_origins.unwrap_or_default(),
		}
	}
}
