// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request bodies for resource creation.

use serde::Serialize;
use serde_json::{json, Value};

use crate::types::{NewUser, RoleTemplate};

/// Lowercase `name` and replace every character outside `[a-z0-9]` with `-`.
pub fn slugify(name: &str) -> String {
	name.chars()
		.map(|c| {
			let c = c.to_ascii_lowercase();
			if c.is_ascii_lowercase() || c.is_ascii_digit() {
				c
			} else {
				'-'
			}
		})
		.collect()
}

/// OIDC client id for a tenant.
pub fn client_id_for(tenant: &str) -> String {
	format!("client-{}", slugify(tenant))
}

/// Where a tenant's own site is assumed to live.
pub fn tenant_home_url(tenant: &str) -> String {
	format!("https://{tenant}.com")
}

/// Redirect and web-origin settings shared by every provisioned client.
#[derive(Debug, Clone, Default)]
pub struct ClientUrls {
	pub public_base_url: String,
	pub extra_redirect_uris: Vec<String>,
	pub extra_web_origins: Vec<String>,
}

impl ClientUrls {
	pub fn redirect_uris(&self) -> Vec<String> {
		let base = self.public_base_url.trim_end_matches('/');
		let mut uris = vec![format!("{base}/*"), format!("{base}/api/auth/callback")];
		for uri in &self.extra_redirect_uris {
			if !uris.contains(uri) {
				uris.push(uri.clone());
			}
		}
		uris
	}

	pub fn web_origins(&self) -> Vec<String> {
		let mut origins = vec![self.public_base_url.trim_end_matches('/').to_string()];
		for origin in &self.extra_web_origins {
			if !origins.contains(origin) {
				origins.push(origin.clone());
			}
		}
		origins
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct OrganizationPayload {
	name: String,
	alias: String,
	description: String,
	redirect_url: String,
	domains: Vec<DomainPayload>,
	attributes: Value,
}

#[derive(Debug, Serialize)]
struct DomainPayload {
	name: String,
	verified: bool,
}

impl OrganizationPayload {
	/// The domain is taken from `email`; `<name>.com` is used when it has none.
	pub(crate) fn new(name: &str, email: &str) -> Self {
		let domain = email
			.split_once('@')
			.map(|(_, domain)| domain.to_string())
			.filter(|domain| !domain.is_empty())
			.unwrap_or_else(|| format!("{name}.com"));

		Self {
			name: name.to_string(),
			alias: slugify(name),
			description: String::new(),
			redirect_url: tenant_home_url(name),
			domains: vec![DomainPayload {
				name: domain,
				verified: false,
			}],
			attributes: json!({}),
		}
	}
}

/// Confidential OIDC client registration body.
pub(crate) fn client_payload(tenant: &str, urls: &ClientUrls) -> Value {
	let home = tenant_home_url(tenant);
	let redirect_uris = urls.redirect_uris();
	json!({
		"clientId": client_id_for(tenant),
		"name": format!("{tenant} Client"),
		"description": "",
		"rootUrl": home,
		"adminUrl": "",
		"baseUrl": home,
		"surrogateAuthRequired": false,
		"enabled": true,
		"alwaysDisplayInConsole": false,
		"clientAuthenticatorType": "client-secret",
		"redirectUris": redirect_uris,
		"webOrigins": urls.web_origins(),
		"notBefore": 0,
		"bearerOnly": false,
		"consentRequired": false,
		"standardFlowEnabled": true,
		"implicitFlowEnabled": false,
		"directAccessGrantsEnabled": true,
		"serviceAccountsEnabled": true,
		"publicClient": false,
		"frontchannelLogout": true,
		"protocol": "openid-connect",
		"attributes": {
			"realm_client": "false",
			"oidc.ciba.grant.enabled": "false",
			"client.secret.creation.time": "0",
			"backchannel.logout.session.required": "true",
			"oauth2.device.authorization.grant.enabled": "true",
			"display.on.consent.screen": "false",
			"backchannel.logout.revoke.offline.tokens": "false",
			"post.logout.redirect.uris": redirect_uris.join("##"),
		},
		"authenticationFlowBindingOverrides": {},
		"fullScopeAllowed": true,
		"nodeReRegistrationTimeout": -1,
		"defaultClientScopes": ["web-origins", "acr", "profile", "roles", "basic", "email"],
		"optionalClientScopes": ["address", "phone", "offline_access", "microprofile-jwt"],
		"access": {
			"view": true,
			"configure": true,
			"manage": true,
		},
	})
}

pub(crate) fn role_payload(template: &RoleTemplate) -> Value {
	json!({
		"name": template.name,
		"description": template.description,
	})
}

/// User body with a temporary password credential. The email doubles as the
/// username.
pub(crate) fn user_payload(user: &NewUser) -> Value {
	json!({
		"username": user.email,
		"email": user.email,
		"firstName": user.first_name,
		"lastName": user.last_name,
		"enabled": true,
		"emailVerified": true,
		"credentials": [{
			"type": "password",
			"value": user.password.expose(),
			"temporary": true,
		}],
	})
}
