// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request and response shapes of the provisioning operations.
//!
//! Responses are projections: the client secret and user credentials held by
//! the upstream types have no field here.

use onboard_common_secret::SecretString;
use onboard_keycloak::{Client, Role, RoleRef, User};
use serde::{Deserialize, Serialize};

/// Input to [`crate::ProvisioningService::create_user`].
///
/// Every field is optional at the serde level so that missing values surface
/// as validation errors instead of body rejections.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub password: Option<SecretString>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserResponse {
	pub success: bool,
	pub message: String,
	pub organization: OrganizationView,
	pub client: ClientView,
	pub client_roles: ClientRolesView,
	pub user: UserView,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationView {
	pub id: String,
	pub name: String,
	pub existed_before: bool,
	/// Whether an invitation was sent. Always false for new organizations.
	pub invited: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientView {
	#[serde(rename = "clientUUID")]
	pub client_uuid: String,
	pub client_id: String,
	pub name: String,
}

impl From<&Client> for ClientView {
	fn from(client: &Client) -> Self {
		ClientView {
			client_uuid: client.uuid.clone(),
			client_id: client.client_id.clone(),
			name: client.name.clone(),
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientRolesView {
	pub client_id: String,
	pub roles: Vec<Role>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
	pub id: String,
	pub email: String,
	pub username: String,
	pub first_name: String,
	pub last_name: String,
	pub enabled: bool,
	pub email_verified: bool,
	pub is_owner: bool,
}

impl UserView {
	pub(crate) fn new(user: User, is_owner: bool) -> Self {
		UserView {
			id: user.id,
			email: user.email.unwrap_or_default(),
			username: user.username,
			first_name: user.first_name.unwrap_or_default(),
			last_name: user.last_name.unwrap_or_default(),
			enabled: user.enabled,
			email_verified: user.email_verified,
			is_owner,
		}
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CheckUserRequest {
	#[serde(default)]
	pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignRoleRequest {
	#[serde(default)]
	pub user_id: Option<String>,
	#[serde(default, rename = "clientUUID")]
	pub client_uuid: Option<String>,
	#[serde(default)]
	pub roles: Vec<RoleRef>,
}

/// Plain `{success, message}` reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusResponse {
	pub success: bool,
	pub message: String,
}

impl StatusResponse {
	pub fn new(success: bool, message: impl Into<String>) -> Self {
		StatusResponse {
			success,
			message: message.into(),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;

	#[test]
	fn create_request_accepts_partial_body() {
		let request: CreateUserRequest =
			serde_json::from_value(json!({"email": "alice@acme.com"})).unwrap();
		assert_eq!(request.email.as_deref(), Some("alice@acme.com"));
		assert!(request.password.is_none());
	}

	#[test]
	fn client_view_uses_upper_case_uuid_key() {
		let view = ClientView {
			client_uuid: "c-1".to_string(),
			client_id: "client-acme".to_string(),
			name: "acme Client".to_string(),
		};
		let value = serde_json::to_value(view).unwrap();
		assert_eq!(value["clientUUID"], "c-1");
		assert_eq!(value["clientId"], "client-acme");
	}

	#[test]
	fn assign_request_reads_wire_names() {
		let request: AssignRoleRequest = serde_json::from_value(json!({
			"userId": "u-1",
			"clientUUID": "c-1",
			"roles": [{"id": "r-1", "name": "owner"}]
		}))
		.unwrap();
		assert_eq!(request.client_uuid.as_deref(), Some("c-1"));
		assert_eq!(request.roles.len(), 1);
	}
}
