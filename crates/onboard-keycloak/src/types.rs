// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Typed representations exchanged with the Keycloak admin API.
//!
//! Inbound representations deserialize only the fields onboard uses, so user
//! credentials and other sensitive attributes are dropped at the boundary.

use onboard_common_secret::SecretString;
use serde::{Deserialize, Serialize};

/// Template for one role in the fixed per-client catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoleTemplate {
	pub name: &'static str,
	pub description: &'static str,
}

/// Name of the role granted to whoever creates an organization.
pub const OWNER_ROLE: &str = "owner";

/// The roles every provisioned client carries, in order.
pub const ROLE_CATALOG: [RoleTemplate; 3] = [
	RoleTemplate {
		name: OWNER_ROLE,
		description: "Organization owner with full access",
	},
	RoleTemplate {
		name: "developer",
		description: "Developer with write access",
	},
	RoleTemplate {
		name: "reader",
		description: "Reader with read-only access",
	},
];

/// Result of a find-or-create call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provisioned<T> {
	/// The resource did not exist and was created by this call.
	Created(T),
	/// The resource was already present (found by lookup or after a 409).
	Existing(T),
}

impl<T> Provisioned<T> {
	pub fn existed_before(&self) -> bool {
		matches!(self, Provisioned::Existing(_))
	}

	pub fn get(&self) -> &T {
		match self {
			Provisioned::Created(inner) | Provisioned::Existing(inner) => inner,
		}
	}

	pub fn into_inner(self) -> T {
		match self {
			Provisioned::Created(inner) | Provisioned::Existing(inner) => inner,
		}
	}
}

/// Outcome of adding a user as a direct organization member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MembershipOutcome {
	Added,
	AlreadyMember,
}

/// Outcome of a side-effecting call whose rejection is reported, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionOutcome {
	Completed,
	Rejected { status: u16, message: String },
}

/// An organization as onboard tracks it during provisioning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Organization {
	pub id: String,
	pub name: String,
}

/// Organization as listed by `GET /organizations`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationSummary {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub alias: Option<String>,
	#[serde(default)]
	pub enabled: bool,
	#[serde(default)]
	pub description: Option<String>,
	#[serde(default)]
	pub redirect_url: Option<String>,
	#[serde(default)]
	pub domains: Vec<OrganizationDomain>,
}

impl From<OrganizationSummary> for Organization {
	fn from(summary: OrganizationSummary) -> Self {
		Organization {
			id: summary.id,
			name: summary.name,
		}
	}
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrganizationDomain {
	pub name: String,
	#[serde(default)]
	pub verified: bool,
}

/// Member entry from `GET /organizations/{id}/members`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganizationMember {
	pub id: String,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub enabled: bool,
	#[serde(default)]
	pub membership_type: Option<String>,
}

/// A client role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
	pub id: String,
	pub name: String,
	#[serde(default)]
	pub description: Option<String>,
}

/// Minimal role reference accepted by the role-mapping endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleRef {
	pub id: String,
	pub name: String,
}

impl From<&Role> for RoleRef {
	fn from(role: &Role) -> Self {
		RoleRef {
			id: role.id.clone(),
			name: role.name.clone(),
		}
	}
}

/// A provisioned OIDC client with its role catalog.
#[derive(Debug, Clone)]
pub struct Client {
	/// Internal id used in admin URLs.
	pub uuid: String,
	/// Public OIDC client id, `client-<alias>`.
	pub client_id: String,
	pub name: String,
	pub secret: Option<SecretString>,
	pub roles: Vec<Role>,
}

impl Client {
	pub fn role(&self, name: &str) -> Option<&Role> {
		self.roles.iter().find(|role| role.name == name)
	}
}

/// A realm user. Credentials are never deserialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
	pub id: String,
	#[serde(default)]
	pub username: String,
	#[serde(default)]
	pub email: Option<String>,
	#[serde(default)]
	pub first_name: Option<String>,
	#[serde(default)]
	pub last_name: Option<String>,
	#[serde(default)]
	pub enabled: bool,
	#[serde(default)]
	pub email_verified: bool,
}

/// Input for creating a user with a temporary password.
#[derive(Debug, Clone)]
pub struct NewUser {
	pub email: String,
	pub first_name: String,
	pub last_name: String,
	pub password: SecretString,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn catalog_order_is_owner_developer_reader() {
		let names: Vec<_> = ROLE_CATALOG.iter().map(|t| t.name).collect();
		assert_eq!(names, vec!["owner", "developer", "reader"]);
	}

	#[test]
	fn provisioned_tracks_prior_existence() {
		let created = Provisioned::Created(1);
		let existing = Provisioned::Existing(2);
		assert!(!created.existed_before());
		assert!(existing.existed_before());
		assert_eq!(*created.get(), 1);
		assert_eq!(existing.into_inner(), 2);
	}

	#[test]
	fn user_ignores_credentials_field() {
		let json = r#"{
			"id": "u-1",
			"username": "alice@acme.com",
			"email": "alice@acme.com",
			"firstName": "Alice",
			"enabled": true,
			"credentials": [{"type": "password", "value": "hunter2"}]
		}"#;
		let user: User = serde_json::from_str(json).unwrap();
		assert_eq!(user.first_name.as_deref(), Some("Alice"));
		assert_eq!(user.last_name, None);
		assert!(!user.email_verified);

		let back = serde_json::to_string(&user).unwrap();
		assert!(!back.contains("hunter2"));
	}

	#[test]
	fn organization_summary_tolerates_sparse_payload() {
		let summary: OrganizationSummary =
			serde_json::from_str(r#"{"id":"o-1","name":"acme"}"#).unwrap();
		assert_eq!(Organization::from(summary).name, "acme");
	}

	#[test]
	fn client_role_lookup_by_name() {
		let client = Client {
			uuid: "c-1".to_string(),
			client_id: "client-acme".to_string(),
			name: "acme Client".to_string(),
			secret: None,
			roles: vec![Role {
				id: "r-1".to_string(),
				name: OWNER_ROLE.to_string(),
				description: None,
			}],
		};
		assert_eq!(client.role("owner").map(|r| r.id.as_str()), Some("r-1"));
		assert!(client.role("reader").is_none());
	}
}
