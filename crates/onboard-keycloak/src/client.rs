// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keycloak admin REST client.

use std::time::Duration;

use async_trait::async_trait;
use onboard_common_secret::SecretString;
use reqwest::header::LOCATION;
use reqwest::{Client as HttpClient, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, error, info, instrument, warn};

use crate::error::{error_message, KeycloakError};
use crate::payload::{
	client_id_for, client_payload, role_payload, user_payload, ClientUrls, OrganizationPayload,
};
use crate::types::{
	ActionOutcome, Client, MembershipOutcome, NewUser, Organization, OrganizationMember,
	OrganizationSummary, Provisioned, Role, RoleRef, RoleTemplate, User, ROLE_CATALOG,
};

/// The admin operations the provisioning workflow relies on.
///
/// Each call takes the bearer token explicitly so the caller decides when to
/// fetch or invalidate it.
#[async_trait]
pub trait KeycloakAdmin: Send + Sync {
	/// Probe the organizations endpoint. A 404 means the feature is off.
	async fn is_organizations_feature_enabled(
		&self,
		token: &SecretString,
	) -> Result<bool, KeycloakError>;

	async fn find_or_create_organization(
		&self,
		token: &SecretString,
		name: &str,
		email: &str,
	) -> Result<Provisioned<Organization>, KeycloakError>;

	/// Look up `client-<tenant>`, registering it when absent, then fetch its
	/// secret and make sure the role catalog exists.
	async fn find_or_create_client(
		&self,
		token: &SecretString,
		tenant: &str,
	) -> Result<Client, KeycloakError>;

	/// Returns the catalog roles in catalog order.
	async fn ensure_client_roles(
		&self,
		token: &SecretString,
		client_uuid: &str,
	) -> Result<Vec<Role>, KeycloakError>;

	async fn find_or_create_user(
		&self,
		token: &SecretString,
		user: &NewUser,
	) -> Result<Provisioned<User>, KeycloakError>;

	async fn get_users_by_email(
		&self,
		token: &SecretString,
		email: &str,
	) -> Result<Vec<User>, KeycloakError>;

	async fn add_user_to_organization(
		&self,
		token: &SecretString,
		org_id: &str,
		user_id: &str,
	) -> Result<MembershipOutcome, KeycloakError>;

	/// A rejected invite is reported in the outcome, not as an error.
	async fn invite_existing_user(
		&self,
		token: &SecretString,
		org_id: &str,
		user_id: &str,
	) -> Result<ActionOutcome, KeycloakError>;

	/// A rejected assignment is reported in the outcome, not as an error.
	async fn assign_client_roles(
		&self,
		token: &SecretString,
		user_id: &str,
		client_uuid: &str,
		roles: &[RoleRef],
	) -> Result<ActionOutcome, KeycloakError>;

	async fn list_organizations(
		&self,
		token: &SecretString,
	) -> Result<Vec<OrganizationSummary>, KeycloakError>;

	async fn get_organization_members(
		&self,
		token: &SecretString,
		org_id: &str,
	) -> Result<Vec<OrganizationMember>, KeycloakError>;
}

/// Settings for [`KeycloakAdminClient`].
#[derive(Debug, Clone)]
pub struct KeycloakAdminConfig {
	/// Server root, e.g. `http://localhost:8080`.
	pub base_url: String,
	pub realm: String,
	pub request_timeout: Duration,
	pub client_urls: ClientUrls,
}

#[derive(Debug, Deserialize)]
struct ClientRepresentation {
	id: String,
	#[serde(rename = "clientId")]
	client_id: String,
	#[serde(default)]
	name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ClientSecretRepresentation {
	value: Option<String>,
}

/// Typed client for `{base_url}/admin/realms/{realm}`.
#[derive(Debug, Clone)]
pub struct KeycloakAdminClient {
	http_client: HttpClient,
	admin_base: String,
	client_urls: ClientUrls,
}

impl KeycloakAdminClient {
	pub fn new(config: KeycloakAdminConfig) -> Result<Self, KeycloakError> {
		let http_client = onboard_common_http::client_with_timeout(config.request_timeout)?;
		Ok(Self {
			http_client,
			admin_base: format!(
				"{}/admin/realms/{}",
				config.base_url.trim_end_matches('/'),
				config.realm
			),
			client_urls: config.client_urls,
		})
	}

	pub fn admin_base(&self) -> &str {
		&self.admin_base
	}

	fn url(&self, path: &str) -> String {
		format!("{}{}", self.admin_base, path)
	}

	fn get(&self, token: &SecretString, path: &str) -> RequestBuilder {
		self.http_client
			.get(self.url(path))
			.bearer_auth(token.expose())
	}

	fn post(&self, token: &SecretString, path: &str) -> RequestBuilder {
		self.http_client
			.post(self.url(path))
			.bearer_auth(token.expose())
	}

	async fn send(&self, request: RequestBuilder) -> Result<Response, KeycloakError> {
		request.send().await.map_err(|e| {
			error!(error = %e, "request to identity provider failed");
			KeycloakError::from(e)
		})
	}

	/// Decode a 2xx JSON body, turning any other status into an error.
	async fn json<T: DeserializeOwned>(response: Response) -> Result<T, KeycloakError> {
		let response = Self::ensure_success(response).await?;
		response.json::<T>().await.map_err(|e| {
			error!(error = %e, "failed to parse identity provider response");
			KeycloakError::InvalidResponse(e.to_string())
		})
	}

	async fn ensure_success(response: Response) -> Result<Response, KeycloakError> {
		let status = response.status();
		if status.is_success() {
			return Ok(response);
		}
		Err(Self::status_error(response).await)
	}

	async fn status_error(response: Response) -> KeycloakError {
		let status = response.status().as_u16();
		let url = response.url().path().to_string();
		let body = response.text().await.unwrap_or_default();
		error!(status, path = %url, body = %body, "identity provider returned an error");
		KeycloakError::from_status(status, &body)
	}

	async fn rejection(response: Response) -> ActionOutcome {
		let status = response.status().as_u16();
		let body = response.text().await.unwrap_or_default();
		ActionOutcome::Rejected {
			status,
			message: error_message(&body),
		}
	}

	/// Last path segment of the `Location` header of a 201.
	fn created_id(response: &Response) -> Option<String> {
		response
			.headers()
			.get(LOCATION)
			.and_then(|value| value.to_str().ok())
			.and_then(|location| location.trim_end_matches('/').rsplit('/').next())
			.filter(|id| !id.is_empty())
			.map(str::to_string)
	}

	async fn find_organization(
		&self,
		token: &SecretString,
		name: &str,
	) -> Result<Option<Organization>, KeycloakError> {
		let response = self
			.send(
				self.get(token, "/organizations")
					.query(&[("search", name), ("exact", "true")]),
			)
			.await?;
		let found: Vec<OrganizationSummary> = Self::json(response).await?;
		Ok(found
			.into_iter()
			.find(|org| org.name == name)
			.map(Organization::from))
	}

	async fn find_client(
		&self,
		token: &SecretString,
		client_id: &str,
	) -> Result<Option<ClientRepresentation>, KeycloakError> {
		let response = self
			.send(self.get(token, "/clients").query(&[("clientId", client_id)]))
			.await?;
		let found: Vec<ClientRepresentation> = Self::json(response).await?;
		Ok(found.into_iter().find(|c| c.client_id == client_id))
	}

	async fn client_secret(
		&self,
		token: &SecretString,
		client_uuid: &str,
	) -> Result<Option<SecretString>, KeycloakError> {
		let response = self
			.send(self.get(token, &format!("/clients/{client_uuid}/client-secret")))
			.await?;
		let secret: ClientSecretRepresentation = Self::json(response).await?;
		Ok(secret.value.map(SecretString::new))
	}

	async fn get_client_role(
		&self,
		token: &SecretString,
		client_uuid: &str,
		name: &str,
	) -> Result<Option<Role>, KeycloakError> {
		let response = self
			.send(self.get(token, &format!("/clients/{client_uuid}/roles/{name}")))
			.await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Ok(None);
		}
		Self::json(response).await.map(Some)
	}

	async fn get_user(&self, token: &SecretString, user_id: &str) -> Result<User, KeycloakError> {
		let response = self
			.send(self.get(token, &format!("/users/{user_id}")))
			.await?;
		Self::json(response).await
	}

	async fn create_client_role(
		&self,
		token: &SecretString,
		client_uuid: &str,
		template: &RoleTemplate,
	) -> Result<Role, KeycloakError> {
		let response = self
			.send(
				self.post(token, &format!("/clients/{client_uuid}/roles"))
					.json(&role_payload(template)),
			)
			.await?;
		let status = response.status();
		if !status.is_success() && status != StatusCode::CONFLICT {
			return Err(Self::status_error(response).await);
		}
		debug!(role = template.name, "client role created");

		self.get_client_role(token, client_uuid, template.name)
			.await?
			.ok_or_else(|| {
				KeycloakError::InvalidResponse(format!(
					"role {} not found after creation",
					template.name
				))
			})
	}

	async fn first_user_by_email(
		&self,
		token: &SecretString,
		email: &str,
	) -> Result<Option<User>, KeycloakError> {
		Ok(self.get_users_by_email(token, email).await?.into_iter().next())
	}
}

#[async_trait]
impl KeycloakAdmin for KeycloakAdminClient {
	#[instrument(skip(self, token))]
	async fn is_organizations_feature_enabled(
		&self,
		token: &SecretString,
	) -> Result<bool, KeycloakError> {
		let response = self
			.send(
				self.get(token, "/organizations")
					.query(&[("first", "0"), ("max", "1")]),
			)
			.await?;

		match response.status() {
			status if status.is_success() => Ok(true),
			StatusCode::NOT_FOUND => {
				warn!("organizations feature is not enabled");
				Ok(false)
			}
			_ => Err(Self::status_error(response).await),
		}
	}

	#[instrument(skip(self, token, email))]
	async fn find_or_create_organization(
		&self,
		token: &SecretString,
		name: &str,
		email: &str,
	) -> Result<Provisioned<Organization>, KeycloakError> {
		if let Some(existing) = self.find_organization(token, name).await? {
			debug!(org_id = %existing.id, "organization already exists");
			return Ok(Provisioned::Existing(existing));
		}

		let response = self
			.send(
				self.post(token, "/organizations")
					.json(&OrganizationPayload::new(name, email)),
			)
			.await?;

		match response.status() {
			status if status.is_success() => {
				let created = self.find_organization(token, name).await?.ok_or_else(|| {
					KeycloakError::InvalidResponse(format!(
						"organization {name} not found after creation"
					))
				})?;
				info!(org_id = %created.id, "organization created");
				Ok(Provisioned::Created(created))
			}
			StatusCode::CONFLICT => {
				warn!("organization create conflicted, reading back");
				self.find_organization(token, name)
					.await?
					.map(Provisioned::Existing)
					.ok_or_else(|| {
						KeycloakError::Conflict(format!(
							"organization {name} conflicts but cannot be found"
						))
					})
			}
			StatusCode::FORBIDDEN => {
				error!("admin account may not manage organizations");
				Err(KeycloakError::Forbidden(
					"insufficient permissions to create organizations".to_string(),
				))
			}
			StatusCode::NOT_FOUND => Err(KeycloakError::FeatureDisabled),
			_ => Err(Self::status_error(response).await),
		}
	}

	#[instrument(skip(self, token), fields(tenant = %tenant))]
	async fn find_or_create_client(
		&self,
		token: &SecretString,
		tenant: &str,
	) -> Result<Client, KeycloakError> {
		let client_id = client_id_for(tenant);
		let default_name = format!("{tenant} Client");

		let (uuid, name) = match self.find_client(token, &client_id).await? {
			Some(existing) => {
				debug!(client_uuid = %existing.id, "client already exists");
				(existing.id, existing.name.unwrap_or(default_name))
			}
			None => {
				let response = self
					.send(
						self.post(token, "/clients")
							.json(&client_payload(tenant, &self.client_urls)),
					)
					.await?;

				let status = response.status();
				let uuid = if status.is_success() {
					match Self::created_id(&response) {
						Some(id) => id,
						None => self
							.find_client(token, &client_id)
							.await?
							.map(|c| c.id)
							.ok_or_else(|| {
								KeycloakError::InvalidResponse(format!(
									"client {client_id} not found after creation"
								))
							})?,
					}
				} else if status == StatusCode::CONFLICT {
					warn!(client_id = %client_id, "client create conflicted, reading back");
					self.find_client(token, &client_id)
						.await?
						.map(|c| c.id)
						.ok_or_else(|| {
							KeycloakError::Conflict(format!(
								"client {client_id} conflicts but cannot be found"
							))
						})?
				} else {
					return Err(Self::status_error(response).await);
				};
				info!(client_uuid = %uuid, client_id = %client_id, "client registered");
				(uuid, default_name)
			}
		};

		let secret = self.client_secret(token, &uuid).await?;
		let roles = self.ensure_client_roles(token, &uuid).await?;

		Ok(Client {
			uuid,
			client_id,
			name,
			secret,
			roles,
		})
	}

	#[instrument(skip(self, token))]
	async fn ensure_client_roles(
		&self,
		token: &SecretString,
		client_uuid: &str,
	) -> Result<Vec<Role>, KeycloakError> {
		let mut roles = Vec::with_capacity(ROLE_CATALOG.len());

		for template in &ROLE_CATALOG {
			let mut role = match self.get_client_role(token, client_uuid, template.name).await? {
				Some(role) => role,
				None => self.create_client_role(token, client_uuid, template).await?,
			};
			role.description
				.get_or_insert_with(|| template.description.to_string());
			roles.push(role);
		}

		Ok(roles)
	}

	#[instrument(skip(self, token, user), fields(email = %user.email))]
	async fn find_or_create_user(
		&self,
		token: &SecretString,
		user: &NewUser,
	) -> Result<Provisioned<User>, KeycloakError> {
		if let Some(existing) = self.first_user_by_email(token, &user.email).await? {
			debug!(user_id = %existing.id, "user already exists");
			return Ok(Provisioned::Existing(existing));
		}

		let response = self
			.send(self.post(token, "/users").json(&user_payload(user)))
			.await?;

		match response.status() {
			status if status.is_success() => {
				let created = match Self::created_id(&response) {
					Some(id) => self.get_user(token, &id).await?,
					None => self
						.first_user_by_email(token, &user.email)
						.await?
						.ok_or_else(|| {
							KeycloakError::InvalidResponse("user not found after creation".to_string())
						})?,
				};
				info!(user_id = %created.id, "user created");
				Ok(Provisioned::Created(created))
			}
			StatusCode::CONFLICT => {
				warn!("user create conflicted, reading back");
				self.first_user_by_email(token, &user.email)
					.await?
					.map(Provisioned::Existing)
					.ok_or_else(|| {
						KeycloakError::Conflict(
							"user conflicts with an account that has a different email".to_string(),
						)
					})
			}
			_ => Err(Self::status_error(response).await),
		}
	}

	#[instrument(skip(self, token, email))]
	async fn get_users_by_email(
		&self,
		token: &SecretString,
		email: &str,
	) -> Result<Vec<User>, KeycloakError> {
		let response = self
			.send(
				self.get(token, "/users")
					.query(&[("email", email), ("exact", "true")]),
			)
			.await?;
		Self::json(response).await
	}

	#[instrument(skip(self, token))]
	async fn add_user_to_organization(
		&self,
		token: &SecretString,
		org_id: &str,
		user_id: &str,
	) -> Result<MembershipOutcome, KeycloakError> {
		let response = self
			.send(
				self.post(token, &format!("/organizations/{org_id}/members"))
					.json(&user_id),
			)
			.await?;

		match response.status() {
			status if status.is_success() => {
				info!("user added to organization");
				Ok(MembershipOutcome::Added)
			}
			StatusCode::CONFLICT => {
				debug!("user is already a member");
				Ok(MembershipOutcome::AlreadyMember)
			}
			_ => Err(Self::status_error(response).await),
		}
	}

	#[instrument(skip(self, token))]
	async fn invite_existing_user(
		&self,
		token: &SecretString,
		org_id: &str,
		user_id: &str,
	) -> Result<ActionOutcome, KeycloakError> {
		let response = self
			.send(
				self.post(
					token,
					&format!("/organizations/{org_id}/members/invite-existing-user"),
				)
				.form(&[("id", user_id)]),
			)
			.await?;

		if response.status().is_success() {
			info!("invitation sent");
			return Ok(ActionOutcome::Completed);
		}
		let outcome = Self::rejection(response).await;
		warn!(?outcome, "invitation rejected");
		Ok(outcome)
	}

	#[instrument(skip(self, token, roles), fields(role_count = roles.len()))]
	async fn assign_client_roles(
		&self,
		token: &SecretString,
		user_id: &str,
		client_uuid: &str,
		roles: &[RoleRef],
	) -> Result<ActionOutcome, KeycloakError> {
		let response = self
			.send(
				self.post(
					token,
					&format!("/users/{user_id}/role-mappings/clients/{client_uuid}"),
				)
				.json(roles),
			)
			.await?;

		if response.status().is_success() {
			info!("client roles assigned");
			return Ok(ActionOutcome::Completed);
		}
		let outcome = Self::rejection(response).await;
		warn!(?outcome, "role assignment rejected");
		Ok(outcome)
	}

	#[instrument(skip(self, token))]
	async fn list_organizations(
		&self,
		token: &SecretString,
	) -> Result<Vec<OrganizationSummary>, KeycloakError> {
		let response = self.send(self.get(token, "/organizations")).await?;
		Self::json(response).await
	}

	#[instrument(skip(self, token))]
	async fn get_organization_members(
		&self,
		token: &SecretString,
		org_id: &str,
	) -> Result<Vec<OrganizationMember>, KeycloakError> {
		let response = self
			.send(self.get(token, &format!("/organizations/{org_id}/members")))
			.await?;
		if response.status() == StatusCode::NOT_FOUND {
			return Err(KeycloakError::NotFound(format!("organization {org_id}")));
		}
		Self::json(response).await
	}
}
