// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! The provisioning workflow.
//!
//! Steps run sequentially and are not transactional: resources created before
//! a failing step are left in place. Re-running the workflow is safe since
//! every step is find-or-create.

use std::future::Future;
use std::sync::Arc;

use onboard_common_secret::SecretString;
use onboard_keycloak::{
	ActionOutcome, KeycloakAdmin, KeycloakError, MembershipOutcome, NewUser, OrganizationMember,
	OrganizationSummary, RoleRef, TokenSource, OWNER_ROLE,
};
use tracing::{info, instrument, warn};

use crate::dto::{
	AssignRoleRequest, ClientRolesView, ClientView, CreateUserRequest, CreateUserResponse,
	OrganizationView, StatusResponse, UserView,
};
use crate::error::ProvisioningError;
use crate::tenant::{validate_email, TenantName};

/// Orchestrates tenant provisioning against the identity provider.
#[derive(Clone)]
pub struct ProvisioningService {
	tokens: Arc<dyn TokenSource>,
	admin: Arc<dyn KeycloakAdmin>,
}

impl ProvisioningService {
	pub fn new(tokens: Arc<dyn TokenSource>, admin: Arc<dyn KeycloakAdmin>) -> Self {
		Self { tokens, admin }
	}

	async fn token(&self) -> Result<SecretString, ProvisioningError> {
		self.tokens.token().await.map_err(|e| {
			warn!(error = %e, "failed to obtain admin token");
			ProvisioningError::from(e)
		})
	}

	/// Await an admin call, dropping the cached token if it was rejected.
	async fn call<T>(
		&self,
		request: impl Future<Output = Result<T, KeycloakError>>,
	) -> Result<T, ProvisioningError> {
		match request.await {
			Ok(value) => Ok(value),
			Err(KeycloakError::Unauthorized) => {
				self.tokens.invalidate().await;
				Err(KeycloakError::Unauthorized.into())
			}
			Err(e) => Err(e.into()),
		}
	}

	/// Provision the tenant behind `request.email` and its first user.
	///
	/// The first user of a new organization becomes a direct member with the
	/// `owner` client role. Later users of an existing organization are only
	/// invited; a failed invitation is logged and reported as `invited: false`.
	#[instrument(skip(self, request))]
	pub async fn create_user(
		&self,
		request: CreateUserRequest,
	) -> Result<CreateUserResponse, ProvisioningError> {
		let email = request.email.filter(|e| !e.is_empty());
		let password = request.password.filter(|p| !p.is_empty());
		let (Some(email), Some(password)) = (email, password) else {
			return Err(ProvisioningError::Validation(
				"Email and password are required".to_string(),
			));
		};

		let tenant = TenantName::from_email(&email)?;
		info!(tenant = %tenant, "provisioning tenant");

		let token = self.token().await?;

		let enabled = self
			.call(self.admin.is_organizations_feature_enabled(&token))
			.await?;
		if !enabled {
			return Err(ProvisioningError::PreconditionFailed(
				"Organizations feature is not enabled".to_string(),
			));
		}

		let organization = self
			.call(
				self.admin
					.find_or_create_organization(&token, tenant.as_str(), &email),
			)
			.await?;
		let existed_before = organization.existed_before();
		let organization = organization.into_inner();

		let client = self
			.call(self.admin.find_or_create_client(&token, tenant.as_str()))
			.await?;

		let new_user = NewUser {
			email: email.clone(),
			first_name: request.first_name.unwrap_or_default(),
			last_name: request.last_name.unwrap_or_default(),
			password,
		};
		let user = self
			.call(self.admin.find_or_create_user(&token, &new_user))
			.await?
			.into_inner();

		let (invited, is_owner) = if existed_before {
			let outcome = self
				.call(
					self.admin
						.invite_existing_user(&token, &organization.id, &user.id),
				)
				.await;
			let invited = match outcome {
				Ok(ActionOutcome::Completed) => true,
				Ok(ActionOutcome::Rejected { status, message }) => {
					warn!(status, %message, user_id = %user.id, "invitation rejected");
					false
				}
				Err(e) => {
					warn!(error = %e, user_id = %user.id, "invitation failed");
					false
				}
			};
			(invited, false)
		} else {
			let membership = self
				.call(
					self.admin
						.add_user_to_organization(&token, &organization.id, &user.id),
				)
				.await?;
			if membership == MembershipOutcome::AlreadyMember {
				info!(user_id = %user.id, "user was already a member");
			}

			let owner = client.role(OWNER_ROLE).ok_or_else(|| ProvisioningError::Upstream {
				status: 500,
				body: format!("client {} has no {OWNER_ROLE} role", client.client_id),
			})?;
			let outcome = self
				.call(self.admin.assign_client_roles(
					&token,
					&user.id,
					&client.uuid,
					&[RoleRef::from(owner)],
				))
				.await?;
			if let ActionOutcome::Rejected { status, message } = outcome {
				return Err(ProvisioningError::Upstream {
					status,
					body: message,
				});
			}
			(false, true)
		};

		info!(
			tenant = %tenant,
			org_id = %organization.id,
			user_id = %user.id,
			existed_before,
			invited,
			is_owner,
			"tenant provisioned"
		);

		Ok(CreateUserResponse {
			success: true,
			message: "User created successfully".to_string(),
			organization: OrganizationView {
				id: organization.id,
				name: organization.name,
				existed_before,
				invited,
			},
			client: ClientView::from(&client),
			client_roles: ClientRolesView {
				client_id: client.client_id.clone(),
				roles: client.roles.clone(),
			},
			user: UserView::new(user, is_owner),
		})
	}

	/// Report whether a user with exactly this email exists.
	#[instrument(skip(self, email))]
	pub async fn check_user_exists(&self, email: &str) -> Result<StatusResponse, ProvisioningError> {
		if email.is_empty() {
			return Err(ProvisioningError::Validation("Email is required".to_string()));
		}
		validate_email(email)?;

		let token = self.token().await?;
		let users = self.call(self.admin.get_users_by_email(&token, email)).await?;

		Ok(if users.is_empty() {
			StatusResponse::new(false, "User does not exist")
		} else {
			StatusResponse::new(true, "User exists")
		})
	}

	/// Map client roles onto a user. An upstream rejection is returned as an
	/// error so the caller sees the failure.
	#[instrument(skip(self, request), fields(role_count = request.roles.len()))]
	pub async fn assign_role(
		&self,
		request: AssignRoleRequest,
	) -> Result<StatusResponse, ProvisioningError> {
		let user_id = request.user_id.filter(|v| !v.is_empty());
		let client_uuid = request.client_uuid.filter(|v| !v.is_empty());
		let (Some(user_id), Some(client_uuid)) = (user_id, client_uuid) else {
			return Err(ProvisioningError::Validation(
				"userId and clientUUID are required".to_string(),
			));
		};
		if request.roles.is_empty() {
			return Err(ProvisioningError::Validation(
				"at least one role is required".to_string(),
			));
		}

		let token = self.token().await?;
		let outcome = self
			.call(self.admin.assign_client_roles(
				&token,
				&user_id,
				&client_uuid,
				&request.roles,
			))
			.await?;

		match outcome {
			ActionOutcome::Completed => Ok(StatusResponse::new(true, "Role assigned successfully")),
			ActionOutcome::Rejected { status, message } => {
				warn!(status, %message, "role assignment rejected");
				Err(ProvisioningError::Upstream {
					status,
					body: message,
				})
			}
		}
	}

	#[instrument(skip(self))]
	pub async fn list_organizations(&self) -> Result<Vec<OrganizationSummary>, ProvisioningError> {
		let token = self.token().await?;
		self.call(self.admin.list_organizations(&token)).await
	}

	#[instrument(skip(self))]
	pub async fn organization_members(
		&self,
		org_id: &str,
	) -> Result<Vec<OrganizationMember>, ProvisioningError> {
		let token = self.token().await?;
		self.call(self.admin.get_organization_members(&token, org_id))
			.await
	}
}
