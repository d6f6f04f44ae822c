// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant provisioning for onboard.
//!
//! [`ProvisioningService`] turns a sign-up (`email`, names, password) into an
//! organization, an OIDC client with the `owner`/`developer`/`reader` roles,
//! and a user linked to that organization.

pub mod dto;
pub mod error;
pub mod service;
pub mod tenant;

pub use dto::{
	AssignRoleRequest, CheckUserRequest, ClientRolesView, ClientView, CreateUserRequest,
	CreateUserResponse, OrganizationView, StatusResponse, UserView,
};
pub use error::ProvisioningError;
pub use service::ProvisioningService;
pub use tenant::{extract_tenant_name, validate_email, TenantError, TenantName};
