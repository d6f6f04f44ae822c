// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Keycloak admin API client for tenant provisioning.
//!
//! - [`AdminTokenProvider`] caches the admin access token and refreshes it
//!   single-flight.
//! - [`KeycloakAdminClient`] implements [`KeycloakAdmin`], one method per admin
//!   operation, decoding response statuses into typed outcomes or
//!   [`KeycloakError`].
//!
//! # Example
//!
//! ```ignore
//! let tokens = AdminTokenProvider::new(url, realm, credentials, timeout)?;
//! let admin = KeycloakAdminClient::new(config)?;
//! let token = tokens.token().await?;
//! if admin.is_organizations_feature_enabled(&token).await? {
//!     let org = admin.find_or_create_organization(&token, "acme", "alice@acme.com").await?;
//! }
//! ```

pub mod client;
pub mod error;
pub mod payload;
pub mod token;
pub mod types;

pub use client::{KeycloakAdmin, KeycloakAdminClient, KeycloakAdminConfig};
pub use error::KeycloakError;
pub use payload::{client_id_for, slugify, ClientUrls};
pub use token::{AdminCredentials, AdminTokenProvider, TokenSource, REFRESH_MARGIN_SECS};
pub use types::{
	ActionOutcome, Client, MembershipOutcome, NewUser, Organization, OrganizationDomain,
	OrganizationMember, OrganizationSummary, Provisioned, Role, RoleRef, RoleTemplate, User,
	OWNER_ROLE, ROLE_CATALOG,
};
