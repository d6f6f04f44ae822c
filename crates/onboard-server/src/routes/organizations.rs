// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::extract::{Path, State};
use axum::Json;
use onboard_keycloak::{OrganizationMember, OrganizationSummary};

use crate::{ApiError, AppState};

/// GET /api/organizations
pub async fn list_organizations(
	State(state): State<AppState>,
) -> Result<Json<Vec<OrganizationSummary>>, ApiError> {
	Ok(Json(state.provisioning.list_organizations().await?))
}

/// GET /api/organization/{id} - Members of one organization.
pub async fn get_organization_members(
	State(state): State<AppState>,
	Path(id): Path<String>,
) -> Result<Json<Vec<OrganizationMember>>, ApiError> {
	Ok(Json(state.provisioning.organization_members(&id).await?))
}
