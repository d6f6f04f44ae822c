// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! User provisioning handlers.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use onboard_provisioning::{
	AssignRoleRequest, CheckUserRequest, CreateUserRequest, CreateUserResponse, StatusResponse,
};

use crate::{ApiError, AppState};

/// POST /api/user - Provision the sender's tenant and create the user.
pub async fn create_user(
	State(state): State<AppState>,
	body: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUserResponse>), ApiError> {
	let Json(request) = body?;
	let response = state.provisioning.create_user(request).await?;
	Ok((StatusCode::CREATED, Json(response)))
}

/// POST /api/user/is-exists
pub async fn check_user_exists(
	State(state): State<AppState>,
	body: Result<Json<CheckUserRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
	let Json(request) = body?;
	let email = request.email.unwrap_or_default();
	Ok(Json(state.provisioning.check_user_exists(&email).await?))
}

/// POST /api/user/assign-client-role
pub async fn assign_client_role(
	State(state): State<AppState>,
	body: Result<Json<AssignRoleRequest>, JsonRejection>,
) -> Result<Json<StatusResponse>, ApiError> {
	let Json(request) = body?;
	Ok(Json(state.provisioning.assign_role(request).await?))
}
