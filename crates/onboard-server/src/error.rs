// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP error responses.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use onboard_provisioning::{ProvisioningError, StatusResponse};

/// Error returned by route handlers, rendered as `{success: false, message}`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
	#[error(transparent)]
	Provisioning(#[from] ProvisioningError),

	#[error("Invalid request body: {0}")]
	BadRequest(String),
}

impl From<JsonRejection> for ApiError {
	fn from(rejection: JsonRejection) -> Self {
		ApiError::BadRequest(rejection.body_text())
	}
}

impl ApiError {
	pub fn status_code(&self) -> StatusCode {
		match self {
			ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
			ApiError::Provisioning(e) => match e {
				ProvisioningError::Validation(_) | ProvisioningError::PreconditionFailed(_) => {
					StatusCode::BAD_REQUEST
				}
				ProvisioningError::NotFound(_) => StatusCode::NOT_FOUND,
				ProvisioningError::Conflict(_) => StatusCode::CONFLICT,
				ProvisioningError::AuthFailure(_) | ProvisioningError::Upstream { .. } => {
					StatusCode::INTERNAL_SERVER_ERROR
				}
			},
		}
	}
}

impl IntoResponse for ApiError {
	fn into_response(self) -> Response {
		let status = self.status_code();
		if status.is_server_error() {
			tracing::error!(error = %self, "request failed");
		} else {
			tracing::debug!(error = %self, status = status.as_u16(), "request rejected");
		}
		(status, Json(StatusResponse::new(false, self.to_string()))).into_response()
	}
}
