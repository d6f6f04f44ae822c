// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use onboard_keycloak::KeycloakError;

use crate::tenant::TenantError;

/// Errors that can occur during tenant provisioning.
#[derive(Debug, thiserror::Error)]
pub enum ProvisioningError {
	/// Malformed input; nothing was sent upstream.
	#[error("{0}")]
	Validation(String),

	#[error("failed to authenticate with identity provider: {0}")]
	AuthFailure(String),

	/// The realm is not set up for provisioning.
	#[error("{0}")]
	PreconditionFailed(String),

	#[error("identity provider returned {status}: {body}")]
	Upstream { status: u16, body: String },

	#[error("not found: {0}")]
	NotFound(String),

	#[error("conflict: {0}")]
	Conflict(String),
}

impl From<TenantError> for ProvisioningError {
	fn from(e: TenantError) -> Self {
		ProvisioningError::Validation(e.to_string())
	}
}

impl From<KeycloakError> for ProvisioningError {
	fn from(e: KeycloakError) -> Self {
		match e {
			KeycloakError::Auth(message) => ProvisioningError::AuthFailure(message),
			KeycloakError::Unauthorized => {
				ProvisioningError::AuthFailure("admin token rejected".to_string())
			}
			KeycloakError::FeatureDisabled => ProvisioningError::PreconditionFailed(
				"Organizations feature is not enabled".to_string(),
			),
			KeycloakError::NotFound(message) => ProvisioningError::NotFound(message),
			KeycloakError::Conflict(message) => ProvisioningError::Conflict(message),
			KeycloakError::Forbidden(message) => ProvisioningError::Upstream {
				status: 403,
				body: message,
			},
			KeycloakError::Api { status, message } => ProvisioningError::Upstream {
				status,
				body: message,
			},
			KeycloakError::Timeout => ProvisioningError::Upstream {
				status: 504,
				body: "request to identity provider timed out".to_string(),
			},
			KeycloakError::Network(e) => ProvisioningError::Upstream {
				status: 502,
				body: e.to_string(),
			},
			KeycloakError::InvalidResponse(message) => ProvisioningError::Upstream {
				status: 502,
				body: message,
			},
		}
	}
}
