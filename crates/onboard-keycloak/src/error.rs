// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Error types for the Keycloak admin client.

use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when talking to the Keycloak admin API.
///
/// Status codes are decoded into these variants once, at the client boundary.
/// Statuses an operation treats as a normal branch (a 409 on create, a 404 on
/// the feature probe) never surface here.
#[derive(Debug, Error)]
pub enum KeycloakError {
	/// Network-level error during HTTP communication.
	#[error("HTTP request failed: {0}")]
	Network(#[source] reqwest::Error),

	/// Request did not complete within the configured timeout.
	#[error("request to identity provider timed out")]
	Timeout,

	/// The password grant failed or returned no access token.
	#[error("failed to obtain admin token: {0}")]
	Auth(String),

	/// The admin token was rejected (401).
	#[error("admin token rejected by identity provider")]
	Unauthorized,

	/// The admin account lacks a required permission (403).
	#[error("forbidden: {0}")]
	Forbidden(String),

	/// The realm does not have the organizations feature enabled.
	#[error("organizations feature is not enabled in this realm")]
	FeatureDisabled,

	#[error("not found: {0}")]
	NotFound(String),

	/// A create collided with an existing resource that could not be read back.
	#[error("conflict: {0}")]
	Conflict(String),

	/// Any other non-2xx response.
	#[error("identity provider error: {status} - {message}")]
	Api { status: u16, message: String },

	/// The response body or headers did not have the expected shape.
	#[error("invalid response from identity provider: {0}")]
	InvalidResponse(String),
}

impl From<reqwest::Error> for KeycloakError {
	fn from(e: reqwest::Error) -> Self {
		if e.is_timeout() {
			KeycloakError::Timeout
		} else {
			KeycloakError::Network(e)
		}
	}
}

impl KeycloakError {
	/// Map an unexpected status and its body to an error.
	pub(crate) fn from_status(status: u16, body: &str) -> Self {
		let message = error_message(body);
		match status {
			401 => KeycloakError::Unauthorized,
			403 => KeycloakError::Forbidden(message),
			404 => KeycloakError::NotFound(message),
			409 => KeycloakError::Conflict(message),
			_ => KeycloakError::Api { status, message },
		}
	}
}

#[derive(Debug, Deserialize)]
struct KeycloakErrorBody {
	#[serde(rename = "errorMessage")]
	error_message: Option<String>,
	error: Option<String>,
	error_description: Option<String>,
}

/// Pull the human-readable message out of a Keycloak error body.
///
/// Admin endpoints answer `{"errorMessage": ...}`, the token endpoint answers
/// `{"error": ..., "error_description": ...}`. Anything else is returned as is.
pub(crate) fn error_message(body: &str) -> String {
	if let Ok(parsed) = serde_json::from_str::<KeycloakErrorBody>(body) {
		if let Some(message) = parsed
			.error_message
			.or(parsed.error_description)
			.or(parsed.error)
		{
			return message;
		}
	}
	body.to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn error_message_prefers_admin_error_message() {
		let body = r#"{"errorMessage":"Organization already exists"}"#;
		assert_eq!(error_message(body), "Organization already exists");
	}

	#[test]
	fn error_message_uses_oauth_description() {
		let body = r#"{"error":"invalid_grant","error_description":"Invalid user credentials"}"#;
		assert_eq!(error_message(body), "Invalid user credentials");
	}

	#[test]
	fn error_message_falls_back_to_raw_body() {
		assert_eq!(error_message("<html>Bad Gateway</html>"), "<html>Bad Gateway</html>");
		assert_eq!(error_message(""), "");
	}

	#[test]
	fn from_status_decodes_known_statuses() {
		assert!(matches!(KeycloakError::from_status(401, ""), KeycloakError::Unauthorized));
		assert!(matches!(KeycloakError::from_status(403, "no"), KeycloakError::Forbidden(m) if m == "no"));
		assert!(matches!(KeycloakError::from_status(404, ""), KeycloakError::NotFound(_)));
		assert!(matches!(KeycloakError::from_status(409, ""), KeycloakError::Conflict(_)));
		assert!(matches!(
			KeycloakError::from_status(502, "upstream down"),
			KeycloakError::Api { status: 502, ref message } if message == "upstream down"
		));
	}
}
