// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Admin credential cache.
//!
//! [`AdminTokenProvider`] performs the password grant against the realm's
//! token endpoint and caches the resulting access token until it is within
//! [`REFRESH_MARGIN_SECS`] of expiry. The cache sits behind an async mutex
//! that is held across the exchange, so concurrent callers during a refresh
//! wait for the single in-flight request and share its result.

use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use onboard_common_secret::SecretString;
use reqwest::Client;
use serde::Deserialize;
use tokio::sync::Mutex;
use tracing::{debug, error, instrument};

use crate::error::{error_message, KeycloakError};

/// Tokens closer than this to expiry are refreshed before use.
pub const REFRESH_MARGIN_SECS: i64 = 60;

/// Anything that can hand out a bearer token for the admin API.
#[async_trait]
pub trait TokenSource: Send + Sync {
	/// Return a token valid for at least the refresh margin.
	async fn token(&self) -> Result<SecretString, KeycloakError>;

	/// Forget any cached token so the next call performs a fresh exchange.
	async fn invalidate(&self);
}

/// Password-grant credentials for the admin account.
#[derive(Debug, Clone)]
pub struct AdminCredentials {
	pub client_id: String,
	pub username: String,
	pub password: SecretString,
}

#[derive(Debug, Clone)]
struct CachedToken {
	token: SecretString,
	expires_at: DateTime<Utc>,
}

impl CachedToken {
	fn is_fresh(&self, now: DateTime<Utc>) -> bool {
		now < self.expires_at - chrono::Duration::seconds(REFRESH_MARGIN_SECS)
	}
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
	access_token: Option<String>,
	#[serde(default)]
	expires_in: i64,
}

/// Caching token provider for the Keycloak admin account.
pub struct AdminTokenProvider {
	http_client: Client,
	token_url: String,
	credentials: AdminCredentials,
	cached: Mutex<Option<CachedToken>>,
}

impl AdminTokenProvider {
	/// Build a provider for `{base_url}/realms/{realm}`.
	pub fn new(
		base_url: &str,
		realm: &str,
		credentials: AdminCredentials,
		timeout: Duration,
	) -> Result<Self, KeycloakError> {
		let http_client = onboard_common_http::client_with_timeout(timeout)?;
		Ok(Self {
			http_client,
			token_url: format!(
				"{}/realms/{}/protocol/openid-connect/token",
				base_url.trim_end_matches('/'),
				realm
			),
			credentials,
			cached: Mutex::new(None),
		})
	}

	pub fn token_url(&self) -> &str {
		&self.token_url
	}

	#[instrument(skip(self), fields(token_url = %self.token_url, username = %self.credentials.username))]
	async fn exchange(&self) -> Result<CachedToken, KeycloakError> {
		debug!("requesting admin access token");

		let form = [
			("client_id", self.credentials.client_id.as_str()),
			("username", self.credentials.username.as_str()),
			("password", self.credentials.password.expose().as_str()),
			("grant_type", "password"),
		];

		let response = self
			.http_client
			.post(&self.token_url)
			.form(&form)
			.send()
			.await
			.map_err(|e| {
				error!(error = %e, "token endpoint unreachable");
				KeycloakError::Auth(format!("token endpoint unreachable: {e}"))
			})?;

		let status = response.status();
		if !status.is_success() {
			let body = response.text().await.unwrap_or_default();
			error!(status = status.as_u16(), "token request rejected");
			return Err(KeycloakError::Auth(format!(
				"token endpoint returned {}: {}",
				status.as_u16(),
				error_message(&body)
			)));
		}

		let parsed: TokenResponse = response.json().await.map_err(|e| {
			error!(error = %e, "failed to parse token response");
			KeycloakError::Auth(format!("invalid token response: {e}"))
		})?;

		let access_token = parsed
			.access_token
			.filter(|token| !token.is_empty())
			.ok_or_else(|| KeycloakError::Auth("token response has no access_token".to_string()))?;

		let expires_at = Utc::now() + chrono::Duration::seconds(parsed.expires_in.max(0));
		debug!(%expires_at, "admin access token obtained");

		Ok(CachedToken {
			token: SecretString::new(access_token),
			expires_at,
		})
	}
}

#[async_trait]
impl TokenSource for AdminTokenProvider {
	async fn token(&self) -> Result<SecretString, KeycloakError> {
		let mut cached = self.cached.lock().await;

		if let Some(current) = cached.as_ref() {
			if current.is_fresh(Utc::now()) {
				return Ok(current.token.clone());
			}
			debug!("cached admin token is near expiry, refreshing");
		}

		let fresh = self.exchange().await?;
		let token = fresh.token.clone();
		*cached = Some(fresh);
		Ok(token)
	}

	async fn invalidate(&self) {
		debug!("dropping cached admin token");
		self.cached.lock().await.take();
	}
}
