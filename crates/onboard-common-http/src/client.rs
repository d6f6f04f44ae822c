// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP client with consistent User-Agent header and timeouts.

use reqwest::{Client, ClientBuilder};
use std::time::Duration;

/// Upper bound on a single request when the caller does not configure one.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Creates a new HTTP client builder with the standard onboard User-Agent
/// header and [`DEFAULT_TIMEOUT`].
///
/// Use this when you need to customize the client further.
///
/// # Example
/// ```ignore
/// let client = onboard_common_http::builder()
///     .connect_timeout(Duration::from_secs(2))
///     .build()?;
/// ```
pub fn builder() -> ClientBuilder {
	Client::builder()
		.user_agent(user_agent())
		.timeout(DEFAULT_TIMEOUT)
}

/// Builds a client whose every request is bounded by `timeout`.
pub fn client_with_timeout(timeout: Duration) -> Result<Client, reqwest::Error> {
	builder().timeout(timeout).build()
}

/// Returns the standard onboard User-Agent string.
///
/// Format: `onboard/{version}`
pub fn user_agent() -> String {
	format!("onboard/{}", env!("CARGO_PKG_VERSION"))
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn user_agent_has_correct_format() {
		let ua = user_agent();
		let parts: Vec<&str> = ua.split('/').collect();
		assert_eq!(parts.len(), 2);
		assert_eq!(parts[0], "onboard");
		assert!(!parts[1].is_empty());
	}

	#[test]
	fn client_with_custom_timeout_builds() {
		let client = client_with_timeout(Duration::from_secs(3));
		assert!(client.is_ok());
	}
}
