// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! HTTP server configuration.

use serde::Deserialize;

/// HTTP server configuration (runtime, fully resolved).
///
/// `base_url` is the public URL of the portal this server backs. Redirect URIs
/// and web origins of every provisioned client are derived from it.
#[derive(Debug, Clone)]
pub struct HttpConfig {
	pub host: String,
	pub port: u16,
	pub base_url: String,
}

impl Default for HttpConfig {
	fn default() -> Self {
		HttpConfigLayer::default().finalize()
	}
}

/// HTTP configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct HttpConfigLayer {
	#[serde(default)]
	pub host: Option<String>,
	#[serde(default)]
	pub port: Option<u16>,
	#[serde(default)]
	pub base_url: Option<String>,
}

impl HttpConfigLayer {
	pub fn merge(&mut self, other: HttpConfigLayer) {
		if other.host.is_some() {
			self.host = other.host;
		}
		if other.port.is_some() {
			self.port = other.port;
		}
		if other.base_url.is_some() {
			self.base_url = other.base_url;
		}
	}

	pub fn finalize(self) -> HttpConfig {
		let port = self.port.unwrap_or(3002);
		HttpConfig {
			host: self.host.unwrap_or_else(|| "0.0.0.0".to_string()),
			port,
			base_url: self
				.base_url
				.map(|url| url.trim_end_matches('/').to_string())
				.unwrap_or_else(|| format!("http://localhost:{port}")),
		}
	}
}
