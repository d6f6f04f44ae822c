// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration for the onboard provisioning server.
//!
//! Values are layered from built-in defaults, an optional TOML file and the
//! environment, in increasing order of precedence.
//!
//! # Usage
//!
//! ```ignore
//! use onboard_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Provisioning into realm {}", config.keycloak.realm);
//! ```

pub mod error;
pub mod layer;
pub mod secret_env;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use layer::ServerConfigLayer;
pub use secret_env::{load_secret_env, SecretEnvError};
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use tracing::{debug, info};

const ADMIN_PASSWORD_ENV: &str = "ONBOARD_KEYCLOAK_ADMIN_PASSWORD";

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
	pub http: HttpConfig,
	pub keycloak: KeycloakConfig,
	pub logging: LoggingConfig,
}

impl ServerConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`ONBOARD_*`)
/// 2. Config file (`/etc/onboard/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<ServerConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<ServerConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = ServerConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	let admin_password = load_secret_env(ADMIN_PASSWORD_ENV)?;
	finalize(merged, admin_password)
}

/// Finalize configuration layer into resolved config.
fn finalize(
	layer: ServerConfigLayer,
	admin_password: Option<onboard_common_secret::SecretString>,
) -> Result<ServerConfig, ConfigError> {
	let http = layer.http.unwrap_or_default().finalize();
	let keycloak = layer.keycloak.unwrap_or_default().finalize(admin_password);
	let logging = layer.logging.unwrap_or_default().finalize();

	validate_keycloak(&keycloak)?;
	validate_url("http.base_url", &http.base_url)?;

	info!(
		host = %http.host,
		port = http.port,
		base_url = %http.base_url,
		keycloak_url = %keycloak.url,
		realm = %keycloak.realm,
		admin_username = %keycloak.admin_username,
		request_timeout_secs = keycloak.request_timeout_secs,
		"Server configuration loaded"
	);

	Ok(ServerConfig {
		http,
		keycloak,
		logging,
	})
}

fn validate_url(key: &str, value: &str) -> Result<(), ConfigError> {
	let parsed = url::Url::parse(value).map_err(|e| ConfigError::InvalidValue {
		key: key.to_string(),
		message: format!("'{value}' is not a valid URL: {e}"),
	})?;
	if !matches!(parsed.scheme(), "http" | "https") {
		return Err(ConfigError::InvalidValue {
			key: key.to_string(),
			message: format!("unsupported scheme '{}'", parsed.scheme()),
		});
	}
	Ok(())
}

fn validate_keycloak(keycloak: &KeycloakConfig) -> Result<(), ConfigError> {
	if keycloak.url.is_empty() {
		return Err(ConfigError::Validation(
			"keycloak url cannot be empty".to_string(),
		));
	}
	validate_url("keycloak.url", &keycloak.url)?;
	if keycloak.realm.is_empty() {
		return Err(ConfigError::Validation(
			"keycloak realm cannot be empty".to_string(),
		));
	}
	if keycloak.request_timeout_secs == 0 {
		return Err(ConfigError::Validation(
			"keycloak request_timeout_secs must be greater than zero".to_string(),
		));
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_socket_addr() {
		let config = ServerConfig {
			http: HttpConfig {
				host: "127.0.0.1".to_string(),
				port: 9000,
				base_url: "http://localhost:9000".to_string(),
			},
			..Default::default()
		};
		assert_eq!(config.socket_addr(), "127.0.0.1:9000");
	}

	#[test]
	fn test_zero_timeout_rejected() {
		let layer = ServerConfigLayer {
			keycloak: Some(KeycloakConfigLayer {
				request_timeout_secs: Some(0),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer, None).unwrap_err();
		assert!(err.to_string().contains("request_timeout_secs"));
	}

	#[test]
	fn test_empty_realm_rejected() {
		let layer = ServerConfigLayer {
			keycloak: Some(KeycloakConfigLayer {
				realm: Some(String::new()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(
			finalize(layer, None),
			Err(ConfigError::Validation(_))
		));
	}

	#[test]
	fn test_invalid_keycloak_url_rejected() {
		let layer = ServerConfigLayer {
			keycloak: Some(KeycloakConfigLayer {
				url: Some("localhost:8080".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		let err = finalize(layer, None).unwrap_err();
		assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "keycloak.url"));
	}

	#[test]
	fn test_invalid_base_url_rejected() {
		let layer = ServerConfigLayer {
			http: Some(HttpConfigLayer {
				base_url: Some("not a url".to_string()),
				..Default::default()
			}),
			..Default::default()
		};
		assert!(matches!(
			finalize(layer, None),
			Err(ConfigError::InvalidValue { .. })
		));
	}

	#[test]
	fn test_defaults_finalize() {
		let config = finalize(ServerConfigLayer::default(), None).unwrap();
		assert_eq!(config.keycloak.realm, "master");
		assert_eq!(config.http.port, 3002);
	}
}
