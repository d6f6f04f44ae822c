// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Loading secrets from the environment with `*_FILE` support.
//!
//! The admin password is the only secret onboard reads at startup. It can be
//! given directly (`ONBOARD_KEYCLOAK_ADMIN_PASSWORD`) or as a path to a mounted
//! secret file (`ONBOARD_KEYCLOAK_ADMIN_PASSWORD_FILE`), which is what Docker
//! and Kubernetes secrets produce.

use std::path::PathBuf;
use std::{env, fs};

use onboard_common_secret::SecretString;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SecretEnvError {
	#[error("failed to read secret file at {path}: {source}")]
	Io {
		path: PathBuf,
		#[source]
		source: std::io::Error,
	},

	#[error("secret file path in {var} is empty")]
	EmptyPath { var: String },
}

/// Load a secret using the `VAR` / `VAR_FILE` convention.
///
/// `{var}_FILE` wins over `{var}`. A single trailing newline is stripped from
/// file contents. Returns `Ok(None)` when neither is set or the direct value is
/// empty.
pub fn load_secret_env(var: &str) -> Result<Option<SecretString>, SecretEnvError> {
	let file_var = format!("{var}_FILE");

	if let Ok(path_str) = env::var(&file_var) {
		if path_str.is_empty() {
			return Err(SecretEnvError::EmptyPath { var: file_var });
		}

		let path = PathBuf::from(&path_str);
		let content = fs::read_to_string(&path).map_err(|e| SecretEnvError::Io {
			path: path.clone(),
			source: e,
		})?;

		let secret = content.strip_suffix('\n').unwrap_or(&content).to_string();
		return Ok(Some(SecretString::new(secret)));
	}

	match env::var(var) {
		Ok(value) if !value.is_empty() => Ok(Some(SecretString::new(value))),
		_ => Ok(None),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use std::io::Write;
	use tempfile::NamedTempFile;

	#[test]
	fn returns_none_when_not_set() {
		let var = "ONBOARD_TEST_SECRET_UNSET";
		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());
	}

	#[test]
	fn empty_direct_value_is_treated_as_unset() {
		let var = "ONBOARD_TEST_SECRET_EMPTY";
		env::set_var(var, "");
		env::remove_var(format!("{var}_FILE"));

		assert!(load_secret_env(var).unwrap().is_none());

		env::remove_var(var);
	}

	#[test]
	fn reads_from_direct_env_var() {
		let var = "ONBOARD_TEST_SECRET_DIRECT";
		env::set_var(var, "direct-password");
		env::remove_var(format!("{var}_FILE"));

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "direct-password");

		env::remove_var(var);
	}

	#[test]
	fn file_var_takes_precedence_and_strips_newline() {
		let var = "ONBOARD_TEST_SECRET_FILE";
		let mut temp_file = NamedTempFile::new().unwrap();
		writeln!(temp_file, "file-password").unwrap();

		env::set_var(var, "direct-password");
		env::set_var(format!("{var}_FILE"), temp_file.path().to_str().unwrap());

		let secret = load_secret_env(var).unwrap().unwrap();
		assert_eq!(secret.expose(), "file-password");

		env::remove_var(var);
		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn missing_file_is_an_error() {
		let var = "ONBOARD_TEST_SECRET_MISSING_FILE";
		env::set_var(format!("{var}_FILE"), "/nonexistent/onboard/secret");

		let result = load_secret_env(var);
		assert!(matches!(result, Err(SecretEnvError::Io { .. })));

		env::remove_var(format!("{var}_FILE"));
	}

	#[test]
	fn empty_file_path_is_an_error() {
		let var = "ONBOARD_TEST_SECRET_EMPTY_PATH";
		env::set_var(format!("{var}_FILE"), "");

		let result = load_secret_env(var);
		assert!(matches!(result, Err(SecretEnvError::EmptyPath { .. })));

		env::remove_var(format!("{var}_FILE"));
	}
}
