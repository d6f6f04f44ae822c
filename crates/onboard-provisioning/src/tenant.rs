// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenant names derived from email addresses.
//!
//! The tenant is the first label of the email's domain, lowercased:
//! `alice@acme.co.uk` belongs to tenant `acme`.

use std::fmt;

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid email format")]
pub struct TenantError;

/// Lowercase slug identifying a tenant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TenantName(String);

impl TenantName {
	/// Derive the tenant from an email address.
	///
	/// Requires exactly one `@`, a non-empty local part, no whitespace, and a
	/// dotted domain whose labels are all non-empty.
	pub fn from_email(email: &str) -> Result<Self, TenantError> {
		validate_email(email)?;
		let (_, domain) = email.split_once('@').ok_or(TenantError)?;
		let first = domain.split('.').next().ok_or(TenantError)?;
		Ok(TenantName(first.to_lowercase()))
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for TenantName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl AsRef<str> for TenantName {
	fn as_ref(&self) -> &str {
		&self.0
	}
}

/// Shorthand for [`TenantName::from_email`].
pub fn extract_tenant_name(email: &str) -> Result<TenantName, TenantError> {
	TenantName::from_email(email)
}

/// Check the shape `local@label.label[...]` without touching the network.
pub fn validate_email(email: &str) -> Result<(), TenantError> {
	if email.chars().any(char::is_whitespace) {
		return Err(TenantError);
	}

	let mut parts = email.split('@');
	let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
		return Err(TenantError);
	};

	if local.is_empty() || !domain.contains('.') {
		return Err(TenantError);
	}
	if domain.split('.').any(str::is_empty) {
		return Err(TenantError);
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn takes_first_domain_label() {
		assert_eq!(extract_tenant_name("alice@acme.com").unwrap().as_str(), "acme");
		assert_eq!(extract_tenant_name("user@acme.co.uk").unwrap().as_str(), "acme");
		assert_eq!(
			extract_tenant_name("ops@eu.mail.acme.io").unwrap().as_str(),
			"eu"
		);
	}

	#[test]
	fn lowercases_domain() {
		assert_eq!(extract_tenant_name("Bob@ACME.Com").unwrap().as_str(), "acme");
	}

	#[test]
	fn rejects_malformed_addresses() {
		for email in [
			"",
			"not-an-email",
			"@acme.com",
			"alice@",
			"alice@acme",
			"alice@@acme.com",
			"a@b@acme.com",
			"alice @acme.com",
			"alice@.com",
			"alice@acme.",
			"alice@acme..com",
		] {
			assert_eq!(extract_tenant_name(email), Err(TenantError), "{email}");
		}
	}

	#[test]
	fn unsafe_label_characters_are_slugged_in_client_id() {
		let tenant = extract_tenant_name("x@my_co.com").unwrap();
		assert_eq!(tenant.as_str(), "my_co");
		assert_eq!(onboard_keycloak::client_id_for(tenant.as_str()), "client-my-co");
	}

	proptest! {
		#[test]
		fn tenant_is_lowercased_first_label(
			local in "[a-zA-Z0-9._+-]{1,20}",
			first in "[a-zA-Z0-9-]{1,20}",
			rest in prop::collection::vec("[a-zA-Z0-9-]{1,10}", 1..4),
		) {
			let email = format!("{local}@{first}.{}", rest.join("."));
			let tenant = extract_tenant_name(&email).unwrap();
			prop_assert_eq!(tenant.as_str(), first.to_lowercase());
		}

		#[test]
		fn addresses_without_at_are_rejected(s in "[a-z0-9.]{0,30}") {
			prop_assert!(extract_tenant_name(&s).is_err());
		}

		#[test]
		fn whitespace_anywhere_is_rejected(
			prefix in "[a-z]{1,10}",
			ws in "[ \t\n]",
		) {
			let email = format!("{prefix}{ws}@acme.com");
			prop_assert!(extract_tenant_name(&email).is_err());
		}
	}
}
