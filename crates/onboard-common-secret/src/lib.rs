// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Redacting wrapper for the sensitive values onboard handles.
//!
//! Three kinds of secret flow through the provisioning path: the admin
//! password used for the password grant, the bearer token it yields, and the
//! client secret read back after a client is registered. [`Secret<T>`] keeps
//! all of them out of logs and response bodies:
//!
//! - Debug and Display print `[REDACTED]`
//! - Serialize writes `"[REDACTED]"`, so a secret embedded in a response DTO
//!   can never reach the wire
//! - the inner value is zeroized on drop
//! - reading the value requires an explicit `.expose()`
//!
//! ```
//! use onboard_common_secret::SecretString;
//!
//! let password = SecretString::new("hunter2".to_string());
//! assert_eq!(format!("{password}"), "[REDACTED]");
//! assert_eq!(password.expose(), "hunter2");
//! ```

use std::fmt;
use zeroize::Zeroize;

/// The placeholder written wherever a secret would otherwise appear.
pub const REDACTED: &str = "[REDACTED]";

/// A value that must never be printed, logged or serialized.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct Secret<T>
where
	T: Zeroize,
{
	inner: T,
}

/// Convenience alias for the common case of secret strings.
pub type SecretString = Secret<String>;

impl<T> Secret<T>
where
	T: Zeroize,
{
	pub fn new(inner: T) -> Self {
		Self { inner }
	}

	/// Explicitly access the inner value.
	///
	/// Every call site that needs the raw value (building an `Authorization`
	/// header, filling the token form) goes through here, which keeps secret
	/// access greppable.
	pub fn expose(&self) -> &T {
		&self.inner
	}

	/// Return a copy of the inner value. The wrapper's own memory is still
	/// zeroized when it drops.
	pub fn into_inner(self) -> T
	where
		T: Clone,
	{
		self.inner.clone()
	}
}

impl SecretString {
	pub fn is_empty(&self) -> bool {
		self.inner.is_empty()
	}
}

impl From<String> for SecretString {
	fn from(value: String) -> Self {
		Self::new(value)
	}
}

impl From<&str> for SecretString {
	fn from(value: &str) -> Self {
		Self::new(value.to_string())
	}
}

impl<T> Clone for Secret<T>
where
	T: Zeroize + Clone,
{
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
		}
	}
}

impl<T> fmt::Debug for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Secret").field(&REDACTED).finish()
	}
}

impl<T> fmt::Display for Secret<T>
where
	T: Zeroize,
{
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(REDACTED)
	}
}

impl<T> PartialEq for Secret<T>
where
	T: Zeroize + PartialEq,
{
	fn eq(&self, other: &Self) -> bool {
		self.inner == other.inner
	}
}

impl<T> Eq for Secret<T> where T: Zeroize + Eq {}

#[cfg(feature = "serde")]
mod serde_impl {
	use super::{Secret, REDACTED};
	use serde::{Deserialize, Deserializer, Serialize, Serializer};
	use zeroize::Zeroize;

	impl<T> Serialize for Secret<T>
	where
		T: Serialize + Zeroize,
	{
		fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
		where
			S: Serializer,
		{
			serializer.serialize_str(REDACTED)
		}
	}

	impl<'de, T> Deserialize<'de> for Secret<T>
	where
		T: Deserialize<'de> + Zeroize,
	{
		fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
		where
			D: Deserializer<'de>,
		{
			let inner = T::deserialize(deserializer)?;
			Ok(Secret::new(inner))
		}
	}
}
