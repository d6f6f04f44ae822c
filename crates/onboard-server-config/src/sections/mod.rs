// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sections.

mod http;
mod keycloak;
mod logging;

pub use http::{HttpConfig, HttpConfigLayer};
pub use keycloak::{KeycloakConfig, KeycloakConfigLayer};
pub use logging::{LoggingConfig, LoggingConfigLayer};
