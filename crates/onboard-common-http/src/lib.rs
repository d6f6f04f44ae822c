// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Shared HTTP utilities for onboard.
//!
//! Every outbound call to the identity provider goes through a client built
//! here, so all of them carry the same User-Agent and a bounded timeout.

mod client;

pub use client::{builder, client_with_timeout, user_agent, DEFAULT_TIMEOUT};
