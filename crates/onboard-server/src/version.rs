// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Build information for onboard-server.

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Format version info for display.
pub fn format_version_info() -> String {
	format!(
		"onboard-server version: {}\n\
         Platform:               {}-{}",
		VERSION,
		std::env::consts::OS,
		std::env::consts::ARCH,
	)
}
