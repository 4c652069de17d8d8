// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error monitor pipeline configuration.

use std::time::Duration;

use serde::Deserialize;

/// Monitor configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct MonitorConfig {
	/// Per-request ceiling for resolving one report, so a stuck or
	/// oversized map read cannot stall a request indefinitely.
	pub resolve_timeout_secs: u64,
}

impl Default for MonitorConfig {
	fn default() -> Self {
		Self {
			resolve_timeout_secs: 10,
		}
	}
}

impl MonitorConfig {
	pub fn resolve_timeout(&self) -> Duration {
		Duration::from_secs(self.resolve_timeout_secs)
	}
}

/// Monitor configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MonitorConfigLayer {
	#[serde(default)]
	pub resolve_timeout_secs: Option<u64>,
}

impl MonitorConfigLayer {
	pub fn merge(&mut self, other: MonitorConfigLayer) {
		if other.resolve_timeout_secs.is_some() {
			self.resolve_timeout_secs = other.resolve_timeout_secs;
		}
	}

	pub fn finalize(self) -> MonitorConfig {
		MonitorConfig {
			resolve_timeout_secs: self.resolve_timeout_secs.unwrap_or(10),
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn default_timeout_is_ten_seconds() {
		let config = MonitorConfigLayer::default().finalize();
		assert_eq!(config.resolve_timeout(), Duration::from_secs(10));
	}
}
