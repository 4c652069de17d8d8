// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Filesystem path configuration.

use std::path::PathBuf;

use serde::Deserialize;

/// Path configuration (runtime, fully resolved).
#[derive(Debug, Clone)]
pub struct PathsConfig {
	/// Directory uploaded source maps are persisted to and resolved from.
	pub sourcemap_dir: PathBuf,
}

impl Default for PathsConfig {
	fn default() -> Self {
		Self {
			sourcemap_dir: PathBuf::from("./uploads"),
		}
	}
}

/// Path configuration layer (partial, for merging).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfigLayer {
	#[serde(default)]
	pub sourcemap_dir: Option<PathBuf>,
}

impl PathsConfigLayer {
	pub fn merge(&mut self, other: PathsConfigLayer) {
		if other.sourcemap_dir.is_some() {
			self.sourcemap_dir = other.sourcemap_dir;
		}
	}

	pub fn finalize(self) -> PathsConfig {
		PathsConfig {
			sourcemap_dir: self
				.sourcemap_dir
				.unwrap_or_else(|| PathsConfig::default().sourcemap_dir),
		}
	}
}
