// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source map artifact persistence.
//!
//! Uploaded bytes are written verbatim under the configured directory as
//! `<name>`; the resolver later expects `<bundle>.map` names. No format
//! validation happens here — corrupt content is discovered, and
//! tolerated, at first resolution attempt.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::{MonitorServerError, Result};

/// Persists uploaded source map artifacts into a flat directory.
#[derive(Debug, Clone)]
pub struct MapUploads {
	dir: PathBuf,
}

impl MapUploads {
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Persist raw uploaded bytes as `<dir>/<name>`, creating the
	/// directory on first use. Returns the written path.
	pub async fn store(&self, name: &str, data: &[u8]) -> Result<PathBuf> {
		validate_artifact_name(name)?;

		tokio::fs::create_dir_all(&self.dir).await?;

		let target = self.dir.join(name);
		tokio::fs::write(&target, data).await?;

		info!(name = %name, bytes = data.len(), "stored source map artifact");
		Ok(target)
	}
}

/// Artifact names address files in one flat directory; anything that
/// could escape it is rejected.
fn validate_artifact_name(name: &str) -> Result<()> {
	if name.is_empty()
		|| name.len() > 255
		|| name.contains(['/', '\\'])
		|| name.contains("..")
	{
		return Err(MonitorServerError::InvalidArtifactName(name.to_string()));
	}
	Ok(())
}
