// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for server-side monitor operations.

use thiserror::Error;

/// Errors that can occur in server-side monitor operations.
#[derive(Debug, Error)]
pub enum MonitorServerError {
	#[error("invalid artifact name: {0}")]
	InvalidArtifactName(String),

	#[error("io error: {0}")]
	Io(#[from] std::io::Error),
}

/// Result type for server-side monitor operations.
pub type Result<T> = std::result::Result<T, MonitorServerError>;
