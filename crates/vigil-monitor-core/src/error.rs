// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error types for the monitoring data model.

use thiserror::Error;

/// Errors that can occur while decoding inbound monitoring data.
#[derive(Debug, Error)]
pub enum MonitorError {
	#[error("invalid report payload: {0}")]
	PayloadDecode(#[from] serde_json::Error),
}

/// Result type for monitoring data operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
