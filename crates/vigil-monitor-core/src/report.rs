// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error report and stack frame types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Inbound wire payload, carried base64-encoded in the `info` query
/// parameter of the ingestion endpoint.
///
/// Field names follow the browser `ErrorEvent` the reporting snippet
/// serializes; everything except `message` and `stack` tolerates absence.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportPayload {
	pub message: String,
	pub stack: String,
	#[serde(default)]
	pub lineno: u32,
	#[serde(default)]
	pub colno: u32,
	#[serde(default)]
	pub filename: String,
	/// DOM high-resolution timestamp, milliseconds.
	#[serde(rename = "timeStamp", default)]
	pub time_stamp: f64,
}

impl ReportPayload {
	/// Decode a payload from JSON bytes.
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		Ok(serde_json::from_slice(data)?)
	}
}

/// One decoded error report, constructed once per inbound request.
#[derive(Debug, Clone, Serialize)]
pub struct ErrorReport {
	pub message: String,
	pub raw_stack: String,
	/// Bundle file the error was reported against.
	pub file_name: String,
	pub lineno: u32,
	pub colno: u32,
	/// DOM high-resolution timestamp from the client, milliseconds.
	pub time_stamp: f64,
	/// When the server received the report.
	pub received_at: DateTime<Utc>,
}

impl ErrorReport {
	/// Build a report from a decoded payload, stamping the receive time.
	pub fn from_payload(payload: ReportPayload) -> Self {
		Self {
			message: payload.message,
			raw_stack: payload.stack,
			file_name: payload.filename,
			lineno: payload.lineno,
			colno: payload.colno,
			time_stamp: payload.time_stamp,
			received_at: Utc::now(),
		}
	}
}

/// One parsed call-site from a raw stack trace.
///
/// Lines are 1-based, columns 0-based, matching the runtime that produced
/// the trace.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StackFrame {
	pub function: Option<String>,
	pub file_name: String,
	pub lineno: u32,
	pub colno: u32,
	/// The trace line this frame was parsed from, kept for diagnostics.
	pub raw_line: String,
}

/// A frame after source-map resolution.
///
/// Either the original position recovered from a source map, or a verbatim
/// copy of the parsed frame when no mapping was available.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedFrame {
	pub file_name: String,
	pub lineno: u32,
	pub colno: u32,
	pub function: Option<String>,
}

impl ResolvedFrame {
	/// Identity fallback: carry the minified position through unchanged.
	pub fn from_unmapped(frame: &StackFrame) -> Self {
		Self {
			file_name: frame.file_name.clone(),
			lineno: frame.lineno,
			colno: frame.colno,
			function: frame.function.clone(),
		}
	}
}
