// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error report ingestion and source map upload handlers.
//!
//! Reports arrive the way the browser snippet sends them: a base64-encoded
//! JSON object in the `info` query parameter of a GET (the snippet fires
//! it through an `Image` beacon). A malformed payload is the only
//! externally visible failure; everything past decoding resolves
//! best-effort and responds with an empty 200.

use axum::body::Bytes;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;

use vigil_monitor_core::{ErrorReport, ReportPayload};
use vigil_server_monitor::MonitorServerError;

use crate::AppState;

/// Error body for rejected requests.
#[derive(Debug, Serialize)]
pub struct MonitorErrorResponse {
	pub error: String,
	pub message: String,
}

fn bad_request(error: &str, message: String) -> (StatusCode, Json<MonitorErrorResponse>) {
	(
		StatusCode::BAD_REQUEST,
		Json(MonitorErrorResponse {
			error: error.to_string(),
			message,
		}),
	)
}

#[derive(Debug, Deserialize)]
pub struct IngestQuery {
	/// Base64-encoded JSON report payload.
	pub info: String,
}

/// GET /monitor/error - ingest one frontend error report.
pub async fn ingest_error(
	State(state): State<AppState>,
	Query(query): Query<IngestQuery>,
) -> Result<StatusCode, (StatusCode, Json<MonitorErrorResponse>)> {
	let bytes = base64::engine::general_purpose::STANDARD
		.decode(query.info.as_bytes())
		.map_err(|e| bad_request("invalid_base64", format!("info is not valid base64: {e}")))?;

	let payload = ReportPayload::from_slice(&bytes)
		.map_err(|e| bad_request("invalid_payload", format!("info is not a report: {e}")))?;

	let report = ErrorReport::from_payload(payload);

	match tokio::time::timeout(state.resolve_timeout, state.resolver.resolve(&report)).await {
		Ok(resolved) => {
			tracing::error!(
				target: "frontend",
				message = %report.message,
				file_name = %report.file_name,
				lineno = report.lineno,
				colno = report.colno,
				time_stamp = report.time_stamp,
				received_at = %report.received_at,
				resolved_stack = %serde_json::to_string(&resolved).unwrap_or_default(),
				"frontend error report"
			);
		}
		Err(_) => {
			warn!(
				message = %report.message,
				file_name = %report.file_name,
				"report resolution timed out, logging unresolved"
			);
			tracing::error!(
				target: "frontend",
				message = %report.message,
				file_name = %report.file_name,
				lineno = report.lineno,
				colno = report.colno,
				raw_stack = %report.raw_stack,
				received_at = %report.received_at,
				"frontend error report (unresolved)"
			);
		}
	}

	// The beacon never reads the response; an empty 200 is the contract.
	Ok(StatusCode::OK)
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
	/// Artifact file name, expected as `<bundle>.map`.
	pub name: String,
}

/// POST /monitor/sourcemap - persist an uploaded source map artifact.
pub async fn upload_sourcemap(
	State(state): State<AppState>,
	Query(query): Query<UploadQuery>,
	body: Bytes,
) -> Result<StatusCode, (StatusCode, Json<MonitorErrorResponse>)> {
	match state.uploads.store(&query.name, &body).await {
		Ok(_) => Ok(StatusCode::OK),
		Err(MonitorServerError::InvalidArtifactName(name)) => Err(bad_request(
			"invalid_artifact_name",
			format!("refusing to store artifact named {name:?}"),
		)),
		Err(e) => {
			tracing::error!(error = %e, name = %query.name, "failed to store source map");
			Err((
				StatusCode::INTERNAL_SERVER_ERROR,
				Json(MonitorErrorResponse {
					error: "storage_failed".to_string(),
					message: "failed to persist source map".to_string(),
				}),
			))
		}
	}
}
