// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Health probe handler.

use axum::extract::State;
use axum::Json;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	/// Whether the source map directory exists or could be created.
	pub uploads_writable: bool,
}

/// GET /health - deployment probe.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
	let uploads_writable = tokio::fs::create_dir_all(state.uploads.dir()).await.is_ok();

	Json(HealthResponse {
		status: "ok",
		uploads_writable,
	})
}
