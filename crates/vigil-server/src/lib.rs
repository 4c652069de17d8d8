// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights
// reserved. SPDX-License-Identifier: Proprietary

//! Vigil frontend error monitoring server.
//!
//! This crate provides the HTTP transport around the resolution pipeline:
//! report ingestion, source map uploads, and a health probe. Everything
//! stateful lives in `vigil-server-monitor`; handlers here decode, call
//! the pipeline, and log.

pub mod routes;

use std::sync::Arc;
use std::time::Duration;

use axum::{
	routing::{get, post},
	Router,
};

use vigil_server_config::VigilConfig;
use vigil_server_monitor::{DirectoryMaps, MapUploads, ReportResolver};

/// Shared state for all request handlers.
#[derive(Clone)]
pub struct AppState {
	/// Process-wide resolver; its store caches map consumers across requests.
	pub resolver: Arc<ReportResolver<DirectoryMaps>>,
	pub uploads: MapUploads,
	pub resolve_timeout: Duration,
}

/// Build the application state from resolved configuration.
pub fn create_app_state(config: &VigilConfig) -> AppState {
	let dir = &config.paths.sourcemap_dir;
	AppState {
		resolver: Arc::new(ReportResolver::new(DirectoryMaps::new(dir))),
		uploads: MapUploads::new(dir),
		resolve_timeout: config.monitor.resolve_timeout(),
	}
}

/// Build the router with all monitor routes.
pub fn create_router(state: AppState) -> Router {
	Router::new()
		.route("/health", get(routes::health::health_check))
		.route("/monitor/error", get(routes::monitor::ingest_error))
		.route("/monitor/sourcemap", post(routes::monitor::upload_sourcemap))
		.with_state(state)
}
