// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Centralized configuration management for the Vigil server.
//!
//! This crate provides:
//! - Layered configuration from multiple sources (defaults, TOML file, environment)
//! - Type-safe configuration with validation
//! - Consistent environment variable naming (`VIGIL_SERVER_*`)
//!
//! # Usage
//!
//! ```ignore
//! use vigil_server_config::load_config;
//!
//! let config = load_config()?;
//! println!("Server listening on {}:{}", config.http.host, config.http.port);
//! ```

pub mod error;
pub mod sections;
pub mod sources;

pub use error::ConfigError;
pub use sections::*;
pub use sources::{ConfigSource, DefaultsSource, EnvSource, Precedence, TomlSource};

use serde::Deserialize;
use tracing::debug;

/// Fully resolved server configuration.
#[derive(Debug, Clone, Default)]
pub struct VigilConfig {
	pub http: HttpConfig,
	pub paths: PathsConfig,
	pub monitor: MonitorConfig,
	pub logging: LoggingConfig,
}

impl VigilConfig {
	/// Get the socket address string for binding.
	pub fn socket_addr(&self) -> String {
		format!("{}:{}", self.http.host, self.http.port)
	}
}

/// Partial configuration produced by one source, merged by precedence.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VigilConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub paths: Option<PathsConfigLayer>,
	#[serde(default)]
	pub monitor: Option<MonitorConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

impl VigilConfigLayer {
	pub fn merge(&mut self, other: VigilConfigLayer) {
		merge_section(&mut self.http, other.http, HttpConfigLayer::merge);
		merge_section(&mut self.paths, other.paths, PathsConfigLayer::merge);
		merge_section(&mut self.monitor, other.monitor, MonitorConfigLayer::merge);
		merge_section(&mut self.logging, other.logging, LoggingConfigLayer::merge);
	}
}

fn merge_section<T>(base: &mut Option<T>, other: Option<T>, merge: impl Fn(&mut T, T)) {
	match (base.as_mut(), other) {
		(Some(base), Some(other)) => merge(base, other),
		(None, Some(other)) => *base = Some(other),
		_ => {}
	}
}

/// Load configuration from all sources with standard precedence.
///
/// Precedence (highest to lowest):
/// 1. Environment variables (`VIGIL_SERVER_*`)
/// 2. Config file (`/etc/vigil/server.toml`)
/// 3. Built-in defaults
pub fn load_config() -> Result<VigilConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::system()),
		Box::new(EnvSource),
	])
}

/// Load configuration from environment only (for testing or simple deployments).
pub fn load_config_from_env() -> Result<VigilConfig, ConfigError> {
	load_from_sources(vec![Box::new(DefaultsSource), Box::new(EnvSource)])
}

/// Load configuration with a custom config file path.
pub fn load_config_with_file(
	config_path: impl Into<std::path::PathBuf>,
) -> Result<VigilConfig, ConfigError> {
	load_from_sources(vec![
		Box::new(DefaultsSource),
		Box::new(TomlSource::new(config_path)),
		Box::new(EnvSource),
	])
}

fn load_from_sources(mut sources: Vec<Box<dyn ConfigSource>>) -> Result<VigilConfig, ConfigError> {
	sources.sort_by_key(|s| s.precedence());

	let mut merged = VigilConfigLayer::default();
	for source in sources {
		debug!(source = source.name(), "loading configuration source");
		merged.merge(source.load()?);
	}

	Ok(finalize(merged))
}

fn finalize(layer: VigilConfigLayer) -> VigilConfig {
	VigilConfig {
		http: layer.http.unwrap_or_default().finalize(),
		paths: layer.paths.unwrap_or_default().finalize(),
		monitor: layer.monitor.unwrap_or_default().finalize(),
		logging: layer.logging.unwrap_or_default().finalize(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn empty_layers_finalize_to_defaults() {
		let config = finalize(VigilConfigLayer::default());
		assert_eq!(config.socket_addr(), "127.0.0.1:7001");
		assert_eq!(config.monitor.resolve_timeout_secs, 10);
		assert_eq!(config.logging.level, "info");
	}

	#[test]
	fn later_layer_wins_per_field() {
		let mut merged = VigilConfigLayer {
			http: Some(HttpConfigLayer {
				host: Some("10.0.0.1".to_string()),
				port: Some(7001),
			}),
			..Default::default()
		};
		merged.merge(VigilConfigLayer {
			http: Some(HttpConfigLayer {
				host: None,
				port: Some(9001),
			}),
			..Default::default()
		});

		let config = finalize(merged);
		assert_eq!(config.http.host, "10.0.0.1");
		assert_eq!(config.http.port, 9001);
	}

	#[test]
	fn file_layer_fills_missing_sections() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("server.toml");
		std::fs::write(&path, "[monitor]\nresolve_timeout_secs = 3\n").unwrap();

		let config = load_config_with_file(&path).unwrap();
		assert_eq!(config.monitor.resolve_timeout_secs, 3);
		// Untouched sections keep their defaults.
		assert_eq!(config.http.port, 7001);
	}
}
