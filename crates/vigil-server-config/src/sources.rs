// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Configuration sources: defaults, TOML files, and environment variables.

use std::path::PathBuf;

use tracing::debug;

use crate::error::ConfigError;
use crate::sections::{
	HttpConfigLayer, LoggingConfigLayer, MonitorConfigLayer, PathsConfigLayer,
};
use crate::VigilConfigLayer;

/// Source precedence levels (higher = overrides lower).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
	Defaults = 10,
	ConfigFile = 20,
	Environment = 50,
}

/// Trait for configuration sources.
pub trait ConfigSource: Send + Sync {
	fn name(&self) -> &'static str;
	fn precedence(&self) -> Precedence;
	fn load(&self) -> Result<VigilConfigLayer, ConfigError>;
}

/// Built-in defaults source.
pub struct DefaultsSource;

impl ConfigSource for DefaultsSource {
	fn name(&self) -> &'static str {
		"defaults"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Defaults
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		Ok(VigilConfigLayer::default())
	}
}

/// TOML file configuration source.
pub struct TomlSource {
	path: PathBuf,
}

impl TomlSource {
	pub fn new(path: impl Into<PathBuf>) -> Self {
		Self { path: path.into() }
	}

	pub fn system() -> Self {
		Self::new("/etc/vigil/server.toml")
	}
}

impl ConfigSource for TomlSource {
	fn name(&self) -> &'static str {
		"toml-config"
	}

	fn precedence(&self) -> Precedence {
		Precedence::ConfigFile
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		if !self.path.exists() {
			debug!(path = %self.path.display(), "config file not found, skipping");
			return Ok(VigilConfigLayer::default());
		}

		debug!(path = %self.path.display(), "loading config file");
		let content = std::fs::read_to_string(&self.path).map_err(|e| ConfigError::FileRead {
			path: self.path.clone(),
			source: e,
		})?;

		toml::from_str(&content).map_err(|e| ConfigError::TomlParse {
			path: self.path.clone(),
			source: e,
		})
	}
}

/// Environment variable source.
///
/// Convention: VIGIL_SERVER_<SECTION>_<FIELD>
pub struct EnvSource;

impl ConfigSource for EnvSource {
	fn name(&self) -> &'static str {
		"environment"
	}

	fn precedence(&self) -> Precedence {
		Precedence::Environment
	}

	fn load(&self) -> Result<VigilConfigLayer, ConfigError> {
		Ok(VigilConfigLayer {
			http: Some(load_http_from_env()?),
			paths: Some(load_paths_from_env()),
			monitor: Some(load_monitor_from_env()?),
			logging: Some(load_logging_from_env()),
		})
	}
}

fn env_var(name: &str) -> Option<String> {
	std::env::var(name).ok().filter(|s| !s.is_empty())
}

fn load_http_from_env() -> Result<HttpConfigLayer, ConfigError> {
	let port = match env_var("VIGIL_SERVER_HTTP_PORT") {
		Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
			key: "VIGIL_SERVER_HTTP_PORT",
			message: format!("expected a port number, got {raw:?}"),
		})?),
		None => None,
	};

	Ok(HttpConfigLayer {
		host: env_var("VIGIL_SERVER_HTTP_HOST"),
		port,
	})
}

fn load_paths_from_env() -> PathsConfigLayer {
	PathsConfigLayer {
		sourcemap_dir: env_var("VIGIL_SERVER_PATHS_SOURCEMAP_DIR").map(PathBuf::from),
	}
}

fn load_monitor_from_env() -> Result<MonitorConfigLayer, ConfigError> {
	let resolve_timeout_secs = match env_var("VIGIL_SERVER_MONITOR_RESOLVE_TIMEOUT_SECS") {
		Some(raw) => Some(raw.parse().map_err(|_| ConfigError::InvalidValue {
			key: "VIGIL_SERVER_MONITOR_RESOLVE_TIMEOUT_SECS",
			message: format!("expected seconds, got {raw:?}"),
		})?),
		None => None,
	};

	Ok(MonitorConfigLayer {
		resolve_timeout_secs,
	})
}

fn load_logging_from_env() -> LoggingConfigLayer {
	LoggingConfigLayer {
		level: env_var("VIGIL_SERVER_LOGGING_LEVEL"),
	}
}
