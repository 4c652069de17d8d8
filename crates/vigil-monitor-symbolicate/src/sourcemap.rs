// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Source Map v3 parsing and position lookup.
//!
//! Parses the published JSON format (`version`, `sources`, `names`,
//! `mappings`, optional `file`/`sourceRoot`; `sourcesContent` is tolerated
//! but not retained) and answers position queries against the decoded
//! mapping table.

use serde::Deserialize;

use crate::error::{Result, SymbolicateError};
use crate::vlq::{decode_mappings, MappingTable};

/// Raw source map JSON structure.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSourceMap {
	version: u32,
	#[serde(default)]
	file: Option<String>,
	#[serde(default)]
	source_root: Option<String>,
	sources: Vec<String>,
	names: Vec<String>,
	mappings: String,
}

/// A parsed source map ready for lookups.
///
/// Index bounds are validated at parse time, so lookups cannot fail, only
/// miss.
#[derive(Debug, Clone)]
pub struct SourceMap {
	/// Generated file name, if recorded.
	pub file: Option<String>,
	/// Root path prepended to source file names.
	pub source_root: Option<String>,
	/// Original source file paths.
	pub sources: Vec<String>,
	/// Original identifiers (function/variable names).
	pub names: Vec<String>,
	mappings: MappingTable,
}

/// Original position recovered from a source map lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OriginalPosition {
	/// Original source file path, with `sourceRoot` applied.
	pub source: String,
	/// Line in the original source (1-indexed for display).
	pub line: u32,
	/// Column in the original source (0-indexed).
	pub column: u32,
	/// Original identifier name, if the mapping recorded one.
	pub name: Option<String>,
}

impl SourceMap {
	/// Parse a source map from JSON bytes.
	pub fn from_slice(data: &[u8]) -> Result<Self> {
		let raw: RawSourceMap = serde_json::from_slice(data)?;

		if raw.version != 3 {
			return Err(SymbolicateError::InvalidSourceMapVersion(raw.version));
		}

		let mappings = decode_mappings(&raw.mappings)?;

		if let Some(max) = mappings.max_source_index() {
			if max as usize >= raw.sources.len() {
				return Err(SymbolicateError::InvalidSourceIndex(max));
			}
		}
		if let Some(max) = mappings.max_name_index() {
			if max as usize >= raw.names.len() {
				return Err(SymbolicateError::InvalidNameIndex(max));
			}
		}

		Ok(Self {
			file: raw.file,
			source_root: raw.source_root,
			sources: raw.sources,
			names: raw.names,
			mappings,
		})
	}

	/// Parse a source map from a JSON string.
	#[allow(clippy::should_implement_trait)]
	pub fn from_str(data: &str) -> Result<Self> {
		Self::from_slice(data.as_bytes())
	}

	/// Look up the original position for a generated line and column.
	///
	/// The generated line is 1-indexed (as stack traces display it), the
	/// column 0-indexed. `None` when the map has no mapping at or before
	/// that position (sparse maps).
	pub fn original_position_for(&self, line: u32, column: u32) -> Option<OriginalPosition> {
		let entry = self.mappings.find(line.saturating_sub(1), column)?;

		let source = &self.sources[entry.source as usize];
		let name = entry.name.map(|idx| self.names[idx as usize].clone());

		Some(OriginalPosition {
			source: self.resolve_source_path(source),
			line: entry.original_line + 1,
			column: entry.original_column,
			name,
		})
	}

	/// Apply the `sourceRoot` prefix to a source path, if present.
	fn resolve_source_path(&self, source: &str) -> String {
		match &self.source_root {
			Some(root) if !root.is_empty() => {
				format!("{}/{}", root.trim_end_matches('/'), source)
			}
			_ => source.to_string(),
		}
	}

	/// Number of mappings available for lookups.
	pub fn mapping_count(&self) -> usize {
		self.mappings.len()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn sample_source_map() -> &'static str {
		r#"{
			"version": 3,
			"file": "out.js",
			"sourceRoot": "",
			"sources": ["src/index.ts"],
			"names": ["hello", "console", "log"],
			"mappings": "AAAA,SAASA,KAAKT,CAAC;AACXC,OAAQ,CAACC,GAAG,CAAC,eAAe,CAAC,CAAC;AAClC,CAAC;AAEDF,KAAK,EAAE,CAAC"
		}"#
	}

	#[test]
	fn parses_v3_document() {
		let map = SourceMap::from_str(sample_source_map()).unwrap();

		assert_eq!(map.file, Some("out.js".to_string()));
		assert_eq!(map.sources, vec!["src/index.ts"]);
		assert_eq!(map.names, vec!["hello", "console", "log"]);
		assert!(map.mapping_count() > 0);
	}

	#[test]
	fn looks_up_original_position() {
		let map = SourceMap::from_str(sample_source_map()).unwrap();

		let pos = map.original_position_for(1, 0).unwrap();
		assert_eq!(pos.source, "src/index.ts");
		assert_eq!(pos.line, 1);
	}

	#[test]
	fn sparse_map_misses_return_none() {
		let json = r#"{
			"version": 3,
			"sources": ["app.js"],
			"names": [],
			"mappings": ";;;;UAyCO"
		}"#;
		let map = SourceMap::from_str(json).unwrap();

		// Mapped: generated line 5, column 10 -> app.js:42:7.
		let pos = map.original_position_for(5, 10).unwrap();
		assert_eq!(pos.source, "app.js");
		assert_eq!(pos.line, 42);
		assert_eq!(pos.column, 7);

		// Line 3 has no mappings at all.
		assert!(map.original_position_for(3, 2).is_none());
	}

	#[test]
	fn rejects_unsupported_version() {
		let json = r#"{"version": 2, "sources": [], "names": [], "mappings": ""}"#;
		assert!(matches!(
			SourceMap::from_str(json),
			Err(SymbolicateError::InvalidSourceMapVersion(2))
		));
	}

	#[test]
	fn rejects_out_of_bounds_source_index() {
		// "ACAA" references source index 1 with a single-entry sources list.
		let json = r#"{"version": 3, "sources": ["only.ts"], "names": [], "mappings": "ACAA"}"#;
		assert!(matches!(
			SourceMap::from_str(json),
			Err(SymbolicateError::InvalidSourceIndex(1))
		));
	}

	#[test]
	fn rejects_malformed_json() {
		assert!(matches!(
			SourceMap::from_slice(b"{not json"),
			Err(SymbolicateError::InvalidSourceMapJson(_))
		));
	}

	#[test]
	fn tolerates_sources_content() {
		let json = r#"{
			"version": 3,
			"sources": ["a.ts"],
			"sourcesContent": ["let x = 1;"],
			"names": [],
			"mappings": "AAAA"
		}"#;
		assert!(SourceMap::from_str(json).is_ok());
	}

	#[test]
	fn source_root_is_applied() {
		let json = r#"{
			"version": 3,
			"sourceRoot": "src/",
			"sources": ["index.ts"],
			"names": [],
			"mappings": "AAAA"
		}"#;
		let map = SourceMap::from_str(json).unwrap();

		let pos = map.original_position_for(1, 0).unwrap();
		assert_eq!(pos.source, "src/index.ts");
	}
}
