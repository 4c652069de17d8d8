// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Stack trace grammar and source map engine for Vigil error monitoring.
//!
//! This crate provides the computation-only half of error report
//! resolution:
//! - Parsing raw V8-style stack trace strings into structured frames
//! - Parsing JavaScript/TypeScript source maps (v3)
//! - Looking up minified positions in a decoded mapping table
//!
//! Nothing in here performs I/O or holds shared state; the caching,
//! file-backed store lives in `vigil-server-monitor`.
//!
//! # Example
//!
//! ```
//! use vigil_monitor_symbolicate::{parse_stack, SourceMap};
//!
//! let frames = parse_stack(
//!     "Error: boom\n    at foo (bundle.js:5:10)",
//!     "boom",
//! );
//! assert_eq!(frames.len(), 1);
//! assert_eq!(frames[0].file_name, "bundle.js");
//!
//! let map = SourceMap::from_str(r#"{
//!     "version": 3,
//!     "sources": ["src/app.ts"],
//!     "names": [],
//!     "mappings": "AAAA"
//! }"#).unwrap();
//! let original = map.original_position_for(1, 0).unwrap();
//! assert_eq!(original.source, "src/app.ts");
//! ```

pub mod error;
pub mod sourcemap;
pub mod stack;
pub mod vlq;

// Re-export main types
pub use error::{Result, SymbolicateError};
pub use sourcemap::{OriginalPosition, SourceMap};
pub use stack::parse_stack;
pub use vlq::{decode_mappings, MappingEntry, MappingTable};
