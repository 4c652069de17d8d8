// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Report resolution pipeline.
//!
//! Drives the stack parser and the source map store over one inbound
//! error report. The resolved output always has the same length and order
//! as the parsed stack; anything that cannot be resolved falls back to
//! the minified position unchanged.

use tracing::{debug, instrument};

use vigil_monitor_core::{ErrorReport, ResolvedFrame, StackFrame};
use vigil_monitor_symbolicate::parse_stack;

use crate::store::{MapEntry, MapSource, SourceMapStore};

/// Resolves parsed stack frames to original source positions through a
/// process-wide [`SourceMapStore`].
pub struct ReportResolver<S> {
	store: SourceMapStore<S>,
}

impl<S: MapSource> ReportResolver<S> {
	pub fn new(source: S) -> Self {
		Self {
			store: SourceMapStore::new(source),
		}
	}

	/// Resolve one report: parse the raw stack, then resolve every frame
	/// in trace order.
	#[instrument(skip(self, report), fields(file_name = %report.file_name))]
	pub async fn resolve(&self, report: &ErrorReport) -> Vec<ResolvedFrame> {
		let frames = parse_stack(&report.raw_stack, &report.message);
		debug!(frames = frames.len(), "parsed raw stack");

		let mut resolved = Vec::with_capacity(frames.len());
		for frame in &frames {
			resolved.push(self.resolve_frame(frame).await);
		}
		resolved
	}

	/// Resolve a single frame, falling back to the frame's own position
	/// when no map, or no mapping at that position, is available.
	pub async fn resolve_frame(&self, frame: &StackFrame) -> ResolvedFrame {
		let base_name = bundle_base_name(&frame.file_name);

		let map = match self.store.entry(base_name).await {
			MapEntry::Loaded(map) => map,
			MapEntry::Missing => return ResolvedFrame::from_unmapped(frame),
		};

		match map.original_position_for(frame.lineno, frame.colno) {
			Some(original) => ResolvedFrame {
				file_name: original.source,
				lineno: original.line,
				colno: original.column,
				// A mapping without a name keeps the minified one.
				function: original.name.or_else(|| frame.function.clone()),
			},
			None => {
				debug!(
					file_name = %frame.file_name,
					lineno = frame.lineno,
					colno = frame.colno,
					"no mapping at position"
				);
				ResolvedFrame::from_unmapped(frame)
			}
		}
	}
}

/// The bundle file's base name, as uploaded maps are keyed: the path
/// component after the last separator.
fn bundle_base_name(file_name: &str) -> &str {
	file_name
		.rsplit(['/', '\\'])
		.next()
		.unwrap_or(file_name)
}
