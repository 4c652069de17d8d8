// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Raw stack trace parsing for V8-style traces.
//!
//! Turns the loosely structured multi-line `stack` string a browser
//! attaches to an error into structured frames. The grammar:
//!
//! ```text
//! <ErrorKind>: <message>          <- header, discarded
//!     at <function> (<file>:<line>:<column>)
//!     at <file>:<line>:<column>   <- anonymous frame
//!     at native                   <- no location, skipped
//! ```
//!
//! Lines that do not yield a `file:line:column` triple are skipped rather
//! than emitted degraded; order among kept frames is preserved.

use vigil_monitor_core::StackFrame;

/// Parse a raw stack trace into ordered frames, innermost call first.
///
/// `message` is the error message the header line carries; when the
/// message itself spans lines it bounds how many leading lines belong to
/// the header. Malformed individual lines never fail the parse.
pub fn parse_stack(raw_stack: &str, message: &str) -> Vec<StackFrame> {
	if raw_stack.trim().is_empty() {
		return Vec::new();
	}

	// The header is `<Kind>: <message>`, so it occupies as many lines as
	// the message does (at least one).
	let header_lines = message.lines().count().max(1);

	raw_stack
		.lines()
		.skip(header_lines)
		.filter_map(parse_frame_line)
		.collect()
}

/// Parse one candidate call-site line. `None` for anything that does not
/// carry a usable `file:line:column` triple.
fn parse_frame_line(line: &str) -> Option<StackFrame> {
	let rest = line.trim_start().strip_prefix("at ")?.trim_end();

	let (function, location) = split_location(rest)?;
	let (file, lineno, colno) = parse_location(location)?;

	// Trace lines are 1-based; a zero line never comes from a real frame.
	if lineno == 0 {
		return None;
	}

	Some(StackFrame {
		function,
		file_name: strip_url_decoration(file),
		lineno,
		colno,
		raw_line: line.to_string(),
	})
}

/// Split a frame body into its optional function name and its location.
///
/// Function names can themselves contain parentheses
/// (`Object.(anonymous function)`), so the location is the last
/// parenthesized group on the line, never the first. Frames without
/// parentheses are anonymous and the whole body is the location.
fn split_location(rest: &str) -> Option<(Option<String>, &str)> {
	if let Some(body) = rest.strip_suffix(')') {
		let open = body.rfind('(')?;
		let function = body[..open].trim();
		let function = (!function.is_empty()).then(|| function.to_string());
		Some((function, &body[open + 1..]))
	} else {
		Some((None, rest))
	}
}

/// Split `<file>:<line>:<column>` from the right, so colons inside the
/// file portion (`http://host:8080/bundle.js`) survive.
fn parse_location(location: &str) -> Option<(&str, u32, u32)> {
	let mut parts = location.rsplitn(3, ':');
	let colno = parts.next()?.parse().ok()?;
	let lineno = parts.next()?.parse().ok()?;
	let file = parts.next()?;

	// eval frames nest a whole location inside the group; whitespace or
	// brackets in the file portion mean this was not a plain triple.
	if file.is_empty() || file.contains(['(', ')']) || file.contains(char::is_whitespace) {
		return None;
	}

	Some((file, lineno, colno))
}

/// Reduce a possibly URL-decorated file reference to its path: strip any
/// `?query`/`#fragment` suffix and any `scheme://host[:port]` prefix.
fn strip_url_decoration(file: &str) -> String {
	let file = file.split(['?', '#']).next().unwrap_or(file);

	match file.find("://") {
		Some(idx) => {
			let after_scheme = &file[idx + 3..];
			match after_scheme.find('/') {
				Some(slash) => after_scheme[slash..].to_string(),
				None => after_scheme.to_string(),
			}
		}
		None => file.to_string(),
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	#[test]
	fn parses_named_frames_in_order() {
		let stack = "Error: boom\n    at foo (bundle.js:5:10)\n    at bar (bundle.js:3:2)";

		let frames = parse_stack(stack, "boom");

		assert_eq!(frames.len(), 2);
		assert_eq!(frames[0].function.as_deref(), Some("foo"));
		assert_eq!(frames[0].file_name, "bundle.js");
		assert_eq!(frames[0].lineno, 5);
		assert_eq!(frames[0].colno, 10);
		assert_eq!(frames[1].function.as_deref(), Some("bar"));
		assert_eq!(frames[1].lineno, 3);
		assert_eq!(frames[1].colno, 2);
	}

	#[test]
	fn anonymous_frame_without_parens() {
		let stack = "ReferenceError: xxx is not defined\n    at http://localhost:9000/bundle.js:1:970";

		let frames = parse_stack(stack, "xxx is not defined");

		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].function, None);
		assert_eq!(frames[0].file_name, "/bundle.js");
		assert_eq!(frames[0].lineno, 1);
		assert_eq!(frames[0].colno, 970);
	}

	#[test]
	fn locationless_frames_yield_empty_stack() {
		let frames = parse_stack("Error: x\n  at <anonymous>", "x");
		assert!(frames.is_empty());
	}

	#[test]
	fn unrecognizable_lines_are_skipped_keeping_order() {
		let stack = concat!(
			"Error: boom\n",
			"    at first (bundle.js:1:1)\n",
			"    at native\n",
			"    at second (bundle.js:2:2)\n",
			"    some garbage line\n",
			"    at third (bundle.js:3:3)",
		);

		let frames = parse_stack(stack, "boom");

		let names: Vec<_> = frames.iter().filter_map(|f| f.function.as_deref()).collect();
		assert_eq!(names, ["first", "second", "third"]);
	}

	#[test]
	fn function_name_containing_parens_uses_last_group() {
		let stack = "TypeError: nope\n    at Object.(anonymous function) (bundle.js:7:42)";

		let frames = parse_stack(stack, "nope");

		assert_eq!(frames.len(), 1);
		assert_eq!(
			frames[0].function.as_deref(),
			Some("Object.(anonymous function)")
		);
		assert_eq!(frames[0].file_name, "bundle.js");
		assert_eq!(frames[0].lineno, 7);
		assert_eq!(frames[0].colno, 42);
	}

	#[test]
	fn eval_frames_are_skipped() {
		let stack =
			"Error: boom\n    at eval (eval at run (bundle.js:1:1), <anonymous>:1:30)\n    at run (bundle.js:2:5)";

		let frames = parse_stack(stack, "boom");

		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].function.as_deref(), Some("run"));
	}

	#[test]
	fn query_string_is_stripped_from_file_name() {
		let stack = "Error: boom\n    at foo (http://localhost:9000/static/bundle.js?v=abc123:5:10)";

		let frames = parse_stack(stack, "boom");

		assert_eq!(frames[0].file_name, "/static/bundle.js");
	}

	#[test]
	fn multiline_message_header_is_discarded() {
		let stack = "Error: first\nsecond\n    at foo (bundle.js:5:10)";

		let frames = parse_stack(stack, "first\nsecond");

		assert_eq!(frames.len(), 1);
		assert_eq!(frames[0].function.as_deref(), Some("foo"));
	}

	#[test]
	fn empty_stack_yields_no_frames() {
		assert!(parse_stack("", "boom").is_empty());
		assert!(parse_stack("   \n  ", "boom").is_empty());
	}

	#[test]
	fn raw_line_is_preserved_for_diagnostics() {
		let stack = "Error: boom\n    at foo (bundle.js:5:10)";

		let frames = parse_stack(stack, "boom");

		assert_eq!(frames[0].raw_line, "    at foo (bundle.js:5:10)");
	}

	proptest! {
		#[test]
		fn never_panics_on_arbitrary_input(stack in ".{0,400}", message in ".{0,80}") {
			let _ = parse_stack(&stack, &message);
		}

		#[test]
		fn kept_frames_have_positive_lines(lineno in 0u32..100, colno in 0u32..100) {
			let stack = format!("Error: x\n    at f (bundle.js:{lineno}:{colno})");
			for frame in parse_stack(&stack, "x") {
				prop_assert!(frame.lineno >= 1);
			}
		}
	}
}
