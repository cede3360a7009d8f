use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::router::PlaceholderBuckets;

/// Placeholder appended to documents that have none.
pub const DEFAULT_SCAFFOLD: &str = "<!-- mdnize: -->\n\n<!-- :mdnize -->";
/// Blank-line separator written around and between bucket entries.
pub const ENTRY_SEPARATOR: &str = "\r\n\r\n";

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(
		r"(?P<open><!--\s*mdnize(?:\[(?P<key>[^\]\r\n]*)\])?:\s*-->)(?P<interior>(?s:.*?))(?P<close><!--\s*:mdnize\s*-->)",
	)
	.unwrap_or_else(|e| panic!("placeholder pattern must compile: {e}"))
});

static MARKER: LazyLock<Regex> = LazyLock::new(|| {
	Regex::new(r"<!--\s*(?:mdnize(?:\[[^\]\r\n]*\])?:|:mdnize)\s*-->")
		.unwrap_or_else(|e| panic!("marker pattern must compile: {e}"))
});

/// Check whether `text` holds an opening or closing placeholder marker.
/// Such text cannot be merged without splitting its placeholder.
pub fn contains_marker(text: &str) -> bool {
	MARKER.is_match(text)
}

/// An open/close marker pair in a destination document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
	/// Path prefix from the opening marker, trimmed. Empty for the default
	/// placeholder.
	pub key: String,
	/// Byte range of the opening marker.
	pub opening: Range<usize>,
	/// Byte range between the markers.
	pub interior: Range<usize>,
	/// Byte range of the closing marker.
	pub closing: Range<usize>,
}

/// Find every complete marker pair in `document`, in document order.
pub fn find_placeholders(document: &str) -> Vec<Placeholder> {
	PLACEHOLDER
		.captures_iter(document)
		.filter_map(|captures| {
			Some(Placeholder {
				key: captures
					.name("key")
					.map_or("", |m| m.as_str())
					.trim()
					.to_string(),
				opening: captures.name("open")?.range(),
				interior: captures.name("interior")?.range(),
				closing: captures.name("close")?.range(),
			})
		})
		.collect()
}

/// The buckets declared by `document`: the default key followed by every
/// placeholder key in the order it first appears.
pub fn discover_buckets(document: &str) -> PlaceholderBuckets {
	PlaceholderBuckets::from_keys(
		find_placeholders(document)
			.into_iter()
			.map(|placeholder| placeholder.key),
	)
}

/// Return `document` with a default placeholder appended when it has none.
pub fn ensure_placeholder(document: &str) -> String {
	if document.is_empty() {
		return DEFAULT_SCAFFOLD.to_string();
	}

	if PLACEHOLDER.is_match(document) {
		return document.to_string();
	}

	let mut scaffolded = String::with_capacity(document.len() + DEFAULT_SCAFFOLD.len() + 1);
	scaffolded.push_str(document);
	if !document.ends_with('\n') {
		scaffolded.push('\n');
	}
	scaffolded.push_str(DEFAULT_SCAFFOLD);
	scaffolded
}

/// The text placed between a placeholder's markers for `entries`.
pub fn render_interior(entries: &[String]) -> String {
	if entries.is_empty() {
		return String::new();
	}

	format!(
		"{ENTRY_SEPARATOR}{}{ENTRY_SEPARATOR}",
		entries.join(ENTRY_SEPARATOR)
	)
}

/// Replace the interior of each placeholder with its bucket's entries.
///
/// Only the first placeholder for a key is rewritten. Buckets without a
/// placeholder are dropped. Marker text is kept exactly as written, so
/// merging the output again with the same buckets changes nothing.
pub fn merge(document: &str, buckets: &PlaceholderBuckets) -> String {
	let document = ensure_placeholder(document);
	let mut output = String::with_capacity(document.len());
	let mut replaced: HashSet<String> = HashSet::new();
	let mut copied_until = 0;

	for placeholder in find_placeholders(&document) {
		let Some(entries) = buckets.get(&placeholder.key) else {
			continue;
		};

		if !replaced.insert(placeholder.key.clone()) {
			continue;
		}

		output.push_str(&document[copied_until..placeholder.interior.start]);
		output.push_str(&render_interior(entries));
		copied_until = placeholder.interior.end;
	}

	output.push_str(&document[copied_until..]);
	output
}
