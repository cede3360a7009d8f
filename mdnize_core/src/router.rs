use indexmap::IndexMap;

use crate::diagnostics::DiagnosticSink;
use crate::tree::ExtractionNode;

/// Key of the catch-all placeholder.
pub const DEFAULT_KEY: &str = "";

/// How the section header above each file's content is written.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[non_exhaustive]
pub enum HeaderMode {
	/// `## <path>`
	#[default]
	Heading,
	/// `<prefix> <path>`
	Prefix(String),
	/// `<!-- <path> -->`
	Comment,
}

impl HeaderMode {
	/// Interpret a command line value: `true`/`heading` and `false`/`comment`
	/// select the built-in modes, anything else is a literal prefix.
	pub fn from_flag(value: &str) -> Self {
		match value {
			"true" | "heading" => Self::Heading,
			"false" | "comment" => Self::Comment,
			prefix => Self::Prefix(prefix.to_string()),
		}
	}

	pub fn render(&self, path: &str) -> String {
		match self {
			Self::Heading => format!("## {path}"),
			Self::Prefix(prefix) => format!("{prefix} {path}"),
			Self::Comment => format!("<!-- {path} -->"),
		}
	}
}

/// Rendered blocks collected for each placeholder key.
///
/// Keys are kept in the order the destination document declared them and
/// that order decides which placeholder receives a file: the first explicit
/// key matching the file's path wins, even when a later key is more specific.
/// The default key is never matched as a prefix; it only catches files no
/// explicit key claimed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderBuckets {
	buckets: IndexMap<String, Vec<String>>,
}

impl Default for PlaceholderBuckets {
	fn default() -> Self {
		Self::new()
	}
}

impl PlaceholderBuckets {
	/// Buckets holding only the default key.
	pub fn new() -> Self {
		let mut buckets = IndexMap::new();
		buckets.insert(DEFAULT_KEY.to_string(), Vec::new());
		Self { buckets }
	}

	/// Buckets for `keys` in the given order, plus the default key.
	pub fn from_keys<I, K>(keys: I) -> Self
	where
		I: IntoIterator<Item = K>,
		K: AsRef<str>,
	{
		let mut buckets = Self::new();
		for key in keys {
			buckets.add_key(key.as_ref());
		}
		buckets
	}

	/// Register `key` if it is not known yet. Keys are trimmed.
	pub fn add_key(&mut self, key: &str) {
		self.buckets.entry(key.trim().to_string()).or_default();
	}

	pub fn keys(&self) -> impl Iterator<Item = &str> {
		self.buckets.keys().map(String::as_str)
	}

	pub fn get(&self, key: &str) -> Option<&[String]> {
		self.buckets.get(key).map(Vec::as_slice)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
		self.buckets
			.iter()
			.map(|(key, entries)| (key.as_str(), entries.as_slice()))
	}

	/// The key whose bucket receives the file at `path`.
	pub fn select(&self, path: &str) -> &str {
		self.buckets
			.keys()
			.filter(|key| !key.is_empty())
			.find(|key| key_matches(key, path))
			.map_or(DEFAULT_KEY, String::as_str)
	}

	fn push(&mut self, key: &str, entry: String) {
		self.buckets.entry(key.to_string()).or_default().push(entry);
	}
}

/// Check whether the placeholder `key` claims the file at `path`.
///
/// The path must equal the key or continue it with a `/`. A leading `./` on
/// either side and a trailing `/` on the key are ignored.
pub fn key_matches(key: &str, path: &str) -> bool {
	let key = key.strip_prefix("./").unwrap_or(key).trim_end_matches('/');
	let path = path.strip_prefix("./").unwrap_or(path);

	if key.is_empty() {
		return false;
	}

	path.strip_prefix(key)
		.is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// Distribute the leaves of `node` over `buckets` depth first.
///
/// `path_prefix` holds the segments leading to `node`. Each leaf appends its
/// header line and then its text to the selected bucket. Returns the number
/// of leaves routed.
pub fn route(
	node: &ExtractionNode,
	buckets: &mut PlaceholderBuckets,
	path_prefix: &[String],
	header: &HeaderMode,
	sink: &dyn DiagnosticSink,
) -> usize {
	match node {
		ExtractionNode::Directory(children) => {
			let mut routed = 0;
			for (name, child) in children {
				let mut segments = path_prefix.to_vec();
				segments.push(name.clone());
				routed += route(child, buckets, &segments, header, sink);
			}
			routed
		}
		ExtractionNode::Leaf(text) => {
			let path = path_prefix.join("/");
			let key = buckets.select(&path).to_string();
			if key != DEFAULT_KEY {
				sink.record(&format!("{key} -> {path}"));
			}

			buckets.push(&key, header.render(&path));
			buckets.push(&key, text.clone());
			1
		}
	}
}
