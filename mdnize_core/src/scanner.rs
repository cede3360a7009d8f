use std::path::Path;

use regex::Regex;

use crate::MdnizeError;
use crate::MdnizeResult;
use crate::comment_syntax::CommentSyntax;
use crate::comment_syntax::is_documentation_file;
use crate::comment_syntax::syntax_key;
use crate::diagnostics::DiagnosticSink;

/// Default symbol opening a fragment.
pub const DEFAULT_START_SYMBOL: &str = "md:";
/// Default symbol closing a block fragment.
pub const DEFAULT_END_SYMBOL: &str = ":md";
/// Separator placed between the rendered fragments of one file.
pub const FRAGMENT_SEPARATOR: &str = "\r\n";

/// The text carried by a fragment. A marker line either carries its text
/// inline or opens a block that runs until the end symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FragmentText {
	/// Text following the start symbol on the marker line.
	Inline(String),
	/// Lines between the opening marker and the closing marker, with the
	/// opening line's prefix removed.
	Block(String),
}

/// One unit of documentation extracted from a source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment {
	pub text: FragmentText,
	/// Language from a `[tag]` suffix on the start symbol. Tagged fragments
	/// render as fenced code blocks.
	pub language_tag: Option<String>,
}

impl Fragment {
	pub fn inline(&self) -> Option<&str> {
		match &self.text {
			FragmentText::Inline(text) => Some(text),
			FragmentText::Block(_) => None,
		}
	}

	pub fn body(&self) -> Option<&str> {
		match &self.text {
			FragmentText::Inline(_) => None,
			FragmentText::Block(text) => Some(text),
		}
	}

	/// The fragment as it appears in the destination document.
	pub fn render(&self) -> String {
		let text = match &self.text {
			FragmentText::Inline(text) | FragmentText::Block(text) => text,
		};

		match &self.language_tag {
			Some(tag) => format!("```{tag}\n{text}\n```"),
			None => text.clone(),
		}
	}
}

/// Render and join the fragments of one file. Returns `None` when there are
/// no fragments.
pub fn render_fragments(fragments: &[Fragment]) -> Option<String> {
	if fragments.is_empty() {
		return None;
	}

	Some(
		fragments
			.iter()
			.map(Fragment::render)
			.collect::<Vec<_>>()
			.join(FRAGMENT_SEPARATOR),
	)
}

/// A compiled fragment pattern for one set of comment tokens.
#[derive(Debug, Clone)]
pub struct FragmentPattern {
	/// `None` when there are no comment tokens; such a pattern never matches.
	regex: Option<Regex>,
}

impl FragmentPattern {
	/// Build the pattern for `comment_tokens`.
	///
	/// Comment tokens are matched literally and tried longest first, so `///`
	/// wins over `//`. The start and end symbols are regular expression
	/// fragments.
	pub fn new(
		comment_tokens: &[String],
		start_symbol: &str,
		end_symbol: &str,
	) -> MdnizeResult<Self> {
		let mut tokens: Vec<&str> = comment_tokens
			.iter()
			.map(String::as_str)
			.filter(|token| !token.is_empty())
			.collect();

		if tokens.is_empty() {
			return Ok(Self { regex: None });
		}

		tokens.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
		tokens.dedup();

		let tokens = tokens
			.into_iter()
			.map(regex::escape)
			.collect::<Vec<_>>()
			.join("|");

		let pattern = format!(
			r"(?m)^(?P<prefix>[ \t]*(?:{tokens})[ \t]*)(?:{start_symbol})(?:\[(?P<tag>[A-Za-z0-9_]+)\])?(?:[ \t]*(?P<inline>[^ \t\n].*?)$|[ \t]*\n(?P<body>(?s:.*?))^[ \t]*(?:{tokens})[ \t]*(?:{end_symbol}))"
		);

		let regex = Regex::new(&pattern).map_err(|e| {
			MdnizeError::Pattern {
				pattern: pattern.clone(),
				reason: e.to_string(),
			}
		})?;

		Ok(Self { regex: Some(regex) })
	}

	/// Extract fragments from `text` in order of appearance. `text` must
	/// already use `\n` line endings.
	pub fn scan(&self, text: &str) -> Vec<Fragment> {
		let Some(regex) = &self.regex else {
			return Vec::new();
		};

		regex
			.captures_iter(text)
			.filter_map(|captures| {
				let prefix = captures.name("prefix").map_or("", |m| m.as_str());
				let language_tag = captures.name("tag").map(|m| m.as_str().to_string());

				let text = if let Some(inline) = captures.name("inline") {
					FragmentText::Inline(inline.as_str().to_string())
				} else {
					let body = captures.name("body")?.as_str();
					let body = body.strip_suffix('\n').unwrap_or(body);
					FragmentText::Block(strip_line_prefix(body, prefix))
				};

				Some(Fragment { text, language_tag })
			})
			.collect()
	}
}

/// Scan `text` for fragments introduced by any of `comment_tokens`.
pub fn scan(
	text: &str,
	comment_tokens: &[String],
	start_symbol: &str,
	end_symbol: &str,
) -> MdnizeResult<Vec<Fragment>> {
	let pattern = FragmentPattern::new(comment_tokens, start_symbol, end_symbol)?;
	let text = normalize_line_endings(text);
	Ok(pattern.scan(&text))
}

/// Read and scan one source file.
///
/// Documentation files and files whose type has no known line comment are
/// not opened and yield no fragments.
pub fn scan_path(
	path: &Path,
	syntax: &dyn CommentSyntax,
	start_symbol: &str,
	end_symbol: &str,
	sink: &dyn DiagnosticSink,
) -> MdnizeResult<Vec<Fragment>> {
	if is_documentation_file(path) {
		return Ok(Vec::new());
	}

	let tokens = syntax.line_comment_tokens(&syntax_key(path));
	if tokens.is_empty() {
		return Ok(Vec::new());
	}

	let bytes = std::fs::read(path).map_err(|e| MdnizeError::read(path, e))?;
	sink.record(&format!("[Read] {}", path.display()));

	let fragments = scan(
		&String::from_utf8_lossy(&bytes),
		&tokens,
		start_symbol,
		end_symbol,
	)?;

	for fragment in &fragments {
		sink.record(&fragment.render());
	}

	if !fragments.is_empty() {
		sink.record(&format!("Pick from {}", path.display()));
	}

	Ok(fragments)
}

/// Remove the opening marker's prefix from each body line.
///
/// For an opening line `  // md:` the prefix is `  // `. Lines starting with
/// the whole prefix lose it, bare comment lines (`  //`) become empty, and
/// lines that only share the leading indent lose the indent. Anything else is
/// kept as written.
fn strip_line_prefix(body: &str, prefix: &str) -> String {
	let indent = &prefix[..prefix.len() - prefix.trim_start_matches([' ', '\t']).len()];
	let bare_prefix = prefix.trim_end_matches([' ', '\t']);

	body.split('\n')
		.map(|line| {
			if let Some(rest) = line.strip_prefix(prefix) {
				rest
			} else if line.trim_end_matches([' ', '\t']) == bare_prefix {
				""
			} else if indent.is_empty() {
				line
			} else {
				line.strip_prefix(indent).unwrap_or(line)
			}
		})
		.collect::<Vec<_>>()
		.join("\n")
}

/// Normalize CRLF line endings to LF.
pub fn normalize_line_endings(content: &str) -> String {
	if content.contains('\r') {
		content.replace("\r\n", "\n").replace('\r', "\n")
	} else {
		content.to_string()
	}
}
