use std::collections::HashMap;
use std::path::Path;

/// Extension of generated documentation. Files with this extension are never
/// scanned for fragments.
pub const DOCUMENTATION_EXTENSION: &str = "md";

/// Resolves the line-comment tokens that introduce marker lines for a file
/// extension.
///
/// Implementations must be pure: the same extension always maps to the same
/// tokens. An empty result means the file type has no known line comments and
/// is not scanned.
pub trait CommentSyntax {
	fn line_comment_tokens(&self, extension: &str) -> Vec<String>;
}

/// Line-comment tokens for common source file extensions.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinCommentSyntax;

impl CommentSyntax for BuiltinCommentSyntax {
	fn line_comment_tokens(&self, extension: &str) -> Vec<String> {
		builtin_tokens(&extension.to_ascii_lowercase())
			.iter()
			.map(ToString::to_string)
			.collect()
	}
}

fn builtin_tokens(extension: &str) -> &'static [&'static str] {
	match extension {
		"js" | "mjs" | "cjs" | "jsx" | "ts" | "mts" | "cts" | "tsx" | "rs" | "go" | "java"
		| "kt" | "kts" | "swift" | "c" | "h" | "cc" | "cpp" | "cxx" | "hpp" | "hh" | "cs"
		| "m" | "mm" | "scala" | "groovy" | "gradle" | "dart" | "scss" | "less" | "styl"
		| "sass" | "jsonc" | "proto" | "zig" | "v" | "sv" | "hx" | "as" => &["//"],
		"php" => &["//", "#"],
		"py" | "pyw" | "rb" | "sh" | "bash" | "zsh" | "fish" | "pl" | "pm" | "r" | "yaml"
		| "yml" | "toml" | "ini" | "cfg" | "conf" | "coffee" | "cmake" | "mk" | "nim"
		| "cr" | "ex" | "exs" | "jl" | "tcl" | "ps1" | "dockerfile" | "nix" => &["#"],
		"sql" | "lua" | "hs" | "elm" | "ada" | "adb" | "ads" | "vhd" | "vhdl" => &["--"],
		"lisp" | "lsp" | "cl" | "el" | "clj" | "cljs" | "cljc" | "edn" | "scm" | "rkt"
		| "asm" | "s" => &[";"],
		"erl" | "hrl" | "tex" | "sty" | "m4" => &["%"],
		"vim" => &["\""],
		"bat" | "cmd" => &["REM", "::"],
		"f90" | "f95" | "f03" => &["!"],
		_ => &[],
	}
}

/// Built-in tokens with per-extension overrides layered on top.
#[derive(Debug, Clone, Default)]
pub struct CommentSyntaxTable {
	overrides: HashMap<String, Vec<String>>,
}

impl CommentSyntaxTable {
	/// Extension keys are matched case-insensitively and may carry a leading
	/// dot.
	pub fn new(overrides: &HashMap<String, Vec<String>>) -> Self {
		let overrides = overrides
			.iter()
			.map(|(extension, tokens)| (normalize_extension(extension), tokens.clone()))
			.collect();

		Self { overrides }
	}
}

impl CommentSyntax for CommentSyntaxTable {
	fn line_comment_tokens(&self, extension: &str) -> Vec<String> {
		let extension = normalize_extension(extension);
		match self.overrides.get(&extension) {
			Some(tokens) => tokens.clone(),
			None => BuiltinCommentSyntax.line_comment_tokens(&extension),
		}
	}
}

fn normalize_extension(extension: &str) -> String {
	extension.trim_start_matches('.').to_ascii_lowercase()
}

/// The extension used to look up comment tokens for `path`. Files without an
/// extension are looked up by their lowercased file name, so `Dockerfile`
/// resolves like a `dockerfile` extension.
pub fn syntax_key(path: &Path) -> String {
	path.extension()
		.or_else(|| path.file_name())
		.and_then(|name| name.to_str())
		.map(str::to_ascii_lowercase)
		.unwrap_or_default()
}

/// Check whether `path` is a documentation output file (`.md`, any case).
pub fn is_documentation_file(path: &Path) -> bool {
	path.extension()
		.and_then(|ext| ext.to_str())
		.is_some_and(|ext| ext.eq_ignore_ascii_case(DOCUMENTATION_EXTENSION))
}
