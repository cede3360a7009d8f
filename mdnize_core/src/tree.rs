use std::collections::HashSet;
use std::fs::FileType;
use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use indexmap::IndexMap;

use crate::MdnizeError;
use crate::MdnizeResult;
use crate::comment_syntax::CommentSyntax;
use crate::comment_syntax::is_documentation_file;
use crate::diagnostics::DiagnosticSink;
use crate::scanner::render_fragments;
use crate::scanner::scan_path;

/// The extracted documentation of a directory tree.
///
/// Directory entries keep the order in which the file system listed them.
/// Files without fragments have no entry; directories without fragments are
/// kept as empty `Directory` nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionNode {
	Directory(IndexMap<String, ExtractionNode>),
	/// Rendered fragments of one file, joined with CRLF.
	Leaf(String),
}

impl ExtractionNode {
	/// An empty directory node.
	pub fn directory() -> Self {
		Self::Directory(IndexMap::new())
	}

	/// Look up a node by its slash separated path below this node.
	pub fn get(&self, path: &str) -> Option<&ExtractionNode> {
		path.split('/')
			.filter(|segment| !segment.is_empty())
			.try_fold(self, |node, segment| {
				match node {
					Self::Directory(children) => children.get(segment),
					Self::Leaf(_) => None,
				}
			})
	}

	/// All leaves with their slash separated paths, in traversal order.
	pub fn leaves(&self) -> Vec<(String, &str)> {
		let mut leaves = Vec::new();
		collect_leaves(self, &mut Vec::new(), &mut leaves);
		leaves
	}

	pub fn leaf_count(&self) -> usize {
		match self {
			Self::Directory(children) => children.values().map(Self::leaf_count).sum(),
			Self::Leaf(_) => 1,
		}
	}
}

fn collect_leaves<'a>(
	node: &'a ExtractionNode,
	segments: &mut Vec<&'a str>,
	leaves: &mut Vec<(String, &'a str)>,
) {
	match node {
		ExtractionNode::Directory(children) => {
			for (name, child) in children {
				segments.push(name);
				collect_leaves(child, segments, leaves);
				segments.pop();
			}
		}
		ExtractionNode::Leaf(text) => leaves.push((segments.join("/"), text)),
	}
}

/// Everything the walk needs besides the paths themselves.
pub struct WalkContext<'a> {
	pub start_symbol: &'a str,
	pub end_symbol: &'a str,
	pub syntax: &'a dyn CommentSyntax,
	pub sink: &'a dyn DiagnosticSink,
	/// Entries matching this are skipped.
	pub exclude: &'a Gitignore,
}

/// Walk `target`, resolved against `base_dir`, and extract the fragments of
/// every file below it.
///
/// A directory target yields its own node. A file target yields a directory
/// node holding that file under its name, so every leaf has a path. The first
/// I/O failure aborts the walk.
pub fn walk(target: &Path, base_dir: &Path, ctx: &WalkContext<'_>) -> MdnizeResult<ExtractionNode> {
	let root = base_dir.join(target);
	let metadata = std::fs::metadata(&root).map_err(|e| MdnizeError::read(&root, e))?;

	if metadata.is_dir() {
		let mut ancestors = HashSet::new();
		return walk_directory(&root, ctx, &mut ancestors);
	}

	let mut children = IndexMap::new();
	if let Some(leaf) = walk_file(&root, ctx)? {
		children.insert(entry_name(&root), leaf);
	}

	Ok(ExtractionNode::Directory(children))
}

fn walk_directory(
	dir: &Path,
	ctx: &WalkContext<'_>,
	ancestors: &mut HashSet<PathBuf>,
) -> MdnizeResult<ExtractionNode> {
	// A directory that is its own ancestor can only be reached through a
	// symlink loop.
	let canonical = dir.canonicalize().map_err(|e| MdnizeError::read(dir, e))?;
	if !ancestors.insert(canonical.clone()) {
		return Err(MdnizeError::SymlinkCycle {
			path: dir.display().to_string(),
		});
	}

	let mut children = IndexMap::new();
	let entries = std::fs::read_dir(dir).map_err(|e| MdnizeError::read(dir, e))?;

	for entry in entries {
		let entry = entry.map_err(|e| MdnizeError::read(dir, e))?;
		let path = entry.path();
		let file_type = entry.file_type().map_err(|e| MdnizeError::read(&path, e))?;

		// Exclusion is decided before any symlink is followed.
		if is_excluded(ctx.exclude, &path, file_type) {
			ctx.sink.record(&format!("[Skip] {}", path.display()));
			continue;
		}

		let metadata = std::fs::metadata(&path).map_err(|e| MdnizeError::read(&path, e))?;
		let is_dir = metadata.is_dir();

		let name = entry.file_name().to_string_lossy().to_string();

		if is_dir {
			children.insert(name, walk_directory(&path, ctx, ancestors)?);
		} else if metadata.is_file() {
			if let Some(leaf) = walk_file(&path, ctx)? {
				children.insert(name, leaf);
			}
		}
	}

	ancestors.remove(&canonical);

	Ok(ExtractionNode::Directory(children))
}

/// A symlink may point at a directory, so it also answers to directory-only
/// patterns.
fn is_excluded(exclude: &Gitignore, path: &Path, file_type: FileType) -> bool {
	exclude.matched(path, file_type.is_dir()).is_ignore()
		|| (file_type.is_symlink() && exclude.matched(path, true).is_ignore())
}

fn walk_file(path: &Path, ctx: &WalkContext<'_>) -> MdnizeResult<Option<ExtractionNode>> {
	if is_documentation_file(path) {
		return Ok(None);
	}

	let fragments = scan_path(
		path,
		ctx.syntax,
		ctx.start_symbol,
		ctx.end_symbol,
		ctx.sink,
	)?;

	Ok(render_fragments(&fragments).map(ExtractionNode::Leaf))
}

fn entry_name(path: &Path) -> String {
	path.file_name().map_or_else(
		|| path.display().to_string(),
		|name| name.to_string_lossy().to_string(),
	)
}

/// Build a `Gitignore` matcher from exclude patterns. Patterns follow
/// `.gitignore` syntax and are relative to `root`.
pub fn build_exclude_matcher(root: &Path, patterns: &[String]) -> MdnizeResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			MdnizeError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| MdnizeError::ConfigParse(format!("failed to build exclude rules: {e}")))
}
