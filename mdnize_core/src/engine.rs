use std::io::ErrorKind;
use std::path::Path;
use std::path::PathBuf;

use crate::MdnizeError;
use crate::MdnizeResult;
use crate::comment_syntax::CommentSyntax;
use crate::comment_syntax::CommentSyntaxTable;
use crate::config::MdnizeOptions;
use crate::diagnostics::DiagnosticSink;
use crate::diagnostics::NoopSink;
use crate::diagnostics::TracingSink;
use crate::merger::contains_marker;
use crate::merger::discover_buckets;
use crate::merger::ensure_placeholder;
use crate::merger::merge;
use crate::router::route;
use crate::tree::WalkContext;
use crate::tree::build_exclude_matcher;
use crate::tree::walk;

/// Result of merging extracted documentation into a destination document.
#[derive(Debug, Clone)]
pub struct MergeOutcome {
	/// Path of the destination document.
	pub dest: PathBuf,
	/// Content of the destination before the merge. `None` when the file did
	/// not exist.
	pub previous: Option<String>,
	/// Content after the merge.
	pub merged: String,
	/// Number of files whose fragments were routed into the document.
	pub leaf_count: usize,
}

impl MergeOutcome {
	/// Returns true if writing the merged content would change the file.
	pub fn is_changed(&self) -> bool {
		self.previous.as_deref() != Some(self.merged.as_str())
	}
}

/// Extract documentation from `target`, merge it into `dest` and write the
/// result when it differs from the current file.
pub fn run(target: &Path, dest: &Path, options: &MdnizeOptions) -> MdnizeResult<MergeOutcome> {
	let syntax = CommentSyntaxTable::new(&options.comment_overrides);
	let outcome = if options.verbose {
		compute(target, dest, options, &syntax, &TracingSink)?
	} else {
		compute(target, dest, options, &syntax, &NoopSink)?
	};

	write_outcome(&outcome)?;
	Ok(outcome)
}

/// Compute the merged destination without writing anything.
///
/// A missing destination is treated as an empty document, which receives the
/// default placeholder.
pub fn compute(
	target: &Path,
	dest: &Path,
	options: &MdnizeOptions,
	syntax: &dyn CommentSyntax,
	sink: &dyn DiagnosticSink,
) -> MdnizeResult<MergeOutcome> {
	let exclude_root = if target.is_dir() {
		target
	} else {
		target.parent().unwrap_or(target)
	};
	let exclude = build_exclude_matcher(exclude_root, &options.exclude_patterns)?;
	let ctx = WalkContext {
		start_symbol: &options.start_symbol,
		end_symbol: &options.end_symbol,
		syntax,
		sink,
		exclude: &exclude,
	};

	let tree = walk(target, Path::new(""), &ctx)?;
	if let Some((path, _)) = tree
		.leaves()
		.into_iter()
		.find(|(path, text)| contains_marker(text) || contains_marker(&options.header.render(path)))
	{
		return Err(MdnizeError::NestedMarker { path });
	}

	let previous = read_destination(dest)?;
	let document = ensure_placeholder(previous.as_deref().unwrap_or_default());
	let mut buckets = discover_buckets(&document);

	sink.record(&format!(
		"Routing {} file(s) into {} placeholder(s)",
		tree.leaf_count(),
		buckets.keys().count()
	));
	let leaf_count = route(&tree, &mut buckets, &[], &options.header, sink);
	let merged = merge(&document, &buckets);

	Ok(MergeOutcome {
		dest: dest.to_path_buf(),
		previous,
		merged,
		leaf_count,
	})
}

/// Write the merged content to disk when it changed. Returns whether the
/// file was written.
pub fn write_outcome(outcome: &MergeOutcome) -> MdnizeResult<bool> {
	if !outcome.is_changed() {
		return Ok(false);
	}

	std::fs::write(&outcome.dest, &outcome.merged)
		.map_err(|e| MdnizeError::write(&outcome.dest, e))?;
	Ok(true)
}

fn read_destination(dest: &Path) -> MdnizeResult<Option<String>> {
	match std::fs::read_to_string(dest) {
		Ok(content) => Ok(Some(content)),
		Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
		Err(e) => Err(MdnizeError::read(dest, e)),
	}
}
