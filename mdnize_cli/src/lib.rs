use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Pull documentation out of source comments and merge it into a markdown file.",
	long_about = "mdnize extracts documentation written between `md:` and `:md` comment \
	              markers in your source files and merges it into the `<!-- mdnize: -->` \
	              regions of a markdown document.\n\nQuick start:\n  mdnize init    Create \
	              mdnize.toml and a README placeholder\n  mdnize update  Merge documentation \
	              into the README\n  mdnize check   Verify the README is up to date"
)]
pub struct MdnizeCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory. Config, target and destination
	/// are resolved against it.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// File or directory to scan for documentation fragments.
	#[arg(long, short, global = true)]
	pub target: Option<PathBuf>,

	/// Markdown document to merge the documentation into.
	#[arg(long, short, global = true)]
	pub dest: Option<PathBuf>,

	/// Marker that opens a fragment. Interpreted as a regular expression
	/// fragment.
	#[arg(long, global = true)]
	pub start_symbol: Option<String>,

	/// Marker that closes a block fragment. Interpreted as a regular
	/// expression fragment.
	#[arg(long, global = true)]
	pub end_symbol: Option<String>,

	/// Section header written above each file: `true` for `## path`, `false`
	/// for `<!-- path -->`, or any other text to use as the prefix.
	#[arg(long, global = true)]
	pub header: Option<String>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Initialize mdnize in a project.
	///
	/// Creates an `mdnize.toml` with the default settings and appends a
	/// placeholder to the destination document when it has none. Existing
	/// files are left untouched.
	Init,
	/// Check that the destination document is up to date.
	///
	/// Extracts documentation from the target and compares the merged result
	/// with the current destination. Exits with a non-zero status code when
	/// they differ. Nothing is written.
	Check {
		/// Show a line diff between the current and expected document.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// Merge the extracted documentation into the destination document.
	///
	/// The destination is created when missing and left alone when the merge
	/// would not change it.
	Update {
		/// Preview changes without writing files.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and re-run updates automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
}
