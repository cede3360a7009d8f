use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum MdnizeError {
	#[error(transparent)]
	#[diagnostic(code(mdnize::io_error))]
	Io(#[from] std::io::Error),

	#[error("failed to read `{path}`")]
	#[diagnostic(
		code(mdnize::read),
		help("check that the path exists and is readable")
	)]
	Read {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("failed to write `{path}`")]
	#[diagnostic(code(mdnize::write))]
	Write {
		path: String,
		#[source]
		source: std::io::Error,
	},

	#[error("invalid scanning pattern `{pattern}`: {reason}")]
	#[diagnostic(
		code(mdnize::pattern),
		help("`start_symbol` and `end_symbol` are regular expression fragments; escape special characters")
	)]
	Pattern { pattern: String, reason: String },

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(mdnize::config_parse),
		help("check that mdnize.toml is valid TOML")
	)]
	ConfigParse(String),

	#[error("documentation from `{path}` contains a placeholder marker")]
	#[diagnostic(
		code(mdnize::nested_marker),
		help("placeholders cannot nest; reword the `<!-- mdnize: -->` or `<!-- :mdnize -->` text in the source comment")
	)]
	NestedMarker { path: String },

	#[error("symlink cycle detected at: `{path}`")]
	#[diagnostic(
		code(mdnize::symlink_cycle),
		help("remove the circular symlink or exclude this path")
	)]
	SymlinkCycle { path: String },
}

impl MdnizeError {
	pub(crate) fn read(path: &std::path::Path, source: std::io::Error) -> Self {
		Self::Read {
			path: path.display().to_string(),
			source,
		}
	}

	pub(crate) fn write(path: &std::path::Path, source: std::io::Error) -> Self {
		Self::Write {
			path: path.display().to_string(),
			source,
		}
	}
}

pub type MdnizeResult<T> = Result<T, MdnizeError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
