use std::collections::HashMap;
use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::MdnizeError;
use crate::MdnizeResult;
use crate::router::HeaderMode;
use crate::scanner::DEFAULT_END_SYMBOL;
use crate::scanner::DEFAULT_START_SYMBOL;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["mdnize.toml", ".mdnize.toml", ".config/mdnize.toml"];

/// Scanned when neither the config nor the command line names a target.
pub const DEFAULT_TARGET: &str = ".";

/// Written when neither the config nor the command line names a destination.
pub const DEFAULT_DEST: &str = "README.md";

/// The `header` setting: a boolean or a custom prefix.
///
/// ```toml
/// header = true     # "## src/lib.js"
/// header = false    # "<!-- src/lib.js -->"
/// header = "###"    # "### src/lib.js"
/// ```
#[derive(Debug, Clone, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
#[non_exhaustive]
pub enum HeaderSetting {
	Enabled(bool),
	Prefix(String),
}

impl Default for HeaderSetting {
	fn default() -> Self {
		Self::Enabled(true)
	}
}

impl From<&HeaderSetting> for HeaderMode {
	fn from(setting: &HeaderSetting) -> Self {
		match setting {
			HeaderSetting::Enabled(true) => Self::Heading,
			HeaderSetting::Enabled(false) => Self::Comment,
			HeaderSetting::Prefix(prefix) => Self::Prefix(prefix.clone()),
		}
	}
}

/// Configuration loaded from an `mdnize.toml` file.
///
/// ```toml
/// target = "src"
/// dest = "README.md"
/// start_symbol = "md:"
/// end_symbol = ":md"
/// header = true
///
/// [comments]
/// vue = ["//"]
///
/// [exclude]
/// patterns = ["vendor/", "*.min.js"]
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct MdnizeConfig {
	/// File or directory to scan, relative to the project root.
	#[serde(default)]
	pub target: Option<PathBuf>,
	/// Document to merge into, relative to the project root.
	#[serde(default)]
	pub dest: Option<PathBuf>,
	#[serde(default)]
	pub start_symbol: Option<String>,
	#[serde(default)]
	pub end_symbol: Option<String>,
	#[serde(default)]
	pub header: Option<HeaderSetting>,
	#[serde(default)]
	pub verbose: bool,
	/// Line-comment tokens per file extension. Entries replace the built-in
	/// tokens for that extension.
	#[serde(default)]
	pub comments: HashMap<String, Vec<String>>,
	#[serde(default)]
	pub exclude: ExcludeConfig,
}

/// Configuration for excluding files and directories from the walk.
#[derive(Debug, Default, Deserialize)]
pub struct ExcludeConfig {
	/// Gitignore-style patterns relative to the scanned target.
	///
	/// Examples: `"vendor/"`, `"*.min.js"`, `"!keep.min.js"`.
	#[serde(default)]
	pub patterns: Vec<String>,
}

impl MdnizeConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is none.
	pub fn load(root: &Path) -> MdnizeResult<Option<MdnizeConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)
			.map_err(|e| MdnizeError::read(&config_path, e))?;
		let config: MdnizeConfig =
			toml::from_str(&content).map_err(|e| MdnizeError::ConfigParse(e.to_string()))?;

		Ok(Some(config))
	}

	pub fn target(&self) -> &Path {
		self.target
			.as_deref()
			.unwrap_or_else(|| Path::new(DEFAULT_TARGET))
	}

	pub fn dest(&self) -> &Path {
		self.dest.as_deref().unwrap_or_else(|| Path::new(DEFAULT_DEST))
	}
}

/// Runtime options for one extraction and merge.
#[derive(Debug, Clone)]
pub struct MdnizeOptions {
	pub start_symbol: String,
	pub end_symbol: String,
	pub header: HeaderMode,
	/// Report progress through a tracing sink. Has no effect on the output.
	pub verbose: bool,
	pub comment_overrides: HashMap<String, Vec<String>>,
	pub exclude_patterns: Vec<String>,
}

impl Default for MdnizeOptions {
	fn default() -> Self {
		Self {
			start_symbol: DEFAULT_START_SYMBOL.to_string(),
			end_symbol: DEFAULT_END_SYMBOL.to_string(),
			header: HeaderMode::default(),
			verbose: false,
			comment_overrides: HashMap::new(),
			exclude_patterns: Vec::new(),
		}
	}
}

impl MdnizeOptions {
	/// Construct [`MdnizeOptions`] from an optional [`MdnizeConfig`], falling
	/// back to defaults for anything it leaves out.
	pub fn from_config(config: Option<&MdnizeConfig>) -> Self {
		let defaults = Self::default();
		let Some(config) = config else {
			return defaults;
		};

		Self {
			start_symbol: config
				.start_symbol
				.clone()
				.unwrap_or(defaults.start_symbol),
			end_symbol: config.end_symbol.clone().unwrap_or(defaults.end_symbol),
			header: config
				.header
				.as_ref()
				.map_or(defaults.header, HeaderMode::from),
			verbose: config.verbose,
			comment_overrides: config.comments.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
		}
	}
}
