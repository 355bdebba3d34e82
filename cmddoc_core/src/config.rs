use std::path::Path;
use std::path::PathBuf;

use serde::Deserialize;

use crate::CmddocError;
use crate::CmddocResult;
use crate::classifier::DEFAULT_PREFIX;

/// Supported config file locations in discovery order (highest precedence
/// first), relative to the source root.
pub const CONFIG_FILE_CANDIDATES: [&str; 3] = ["cmddoc.toml", ".cmddoc.toml", ".config/cmddoc.toml"];

/// Files whose name ends with this suffix are scanned by default.
pub const DEFAULT_SUFFIX: &str = ".c";

/// Extension of generated documents by default.
pub const DEFAULT_EXTENSION: &str = "rst";

/// Configuration loaded from a `cmddoc.toml` file.
///
/// ```toml
/// prefix = "BAREBOX_CMD"
/// suffix = ".c"
/// extension = "rst"
/// respect_gitignore = false
///
/// [exclude]
/// patterns = ["scripts/", "*_test.c"]
///
/// [template]
/// path = "Documentation/command.rst.j2"
/// ```
///
/// Every key is optional; an empty file behaves like no file at all.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct CmddocConfig {
	/// Prefix shared by every block marker (`{prefix}_HELP_START` and so on).
	#[serde(default = "default_prefix")]
	pub prefix: String,
	/// Only files whose name ends with this suffix are scanned.
	#[serde(default = "default_suffix")]
	pub suffix: String,
	/// Extension given to each generated document.
	#[serde(default = "default_extension")]
	pub extension: String,
	/// Skip files ignored by `.gitignore`. Off by default: every file with
	/// the right suffix is scanned.
	#[serde(default)]
	pub respect_gitignore: bool,
	#[serde(default)]
	pub exclude: ExcludeConfig,
	#[serde(default)]
	pub template: TemplateConfig,
}

/// Gitignore-style patterns for files and directories to skip, relative to
/// the source root.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct ExcludeConfig {
	#[serde(default)]
	pub patterns: Vec<String>,
}

/// A custom document template replacing the built-in reST layout.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct TemplateConfig {
	/// Path to a minijinja template, relative to the source root.
	#[serde(default)]
	pub path: Option<PathBuf>,
}

impl Default for CmddocConfig {
	fn default() -> Self {
		Self {
			prefix: default_prefix(),
			suffix: default_suffix(),
			extension: default_extension(),
			respect_gitignore: false,
			exclude: ExcludeConfig::default(),
			template: TemplateConfig::default(),
		}
	}
}

fn default_prefix() -> String {
	DEFAULT_PREFIX.to_string()
}

fn default_suffix() -> String {
	DEFAULT_SUFFIX.to_string()
}

fn default_extension() -> String {
	DEFAULT_EXTENSION.to_string()
}

impl CmddocConfig {
	/// Return the first config file candidate that exists under `root`.
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if there is no config file.
	pub fn load(root: &Path) -> CmddocResult<Option<CmddocConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		let config: CmddocConfig = toml::from_str(&content)
			.map_err(|e| CmddocError::ConfigParse(format!("{}: {e}", config_path.display())))?;

		Ok(Some(config))
	}

	/// Load the config at `root`, falling back to the defaults.
	pub fn load_or_default(root: &Path) -> CmddocResult<CmddocConfig> {
		Ok(Self::load(root)?.unwrap_or_default())
	}

	/// Read the custom template, if one is configured. Relative paths are
	/// resolved against `root`.
	pub fn load_template(&self, root: &Path) -> CmddocResult<Option<String>> {
		let Some(path) = &self.template.path else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(root.join(path))?;
		Ok(Some(content))
	}
}
