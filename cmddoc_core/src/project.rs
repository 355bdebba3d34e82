use std::path::Path;
use std::path::PathBuf;

use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;
use serde::Serialize;
use tracing::debug;
use tracing::info;

use crate::CmddocError;
use crate::CmddocResult;
use crate::classifier::DEFAULT_PREFIX;
use crate::classifier::LineClassifier;
use crate::config::CmddocConfig;
use crate::config::DEFAULT_SUFFIX;
use crate::extractor::Extractor;
use crate::registry::CommandRegistry;
use crate::render::Renderer;

/// Options for controlling how a source tree is scanned.
///
/// Use [`ScanOptions::default()`] for the barebox defaults or
/// [`ScanOptions::from_config`] to construct from a [`CmddocConfig`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanOptions {
	/// Marker prefix handed to the [`LineClassifier`].
	pub prefix: String,
	/// File-name suffix selecting source files.
	pub suffix: String,
	/// Gitignore-style patterns to exclude from scanning.
	pub exclude_patterns: Vec<String>,
	/// Whether `.gitignore` files are honored during the walk.
	pub respect_gitignore: bool,
}

impl Default for ScanOptions {
	fn default() -> Self {
		Self {
			prefix: DEFAULT_PREFIX.to_string(),
			suffix: DEFAULT_SUFFIX.to_string(),
			exclude_patterns: Vec::new(),
			respect_gitignore: false,
		}
	}
}

impl ScanOptions {
	pub fn from_config(config: &CmddocConfig) -> Self {
		Self {
			prefix: config.prefix.clone(),
			suffix: config.suffix.clone(),
			exclude_patterns: config.exclude.patterns.clone(),
			respect_gitignore: config.respect_gitignore,
		}
	}
}

/// The outcome of scanning a source tree.
#[derive(Debug, Clone, Serialize)]
pub struct ScanResult {
	pub registry: CommandRegistry,
	/// Number of source files fed through the extractor.
	pub files_scanned: usize,
}

/// A scanned source tree together with the renderer its documents use.
///
/// This is the main entry point returned by [`scan_project`] and
/// [`scan_project_with_config`].
#[derive(Debug)]
pub struct ProjectContext {
	pub root: PathBuf,
	pub config: CmddocConfig,
	pub scan: ScanResult,
	pub renderer: Renderer,
}

impl ProjectContext {
	/// Render one document per command, destined for `target`.
	pub fn render_documents(&self, target: &Path) -> CmddocResult<Vec<RenderedDocument>> {
		render_documents(
			&self.scan.registry,
			&self.renderer,
			target,
			&self.config.extension,
		)
	}
}

/// A document rendered for one command and the path it belongs at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
	pub name: String,
	pub path: PathBuf,
	pub content: String,
}

/// A document on disk that does not match what would be generated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaleDocument {
	pub name: String,
	pub path: PathBuf,
	/// Current file content, `None` when the file does not exist.
	pub current: Option<String>,
	pub expected: String,
}

/// Result of comparing generated documents against the target directory.
#[derive(Debug, Clone, Default)]
pub struct CheckResult {
	pub stale: Vec<StaleDocument>,
	/// Number of documents compared.
	pub checked: usize,
}

impl CheckResult {
	/// Returns true if every document on disk is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty()
	}
}

/// Scan `root` using the discovered `cmddoc.toml` (or the defaults).
pub fn scan_project_with_config(root: &Path) -> CmddocResult<ProjectContext> {
	let config = CmddocConfig::load_or_default(root)?;
	scan_project(root, config)
}

/// Scan `root` with an explicit configuration and load its template.
pub fn scan_project(root: &Path, config: CmddocConfig) -> CmddocResult<ProjectContext> {
	let renderer = match config.load_template(root)? {
		Some(source) => Renderer::with_template(source)?,
		None => Renderer::new(),
	};
	let scan = scan_sources(root, &ScanOptions::from_config(&config))?;

	Ok(ProjectContext {
		root: root.to_path_buf(),
		config,
		scan,
		renderer,
	})
}

/// Run every source file under `root` through one [`Extractor`].
///
/// Files are processed one at a time in path order; the first parse error
/// aborts the scan.
pub fn scan_sources(root: &Path, options: &ScanOptions) -> CmddocResult<ScanResult> {
	let classifier = LineClassifier::new(&options.prefix)?;
	let files = collect_sources(root, options)?;
	let mut extractor = Extractor::new(&classifier);

	for path in &files {
		let bytes = std::fs::read(path)?;
		let content = String::from_utf8_lossy(&bytes);
		extractor.scan(&source_id(root, path), &content)?;
	}

	let registry = extractor.into_registry();
	info!(
		files = files.len(),
		commands = registry.len(),
		"scanned source tree"
	);

	Ok(ScanResult {
		registry,
		files_scanned: files.len(),
	})
}

/// Collect every file below `root` whose name ends with the configured
/// suffix, sorted for deterministic ordering.
///
/// Exclude patterns always apply. The root `.gitignore` is only consulted
/// when `respect_gitignore` is set. Symlinks are skipped.
pub fn collect_sources(root: &Path, options: &ScanOptions) -> CmddocResult<Vec<PathBuf>> {
	if !root.is_dir() {
		return Err(CmddocError::Walk(format!(
			"`{}` is not a directory",
			root.display()
		)));
	}

	let gitignore = if options.respect_gitignore {
		build_gitignore(root)?
	} else {
		Gitignore::empty()
	};
	let exclude = build_exclude_matcher(root, &options.exclude_patterns)?;

	let mut files = Vec::new();
	walk_dir(root, options, &gitignore, &exclude, &mut files)?;

	files.sort();
	debug!(count = files.len(), root = %root.display(), "collected source files");
	Ok(files)
}

fn walk_dir(
	dir: &Path,
	options: &ScanOptions,
	gitignore: &Gitignore,
	exclude: &Gitignore,
	files: &mut Vec<PathBuf>,
) -> CmddocResult<()> {
	for entry in std::fs::read_dir(dir)? {
		let entry = entry?;
		let path = entry.path();
		let file_type = entry.file_type()?;

		if file_type.is_symlink() {
			continue;
		}

		let is_dir = file_type.is_dir();
		if gitignore.matched(&path, is_dir).is_ignore() || exclude.matched(&path, is_dir).is_ignore()
		{
			continue;
		}

		if is_dir {
			walk_dir(&path, options, gitignore, exclude, files)?;
		} else if entry.file_name().to_string_lossy().ends_with(&options.suffix) {
			files.push(path);
		}
	}

	Ok(())
}

/// Build a `Gitignore` matcher from the root `.gitignore`, if there is one.
fn build_gitignore(root: &Path) -> CmddocResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.is_file() {
		if let Some(e) = builder.add(&gitignore_path) {
			return Err(CmddocError::Walk(format!(
				"{}: {e}",
				gitignore_path.display()
			)));
		}
	}
	builder
		.build()
		.map_err(|e| CmddocError::Walk(format!("failed to build gitignore rules: {e}")))
}

/// Build a `Gitignore` matcher from exclude patterns. These follow
/// `.gitignore` syntax relative to the source root.
fn build_exclude_matcher(root: &Path, patterns: &[String]) -> CmddocResult<Gitignore> {
	let mut builder = GitignoreBuilder::new(root);
	for pattern in patterns {
		builder.add_line(None, pattern).map_err(|e| {
			CmddocError::ConfigParse(format!("invalid exclude pattern `{pattern}`: {e}"))
		})?;
	}
	builder
		.build()
		.map_err(|e| CmddocError::ConfigParse(format!("failed to build exclude rules: {e}")))
}

/// The identifier recorded for a source file: its path relative to the scan
/// root, with `/` separators.
pub fn source_id(root: &Path, path: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.to_string_lossy()
		.replace('\\', "/")
}

/// Where the document for `name` is written: `<target>/<name>.<extension>`.
pub fn document_path(target: &Path, name: &str, extension: &str) -> CmddocResult<PathBuf> {
	if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
		return Err(CmddocError::InvalidCommandName(name.to_string()));
	}
	Ok(target.join(format!("{name}.{extension}")))
}

/// Render the document of every command in `registry`, in name order.
pub fn render_documents(
	registry: &CommandRegistry,
	renderer: &Renderer,
	target: &Path,
	extension: &str,
) -> CmddocResult<Vec<RenderedDocument>> {
	registry
		.iter()
		.map(|(name, record)| -> CmddocResult<RenderedDocument> {
			Ok(RenderedDocument {
				name: name.to_string(),
				path: document_path(target, name, extension)?,
				content: renderer.render_record(name, record)?,
			})
		})
		.collect()
}

/// Write documents to disk, creating parent directories as needed and
/// overwriting existing files.
pub fn write_documents(documents: &[RenderedDocument]) -> CmddocResult<()> {
	for document in documents {
		if let Some(parent) = document.path.parent() {
			std::fs::create_dir_all(parent)?;
		}
		std::fs::write(&document.path, &document.content)?;
		debug!(command = %document.name, path = %document.path.display(), "wrote document");
	}
	info!(count = documents.len(), "wrote documents");
	Ok(())
}

/// Compare rendered documents with the files currently on disk.
pub fn check_documents(documents: &[RenderedDocument]) -> CmddocResult<CheckResult> {
	let mut stale = Vec::new();

	for document in documents {
		let current = match std::fs::read_to_string(&document.path) {
			Ok(content) => Some(content),
			Err(e) if e.kind() == std::io::ErrorKind::NotFound => None,
			Err(e) => return Err(e.into()),
		};

		if current.as_deref() != Some(document.content.as_str()) {
			stale.push(StaleDocument {
				name: document.name.clone(),
				path: document.path.clone(),
				current,
				expected: document.content.clone(),
			});
		}
	}

	Ok(CheckResult {
		stale,
		checked: documents.len(),
	})
}
