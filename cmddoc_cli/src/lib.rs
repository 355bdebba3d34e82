use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Generate one reference document per command from help blocks in source files.",
	long_about = "cmddoc scans a source tree for command help blocks \
	              (`BAREBOX_CMD_HELP_START` ... `BAREBOX_CMD_HELP_END`) and command \
	              registration blocks (`BAREBOX_CMD_START` ... `BAREBOX_CMD_END`), merges \
	              everything it finds per command name, and writes one reStructuredText \
	              document per command.\n\nQuick start:\n  cmddoc generate SOURCE TARGET  \
	              Write the documents\n  cmddoc check SOURCE TARGET     Verify the documents \
	              are current\n  cmddoc list SOURCE             Show the discovered commands"
)]
pub struct CmddocCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Marker prefix shared by every block macro. Overrides `prefix` in
	/// `cmddoc.toml`.
	#[arg(long, global = true)]
	pub prefix: Option<String>,

	/// Only scan files whose name ends with this suffix. Overrides `suffix`
	/// in `cmddoc.toml`.
	#[arg(long, global = true)]
	pub suffix: Option<String>,

	/// Extension given to generated documents. Overrides `extension` in
	/// `cmddoc.toml`.
	#[arg(long, global = true)]
	pub extension: Option<String>,

	/// Render documents with this minijinja template instead of the built-in
	/// reStructuredText layout.
	#[arg(long, global = true)]
	pub template: Option<PathBuf>,

	/// Enable verbose output. Also raises the log level to `debug` unless
	/// `RUST_LOG` is set.
	#[arg(long, short, global = true, default_value_t = false)]
	pub verbose: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Scan a source tree and write one document per command.
	///
	/// Every file below SOURCE whose name ends with the configured suffix is
	/// scanned. Documents are written to `TARGET/<command>.<extension>`,
	/// overwriting existing files. The target directory is created when
	/// missing.
	Generate {
		/// Root of the source tree to scan.
		source: PathBuf,

		/// Directory receiving the generated documents.
		target: PathBuf,

		/// Print which documents would be written without touching disk.
		#[arg(long, default_value_t = false)]
		dry_run: bool,
	},
	/// Check that the documents in TARGET match what would be generated.
	///
	/// Exits with status 1 when any document is missing or differs from its
	/// generated content. Ideal for CI pipelines.
	Check {
		/// Root of the source tree to scan.
		source: PathBuf,

		/// Directory holding the generated documents.
		target: PathBuf,

		/// Show a unified diff for each outdated document.
		#[arg(long, default_value_t = false)]
		diff: bool,
	},
	/// List every command discovered in a source tree.
	List {
		/// Root of the source tree to scan.
		source: PathBuf,

		/// Output format. Use `text` for human-readable output or `json` for
		/// the full command records.
		#[arg(long, value_enum, default_value_t = ListFormat::Text)]
		format: ListFormat,
	},
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ListFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON object keyed by command name.
	Json,
}
