use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum CmddocError {
	#[error(transparent)]
	#[diagnostic(code(cmddoc::io_error))]
	Io(#[from] std::io::Error),

	#[error("parse error in {file}:{line}: continuation line with no open field: {content:?}")]
	#[diagnostic(
		code(cmddoc::orphan_continuation),
		help("a bare quoted line must follow a help or registration field inside an open block")
	)]
	OrphanContinuation {
		file: String,
		line: usize,
		content: String,
	},

	#[error("invalid escape sequence in {file}:{line}: {reason}")]
	#[diagnostic(
		code(cmddoc::invalid_escape),
		help(
			"C string escapes are supported: \\a \\b \\f \\n \\r \\t \\v \\\\ \\' \\\" \\? \\xHH \\ooo"
		)
	)]
	InvalidEscape {
		file: String,
		line: usize,
		fragment: String,
		reason: String,
	},

	#[error("invalid marker prefix: `{0}`")]
	#[diagnostic(
		code(cmddoc::invalid_prefix),
		help("the prefix must be an identifier such as `BAREBOX_CMD`")
	)]
	InvalidMarkerPrefix(String),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(cmddoc::config_parse),
		help("check that cmddoc.toml is valid TOML with optional [exclude] and [template] sections")
	)]
	ConfigParse(String),

	#[error("failed to walk source tree: {0}")]
	#[diagnostic(code(cmddoc::walk))]
	Walk(String),

	#[error("template rendering failed: {0}")]
	#[diagnostic(code(cmddoc::template_render))]
	TemplateRender(String),

	#[error("command name `{0}` cannot be used as a document file name")]
	#[diagnostic(
		code(cmddoc::invalid_command_name),
		help("command names must not contain path separators")
	)]
	InvalidCommandName(String),
}

pub type CmddocResult<T> = Result<T, CmddocError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
