use regex::Captures;
use regex::Regex;

use crate::CmddocError;
use crate::CmddocResult;

/// Marker prefix used by barebox command sources.
pub const DEFAULT_PREFIX: &str = "BAREBOX_CMD";

/// The marker a single source line carries. Captured text is raw: quoted
/// fragments still contain their escape sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineKind {
	/// `PREFIX_HELP_START(name)`
	HelpStart { name: String },
	/// `PREFIX_START(args)`
	CommandStart { args: String },
	/// `PREFIX_HELP_TEXT("...")`
	HelpText(String),
	/// `PREFIX_HELP_OPT("flag", "description")`
	HelpOpt { flag: String, description: String },
	/// `.cmd = value,`
	CommandFunc(String),
	/// `PREFIX_DESC("...")`
	CommandDesc(String),
	/// `PREFIX_OPTS("...")`
	CommandOpts(String),
	/// `PREFIX_GROUP(args)`
	CommandGroup(String),
	/// A bare `"..."` line extending the previously opened field.
	Continuation(String),
	/// `PREFIX_HELP_END`
	HelpEnd,
	/// `PREFIX_END`
	CommandEnd,
}

impl LineKind {
	/// Whether this line closes the active block.
	pub fn is_block_end(&self) -> bool {
		matches!(self, Self::HelpEnd | Self::CommandEnd)
	}
}

type BuildFn = fn(&Captures<'_>) -> LineKind;

struct Rule {
	pattern: Regex,
	build: BuildFn,
}

/// Ordered table of line rules. The first matching rule wins.
pub struct LineClassifier {
	prefix: String,
	rules: Vec<Rule>,
}

impl std::fmt::Debug for LineClassifier {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("LineClassifier")
			.field("prefix", &self.prefix)
			.field("rules", &self.rules.len())
			.finish()
	}
}

impl LineClassifier {
	/// Build the rule table for markers named `{prefix}_HELP_START`,
	/// `{prefix}_START` and so on.
	pub fn new(prefix: &str) -> CmddocResult<Self> {
		if !is_identifier(prefix) {
			return Err(CmddocError::InvalidMarkerPrefix(prefix.to_string()));
		}

		let p = regex::escape(prefix);
		let rules = vec![
			rule(prefix, &format!(r"^\s*{p}_HELP_START\s*\((\w+)\)?\s*$"), |caps| {
				LineKind::HelpStart {
					name: group(caps, 1),
				}
			})?,
			rule(prefix, &format!(r"^\s*{p}_START\s*\((.+)\)\s*$"), |caps| {
				LineKind::CommandStart {
					args: group(caps, 1),
				}
			})?,
			rule(prefix, &format!(r#"^\s*{p}_HELP_TEXT\s*\("(.*?)"\)?\s*$"#), |caps| {
				LineKind::HelpText(group(caps, 1))
			})?,
			rule(
				prefix,
				&format!(r#"^\s*{p}_HELP_OPT\s*\("(.*?)",\s*"(.*?)"\)?\s*$"#),
				|caps| {
					LineKind::HelpOpt {
						flag: group(caps, 1),
						description: group(caps, 2),
					}
				},
			)?,
			rule(prefix, r"^\s*\.cmd\s*=\s*(.+?),\s*$", |caps| {
				LineKind::CommandFunc(group(caps, 1))
			})?,
			rule(prefix, &format!(r#"^\s*{p}_DESC\s*\("(.*?)"\)?\s*$"#), |caps| {
				LineKind::CommandDesc(group(caps, 1))
			})?,
			rule(prefix, &format!(r#"^\s*{p}_OPTS\s*\("(.*?)"\)?\s*$"#), |caps| {
				LineKind::CommandOpts(group(caps, 1))
			})?,
			rule(prefix, &format!(r"^\s*{p}_GROUP\s*\((.+)\)\s*$"), |caps| {
				LineKind::CommandGroup(group(caps, 1))
			})?,
			rule(prefix, r#"^\s*"(.*?)"\s*\)?\s*$"#, |caps| {
				LineKind::Continuation(group(caps, 1))
			})?,
			rule(prefix, &format!(r"^\s*{p}_HELP_END\s*$"), |_| LineKind::HelpEnd)?,
			rule(prefix, &format!(r"^\s*{p}_END\s*$"), |_| LineKind::CommandEnd)?,
		];

		Ok(Self {
			prefix: prefix.to_string(),
			rules,
		})
	}

	/// The marker prefix this classifier was built for.
	pub fn prefix(&self) -> &str {
		&self.prefix
	}

	/// Classify one line (without its trailing newline).
	pub fn classify(&self, line: &str) -> Option<LineKind> {
		self.rules.iter().find_map(|rule| {
			rule.pattern
				.captures(line)
				.map(|caps| (rule.build)(&caps))
		})
	}
}

fn rule(prefix: &str, pattern: &str, build: BuildFn) -> CmddocResult<Rule> {
	let pattern = Regex::new(pattern)
		.map_err(|e| CmddocError::InvalidMarkerPrefix(format!("{prefix} ({e})")))?;
	Ok(Rule { pattern, build })
}

fn group(caps: &Captures<'_>, index: usize) -> String {
	caps.get(index)
		.map_or_else(String::new, |m| m.as_str().to_string())
}

fn is_identifier(value: &str) -> bool {
	let mut chars = value.chars();
	let Some(first) = chars.next() else {
		return false;
	};

	(first.is_ascii_alphabetic() || first == '_')
		&& chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
