use tracing::debug;
use tracing::warn;

use crate::CmddocError;
use crate::CmddocResult;
use crate::classifier::LineClassifier;
use crate::classifier::LineKind;
use crate::escape::decode_escapes;
use crate::registry::CommandRegistry;
use crate::registry::Field;
use crate::registry::OptionEntry;

/// Per-file position of the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
enum BlockState {
	/// Outside of any help or registration block.
	Idle,
	/// Inside a block for `name`. `cursor` is the field that receives
	/// continuation lines; it is unset until the block's first field marker.
	InBlock { name: String, cursor: Option<Field> },
}

/// Location of the line being processed, used for error reporting.
#[derive(Clone, Copy)]
struct LineContext<'a> {
	file: &'a str,
	number: usize,
	text: &'a str,
}

impl LineContext<'_> {
	fn decode(&self, raw: &str) -> CmddocResult<String> {
		decode_escapes(raw).map_err(|e| {
			CmddocError::InvalidEscape {
				file: self.file.to_string(),
				line: self.number,
				fragment: e.fragment,
				reason: e.reason,
			}
		})
	}

	fn orphan(&self) -> CmddocError {
		CmddocError::OrphanContinuation {
			file: self.file.to_string(),
			line: self.number,
			content: self.text.to_string(),
		}
	}
}

/// Feeds source files through the line classifier and accumulates the
/// resulting command records into one registry.
///
/// Each call to [`Extractor::scan`] starts idle, so block state never leaks
/// from one file into the next, while the registry is shared by all of them.
#[derive(Debug)]
pub struct Extractor<'c> {
	classifier: &'c LineClassifier,
	registry: CommandRegistry,
}

impl<'c> Extractor<'c> {
	pub fn new(classifier: &'c LineClassifier) -> Self {
		Self::with_registry(classifier, CommandRegistry::new())
	}

	/// Continue accumulating into an existing registry.
	pub fn with_registry(classifier: &'c LineClassifier, registry: CommandRegistry) -> Self {
		Self {
			classifier,
			registry,
		}
	}

	pub fn registry(&self) -> &CommandRegistry {
		&self.registry
	}

	pub fn into_registry(self) -> CommandRegistry {
		self.registry
	}

	/// Process every line of `content`, which was read from `file`.
	///
	/// A block left open at the end of the file keeps whatever it captured.
	pub fn scan(&mut self, file: &str, content: &str) -> CmddocResult<()> {
		debug!(file, "scanning source");
		let mut state = BlockState::Idle;

		for (index, text) in content.lines().enumerate() {
			let Some(kind) = self.classifier.classify(text) else {
				continue;
			};
			let ctx = LineContext {
				file,
				number: index + 1,
				text,
			};
			self.step(&mut state, &ctx, kind)?;
		}

		if let BlockState::InBlock { name, .. } = state {
			warn!(file, command = %name, "block not closed before end of file");
		}

		Ok(())
	}

	fn step(
		&mut self,
		state: &mut BlockState,
		ctx: &LineContext<'_>,
		kind: LineKind,
	) -> CmddocResult<()> {
		if kind.is_block_end() {
			*state = BlockState::Idle;
			return Ok(());
		}

		match kind {
			LineKind::HelpStart { name } | LineKind::CommandStart { args: name } => {
				self.open(ctx.file, &name);
				*state = BlockState::InBlock { name, cursor: None };
			}
			LineKind::Continuation(raw) => {
				let BlockState::InBlock { name, cursor } = state else {
					return Ok(());
				};
				let Some(field) = *cursor else {
					return Err(ctx.orphan());
				};
				let fragment = ctx.decode(&raw)?;
				if !self.registry.resolve(name).append_to_last(field, &fragment) {
					return Err(ctx.orphan());
				}
			}
			marker => {
				let BlockState::InBlock { name, cursor } = state else {
					return Ok(());
				};
				if let Some(field) = self.record_field(name, ctx, marker)? {
					*cursor = Some(field);
				}
			}
		}

		Ok(())
	}

	fn open(&mut self, file: &str, name: &str) {
		let record = self.registry.resolve(name);
		if !record.files.is_empty() && !record.files.contains(file) {
			warn!(
				file,
				command = name,
				"command already defined in another file; merging fields"
			);
		}
		record.files.insert(file.to_string());
		debug!(file, command = name, "opened block");
	}

	/// Append the value captured by a field marker and return the field that
	/// now owns the cursor, or `None` if `marker` is not a field marker.
	fn record_field(
		&mut self,
		name: &str,
		ctx: &LineContext<'_>,
		marker: LineKind,
	) -> CmddocResult<Option<Field>> {
		let record = self.registry.resolve(name);

		let field = match marker {
			LineKind::HelpText(raw) => {
				let field = record.help_text_field();
				record.push_text(field, ctx.decode(&raw)?.trim().to_string());
				field
			}
			LineKind::HelpOpt { flag, description } => {
				let entry = OptionEntry::new(ctx.decode(&flag)?, ctx.decode(&description)?);
				record.push_option(entry);
				Field::Options
			}
			LineKind::CommandFunc(value) => {
				record.push_text(Field::InvokeTargets, value);
				Field::InvokeTargets
			}
			LineKind::CommandDesc(raw) => {
				record.push_text(Field::ShortDesc, ctx.decode(&raw)?);
				Field::ShortDesc
			}
			LineKind::CommandOpts(raw) => {
				record.push_text(Field::Usage, ctx.decode(&raw)?);
				Field::Usage
			}
			LineKind::CommandGroup(value) => {
				record.push_text(Field::Group, value);
				Field::Group
			}
			LineKind::HelpStart { .. }
			| LineKind::CommandStart { .. }
			| LineKind::Continuation(_)
			| LineKind::HelpEnd
			| LineKind::CommandEnd => return Ok(None),
		};

		Ok(Some(field))
	}
}
