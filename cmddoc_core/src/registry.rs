use std::collections::BTreeMap;
use std::collections::BTreeSet;

use serde::Serialize;

/// A field of a [`CommandRecord`] that can receive continuation lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
	SynopsisPre,
	Options,
	SynopsisPost,
	InvokeTargets,
	ShortDesc,
	Usage,
	Group,
}

/// How a field stores its entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldShape {
	/// A sequence of strings; continuations extend the last string.
	Text,
	/// A sequence of `(flag, description)` pairs; continuations extend the
	/// description of the last pair.
	Pair,
}

impl Field {
	pub fn shape(self) -> FieldShape {
		match self {
			Self::Options => FieldShape::Pair,
			Self::SynopsisPre
			| Self::SynopsisPost
			| Self::InvokeTargets
			| Self::ShortDesc
			| Self::Usage
			| Self::Group => FieldShape::Text,
		}
	}
}

/// One `(flag, description)` entry of a command's option list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct OptionEntry {
	pub flag: String,
	pub description: String,
}

impl OptionEntry {
	pub fn new(flag: impl Into<String>, description: impl Into<String>) -> Self {
		Self {
			flag: flag.into(),
			description: description.into(),
		}
	}
}

/// Everything collected for one command name. An empty field means the
/// corresponding marker was never seen.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CommandRecord {
	/// Source files that contributed to this record, relative to the scan
	/// root.
	pub files: BTreeSet<String>,
	/// Help text before the first option.
	pub synopsis_pre: Vec<String>,
	pub options: Vec<OptionEntry>,
	/// Help text after the first option.
	pub synopsis_post: Vec<String>,
	/// Values of `.cmd = ...` in registration blocks.
	pub invoke_targets: Vec<String>,
	pub short_desc: Vec<String>,
	pub usage: Vec<String>,
	pub group: Vec<String>,
}

impl CommandRecord {
	/// Where the next help-text line goes: before the option list until the
	/// first option has been recorded, after it from then on.
	pub fn help_text_field(&self) -> Field {
		if self.options.is_empty() {
			Field::SynopsisPre
		} else {
			Field::SynopsisPost
		}
	}

	/// Append a new entry to a text-shaped field.
	pub fn push_text(&mut self, field: Field, value: String) {
		if let Some(entries) = self.text_field_mut(field) {
			entries.push(value);
		}
	}

	pub fn push_option(&mut self, entry: OptionEntry) {
		self.options.push(entry);
	}

	/// Extend the last entry of `field` with `fragment`. Returns `false`
	/// when the field has no entry yet.
	pub fn append_to_last(&mut self, field: Field, fragment: &str) -> bool {
		match field.shape() {
			FieldShape::Pair => {
				let Some(last) = self.options.last_mut() else {
					return false;
				};
				last.description.push_str(fragment);
				true
			}
			FieldShape::Text => {
				let Some(last) = self.text_field_mut(field).and_then(|v| v.last_mut()) else {
					return false;
				};
				last.push_str(fragment);
				true
			}
		}
	}

	fn text_field_mut(&mut self, field: Field) -> Option<&mut Vec<String>> {
		match field {
			Field::SynopsisPre => Some(&mut self.synopsis_pre),
			Field::SynopsisPost => Some(&mut self.synopsis_post),
			Field::InvokeTargets => Some(&mut self.invoke_targets),
			Field::ShortDesc => Some(&mut self.short_desc),
			Field::Usage => Some(&mut self.usage),
			Field::Group => Some(&mut self.group),
			Field::Options => None,
		}
	}
}

/// All command records discovered by a scan, keyed by command name.
///
/// Iteration is in name order so that generated output is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct CommandRegistry {
	commands: BTreeMap<String, CommandRecord>,
}

impl CommandRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	/// Look up `name`, creating an empty record on first sighting.
	pub fn resolve(&mut self, name: &str) -> &mut CommandRecord {
		self.commands.entry(name.to_string()).or_default()
	}

	pub fn get(&self, name: &str) -> Option<&CommandRecord> {
		self.commands.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.commands.contains_key(name)
	}

	pub fn len(&self) -> usize {
		self.commands.len()
	}

	pub fn is_empty(&self) -> bool {
		self.commands.is_empty()
	}

	pub fn names(&self) -> impl Iterator<Item = &str> {
		self.commands.keys().map(String::as_str)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &CommandRecord)> {
		self.commands
			.iter()
			.map(|(name, record)| (name.as_str(), record))
	}
}
