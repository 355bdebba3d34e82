use std::borrow::Cow;

use minijinja::Environment;
use serde::Serialize;

use crate::CmddocError;
use crate::CmddocResult;
use crate::registry::CommandRecord;
use crate::registry::OptionEntry;

/// Name under which the document template is registered. The extension keeps
/// minijinja's auto-escaping disabled.
const TEMPLATE_NAME: &str = "command.rst";

/// Trailing help-text line that introduces the option list.
const OPTIONS_MARKER: &str = "Options:";

/// Built-in reStructuredText layout.
pub const DEFAULT_TEMPLATE: &str = r#".. index:: {{ name }} (command)

.. _command_{{ name }}:

{{ title }}
{{ title|underline("=") }}

{% if usage is not none %}
Usage
^^^^^
``{{ usage }}``

{% endif %}
{% if synopsis is not none %}
Synopsis
^^^^^^^^
{{ synopsis }}

{% endif %}
{% if options %}
Options
^^^^^^^
{% for option in options %}
{% if option.flag %}
{{ option.flag }}
{% endif %}
 {{ option.description }}
{% endfor %}

{% endif %}
{% if description is not none %}
Description
^^^^^^^^^^^
{{ description }}

{% endif %}
.. generated from: {{ files|join(", ") }}
{% if functions %}
.. command function: {{ functions|join(", ") }}
{% endif %}
"#;

/// The sections of one command's document, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDoc {
	pub name: String,
	/// The name, followed by the short description in parentheses when one
	/// was registered.
	pub title: String,
	pub usage: Option<String>,
	pub synopsis: Option<String>,
	/// Options with flag and description trimmed.
	pub options: Vec<OptionEntry>,
	pub description: Option<String>,
	pub group: Option<String>,
	pub files: Vec<String>,
	pub functions: Vec<String>,
}

impl CommandDoc {
	pub fn from_record(name: &str, record: &CommandRecord) -> Self {
		let title = match joined(&record.short_desc) {
			Some(desc) => format!("{name} ({desc})"),
			None => name.to_string(),
		};
		let usage = joined(&record.usage).map(|usage| format!("{name} {usage}"));

		let mut pre = record.synopsis_pre.as_slice();
		if pre.last().is_some_and(|line| line == OPTIONS_MARKER) {
			pre = &pre[..pre.len() - 1];
		}
		if pre.last().is_some_and(String::is_empty) {
			pre = &pre[..pre.len() - 1];
		}

		let mut post = record.synopsis_post.as_slice();
		if post.first().is_some_and(String::is_empty) {
			post = &post[1..];
		}

		let options = record
			.options
			.iter()
			.map(|option| OptionEntry::new(option.flag.trim(), option.description.trim()))
			.collect();

		Self {
			name: name.to_string(),
			title,
			usage,
			synopsis: lines(pre),
			options,
			description: lines(post),
			group: joined(&record.group),
			files: record.files.iter().cloned().collect(),
			functions: record.invoke_targets.clone(),
		}
	}
}

/// Concatenate fragments and trim the result. `None` only when the field was
/// never given, so an empty description still yields `name ()`.
fn joined(fragments: &[String]) -> Option<String> {
	(!fragments.is_empty()).then(|| fragments.concat().trim().to_string())
}

/// Join lines with newlines and trim the block. `None` when no lines remain.
fn lines(lines: &[String]) -> Option<String> {
	(!lines.is_empty()).then(|| lines.join("\n").trim().to_string())
}

/// Renders [`CommandDoc`]s through a minijinja template.
#[derive(Debug, Clone)]
pub struct Renderer {
	template: Cow<'static, str>,
}

impl Default for Renderer {
	fn default() -> Self {
		Self {
			template: Cow::Borrowed(DEFAULT_TEMPLATE),
		}
	}
}

impl Renderer {
	pub fn new() -> Self {
		Self::default()
	}

	/// Use a custom template. The template is compiled once here so syntax
	/// errors surface before any document is written.
	pub fn with_template(source: impl Into<String>) -> CmddocResult<Self> {
		let source = source.into();
		{
			let mut env = environment();
			env.add_template(TEMPLATE_NAME, &source)
				.map_err(|e| CmddocError::TemplateRender(e.to_string()))?;
		}

		Ok(Self {
			template: Cow::Owned(source),
		})
	}

	pub fn render(&self, doc: &CommandDoc) -> CmddocResult<String> {
		let mut env = environment();
		env.add_template(TEMPLATE_NAME, &self.template)
			.map_err(|e| CmddocError::TemplateRender(e.to_string()))?;

		let template = env
			.get_template(TEMPLATE_NAME)
			.map_err(|e| CmddocError::TemplateRender(e.to_string()))?;

		template
			.render(minijinja::Value::from_serialize(doc))
			.map_err(|e| CmddocError::TemplateRender(format!("`{}`: {e}", doc.name)))
	}

	/// Build the document view for `record` and render it.
	pub fn render_record(&self, name: &str, record: &CommandRecord) -> CmddocResult<String> {
		self.render(&CommandDoc::from_record(name, record))
	}
}

fn environment<'source>() -> Environment<'source> {
	let mut env = Environment::new();
	env.set_trim_blocks(true);
	env.set_lstrip_blocks(true);
	env.add_filter("underline", underline);
	env
}

/// Repeat `ch` once per character of `value`, for reST section titles.
fn underline(value: &str, ch: &str) -> String {
	ch.repeat(value.chars().count())
}
