//! `cmddoc_core` extracts command documentation from help and registration
//! blocks embedded in source files and renders one reference document per
//! command.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Source tree
//!   → Project walk (collects every file ending in the source suffix)
//!   → Line classifier (matches each line against the ordered marker rules)
//!   → Extractor (per-file state machine, routes values and continuation lines)
//!   → Command registry (one record per command name, merged across files)
//!   → Renderer (builds a document view and renders it through minijinja)
//! ```
//!
//! ## Block Syntax
//!
//! ```c
//! BAREBOX_CMD_HELP_START(foo)
//! BAREBOX_CMD_HELP_TEXT("Usage line.")
//! BAREBOX_CMD_HELP_TEXT("")
//! BAREBOX_CMD_HELP_OPT("-x", "enable x")
//! BAREBOX_CMD_HELP_END
//!
//! BAREBOX_CMD_START(foo)
//! 	.cmd = do_foo,
//! 	BAREBOX_CMD_DESC("do foo things")
//! 	BAREBOX_CMD_OPTS("[-x] FILE")
//! 	BAREBOX_CMD_GROUP(CMD_GRP_MISC)
//! BAREBOX_CMD_END
//! ```
//!
//! A line holding only a quoted string (`"more text"`) continues whichever
//! field was opened last in the current block.
//!
//! ## Modules
//!
//! - [`classifier`]: The ordered table of line rules.
//! - [`config`]: Configuration loading from `cmddoc.toml`.
//! - [`escape`]: Decoding of backslash escapes in quoted fragments.
//! - [`extractor`]: The per-file extraction state machine.
//! - [`project`]: Directory walking, scanning, and document output.
//! - [`registry`]: Command records and the registry that holds them.
//! - [`render`]: The document view and its template.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cmddoc_core::project::scan_project_with_config;
//! use cmddoc_core::project::write_documents;
//! use std::path::Path;
//!
//! let ctx = scan_project_with_config(Path::new("barebox")).unwrap();
//! let documents = ctx.render_documents(Path::new("Documentation/commands")).unwrap();
//! write_documents(&documents).unwrap();
//! ```

pub use classifier::*;
pub use config::*;
pub use error::*;
pub use escape::*;
pub use extractor::*;
pub use registry::*;
pub use render::*;

pub mod classifier;
pub mod config;
#[allow(unused_assignments)]
mod error;
pub mod escape;
pub mod extractor;
pub mod project;
pub mod registry;
pub mod render;
