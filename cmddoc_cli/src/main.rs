use std::path::Path;
use std::process;

use clap::Parser;
use cmddoc_cli::CmddocCli;
use cmddoc_cli::Commands;
use cmddoc_cli::ListFormat;
use cmddoc_core::CmddocConfig;
use cmddoc_core::project::ProjectContext;
use cmddoc_core::project::check_documents;
use cmddoc_core::project::scan_project;
use cmddoc_core::project::write_documents;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing::debug;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,yellow) => {
		if color_enabled() {
			format!("{}", $text.yellow())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

fn main() {
	let args = CmddocCli::parse();

	// Respect NO_COLOR env var, --no-color flag, and terminals without color.
	let use_color = !args.no_color
		&& std::env::var_os("NO_COLOR").is_none()
		&& supports_color::on(supports_color::Stream::Stderr).is_some();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	init_tracing(args.verbose, use_color);

	let result = match &args.command {
		Some(Commands::Generate {
			source,
			target,
			dry_run,
		}) => run_generate(&args, source, target, *dry_run),
		Some(Commands::Check {
			source,
			target,
			diff,
		}) => run_check(&args, source, target, *diff),
		Some(Commands::List { source, format }) => run_list(&args, source, *format),
		None => {
			eprintln!("No subcommand specified. Run `cmddoc --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Render library errors through miette for error codes and help text.
		match e.downcast::<cmddoc_core::CmddocError>() {
			Ok(cmddoc_err) => {
				let report: miette::Report = (*cmddoc_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr at `warn` (or `debug` with `--verbose`), unless `RUST_LOG`
/// says otherwise.
fn init_tracing(verbose: bool, use_color: bool) {
	let default_level = if verbose { "debug" } else { "warn" };
	let filter =
		EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.try_init()
		.ok();
}

/// Layer the CLI flags over the configuration discovered in `source`.
fn load_config(args: &CmddocCli, source: &Path) -> Result<CmddocConfig, Box<dyn std::error::Error>> {
	let mut config = CmddocConfig::load_or_default(source)?;

	if let Some(prefix) = &args.prefix {
		config.prefix.clone_from(prefix);
	}
	if let Some(suffix) = &args.suffix {
		config.suffix.clone_from(suffix);
	}
	if let Some(extension) = &args.extension {
		config.extension.clone_from(extension);
	}
	if let Some(template) = &args.template {
		// Relative to the working directory, unlike the config file's path.
		config.template.path = Some(std::env::current_dir()?.join(template));
	}

	debug!(?config, "resolved configuration");
	Ok(config)
}

fn scan(args: &CmddocCli, source: &Path) -> Result<ProjectContext, Box<dyn std::error::Error>> {
	let config = load_config(args, source)?;
	Ok(scan_project(source, config)?)
}

fn run_generate(
	args: &CmddocCli,
	source: &Path,
	target: &Path,
	dry_run: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args, source)?;
	let documents = ctx.render_documents(target)?;

	if documents.is_empty() {
		println!(
			"No commands found in {} file(s).",
			ctx.scan.files_scanned
		);
		return Ok(());
	}

	if dry_run {
		println!("Dry run: would write {} document(s):", documents.len());
		for document in &documents {
			println!("  {}", make_relative(&document.path, target));
		}
		return Ok(());
	}

	write_documents(&documents)?;
	println!(
		"Wrote {} document(s) to {}.",
		documents.len(),
		target.display()
	);

	if args.verbose {
		for document in &documents {
			println!("  {}", make_relative(&document.path, target));
		}
	}

	Ok(())
}

fn run_check(
	args: &CmddocCli,
	source: &Path,
	target: &Path,
	show_diff: bool,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args, source)?;
	let documents = ctx.render_documents(target)?;
	let result = check_documents(&documents)?;

	if result.is_ok() {
		println!(
			"Check passed: all {} document(s) are up to date.",
			result.checked
		);
		return Ok(());
	}

	eprintln!(
		"Check failed: {} of {} document(s) are stale.",
		result.stale.len(),
		result.checked
	);
	for stale in &result.stale {
		let rel = make_relative(&stale.path, target);
		let status = match stale.current {
			Some(_) => colored!("outdated", yellow),
			None => colored!("missing", red),
		};
		eprintln!("  {rel} ({status})");

		if show_diff {
			print_diff(stale.current.as_deref().unwrap_or_default(), &stale.expected);
		}
	}
	eprintln!();
	eprintln!(
		"Run `cmddoc generate {} {}` to update them.",
		source.display(),
		target.display()
	);

	process::exit(1);
}

fn run_list(
	args: &CmddocCli,
	source: &Path,
	format: ListFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = scan(args, source)?;
	let registry = &ctx.scan.registry;

	match format {
		ListFormat::Json => {
			println!("{}", serde_json::to_string_pretty(registry)?);
		}
		ListFormat::Text => {
			if registry.is_empty() {
				println!(
					"No commands found in {} file(s).",
					ctx.scan.files_scanned
				);
				return Ok(());
			}

			println!("{}", colored!("Commands:", bold));
			for (name, record) in registry.iter() {
				let files: Vec<&str> = record.files.iter().map(String::as_str).collect();
				let group = record
					.group
					.first()
					.map(|group| format!(" [{group}]"))
					.unwrap_or_default();
				println!("  {name}{group} {}", files.join(", "));
			}

			println!(
				"\n{} command(s) in {} file(s)",
				registry.len(),
				ctx.scan.files_scanned
			);
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
