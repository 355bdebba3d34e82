mod common;

use cmddoc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn generate_writes_one_document_per_command() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg(&source)
		.arg(&target)
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote 2 document(s)"));

	let ls = std::fs::read_to_string(target.join("ls.rst"))?;
	assert!(ls.starts_with(".. index:: ls (command)\n\n.. _command_ls:\n\n"));
	assert!(ls.contains(&format!(
		"ls (list a file or directory)\n{}\n",
		"=".repeat(29)
	)));
	assert!(ls.contains("Usage\n^^^^^\n``ls [-lR] [FILEDIR...]``\n"));
	assert!(ls.contains("Synopsis\n^^^^^^^^\nList information about the specified files or directories.\n\n"));
	assert!(ls.contains("Options\n^^^^^^^\n-l\n long format\n-R\n list subdirectories recursively\n"));
	assert!(!ls.contains("Options:"));
	assert!(ls.ends_with(".. generated from: commands/ls.c\n.. command function: do_ls\n"));

	let cat = std::fs::read_to_string(target.join("cat.rst"))?;
	assert!(cat.contains("cat (concatenate file(s) to stdout)"));
	assert!(!cat.contains("Synopsis"));

	assert!(!target.join("command.rst").exists());

	Ok(())
}

#[test]
fn generate_overwrites_existing_documents() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	common::write_file(&target, "ls.rst", "old content\n")?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg(&source)
		.arg(&target)
		.assert()
		.success();

	let ls = std::fs::read_to_string(target.join("ls.rst"))?;
	assert!(!ls.contains("old content"));

	Ok(())
}

#[test]
fn generate_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg("--dry-run")
		.arg(&source)
		.arg(&target)
		.assert()
		.success()
		.stdout(
			predicates::str::contains("would write 2 document(s)")
				.and(predicates::str::contains("cat.rst"))
				.and(predicates::str::contains("ls.rst")),
		);

	assert!(!target.exists());

	Ok(())
}

#[test]
fn generate_reports_parse_errors() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_file(
		tmp.path(),
		"bad.c",
		"BAREBOX_CMD_HELP_START(bad)\n\"no field yet\"\nBAREBOX_CMD_HELP_END\n",
	)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg(tmp.path())
		.arg(tmp.path().join("out"))
		.assert()
		.code(2)
		.stderr(predicates::str::contains("parse error in"));

	assert!(!tmp.path().join("out").exists());

	Ok(())
}

#[test]
fn generate_fails_for_missing_source() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg(tmp.path().join("missing"))
		.arg(tmp.path().join("out"))
		.assert()
		.code(2)
		.stderr(predicates::str::contains("failed to walk"));

	Ok(())
}

#[test]
fn generate_reads_config_file() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	common::write_file(
		&source,
		"cmddoc.toml",
		"extension = \"txt\"\n\n[exclude]\npatterns = [\"cat.c\"]\n",
	)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg(&source)
		.arg(&target)
		.assert()
		.success()
		.stdout(predicates::str::contains("Wrote 1 document(s)"));

	assert!(target.join("ls.txt").is_file());
	assert!(!target.join("cat.txt").exists());

	Ok(())
}

#[test]
fn generate_flags_override_config() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::write_file(&source, "cmddoc.toml", "extension = \"txt\"\n")?;
	common::write_file(
		&source,
		"shell/echo.cpp",
		"MY_CMD_START(echo)\n\t.cmd = do_echo,\nMY_CMD_END\n",
	)?;
	common::write_file(&source, "commands/cat.c", common::CAT_SOURCE)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg("--prefix")
		.arg("MY_CMD")
		.arg("--suffix")
		.arg(".cpp")
		.arg("--extension")
		.arg("md")
		.arg(&source)
		.arg(&target)
		.assert()
		.success();

	let echo = std::fs::read_to_string(target.join("echo.md"))?;
	assert!(echo.contains(".. generated from: shell/echo.cpp\n"));
	assert!(!target.join("cat.md").exists());

	Ok(())
}

#[test]
fn generate_with_custom_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	let template = tmp.path().join("command.md.j2");
	std::fs::write(
		&template,
		"# {{ title }}\n\n{% for option in options %}- `{{ option.flag }}` {{ option.description \
		 }}\n{% endfor %}",
	)?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg("--template")
		.arg(&template)
		.arg(&source)
		.arg(&target)
		.assert()
		.success();

	let ls = std::fs::read_to_string(target.join("ls.rst"))?;
	assert_eq!(
		ls,
		"# ls (list a file or directory)\n\n- `-l` long format\n- `-R` list subdirectories \
		 recursively\n"
	);

	Ok(())
}

#[test]
fn generate_rejects_invalid_template() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	common::sample_tree(&source)?;
	let template = tmp.path().join("broken.j2");
	std::fs::write(&template, "{% for %}")?;

	common::cmddoc_cmd()
		.arg("generate")
		.arg("--template")
		.arg(&template)
		.arg(&source)
		.arg(tmp.path().join("out"))
		.assert()
		.code(2)
		.stderr(predicates::str::contains("template rendering failed"));

	Ok(())
}

#[test]
fn missing_subcommand_prints_hint() {
	common::cmddoc_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("No subcommand specified"));
}
