mod common;

use cmddoc_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

fn generate(source: &std::path::Path, target: &std::path::Path) {
	common::cmddoc_cmd()
		.arg("generate")
		.arg(source)
		.arg(target)
		.assert()
		.success();
}

#[test]
fn check_passes_when_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	generate(&source, &target);

	common::cmddoc_cmd()
		.arg("check")
		.arg(&source)
		.arg(&target)
		.assert()
		.success()
		.stdout(predicates::str::contains("all 2 document(s) are up to date"));

	Ok(())
}

#[test]
fn check_fails_when_documents_are_missing() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;

	common::cmddoc_cmd()
		.arg("check")
		.arg(&source)
		.arg(&target)
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("2 of 2 document(s) are stale")
				.and(predicates::str::contains("ls.rst (missing)"))
				.and(predicates::str::contains("cmddoc generate")),
		);

	Ok(())
}

#[test]
fn check_fails_when_source_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	generate(&source, &target);

	let updated = common::CAT_SOURCE.replace("concatenate file(s) to stdout", "print files");
	common::write_file(&source, "commands/cat.c", &updated)?;

	common::cmddoc_cmd()
		.arg("check")
		.arg(&source)
		.arg(&target)
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("1 of 2 document(s) are stale")
				.and(predicates::str::contains("cat.rst (outdated)"))
				.and(predicates::str::contains("ls.rst").not()),
		);

	Ok(())
}

#[test]
fn check_diff_shows_changes() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	generate(&source, &target);

	let ls = target.join("ls.rst");
	let content = std::fs::read_to_string(&ls)?;
	std::fs::write(&ls, content.replace("long format", "stale wording"))?;

	common::cmddoc_cmd()
		.arg("check")
		.arg("--diff")
		.arg(&source)
		.arg(&target)
		.assert()
		.code(1)
		.stderr(
			predicates::str::contains("- stale wording")
				.and(predicates::str::contains("+ long format")),
		);

	Ok(())
}

#[test]
fn check_without_diff_hides_content() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	let source = tmp.path().join("src");
	let target = tmp.path().join("out");
	common::sample_tree(&source)?;
	generate(&source, &target);

	let ls = target.join("ls.rst");
	let content = std::fs::read_to_string(&ls)?;
	std::fs::write(&ls, content.replace("long format", "stale wording"))?;

	common::cmddoc_cmd()
		.arg("check")
		.arg(&source)
		.arg(&target)
		.assert()
		.code(1)
		.stderr(predicates::str::contains("stale wording").not());

	Ok(())
}
