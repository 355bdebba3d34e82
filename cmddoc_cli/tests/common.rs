use std::path::Path;

use assert_cmd::Command;

pub const LS_SOURCE: &str = r#"#include <common.h>
#include <command.h>

BAREBOX_CMD_HELP_START(ls)
BAREBOX_CMD_HELP_TEXT("List information about the specified files or directories.")
BAREBOX_CMD_HELP_TEXT("")
BAREBOX_CMD_HELP_TEXT("Options:")
BAREBOX_CMD_HELP_OPT ("-l",  "long format")
BAREBOX_CMD_HELP_OPT ("-R",  "list subdirectories recursively")
BAREBOX_CMD_HELP_END

BAREBOX_CMD_START(ls)
	.cmd		= do_ls,
	BAREBOX_CMD_DESC("list a file or directory")
	BAREBOX_CMD_OPTS("[-lR] [FILEDIR...]")
	BAREBOX_CMD_GROUP(CMD_GRP_FILE)
	BAREBOX_CMD_HELP(cmd_ls_help)
BAREBOX_CMD_END
"#;

pub const CAT_SOURCE: &str = r#"BAREBOX_CMD_START(cat)
	.cmd		= do_cat,
	BAREBOX_CMD_DESC("concatenate file(s) to stdout")
	BAREBOX_CMD_OPTS("FILE...")
	BAREBOX_CMD_GROUP(CMD_GRP_FILE)
BAREBOX_CMD_END
"#;

pub fn cmddoc_cmd() -> Command {
	let mut cmd = Command::cargo_bin("cmddoc").unwrap();
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

/// Write `content` to `root/relative`, creating parent directories.
pub fn write_file(root: &Path, relative: &str, content: &str) -> std::io::Result<()> {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent)?;
	}
	std::fs::write(path, content)
}

/// A source tree with the `ls` and `cat` commands below `commands/`.
pub fn sample_tree(root: &Path) -> std::io::Result<()> {
	write_file(root, "commands/ls.c", LS_SOURCE)?;
	write_file(root, "commands/cat.c", CAT_SOURCE)?;
	write_file(root, "include/command.h", "#define BAREBOX_CMD_START(_name)\n")
}
