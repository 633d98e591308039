//! Exit codes of the binary.

use std::path::Path;

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;
use predicates::prelude::*;

fn depart_mental(dir: &Path, database: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("depart_mental");
    cmd.current_dir(dir)
        .env_remove("DEPART_MENTAL_CONFIG")
        .env("DEPART_MENTAL_DB", database);
    cmd
}

#[test]
fn unreachable_database_exits_without_menu() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("no").join("such").join("dept.db");

    depart_mental(dir.path(), &database)
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("could not open department database"));
}

#[test]
fn exit_choice_exits_cleanly() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("dept.db");

    depart_mental(dir.path(), &database)
        .write_stdin("5\n")
        .assert()
        .code(0)
        .stdout(predicate::str::contains("## 5. Exit").count(1));
}

#[test]
fn end_of_input_before_exit_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let database = dir.path().join("dept.db");

    depart_mental(dir.path(), &database)
        .write_stdin("4\n")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("No departments found."));
}
