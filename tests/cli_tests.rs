mod common;

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

use common::*;

fn dtformat() -> Command {
    let mut cmd = Command::cargo_bin("dtformat").unwrap();
    cmd.env_remove("RUST_LOG");
    cmd
}

#[test]
fn help_mentions_options() {
    dtformat()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--dry-run"))
        .stdout(predicate::str::contains("--config"));
}

#[test]
fn formats_folder_and_exits_zero_despite_failures() {
    let dir = TempDir::new().unwrap();
    let good = write_workbook(dir.path(), "a.xlsx", &[&["序号", MARKER], &["1", ""]]);
    fs::write(dir.path().join("b.xlsx"), b"garbage").unwrap();

    dtformat()
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("成功处理文件: a.xlsx"))
        .stdout(predicate::str::contains("处理文件 b.xlsx 时出错"));

    let book = read(&good);
    let sheet = book.get_sheet_by_name("Sheet1").unwrap();
    assert_eq!(is_locked(sheet, 2, 2), Some(false));
}

#[test]
fn dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(dir.path(), "a.xlsx", &[&["序号", MARKER], &["1", ""]]);
    let before = fs::read(&path).unwrap();

    dtformat()
        .arg(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("下拉范围 B2:B2"));

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn bad_config_fails_before_touching_files() {
    let dir = TempDir::new().unwrap();
    let path = write_workbook(dir.path(), "a.xlsx", &[&["序号", MARKER]]);
    let before = fs::read(&path).unwrap();
    let config = dir.path().join("fmt.yaml");
    fs::write(&config, "header_fill: notacolor\n").unwrap();

    dtformat()
        .arg(dir.path())
        .arg("--config")
        .arg(&config)
        .assert()
        .failure()
        .stderr(predicate::str::contains("无法加载配置"));

    assert_eq!(fs::read(&path).unwrap(), before);
}

#[test]
fn missing_folder_fails() {
    let dir = TempDir::new().unwrap();
    dtformat()
        .arg(dir.path().join("按部门拆分"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("无法读取文件夹"));
}
