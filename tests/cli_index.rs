use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::{create_dir_all, write};
use std::path::{Path, PathBuf};
use tempfile::{tempdir, TempDir};

fn touch(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    create_dir_all(path.parent().unwrap()).unwrap();
    write(&path, content).unwrap();
}

/// Creates a small repository; temp dirs are dot-prefixed so the repository
/// lives in a plain child directory.
fn create_repository() -> (TempDir, PathBuf) {
    let tmp = tempdir().expect("Creating temp dir failed");
    let root = tmp.path().join("handbook");
    touch(&root, "index.md", "# Handbook");
    touch(&root, "a/doc.md", "# A");
    touch(&root, "b/image.png", "not really a png");
    touch(&root, "theme/site.md", "# Theme");
    (tmp, root)
}

#[test]
fn index_cli_prints_items_in_walk_order() {
    let (_tmp, root) = create_repository();
    let mut cmd = Command::cargo_bin("content-tree").expect("Binary exists");

    cmd.env_remove("CONTENT_TREE_ROOT")
        .arg("index")
        .arg("--root")
        .arg(&root);

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("document   / (0 files)")
                .and(predicate::str::contains("document   /a (0 files)"))
                .and(predicate::str::contains("virtual    /b (0 files)"))
                .and(predicate::str::contains("Indexed 3 items (0 errors)"))
                .and(predicate::str::contains("/theme").not()),
        );
}

#[test]
fn index_cli_emits_json_lines() {
    let (_tmp, root) = create_repository();
    let mut cmd = Command::cargo_bin("content-tree").expect("Binary exists");

    let output = cmd
        .arg("index")
        .arg("--root")
        .arg(&root)
        .arg("--json")
        .output()
        .expect("Command runs");
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<serde_json::Value> = stdout
        .lines()
        .map(|line| serde_json::from_str(line).expect("Every line is JSON"))
        .collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0]["route"], "/");
    assert_eq!(lines[1]["route"], "/a");
    assert_eq!(lines[1]["kind"], "document");
    assert_eq!(lines[2]["kind"], "virtual");
}

#[test]
fn index_cli_reads_root_from_config_file() {
    let (tmp, _root) = create_repository();
    let config = tmp.path().join("content-tree.yaml");
    write(
        &config,
        "root: handbook\nindexer:\n  reserved_directories: []\n  skip_hidden: true\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("content-tree").expect("Binary exists");
    cmd.env_remove("CONTENT_TREE_ROOT")
        .arg("index")
        .arg("--config")
        .arg(&config);

    // With no extra reserved names the theme directory becomes an item.
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("/theme").and(predicate::str::contains("Indexed 4 items")));
}

#[test]
fn index_cli_fails_for_missing_root() {
    let tmp = tempdir().unwrap();
    let mut cmd = Command::cargo_bin("content-tree").expect("Binary exists");

    cmd.arg("index").arg("--root").arg(tmp.path().join("absent"));

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot open repository"));
}

#[test]
fn show_cli_prints_item_and_file_content() {
    let (_tmp, root) = create_repository();
    touch(&root, "a/files/notes.txt", "attached notes");

    Command::cargo_bin("content-tree")
        .expect("Binary exists")
        .arg("show")
        .arg("--root")
        .arg(&root)
        .arg("/a")
        .assert()
        .success()
        .stdout("# A");

    Command::cargo_bin("content-tree")
        .expect("Binary exists")
        .arg("show")
        .arg("--root")
        .arg(&root)
        .arg("a/files/notes.txt")
        .assert()
        .success()
        .stdout("attached notes");

    Command::cargo_bin("content-tree")
        .expect("Binary exists")
        .arg("show")
        .arg("--root")
        .arg(&root)
        .arg("/b")
        .assert()
        .success()
        .stdout("# b");

    Command::cargo_bin("content-tree")
        .expect("Binary exists")
        .arg("show")
        .arg("--root")
        .arg(&root)
        .arg("/nowhere")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No item or file matches route /nowhere"));
}
