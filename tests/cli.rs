use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

mod common;

#[test]
fn runs() {
    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("boxlabel --help"));
}

#[test]
fn outputs_tool_name() {
    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("-V");
    cmd.assert().success().stdout("boxlabel 0.1.0\n");
}

// Export subcommand tests

fn write_batch(dir: &std::path::Path, count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            let path = dir.join(format!("img_{i}.png"));
            common::write_png(&path, 200, 100);
            path.to_string_lossy().into_owned()
        })
        .collect()
}

#[test]
fn export_writes_archive_from_canvas_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 3);
    let canvas_path = temp.path().join("canvas.json");
    fs::write(
        &canvas_path,
        r#"{
            "img_0.png": {
                "objects": [{"type": "rect", "left": 0, "top": 0, "width": 100, "height": 50}],
                "labels": ["scratch"]
            },
            "img_2.png": {
                "objects": [{"type": "circle", "radius": 4}],
                "labels": ["ignored"]
            }
        }"#,
    )
    .expect("write canvas file");
    let out = temp.path().join("dataset.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export")
        .args(&images)
        .arg("--canvas")
        .arg(&canvas_path)
        .args(["--seed", "3", "-o"])
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Exported 3 image(s), 1 label file(s), 1 annotation(s), 1 class(es)",
        ))
        .stdout(predicate::str::contains("Wrote"));

    let bytes = fs::read(&out).expect("read archive");
    let entries = common::entry_names(&bytes);
    let label = entries
        .iter()
        .find(|e| e.ends_with("/labels/img_0.txt"))
        .expect("label file for img_0");
    assert_eq!(common::read_entry(&bytes, label), "0 0.25 0.25 0.5 0.5");
    assert!(common::read_entry(&bytes, "data.yaml").ends_with("nc: 1\nnames: ['scratch']"));
}

#[test]
fn export_json_output_is_parseable() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 10);
    let out = temp.path().join("dataset.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export")
        .args(&images)
        .args(["--output", "json", "-o"])
        .arg(&out);
    let output = cmd.assert().success().get_output().stdout.clone();

    let report: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    let subsets = report["subsets"].as_array().expect("subsets array");
    let images: Vec<u64> = subsets
        .iter()
        .map(|s| s["images"].as_u64().expect("image count"))
        .collect();
    assert_eq!(images, vec![7, 2, 1]);
    assert_eq!(report["classes"], 0);
}

#[test]
fn export_rejects_ratio_overflow() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 2);
    let out = temp.path().join("dataset.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export")
        .args(&images)
        .args(["--val-ratio", "0.6", "--test-ratio", "0.5", "-o"])
        .arg(&out);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains(
            "Validation and test ratios cannot exceed 1.0",
        ));
    assert!(!out.exists());
}

#[test]
fn export_rejects_ratio_outside_unit_interval() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 1);

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export").args(&images).args(["--val-ratio", "1.5"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("between 0.0 and 1.0"));
}

#[test]
fn export_reads_ratios_from_env() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 10);
    let out = temp.path().join("dataset.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.env("BOXLABEL_VAL_RATIO", "0.5")
        .env("BOXLABEL_TEST_RATIO", "0.5")
        .arg("export")
        .args(&images)
        .arg("-o")
        .arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("train: 0 image(s)"));
}

#[test]
fn export_rejects_non_image_file() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let bogus = temp.path().join("notes.png");
    fs::write(&bogus, "just text").expect("write file");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export").arg(&bogus).arg("-o").arg(temp.path().join("x.zip"));
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("notes.png"));
}

#[test]
fn export_rejects_unknown_output_format() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 1);

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("export").args(&images).args(["--output", "yaml"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unsupported format"));
}

// Inspect subcommand tests

#[test]
fn inspect_summarizes_exported_archive() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 2);
    let canvas_path = temp.path().join("canvas.json");
    fs::write(
        &canvas_path,
        r#"{"img_1.png": {"objects": [{"type": "rect", "left": 10, "top": 10, "width": 20, "height": 20}], "labels": ["dent"]}}"#,
    )
    .expect("write canvas file");
    let out = temp.path().join("dataset.zip");

    Command::cargo_bin("boxlabel")
        .unwrap()
        .arg("export")
        .args(&images)
        .arg("--canvas")
        .arg(&canvas_path)
        .arg("-o")
        .arg(&out)
        .assert()
        .success();

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("inspect").arg(&out);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Archive: 2 image(s), 1 label file(s), 1 annotation(s)",
        ))
        .stdout(predicate::str::contains("dent"));

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("inspect").arg(&out).args(["--output", "json"]);
    let output = cmd.assert().success().get_output().stdout.clone();
    let summary: serde_json::Value = serde_json::from_slice(&output).expect("valid json");
    assert_eq!(summary["manifest"]["nc"], 1);
    assert_eq!(summary["annotations"], 1);
}

#[test]
fn inspect_missing_file_fails() {
    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.args(["inspect", "does/not/exist.zip"]);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Error:"));
}

// Annotate subcommand tests

#[test]
fn annotate_runs_shell_from_stdin() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 2);
    let out = temp.path().join("session.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("annotate")
        .args(&images)
        .args(["--seed", "9", "-o"])
        .arg(&out)
        .write_stdin("rect 50 25 100 50\nlabel 1 bolt\nnext\nlabel 1 nothing\nsplit 0 0\nquit\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("[1/2] img_1.png (200x100)"))
        .stdout(predicate::str::contains("box 1: left=50 top=25 width=100 height=50 -> 'bolt'"))
        .stdout(predicate::str::contains("Error: Image 'img_0.png' has no drawn box number 1"))
        .stdout(predicate::str::contains("Wrote"));

    let bytes = fs::read(&out).expect("read archive");
    assert_eq!(
        common::read_entry(&bytes, "train/labels/img_1.txt"),
        "0 0.5 0.5 0.5 0.5"
    );
}

#[test]
fn annotate_without_split_writes_nothing() {
    let temp = tempfile::tempdir().expect("create temp dir");
    let images = write_batch(temp.path(), 1);
    let out = temp.path().join("session.zip");

    let mut cmd = Command::cargo_bin("boxlabel").unwrap();
    cmd.arg("annotate")
        .args(&images)
        .arg("-o")
        .arg(&out)
        .write_stdin("help\n");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Commands:"))
        .stdout(predicate::str::contains("No archive written."));
    assert!(!out.exists());
}
