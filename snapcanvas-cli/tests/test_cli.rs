// Allow deprecated APIs (assert_cmd::cargo_bin is deprecated but still works)
#![allow(deprecated)]

use assert_cmd::prelude::*;
use predicates::prelude::*;
use rstest::rstest;
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

const SNAPSHOT: &str = r#"{
    "container": {"id": "root", "left": 0, "top": 0, "width": 40, "height": 20,
                  "style": {"background-color": "rgb(0, 0, 255)"}},
    "nodes": [
        {"id": "logo", "left": 5, "top": 5, "width": 10, "height": 10, "src": "missing.png"}
    ]
}"#;

fn write_snapshot(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("snapshot.json");
    fs::write(&path, SNAPSHOT).unwrap();
    path
}

fn snapcanvas() -> Command {
    let mut cmd = Command::cargo_bin("snapcanvas").unwrap();
    cmd.arg("--no-system-fonts");
    cmd
}

#[rstest]
#[case(&[], (40, 20))]
#[case(&["--dpr", "2"], (80, 40))]
#[case(&["--scale", "3"], (120, 60))]
#[case(&["--dpr", "2", "--logical"], (40, 20))]
fn test_render_snapshot(#[case] extra: &[&str], #[case] size: (u32, u32)) {
    let dir = tempdir().unwrap();
    let input = write_snapshot(dir.path());
    let output = dir.path().join("out.png");

    snapcanvas()
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .args(extra)
        .assert()
        .success();

    let img = image::open(&output).unwrap().to_rgba8();
    assert_eq!(img.dimensions(), size);
    assert_eq!(img.get_pixel(0, 0).0, [0, 0, 255, 255]);
}

#[test]
fn test_config_file() {
    let dir = tempdir().unwrap();
    let input = write_snapshot(dir.path());
    let config = dir.path().join("config.json");
    fs::write(&config, r#"{"device_pixel_ratio": 3.0, "platform": "ios"}"#).unwrap();
    let output = dir.path().join("out.png");

    snapcanvas()
        .arg(&input)
        .args(["--config", config.to_str().unwrap()])
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success();

    let img = image::open(&output).unwrap();
    assert_eq!((img.width(), img.height()), (120, 60));
}

#[test]
fn test_missing_input() {
    let dir = tempdir().unwrap();
    snapcanvas()
        .arg(dir.path().join("nope.json"))
        .args(["--output", "out.png"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read snapshot"));
}

#[test]
fn test_invalid_scale() {
    let dir = tempdir().unwrap();
    let input = write_snapshot(dir.path());
    snapcanvas()
        .arg(&input)
        .args(["--output", dir.path().join("out.png").to_str().unwrap()])
        .args(["--scale", "0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid scale"));
}

#[test]
fn test_missing_image_is_a_warning() {
    let dir = tempdir().unwrap();
    let input = write_snapshot(dir.path());
    let output = dir.path().join("out.png");
    snapcanvas()
        .arg(&input)
        .args(["--output", output.to_str().unwrap()])
        .assert()
        .success()
        .stderr(predicate::str::contains("missing.png"));
    assert!(output.exists());
}
