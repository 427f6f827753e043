// SPDX-License-Identifier: GPL-3.0-or-later
// tests/cli_tests.rs
//
// Run the binary against images on disk.

use std::path::Path;
use std::process::Command;

use image::{Rgba, RgbaImage};

/// Isolated from any user config under the real config dir.
fn circlecrop(config_home: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_circlecrop"));
    cmd.env("XDG_CONFIG_HOME", config_home);
    cmd
}

#[test]
fn writes_round_png() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("student.png");
    let output = dir.path().join("student-round.png");
    RgbaImage::from_pixel(640, 480, Rgba([0, 90, 200, 255]))
        .save(&input)
        .unwrap();

    let status = circlecrop(dir.path())
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .args(["--zoom", "1.5", "--pan-x", "-20"])
        .status()
        .unwrap();
    assert!(status.success());

    let result = image::open(&output).unwrap().to_rgba8();
    assert_eq!(result.dimensions(), (400, 400));
    assert_eq!(result.get_pixel(200, 200), &Rgba([0, 90, 200, 255]));
    assert_eq!(result.get_pixel(0, 0), &Rgba([255, 255, 255, 255]));
}

#[test]
fn prints_data_uri() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("tiny.png");
    RgbaImage::from_pixel(8, 8, Rgba([10, 10, 10, 255]))
        .save(&input)
        .unwrap();

    let out = circlecrop(dir.path())
        .arg(&input)
        .arg("--data-uri")
        .args(["--drag", "110,110:120,100"])
        .output()
        .unwrap();
    assert!(out.status.success());
    let stdout = String::from_utf8(out.stdout).unwrap();
    assert!(stdout.trim().starts_with("data:image/png;base64,"));
}

#[test]
fn missing_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let out = circlecrop(dir.path())
        .arg(dir.path().join("nope.png"))
        .arg("-o")
        .arg(dir.path().join("never.png"))
        .output()
        .unwrap();
    assert!(!out.status.success());
    assert!(!dir.path().join("never.png").exists());
}
