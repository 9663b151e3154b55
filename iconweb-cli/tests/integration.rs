use std::fs;
use std::path::Path;
use std::process::Command;

use read_fonts::{FontRef, TableProvider};
use serde_json::Value;
use tempfile::tempdir;

const STAR: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><polygon points="12,2 15,9 22,9 16,14 18,21 12,17 6,21 8,14 2,9 9,9"/></svg>"#;
const BOX: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><rect x="3" y="3" width="18" height="18" rx="3"/></svg>"#;

fn write_icons(dir: &Path) {
    fs::create_dir_all(dir).expect("icons dir");
    fs::write(dir.join("star.svg"), STAR).expect("star");
    fs::write(dir.join("box.svg"), BOX).expect("box");
}

fn iconweb() -> Command {
    Command::new(env!("CARGO_BIN_EXE_iconweb"))
}

#[test]
fn generates_a_kit_from_a_glob() {
    let tmp = tempdir().expect("tempdir");
    let icons = tmp.path().join("icons");
    let out = tmp.path().join("dist");
    write_icons(&icons);
    fs::create_dir(&out).expect("dist");

    let output = iconweb()
        .arg(icons.join("*.svg"))
        .arg("-o")
        .arg(&out)
        .args(["--types", "ttf,woff2", "--color", "never"])
        .output()
        .expect("run iconweb");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("Generating font kit from 2 SVG icons"));
    assert!(stdout.contains("Generated "));
    assert!(stdout.contains("icons.woff2"));
    assert!(stdout.trim_end().ends_with("Done"));

    for name in ["icons.ttf", "icons.woff2", "icons.css", "icons.html", "icons.json"] {
        assert!(out.join(name).exists(), "{name} missing");
    }

    // Glob matches are sorted, so box comes before star.
    let json: Value =
        serde_json::from_str(&fs::read_to_string(out.join("icons.json")).unwrap()).unwrap();
    assert_eq!(json["box"], 0xF101);
    assert_eq!(json["star"], 0xF102);

    let ttf = fs::read(out.join("icons.ttf")).unwrap();
    let font = FontRef::new(&ttf).expect("parse ttf");
    assert!(font.cmap().unwrap().map_codepoint(0xF102u32).is_some());
}

#[test]
fn silent_run_prints_nothing() {
    let tmp = tempdir().expect("tempdir");
    let icons = tmp.path().join("icons");
    write_icons(&icons);

    let output = iconweb()
        .arg(icons.join("star.svg"))
        .arg("-o")
        .arg(tmp.path())
        .args(["-s", "--types", "svg", "--html", "false"])
        .output()
        .expect("run iconweb");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
    assert!(tmp.path().join("icons.svg").exists());
    assert!(!tmp.path().join("icons.html").exists());
}

#[test]
fn validation_errors_exit_non_zero() {
    let tmp = tempdir().expect("tempdir");
    let icons = tmp.path().join("icons");
    write_icons(&icons);

    let output = iconweb()
        .arg(icons.join("star.svg"))
        .output()
        .expect("run iconweb");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error: Please specify an output directory with -o or --output"),
        "stderr: {stderr}"
    );
}

#[test]
fn missing_output_dir_is_reported() {
    let tmp = tempdir().expect("tempdir");
    let icons = tmp.path().join("icons");
    write_icons(&icons);

    let output = iconweb()
        .arg(icons.join("*.svg"))
        .arg("-o")
        .arg(tmp.path().join("nope"))
        .output()
        .expect("run iconweb");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Output directory doesn't exist"));
}
