use std::fs;
use std::io;
use std::path::Path;

use iconweb_core::codepoint::CodepointMap;
use iconweb_core::engine::BuiltinEngine;
use iconweb_core::generate::generate_with;
use iconweb_core::options::{FontType, GenerationOptions, StyleValue};
use read_fonts::{FontRef, TableProvider};
use tempfile::tempdir;

const HOME: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24">
  <path d="M12 3L2 12h3v8h6v-6h2v6h6v-8h3z"/>
</svg>"#;
const USER: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24px" height="24px">
  <circle cx="12" cy="8" r="4"/>
  <path d="M4 20c0-4 4-6 8-6s8 2 8 6z"/>
</svg>"#;

fn write_icons(dir: &Path) -> Vec<std::path::PathBuf> {
    let icons = dir.join("icons");
    fs::create_dir_all(&icons).expect("icons dir");
    let home = icons.join("home.svg");
    let user = icons.join("user.svg");
    fs::write(&home, HOME).expect("write home");
    fs::write(&user, USER).expect("write user");
    vec![home, user]
}

#[tokio::test]
async fn svg_only_run_writes_the_whole_kit() {
    let tmp = tempdir().expect("tempdir");
    let out_dir = tmp.path().join("dist");
    fs::create_dir(&out_dir).expect("dist");

    let options = GenerationOptions::new()
        .with_paths(write_icons(tmp.path()))
        .with_output_dir(&out_dir)
        .with_types(vec![FontType::Svg]);
    let summary = generate_with(&options, &BuiltinEngine, io::sink(), false)
        .await
        .expect("generate");

    for name in ["icons.svg", "icons.css", "icons.html", "icons.json"] {
        assert!(out_dir.join(name).exists(), "{name} missing");
    }
    assert!(!out_dir.join("icons.ttf").exists());

    let json: CodepointMap =
        serde_json::from_str(&fs::read_to_string(out_dir.join("icons.json")).unwrap()).unwrap();
    assert_eq!(json.get("home"), Some(&0xF101));
    assert_eq!(json.get("user"), Some(&0xF102));
    assert_eq!(summary.codepoints, Some(json));

    let css = fs::read_to_string(out_dir.join("icons.css")).unwrap();
    assert!(css.contains(".icon-home:before {\n\tcontent: \"\\f101\";"));
    assert!(css.contains("url(\"icons.svg?"));

    let svg = fs::read_to_string(out_dir.join("icons.svg")).unwrap();
    assert!(svg.contains("glyph-name=\"home\""));
    assert!(svg.contains("unicode=\"&#xf101;\""));
}

#[tokio::test]
async fn css_path_moves_stylesheet_and_fonts_url() {
    let tmp = tempdir().expect("tempdir");
    let out_dir = tmp.path().join("fonts");
    fs::create_dir(&out_dir).expect("fonts");

    let options = GenerationOptions {
        css_path: Some(tmp.path().join("css").join("site.css")),
        html: Some(false),
        json: Some(false),
        ..GenerationOptions::new()
            .with_paths(write_icons(tmp.path()))
            .with_output_dir(&out_dir)
            .with_types(vec![FontType::Woff2, FontType::Woff])
    };
    generate_with(&options, &BuiltinEngine, io::sink(), false)
        .await
        .expect("generate");

    let css = fs::read_to_string(tmp.path().join("css").join("site.css")).unwrap();
    let woff2 = css.find("url(\"../fonts/icons.woff2?").expect("woff2 src");
    let woff = css.find("url(\"../fonts/icons.woff?").expect("woff src");
    assert!(woff2 < woff);
    assert!(!out_dir.join("icons.html").exists());
    assert!(!out_dir.join("icons.json").exists());
}

#[tokio::test]
async fn ttf_honours_codepoint_file_and_styling() {
    let tmp = tempdir().expect("tempdir");
    let out_dir = tmp.path().join("dist");
    fs::create_dir(&out_dir).expect("dist");
    let map = tmp.path().join("codepoints.json");
    fs::write(&map, r#"{"user": "0xe001"}"#).expect("map");

    let mut options = GenerationOptions {
        codepoints: Some(map),
        font_name: Some("glyphs".into()),
        ..GenerationOptions::new()
            .with_paths(write_icons(tmp.path()))
            .with_output_dir(&out_dir)
            .with_types(vec![FontType::Ttf])
    };
    options.style.font_height = Some(StyleValue::from("1000"));
    options.style.fixed_width = Some(StyleValue::Bool(true));

    let summary = generate_with(&options, &BuiltinEngine, io::sink(), false)
        .await
        .expect("generate");
    let codepoints = summary.codepoints.expect("engine map");
    assert_eq!(codepoints.get("home"), Some(&0xF101));
    assert_eq!(codepoints.get("user"), Some(&0xE001));

    let data = fs::read(out_dir.join("glyphs.ttf")).expect("ttf");
    let font = FontRef::new(&data).expect("parse ttf");
    assert_eq!(font.head().unwrap().units_per_em(), 1000);

    let cmap = font.cmap().unwrap();
    let home = cmap.map_codepoint(0xF101u32).expect("home glyph");
    let user = cmap.map_codepoint(0xE001u32).expect("user glyph");
    let hmtx = font.hmtx().unwrap();
    assert_eq!(hmtx.advance(home), hmtx.advance(user));
}

#[tokio::test]
async fn stale_formats_are_removed_after_generation() {
    let tmp = tempdir().expect("tempdir");
    let out_dir = tmp.path().join("dist");
    fs::create_dir(&out_dir).expect("dist");
    for ext in ["woff", "eot"] {
        fs::write(out_dir.join(format!("icons.{ext}")), b"stale").unwrap();
    }

    let options = GenerationOptions::new()
        .with_paths(write_icons(tmp.path()))
        .with_output_dir(&out_dir)
        .with_types(vec![FontType::Svg, FontType::Ttf]);
    let summary = generate_with(&options, &BuiltinEngine, io::sink(), false)
        .await
        .expect("generate");

    assert_eq!(summary.removed.len(), 2);
    assert!(!out_dir.join("icons.woff").exists());
    assert!(!out_dir.join("icons.eot").exists());
    assert!(out_dir.join("icons.svg").exists());
    assert!(out_dir.join("icons.ttf").exists());
}

#[tokio::test]
async fn missing_output_dir_is_reported_without_side_effects() {
    let tmp = tempdir().expect("tempdir");
    let options = GenerationOptions::new().with_paths(write_icons(tmp.path()));

    let err = generate_with(&options, &BuiltinEngine, io::sink(), false)
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Please specify an output directory with -o or --output"
    );
}
