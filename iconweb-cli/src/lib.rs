//! iconweb CLI (made by FontLab https://www.fontlab.com/)

use std::collections::HashSet;
use std::fs;
use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum, ValueHint};
use log::debug;

use iconweb_core::engine::BuiltinEngine;
use iconweb_core::generate::generate_with;
use iconweb_core::options::{FontType, GenerationOptions, StyleOptions, StyleValue};

/// CLI entrypoint for iconweb.
#[derive(Debug, Parser)]
#[command(
    name = "iconweb",
    version,
    about = "Generate webfonts, CSS and an HTML preview from SVG icons (made by FontLab https://www.fontlab.com/)"
)]
pub struct Cli {
    /// SVG files or glob patterns (e.g. "icons/*.svg")
    #[arg(value_hint = ValueHint::FilePath)]
    icons: Vec<String>,

    /// Output directory
    #[arg(short = 'o', long = "out", value_hint = ValueHint::DirPath)]
    out: Option<PathBuf>,

    /// Font family name, also the base name of every generated file
    #[arg(short = 'n', long = "name")]
    name: Option<String>,

    /// JSON file with default options; flags override it
    #[arg(long = "config", value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Do not print progress
    #[arg(short = 's', long = "silent", action = ArgAction::SetTrue)]
    silent: bool,

    /// URL prefix the stylesheet uses to reach the fonts
    #[arg(short = 'f', long = "fontspath")]
    fonts_path: Option<String>,

    /// Write the stylesheet
    #[arg(short = 'c', long = "css", action = ArgAction::Set)]
    css: Option<bool>,

    /// Stylesheet destination
    #[arg(long = "csspath", value_hint = ValueHint::FilePath)]
    css_path: Option<PathBuf>,

    /// Custom stylesheet template
    #[arg(long = "csstp", value_hint = ValueHint::FilePath)]
    css_template: Option<PathBuf>,

    /// Write the HTML preview
    #[arg(long = "html", action = ArgAction::Set)]
    html: Option<bool>,

    /// HTML preview destination
    #[arg(long = "htmlpath", value_hint = ValueHint::FilePath)]
    html_path: Option<PathBuf>,

    /// Custom HTML template
    #[arg(long = "htmltp", value_hint = ValueHint::FilePath)]
    html_template: Option<PathBuf>,

    /// Write the JSON codepoint map
    #[arg(short = 'j', long = "json", action = ArgAction::Set)]
    json: Option<bool>,

    /// JSON codepoint map destination
    #[arg(long = "jsonpath", value_hint = ValueHint::FilePath)]
    json_path: Option<PathBuf>,

    /// CSS class prefix
    #[arg(short = 'p', long = "prefix")]
    prefix: Option<String>,

    /// Element used for icons
    #[arg(short = 't', long = "tag")]
    tag: Option<String>,

    /// Base CSS selector (overrides --tag, adds its classes)
    #[arg(long = "selector")]
    selector: Option<String>,

    /// Font formats to produce (svg,ttf,woff,woff2,eot)
    #[arg(long = "types", value_delimiter = ',', value_parser = parse_font_type)]
    types: Vec<FontType>,

    /// JSON map of icon name to codepoint
    #[arg(long = "codepoints", value_hint = ValueHint::FilePath)]
    codepoints: Option<PathBuf>,

    /// First codepoint for unmapped icons (decimal or 0x hex)
    #[arg(long = "start-codepoint", value_parser = parse_start_codepoint)]
    start_codepoint: Option<u32>,

    /// Scale every icon to the font height
    #[arg(long = "normalize", action = ArgAction::SetTrue)]
    normalize: bool,

    /// Coordinate rounding factor for the SVG font
    #[arg(long = "round")]
    round: Option<String>,

    /// Distance of the baseline above the icon bottom
    #[arg(long = "descent")]
    descent: Option<String>,

    /// Give every glyph the same advance
    #[arg(long = "mono", action = ArgAction::SetTrue)]
    mono: bool,

    /// Font height (units per em)
    #[arg(long = "height")]
    height: Option<String>,

    /// Center outlines within their advance
    #[arg(long = "center", action = ArgAction::SetTrue)]
    center: bool,

    /// Control colorized output (auto|always|never)
    #[arg(long = "color", default_value_t = ColorChoice::Auto, value_enum)]
    color: ColorChoice,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum ColorChoice {
    Auto,
    Always,
    Never,
}

/// Parse CLI args and run one generation.
pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let runtime = tokio::runtime::Runtime::new().context("starting async runtime")?;
    runtime.block_on(run_generate(cli))
}

async fn run_generate(cli: Cli) -> Result<()> {
    let options = build_options(&cli)?;
    let stdout = io::stdout();
    let color = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => stdout.is_terminal(),
    };

    let summary = generate_with(&options, &BuiltinEngine, stdout, color).await?;
    debug!(
        "{} icons, {} files generated, {} removed",
        summary.codepoints.as_ref().map_or(0, |map| map.len()),
        summary.generated.len(),
        summary.removed.len()
    );
    Ok(())
}

/// Layer flags over the config file over the CLI defaults.
fn build_options(cli: &Cli) -> Result<GenerationOptions> {
    let defaults = GenerationOptions {
        silent: Some(false),
        ..GenerationOptions::new()
    };
    let file = match cli.config.as_deref() {
        Some(path) => load_config(path)?,
        None => GenerationOptions::new(),
    };

    let flags = GenerationOptions {
        paths: expand_patterns(&cli.icons)?,
        output_dir: cli.out.clone(),
        font_name: cli.name.clone(),
        fonts_path: cli.fonts_path.clone(),
        types: cli.types.clone(),
        css: cli.css,
        html: cli.html,
        json: cli.json,
        css_path: cli.css_path.clone(),
        html_path: cli.html_path.clone(),
        json_path: cli.json_path.clone(),
        css_template: cli.css_template.clone(),
        html_template: cli.html_template.clone(),
        class_prefix: cli.prefix.clone(),
        base_tag: cli.tag.clone(),
        base_selector: cli.selector.clone(),
        codepoints: cli.codepoints.clone(),
        start_codepoint: cli.start_codepoint,
        style: StyleOptions {
            normalize: switch(cli.normalize),
            round: cli.round.as_deref().map(StyleValue::from),
            descent: cli.descent.as_deref().map(StyleValue::from),
            fixed_width: switch(cli.mono),
            font_height: cli.height.as_deref().map(StyleValue::from),
            center_horizontally: switch(cli.center),
        },
        silent: cli.silent.then_some(true),
    };

    Ok(flags.layered_over(file.layered_over(defaults)))
}

fn switch(on: bool) -> Option<StyleValue> {
    on.then_some(StyleValue::Bool(true))
}

fn load_config(path: &Path) -> Result<GenerationOptions> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing config {}", path.display()))
}

/// Expand glob patterns in order. Matches of one pattern are sorted; a pattern
/// matching nothing is kept as a literal path; repeats are dropped.
fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut paths = Vec::new();

    for pattern in patterns {
        let mut matched: Vec<PathBuf> = glob::glob(pattern)
            .with_context(|| format!("invalid glob pattern: {pattern}"))?
            .filter_map(|entry| entry.ok())
            .collect();
        if matched.is_empty() {
            matched.push(PathBuf::from(pattern));
        }
        matched.sort();

        for path in matched {
            if seen.insert(path.clone()) {
                paths.push(path);
            }
        }
    }

    Ok(paths)
}

fn parse_font_type(raw: &str) -> Result<FontType, String> {
    raw.parse()
}

fn parse_start_codepoint(raw: &str) -> Result<u32, String> {
    let parsed = match raw.strip_prefix("0x").or_else(|| raw.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => raw.parse(),
    };
    match parsed {
        Ok(cp) if cp <= 0x10FFFF => Ok(cp),
        _ => Err(format!("'{raw}' is not a codepoint (use decimal or 0x hex up to 0x10FFFF)")),
    }
}
