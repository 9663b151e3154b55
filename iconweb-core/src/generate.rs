//! The generation pipeline (made by FontLab https://www.fontlab.com/)
//!
//! One call runs every stage in order: resolve options, validate, read the
//! codepoint map, build the engine config, compile, clean up stale formats,
//! write the JSON map and report what was produced. A failing stage stops
//! the run; nothing already written is rolled back.

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{debug, info};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::cleanup::delete_unrequested_formats;
use crate::codepoint::{parse_codepoints_map, CodepointMap};
use crate::config::{build_config, GeneratorConfig};
use crate::engine::{BuiltinEngine, FontEngine};
use crate::error::{Error, Result};
use crate::extract::codepoints_from_css;
use crate::options::{GenerationOptions, Options};
use crate::paths::{resolved_path, Artifact};
use crate::report::Reporter;
use crate::validate::validate_options;

/// What one successful run produced.
#[derive(Debug, Clone)]
pub struct GenerationSummary {
    pub options: Options,
    pub config: GeneratorConfig,
    /// Name to codepoint map, as written to the JSON file. `None` when the
    /// engine reported no map and no JSON was requested.
    pub codepoints: Option<CodepointMap>,
    /// Every file reported as generated, in report order.
    pub generated: Vec<PathBuf>,
    /// Stale font files deleted by the cleanup stage.
    pub removed: Vec<PathBuf>,
}

/// Generate a webfont kit with the bundled engine, reporting on stdout.
pub async fn generate(options: &GenerationOptions) -> Result<GenerationSummary> {
    let stdout = io::stdout();
    let color = stdout.is_terminal();
    generate_with(options, &BuiltinEngine, stdout, color).await
}

/// Generate with any engine, reporting to `out`.
pub async fn generate_with<E, W>(
    options: &GenerationOptions,
    engine: &E,
    out: W,
    color: bool,
) -> Result<GenerationSummary>
where
    E: FontEngine,
    W: Write,
{
    let options = options.resolve();
    let mut reporter = Reporter::new(out, options.silent, color);

    reporter.log(&format!(
        "Generating font kit from {} SVG icons",
        options.paths.len()
    ))?;

    validate_options(&options).await?;

    let mapped = match options.codepoints.as_deref() {
        Some(path) => parse_codepoints_map(path).await?,
        None => CodepointMap::new(),
    };
    debug!("{} codepoints supplied by the caller", mapped.len());

    let config = build_config(&options, mapped)?;
    let output = engine.compile(&config).await?;
    info!("engine wrote {} font files", output.fonts.len());

    let removed = delete_unrequested_formats(&options).await?;

    let codepoints = match output.codepoints.clone() {
        Some(map) => Some(map),
        None if options.json => Some(codepoints_from_css(&output.generate_css())),
        None => None,
    };

    if let (true, Some(map)) = (options.json, &codepoints) {
        let json_dest = resolved_path(&options, Artifact::Json)?;
        write_json(&json_dest, map).await?;
    }

    let mut generated = Vec::new();
    for font_type in &options.types {
        generated.push(resolved_path(&options, Artifact::Font(*font_type))?);
    }
    for (wanted, artifact) in [
        (options.html, Artifact::Html),
        (options.css, Artifact::Css),
        (options.json, Artifact::Json),
    ] {
        if wanted {
            generated.push(resolved_path(&options, artifact)?);
        }
    }
    for path in &generated {
        reporter.log_output(path)?;
    }
    reporter.log("Done")?;

    Ok(GenerationSummary {
        options,
        config,
        codepoints,
        generated,
        removed,
    })
}

/// Write `map` as a JSON object indented with four spaces.
async fn write_json(path: &Path, map: &CodepointMap) -> Result<()> {
    let mut buf = Vec::new();
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    map.serialize(&mut ser)?;
    buf.push(b'\n');

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| Error::io(parent, e))?;
    }
    tokio::fs::write(path, buf)
        .await
        .map_err(|e| Error::io(path, e))
}
