//! Font compilation: SVG icons in, font binaries and stylesheets out.
//!
//! The pipeline only talks to an engine through [`FontEngine`]. The
//! [`BuiltinEngine`] loads icons, places them on a shared em, writes every
//! requested format and renders the stylesheet and preview.

pub mod eot;
pub mod icons;
pub mod metrics;
pub mod svg_font;
pub mod templates;
pub mod ttf;
pub mod woff;
pub mod woff2;

use std::fs;
use std::future::Future;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use log::{debug, info};
use tokio::task;

use crate::codepoint::CodepointMap;
use crate::config::GeneratorConfig;
use crate::options::FontType;

use self::templates::FontSource;

/// What an engine hands back after a successful run.
#[derive(Debug, Clone, Default)]
pub struct EngineOutput {
    css: String,
    /// Structured name to codepoint map, when the engine knows it.
    pub codepoints: Option<CodepointMap>,
    /// Font files written, in requested order.
    pub fonts: Vec<PathBuf>,
}

impl EngineOutput {
    pub fn new(css: String, codepoints: Option<CodepointMap>, fonts: Vec<PathBuf>) -> Self {
        EngineOutput {
            css,
            codepoints,
            fonts,
        }
    }

    /// The rendered stylesheet, whether or not it was written to disk.
    pub fn generate_css(&self) -> String {
        self.css.clone()
    }
}

/// A font compiler driven by a [`GeneratorConfig`].
pub trait FontEngine {
    fn compile(
        &self,
        config: &GeneratorConfig,
    ) -> impl Future<Output = Result<EngineOutput>> + Send;
}

/// The bundled engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinEngine;

impl FontEngine for BuiltinEngine {
    fn compile(
        &self,
        config: &GeneratorConfig,
    ) -> impl Future<Output = Result<EngineOutput>> + Send {
        let config = config.clone();
        async move {
            task::spawn_blocking(move || compile_blocking(&config))
                .await
                .context("font compilation task panicked")?
        }
    }
}

fn compile_blocking(config: &GeneratorConfig) -> Result<EngineOutput> {
    let icons = icons::load_icons(&config.files)?;
    let names: Vec<&str> = icons.iter().map(|icon| icon.name.as_str()).collect();
    let codepoints =
        metrics::assign_codepoints(&names, &config.codepoints, config.start_codepoint)?;
    let layout = metrics::lay_out(&icons, &codepoints, &config.style)?;
    info!(
        "laid out {} glyphs on a {} unit em",
        layout.glyphs.len(),
        layout.units_per_em
    );

    let needs_ttf = config.types.iter().any(|t| *t != FontType::Svg);
    let ttf = if needs_ttf {
        ttf::build_ttf(&config.font_name, &layout)?
    } else {
        Vec::new()
    };

    let mut built: Vec<(FontType, Vec<u8>)> = Vec::with_capacity(config.types.len());
    for font_type in &config.types {
        let data = match font_type {
            FontType::Svg => svg_font::render_svg_font(&config.font_name, &layout).into_bytes(),
            FontType::Ttf => ttf.clone(),
            FontType::Woff => woff::ttf_to_woff(&ttf)?,
            FontType::Woff2 => woff2::ttf_to_woff2(&ttf)?,
            FontType::Eot => eot::ttf_to_eot(&ttf, &config.font_name)?,
        };
        built.push((*font_type, data));
    }

    let mut fonts = Vec::with_capacity(built.len());
    for (font_type, data) in &built {
        let dest = config.font_dest(*font_type);
        write_file(&dest, data)?;
        debug!("wrote {} ({} bytes)", dest.display(), data.len());
        fonts.push(dest);
    }

    let sources: Vec<FontSource<'_>> = built
        .iter()
        .map(|(font_type, data)| FontSource {
            font_type: *font_type,
            data,
        })
        .collect();
    let src = templates::font_src(config, &sources);
    let map = layout.codepoints();
    let ctx = templates::template_context(config, &map, &src);

    let css = templates::render_css(config, &ctx)?;
    if config.css {
        write_file(&config.css_dest, css.as_bytes())?;
    }
    if config.html {
        let html = templates::render_html(config, &ctx)?;
        write_file(&config.html_dest, html.as_bytes())?;
    }

    Ok(EngineOutput::new(css, Some(map), fonts))
}

fn write_file(path: &Path, data: &[u8]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    fs::write(path, data).with_context(|| format!("writing {}", path.display()))
}

#[cfg(test)]
pub(crate) mod test_support {
    use kurbo::BezPath;

    use super::metrics::{GlyphLayout, LaidGlyph};
    use super::ttf::build_ttf;

    /// A one-glyph font: a triangle at U+F101.
    pub(crate) fn sample_ttf() -> Vec<u8> {
        let mut triangle = BezPath::new();
        triangle.move_to((0.0, 0.0));
        triangle.line_to((500.0, 0.0));
        triangle.line_to((250.0, 800.0));
        triangle.close_path();

        let layout = GlyphLayout {
            units_per_em: 1000,
            ascent: 1000,
            descent: 0,
            round: 1e3,
            glyphs: vec![LaidGlyph {
                name: "triangle".into(),
                codepoint: 0xF101,
                outline: triangle,
                advance: 500,
            }],
        };
        build_ttf("icons", &layout).expect("sample font")
    }
}
