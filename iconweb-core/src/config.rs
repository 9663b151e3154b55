//! Engine configuration derived from validated options.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::codepoint::CodepointMap;
use crate::error::Result;
use crate::options::{FontType, Options, StyleOptions, DEFAULT_BASE_TAG, DEFAULT_CLASS_PREFIX};
use crate::paths::{absolutize, relative_path, resolved_path, url_dir_prefix, with_trailing_slash, Artifact};
use crate::selector::parse_selector;

/// Variables consumed by the stylesheet and preview templates.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOptions {
    pub base_tag: String,
    pub base_selector: Option<String>,
    pub base_class_names: String,
    /// Class prefix including its trailing `-`.
    pub class_prefix: String,
    /// URL prefix leading from the HTML file's directory to the CSS file's directory.
    pub html_css_relative_path: String,
}

/// Everything the compilation engine needs for one run. Rebuilt per invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    pub files: Vec<PathBuf>,
    pub dest: PathBuf,
    pub font_name: String,
    pub types: Vec<FontType>,
    pub codepoints: CodepointMap,
    pub start_codepoint: u32,
    pub css: bool,
    pub html: bool,
    pub css_dest: PathBuf,
    pub html_dest: PathBuf,
    /// URL prefix the stylesheet uses to reach the font files.
    pub css_fonts_url: String,
    pub css_template: Option<PathBuf>,
    pub html_template: Option<PathBuf>,
    pub template_options: TemplateOptions,
    /// Styling parameters with numeric-looking text already turned into numbers.
    pub style: StyleOptions,
}

impl GeneratorConfig {
    /// Destination of one font binary.
    pub fn font_dest(&self, font_type: FontType) -> PathBuf {
        self.dest
            .join(format!("{}.{}", self.font_name, font_type.extension()))
    }
}

/// Build the engine configuration from validated options and a parsed codepoint map.
pub fn build_config(options: &Options, codepoints: CodepointMap) -> Result<GeneratorConfig> {
    let dest = absolutize(options.output_dir.as_deref().unwrap_or(Path::new(".")))?;
    let css_dest = resolved_path(options, Artifact::Css)?;
    let html_dest = resolved_path(options, Artifact::Html)?;

    let css_fonts_url = match (&options.fonts_path, &options.css_path) {
        (Some(explicit), _) => with_trailing_slash(explicit.clone()),
        (None, Some(_)) => url_dir_prefix(&relative_path(parent_of(&css_dest), &dest)),
        (None, None) => String::new(),
    };

    let selector = parse_selector(options.base_selector.as_deref().unwrap_or(""));
    let base_tag = selector
        .tag
        .or_else(|| options.base_tag.clone())
        .unwrap_or_else(|| DEFAULT_BASE_TAG.to_string());
    let class_prefix = format!(
        "{}-",
        options.class_prefix.as_deref().unwrap_or(DEFAULT_CLASS_PREFIX)
    );

    let template_options = TemplateOptions {
        base_tag,
        base_selector: options.base_selector.clone(),
        base_class_names: selector.class_names.join(" "),
        class_prefix,
        html_css_relative_path: url_dir_prefix(&relative_path(
            parent_of(&html_dest),
            parent_of(&css_dest),
        )),
    };

    Ok(GeneratorConfig {
        files: options.paths.clone(),
        dest,
        font_name: options.font_name.clone(),
        types: options.types.clone(),
        codepoints,
        start_codepoint: options.start_codepoint,
        css: options.css,
        html: options.html,
        css_dest,
        html_dest,
        css_fonts_url,
        css_template: options.css_template.clone(),
        html_template: options.html_template.clone(),
        template_options,
        style: options.style.coerced(),
    })
}

fn parent_of(path: &Path) -> &Path {
    path.parent().unwrap_or(Path::new("/"))
}
