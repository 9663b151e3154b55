//! Caller-facing generation options and their resolved, defaulted form.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Default font family and file stem.
pub const DEFAULT_FONT_NAME: &str = "icons";
/// Default class prefix (a `-` separator is appended when building templates).
pub const DEFAULT_CLASS_PREFIX: &str = "icon";
/// Default element used for icons in the preview and base CSS rule.
pub const DEFAULT_BASE_TAG: &str = "i";
/// First codepoint handed out to icons without an explicit mapping.
pub const DEFAULT_START_CODEPOINT: u32 = 0xF101;

/// Font formats the engine can emit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontType {
    Svg,
    Ttf,
    Woff,
    Woff2,
    Eot,
}

impl FontType {
    /// Every known format.
    pub const ALL: [FontType; 5] = [
        FontType::Svg,
        FontType::Ttf,
        FontType::Woff,
        FontType::Woff2,
        FontType::Eot,
    ];

    pub fn extension(self) -> &'static str {
        match self {
            FontType::Svg => "svg",
            FontType::Ttf => "ttf",
            FontType::Woff => "woff",
            FontType::Woff2 => "woff2",
            FontType::Eot => "eot",
        }
    }
}

impl fmt::Display for FontType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for FontType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FontType::ALL
            .into_iter()
            .find(|t| t.extension().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown font type '{s}' (expected svg, ttf, woff, woff2 or eot)"))
    }
}

/// A styling parameter as supplied by the caller.
///
/// Values coming from the command line arrive as text; numeric-looking text
/// is turned into a number before it reaches the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Bool(bool),
    Number(f64),
    Text(String),
}

impl StyleValue {
    /// Replace text whose string form survives a float round trip with the number.
    pub fn coerced(&self) -> StyleValue {
        match self {
            StyleValue::Text(raw) => match raw.parse::<f64>() {
                Ok(num) if num.is_finite() && num.to_string() == *raw => StyleValue::Number(num),
                _ => self.clone(),
            },
            other => other.clone(),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self.coerced() {
            StyleValue::Number(num) => Some(num),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            StyleValue::Bool(b) => Some(*b),
            StyleValue::Number(num) => Some(*num != 0.0),
            StyleValue::Text(raw) => match raw.as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
        }
    }
}

impl From<bool> for StyleValue {
    fn from(value: bool) -> Self {
        StyleValue::Bool(value)
    }
}

impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        StyleValue::Number(value)
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

/// Styling parameters passed through to the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct StyleOptions {
    pub normalize: Option<StyleValue>,
    pub round: Option<StyleValue>,
    pub descent: Option<StyleValue>,
    pub fixed_width: Option<StyleValue>,
    pub font_height: Option<StyleValue>,
    pub center_horizontally: Option<StyleValue>,
}

impl StyleOptions {
    /// Layer `self` over `base`: defined values in `self` win.
    pub fn layered_over(self, base: StyleOptions) -> StyleOptions {
        StyleOptions {
            normalize: self.normalize.or(base.normalize),
            round: self.round.or(base.round),
            descent: self.descent.or(base.descent),
            fixed_width: self.fixed_width.or(base.fixed_width),
            font_height: self.font_height.or(base.font_height),
            center_horizontally: self.center_horizontally.or(base.center_horizontally),
        }
    }

    /// Numeric-coerced copy.
    pub fn coerced(&self) -> StyleOptions {
        let coerce = |v: &Option<StyleValue>| v.as_ref().map(StyleValue::coerced);
        StyleOptions {
            normalize: coerce(&self.normalize),
            round: coerce(&self.round),
            descent: coerce(&self.descent),
            fixed_width: coerce(&self.fixed_width),
            font_height: coerce(&self.font_height),
            center_horizontally: coerce(&self.center_horizontally),
        }
    }
}

/// Options as supplied by a caller (command line, config file or library user).
///
/// Every field is optional; [`GenerationOptions::resolve`] layers them over
/// the documented defaults without touching the original value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GenerationOptions {
    pub paths: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub font_name: Option<String>,
    pub fonts_path: Option<String>,
    pub types: Vec<FontType>,
    pub css: Option<bool>,
    pub html: Option<bool>,
    pub json: Option<bool>,
    pub css_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub css_template: Option<PathBuf>,
    pub html_template: Option<PathBuf>,
    pub class_prefix: Option<String>,
    pub base_tag: Option<String>,
    pub base_selector: Option<String>,
    pub codepoints: Option<PathBuf>,
    pub start_codepoint: Option<u32>,
    #[serde(flatten)]
    pub style: StyleOptions,
    pub silent: Option<bool>,
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = Some(dir.into());
        self
    }

    pub fn with_types(mut self, types: Vec<FontType>) -> Self {
        self.types = types;
        self
    }

    /// Layer `self` over `base`: anything `self` defines wins.
    pub fn layered_over(self, base: GenerationOptions) -> GenerationOptions {
        GenerationOptions {
            paths: if self.paths.is_empty() { base.paths } else { self.paths },
            output_dir: self.output_dir.or(base.output_dir),
            font_name: self.font_name.or(base.font_name),
            fonts_path: self.fonts_path.or(base.fonts_path),
            types: if self.types.is_empty() { base.types } else { self.types },
            css: self.css.or(base.css),
            html: self.html.or(base.html),
            json: self.json.or(base.json),
            css_path: self.css_path.or(base.css_path),
            html_path: self.html_path.or(base.html_path),
            json_path: self.json_path.or(base.json_path),
            css_template: self.css_template.or(base.css_template),
            html_template: self.html_template.or(base.html_template),
            class_prefix: self.class_prefix.or(base.class_prefix),
            base_tag: self.base_tag.or(base.base_tag),
            base_selector: self.base_selector.or(base.base_selector),
            codepoints: self.codepoints.or(base.codepoints),
            start_codepoint: self.start_codepoint.or(base.start_codepoint),
            style: self.style.layered_over(base.style),
            silent: self.silent.or(base.silent),
        }
    }

    /// Merge over the documented defaults into a new [`Options`] value.
    pub fn resolve(&self) -> Options {
        let mut types: Vec<FontType> = Vec::with_capacity(FontType::ALL.len());
        for t in &self.types {
            if !types.contains(t) {
                types.push(*t);
            }
        }
        if types.is_empty() {
            types = FontType::ALL.to_vec();
        }

        Options {
            paths: self.paths.clone(),
            output_dir: self.output_dir.clone(),
            font_name: self
                .font_name
                .clone()
                .unwrap_or_else(|| DEFAULT_FONT_NAME.to_string()),
            fonts_path: self.fonts_path.clone(),
            types,
            css: self.css.unwrap_or(true),
            html: self.html.unwrap_or(true),
            json: self.json.unwrap_or(true),
            css_path: self.css_path.clone(),
            html_path: self.html_path.clone(),
            json_path: self.json_path.clone(),
            css_template: self.css_template.clone(),
            html_template: self.html_template.clone(),
            class_prefix: self.class_prefix.clone(),
            base_tag: self.base_tag.clone(),
            base_selector: self.base_selector.clone(),
            codepoints: self.codepoints.clone(),
            start_codepoint: self.start_codepoint.unwrap_or(DEFAULT_START_CODEPOINT),
            style: self.style.clone(),
            silent: self.silent.unwrap_or(true),
        }
    }
}

/// Fully defaulted options for one invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct Options {
    pub paths: Vec<PathBuf>,
    pub output_dir: Option<PathBuf>,
    pub font_name: String,
    pub fonts_path: Option<String>,
    /// Non-empty, duplicate-free, in caller order.
    pub types: Vec<FontType>,
    pub css: bool,
    pub html: bool,
    pub json: bool,
    pub css_path: Option<PathBuf>,
    pub html_path: Option<PathBuf>,
    pub json_path: Option<PathBuf>,
    pub css_template: Option<PathBuf>,
    pub html_template: Option<PathBuf>,
    pub class_prefix: Option<String>,
    pub base_tag: Option<String>,
    pub base_selector: Option<String>,
    pub codepoints: Option<PathBuf>,
    pub start_codepoint: u32,
    pub style: StyleOptions,
    pub silent: bool,
}

impl Options {
    pub fn wants(&self, font_type: FontType) -> bool {
        self.types.contains(&font_type)
    }
}
