//! SVG icon loading.
//!
//! Only geometry is read: `<path d>` and the basic shapes. Transforms,
//! strokes and styling are ignored; anything inside `<defs>`, `<clipPath>`,
//! `<mask>` or `<symbol>` is skipped.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{anyhow, bail, Context, Result};
use kurbo::{BezPath, Circle, Ellipse, Point, Rect, RoundedRect, Shape};
use regex::Regex;

const SHAPE_TOLERANCE: f64 = 0.01;

/// One parsed icon in its own SVG user space (y pointing down).
#[derive(Debug, Clone)]
pub struct Icon {
    pub name: String,
    pub source: PathBuf,
    pub outline: BezPath,
    pub view_box: Rect,
}

/// Read every file in `files`, in order. Icon names are the file stems and
/// must be unique.
pub fn load_icons(files: &[PathBuf]) -> Result<Vec<Icon>> {
    let mut seen: HashMap<String, PathBuf> = HashMap::new();
    let mut icons = Vec::with_capacity(files.len());

    for file in files {
        let name = icon_name(file)?;
        if let Some(previous) = seen.get(&name) {
            bail!(
                "duplicate icon name '{name}' ({} and {})",
                previous.display(),
                file.display()
            );
        }
        let text = fs::read_to_string(file)
            .with_context(|| format!("reading icon {}", file.display()))?;
        let icon = parse_icon(&name, file, &text)
            .with_context(|| format!("parsing icon {}", file.display()))?;
        seen.insert(name, file.clone());
        icons.push(icon);
    }

    Ok(icons)
}

fn icon_name(file: &Path) -> Result<String> {
    file.file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow!("cannot derive an icon name from {}", file.display()))
}

/// Parse one SVG document.
pub fn parse_icon(name: &str, source: &Path, text: &str) -> Result<Icon> {
    let text = hidden_pattern().replace_all(text, "");

    let root = root_pattern()
        .captures(&text)
        .ok_or_else(|| anyhow!("not an SVG document"))?;
    let root_attrs = attributes(&root[1]);

    let mut outline = BezPath::new();
    for caps in element_pattern().captures_iter(&text) {
        let attrs = attributes(&caps[2]);
        let shape = match &caps[1] {
            "path" => path_outline(&attrs)?,
            "rect" => rect_outline(&attrs),
            "circle" => circle_outline(&attrs),
            "ellipse" => ellipse_outline(&attrs),
            "polygon" | "polyline" => poly_outline(&attrs)?,
            _ => None,
        };
        if let Some(shape) = shape {
            outline.extend(shape.elements().iter().copied());
        }
    }

    let view_box = view_box(&root_attrs)
        .or_else(|| {
            let bounds = outline.bounding_box();
            (bounds.width() > 0.0 && bounds.height() > 0.0).then_some(bounds)
        })
        .ok_or_else(|| anyhow!("icon has neither a viewBox, a size nor any geometry"))?;

    Ok(Icon {
        name: name.to_string(),
        source: source.to_path_buf(),
        outline,
        view_box,
    })
}

fn hidden_pattern() -> &'static Regex {
    static HIDDEN: OnceLock<Regex> = OnceLock::new();
    HIDDEN.get_or_init(|| {
        Regex::new(
            r"(?s)<!--.*?-->|<defs\b.*?</defs>|<clipPath\b.*?</clipPath>|<mask\b.*?</mask>|<symbol\b.*?</symbol>",
        )
        .expect("valid hidden-content regex")
    })
}

fn root_pattern() -> &'static Regex {
    static ROOT: OnceLock<Regex> = OnceLock::new();
    ROOT.get_or_init(|| Regex::new(r"<svg\b([^>]*)>").expect("valid root regex"))
}

fn element_pattern() -> &'static Regex {
    static ELEMENT: OnceLock<Regex> = OnceLock::new();
    ELEMENT.get_or_init(|| {
        Regex::new(r"<(path|rect|circle|ellipse|polygon|polyline)\b([^>]*?)/?>")
            .expect("valid element regex")
    })
}

fn attribute_pattern() -> &'static Regex {
    static ATTRIBUTE: OnceLock<Regex> = OnceLock::new();
    ATTRIBUTE.get_or_init(|| {
        Regex::new(r#"([a-zA-Z_:][-a-zA-Z0-9_:.]*)\s*=\s*(?:"([^"]*)"|'([^']*)')"#)
            .expect("valid attribute regex")
    })
}

fn attributes(raw: &str) -> HashMap<String, String> {
    attribute_pattern()
        .captures_iter(raw)
        .map(|caps| {
            let value = caps.get(2).or_else(|| caps.get(3)).map_or("", |m| m.as_str());
            (caps[1].to_string(), value.to_string())
        })
        .collect()
}

fn length(attrs: &HashMap<String, String>, key: &str) -> Option<f64> {
    let raw = attrs.get(key)?.trim();
    raw.strip_suffix("px").unwrap_or(raw).trim().parse().ok()
}

fn numbers(raw: &str) -> Vec<f64> {
    raw.split(|c: char| c.is_whitespace() || c == ',')
        .filter(|s| !s.is_empty())
        .filter_map(|s| s.parse().ok())
        .collect()
}

fn view_box(attrs: &HashMap<String, String>) -> Option<Rect> {
    if let Some(raw) = attrs.get("viewBox") {
        if let &[x, y, w, h] = numbers(raw).as_slice() {
            if w > 0.0 && h > 0.0 {
                return Some(Rect::new(x, y, x + w, y + h));
            }
        }
    }
    let width = length(attrs, "width")?;
    let height = length(attrs, "height")?;
    (width > 0.0 && height > 0.0).then(|| Rect::new(0.0, 0.0, width, height))
}

fn path_outline(attrs: &HashMap<String, String>) -> Result<Option<BezPath>> {
    let Some(data) = attrs.get("d").map(|d| d.trim()).filter(|d| !d.is_empty()) else {
        return Ok(None);
    };
    let path = BezPath::from_svg(data).map_err(|e| anyhow!("invalid path data: {e}"))?;
    Ok(Some(path))
}

fn rect_outline(attrs: &HashMap<String, String>) -> Option<BezPath> {
    let x = length(attrs, "x").unwrap_or(0.0);
    let y = length(attrs, "y").unwrap_or(0.0);
    let width = length(attrs, "width")?;
    let height = length(attrs, "height")?;
    if width <= 0.0 || height <= 0.0 {
        return None;
    }
    let radius = length(attrs, "rx")
        .or_else(|| length(attrs, "ry"))
        .unwrap_or(0.0)
        .min(width / 2.0)
        .min(height / 2.0);
    let rect = Rect::new(x, y, x + width, y + height);
    if radius > 0.0 {
        Some(RoundedRect::from_rect(rect, radius).to_path(SHAPE_TOLERANCE))
    } else {
        Some(rect.to_path(SHAPE_TOLERANCE))
    }
}

fn circle_outline(attrs: &HashMap<String, String>) -> Option<BezPath> {
    let r = length(attrs, "r").filter(|r| *r > 0.0)?;
    let center = Point::new(
        length(attrs, "cx").unwrap_or(0.0),
        length(attrs, "cy").unwrap_or(0.0),
    );
    Some(Circle::new(center, r).to_path(SHAPE_TOLERANCE))
}

fn ellipse_outline(attrs: &HashMap<String, String>) -> Option<BezPath> {
    let rx = length(attrs, "rx").filter(|r| *r > 0.0)?;
    let ry = length(attrs, "ry").filter(|r| *r > 0.0)?;
    let center = Point::new(
        length(attrs, "cx").unwrap_or(0.0),
        length(attrs, "cy").unwrap_or(0.0),
    );
    Some(Ellipse::new(center, (rx, ry), 0.0).to_path(SHAPE_TOLERANCE))
}

/// Polylines are closed too: glyph outlines are always filled.
fn poly_outline(attrs: &HashMap<String, String>) -> Result<Option<BezPath>> {
    let Some(raw) = attrs.get("points") else {
        return Ok(None);
    };
    let coords = numbers(raw);
    if coords.len() % 2 != 0 {
        bail!("odd number of coordinates in points list");
    }
    if coords.len() < 6 {
        return Ok(None);
    }

    let mut path = BezPath::new();
    let mut pairs = coords.chunks_exact(2);
    if let Some(first) = pairs.next() {
        path.move_to((first[0], first[1]));
    }
    for pair in pairs {
        path.line_to((pair[0], pair[1]));
    }
    path.close_path();
    Ok(Some(path))
}
