//! SVG font document output.

use std::fmt::Write as _;

use kurbo::{BezPath, PathEl, Point};

use super::metrics::GlyphLayout;

/// Render `layout` as an SVG font named `font_name`.
pub fn render_svg_font(font_name: &str, layout: &GlyphLayout) -> String {
    let name = escape(font_name);
    let mut out = String::new();

    out.push_str("<?xml version=\"1.0\" standalone=\"no\"?>\n");
    out.push_str("<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\" \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\" >\n");
    out.push_str("<svg xmlns=\"http://www.w3.org/2000/svg\">\n<defs>\n");
    let _ = writeln!(
        out,
        "  <font id=\"{name}\" horiz-adv-x=\"{}\">",
        layout.max_advance()
    );
    let _ = writeln!(
        out,
        "    <font-face font-family=\"{name}\" units-per-em=\"{}\" ascent=\"{}\" descent=\"{}\" />",
        layout.units_per_em,
        layout.ascent,
        -i32::from(layout.descent)
    );
    out.push_str("    <missing-glyph horiz-adv-x=\"0\" />\n");

    for glyph in &layout.glyphs {
        let _ = writeln!(
            out,
            "    <glyph glyph-name=\"{}\" unicode=\"&#x{:x};\" horiz-adv-x=\"{}\" d=\"{}\" />",
            escape(&glyph.name),
            glyph.codepoint,
            glyph.advance,
            path_data(&glyph.outline, layout.round)
        );
    }

    out.push_str("  </font>\n</defs>\n</svg>\n");
    out
}

/// SVG path data with coordinates rounded to `1 / round`.
pub fn path_data(path: &BezPath, round: f64) -> String {
    let pt = |p: Point| format!("{} {}", number(p.x, round), number(p.y, round));
    path.elements()
        .iter()
        .map(|el| match *el {
            PathEl::MoveTo(p) => format!("M{}", pt(p)),
            PathEl::LineTo(p) => format!("L{}", pt(p)),
            PathEl::QuadTo(c, p) => format!("Q{} {}", pt(c), pt(p)),
            PathEl::CurveTo(c1, c2, p) => format!("C{} {} {}", pt(c1), pt(c2), pt(p)),
            PathEl::ClosePath => "Z".to_string(),
        })
        .collect::<Vec<_>>()
        .join("")
}

fn number(value: f64, round: f64) -> String {
    let rounded = (value * round).round() / round;
    if rounded == 0.0 {
        "0".to_string()
    } else {
        rounded.to_string()
    }
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
