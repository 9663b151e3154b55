//! Codepoint assignment and glyph placement in font units.

use std::collections::HashSet;

use anyhow::{bail, Result};
use kurbo::{Affine, BezPath, CubicBez, PathEl, Point, Rect, Shape};
use log::warn;

use super::icons::Icon;
use crate::codepoint::CodepointMap;
use crate::options::{StyleOptions, StyleValue};

/// Maximum distance between a cubic and its quadratic replacement, in font units.
const QUADRATIC_ACCURACY: f64 = 0.5;
const DEFAULT_ROUND: f64 = 1e3;

/// Icons placed on a shared em, y pointing up, baseline at 0.
#[derive(Debug, Clone)]
pub struct GlyphLayout {
    pub units_per_em: u16,
    /// Height above the baseline.
    pub ascent: i16,
    /// Depth below the baseline, positive.
    pub descent: i16,
    /// Coordinate rounding factor for text outputs.
    pub round: f64,
    pub glyphs: Vec<LaidGlyph>,
}

#[derive(Debug, Clone)]
pub struct LaidGlyph {
    pub name: String,
    pub codepoint: u32,
    /// Quadratic-only outline.
    pub outline: BezPath,
    pub advance: u16,
}

impl GlyphLayout {
    pub fn max_advance(&self) -> u16 {
        self.glyphs.iter().map(|g| g.advance).max().unwrap_or(0)
    }

    /// Union of every outline's bounds, or the em box when nothing is drawn.
    pub fn bounds(&self) -> Rect {
        self.glyphs
            .iter()
            .filter(|g| !g.outline.elements().is_empty())
            .map(|g| g.outline.bounding_box())
            .reduce(|a, b| a.union(b))
            .unwrap_or(Rect::new(
                0.0,
                -f64::from(self.descent),
                f64::from(self.max_advance()),
                f64::from(self.ascent),
            ))
    }

    /// Name to codepoint, in glyph order.
    pub fn codepoints(&self) -> CodepointMap {
        self.glyphs
            .iter()
            .map(|g| (g.name.clone(), g.codepoint))
            .collect()
    }
}

/// Give every icon a codepoint.
///
/// Icons listed in `mapped` keep their value; the rest receive consecutive
/// values from `start`, skipping taken values and surrogates.
pub fn assign_codepoints(names: &[&str], mapped: &CodepointMap, start: u32) -> Result<Vec<u32>> {
    let mut taken: HashSet<u32> = names
        .iter()
        .filter_map(|name| mapped.get(*name).copied())
        .collect();
    let mut next = start;
    let mut out = Vec::with_capacity(names.len());

    for name in names {
        if let Some(cp) = mapped.get(*name) {
            out.push(*cp);
            continue;
        }
        while taken.contains(&next) || char::from_u32(next).is_none() {
            if next >= 0x10FFFF {
                bail!("ran out of codepoints while assigning '{name}' (start {start:#x})");
            }
            next += 1;
        }
        taken.insert(next);
        out.push(next);
        next += 1;
    }

    for name in mapped.keys() {
        if !names.contains(&name.as_str()) {
            warn!("codepoint map names '{name}', which is not among the icons");
        }
    }

    Ok(out)
}

/// Scale and position every icon on the em.
///
/// The em height is `font_height` or the tallest icon. With `normalize` each
/// icon is scaled to fill the em; otherwise all icons share the scale of the
/// tallest one.
pub fn lay_out(icons: &[Icon], codepoints: &[u32], style: &StyleOptions) -> Result<GlyphLayout> {
    let tallest = icons
        .iter()
        .map(|icon| icon.view_box.height())
        .fold(0.0_f64, f64::max);
    if tallest <= 0.0 {
        bail!("no icon has a usable height");
    }

    let number = |v: &Option<StyleValue>| v.as_ref().and_then(StyleValue::as_f64);
    let flag = |v: &Option<StyleValue>| v.as_ref().and_then(StyleValue::as_bool).unwrap_or(false);

    let em = number(&style.font_height)
        .filter(|h| *h > 0.0)
        .unwrap_or(tallest)
        .round()
        .clamp(16.0, 16384.0);
    let descent = number(&style.descent).unwrap_or(0.0).round().clamp(0.0, em);
    let normalize = flag(&style.normalize);
    let round = number(&style.round).filter(|r| *r > 0.0).unwrap_or(DEFAULT_ROUND);

    let mut glyphs = Vec::with_capacity(icons.len());
    for (icon, codepoint) in icons.iter().zip(codepoints) {
        let view_box = icon.view_box;
        let scale = if normalize {
            em / view_box.height()
        } else {
            em / tallest
        };
        let to_font = Affine::new([
            scale,
            0.0,
            0.0,
            -scale,
            -view_box.x0 * scale,
            view_box.y1 * scale - descent,
        ]);
        let mut outline = icon.outline.clone();
        outline.apply_affine(to_font);

        glyphs.push(LaidGlyph {
            name: icon.name.clone(),
            codepoint: *codepoint,
            outline: to_quadratic(&outline, QUADRATIC_ACCURACY),
            advance: to_advance(view_box.width() * scale),
        });
    }

    if flag(&style.fixed_width) {
        let widest = glyphs.iter().map(|g| g.advance).max().unwrap_or(0);
        for glyph in &mut glyphs {
            glyph.advance = widest;
        }
    }

    if flag(&style.center_horizontally) {
        for glyph in &mut glyphs {
            if glyph.outline.elements().is_empty() {
                continue;
            }
            let bounds = glyph.outline.bounding_box();
            let dx = (f64::from(glyph.advance) - bounds.width()) / 2.0 - bounds.x0;
            glyph.outline.apply_affine(Affine::translate((dx, 0.0)));
        }
    }

    Ok(GlyphLayout {
        units_per_em: em as u16,
        ascent: (em - descent) as i16,
        descent: descent as i16,
        round,
        glyphs,
    })
}

fn to_advance(width: f64) -> u16 {
    width.round().clamp(0.0, f64::from(u16::MAX)) as u16
}

/// Replace every cubic segment with quadratics within `accuracy`.
pub fn to_quadratic(path: &BezPath, accuracy: f64) -> BezPath {
    let mut out = BezPath::new();
    let mut start = Point::ZERO;
    let mut last = Point::ZERO;

    for el in path.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                out.move_to(p);
                start = p;
                last = p;
            }
            PathEl::LineTo(p) => {
                out.line_to(p);
                last = p;
            }
            PathEl::QuadTo(c, p) => {
                out.quad_to(c, p);
                last = p;
            }
            PathEl::CurveTo(c1, c2, p) => {
                for (_, _, quad) in CubicBez::new(last, c1, c2, p).to_quads(accuracy) {
                    out.quad_to(quad.p1, quad.p2);
                }
                last = p;
            }
            PathEl::ClosePath => {
                out.close_path();
                last = start;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn icon(name: &str, width: f64, height: f64) -> Icon {
        let mut outline = BezPath::new();
        outline.move_to((0.0, 0.0));
        outline.line_to((width, 0.0));
        outline.line_to((width, height));
        outline.close_path();
        Icon {
            name: name.to_string(),
            source: PathBuf::from(format!("{name}.svg")),
            outline,
            view_box: Rect::new(0.0, 0.0, width, height),
        }
    }

    #[test]
    fn unmapped_icons_get_consecutive_codepoints() {
        let cps = assign_codepoints(&["a", "b", "c"], &CodepointMap::new(), 0xF101).unwrap();
        assert_eq!(cps, vec![0xF101, 0xF102, 0xF103]);
    }

    #[test]
    fn mapped_values_are_kept_and_skipped() {
        let mut mapped = CodepointMap::new();
        mapped.insert("b".into(), 0xF101);
        let cps = assign_codepoints(&["a", "b", "c"], &mapped, 0xF101).unwrap();
        assert_eq!(cps, vec![0xF102, 0xF101, 0xF103]);
    }

    #[test]
    fn surrogates_are_skipped() {
        let cps = assign_codepoints(&["a", "b"], &CodepointMap::new(), 0xD7FF).unwrap();
        assert_eq!(cps, vec![0xD7FF, 0xE000]);
    }

    #[test]
    fn running_past_unicode_is_an_error() {
        assert!(assign_codepoints(&["a", "b"], &CodepointMap::new(), 0x10FFFF).is_err());
    }

    #[test]
    fn tallest_icon_sets_the_em() {
        let icons = [icon("a", 24.0, 24.0), icon("b", 48.0, 48.0)];
        let layout = lay_out(&icons, &[1, 2], &StyleOptions::default()).unwrap();

        assert_eq!(layout.units_per_em, 48);
        assert_eq!(layout.ascent, 48);
        assert_eq!(layout.descent, 0);
        assert_eq!(layout.glyphs[0].advance, 24);
        assert_eq!(layout.glyphs[1].advance, 48);
    }

    #[test]
    fn font_height_and_descent_move_the_outline() {
        let style = StyleOptions {
            font_height: Some(StyleValue::Number(1000.0)),
            descent: Some(StyleValue::Number(150.0)),
            ..StyleOptions::default()
        };
        let layout = lay_out(&[icon("a", 10.0, 10.0)], &[1], &style).unwrap();
        let bounds = layout.glyphs[0].outline.bounding_box();

        assert_eq!(layout.units_per_em, 1000);
        assert_eq!(layout.ascent, 850);
        assert_eq!(layout.descent, 150);
        assert_eq!(bounds, Rect::new(0.0, -150.0, 1000.0, 850.0));
    }

    #[test]
    fn normalize_scales_each_icon_to_the_em() {
        let style = StyleOptions {
            normalize: Some(StyleValue::Bool(true)),
            ..StyleOptions::default()
        };
        let icons = [icon("small", 10.0, 10.0), icon("big", 20.0, 20.0)];
        let layout = lay_out(&icons, &[1, 2], &style).unwrap();
        assert_eq!(layout.glyphs[0].advance, 20);
        assert_eq!(layout.glyphs[1].advance, 20);
    }

    #[test]
    fn fixed_width_and_centering() {
        let style = StyleOptions {
            fixed_width: Some(StyleValue::Bool(true)),
            center_horizontally: Some(StyleValue::Bool(true)),
            ..StyleOptions::default()
        };
        let icons = [icon("narrow", 10.0, 40.0), icon("wide", 40.0, 40.0)];
        let layout = lay_out(&icons, &[1, 2], &style).unwrap();

        assert_eq!(layout.glyphs[0].advance, 40);
        let bounds = layout.glyphs[0].outline.bounding_box();
        assert_eq!(bounds.x0, 15.0);
        assert_eq!(bounds.x1, 25.0);
    }

    #[test]
    fn cubics_become_quadratics() {
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.curve_to((0.0, 100.0), (100.0, 100.0), (100.0, 0.0));
        path.close_path();

        let quads = to_quadratic(&path, 0.5);
        assert!(quads
            .elements()
            .iter()
            .all(|el| !matches!(el, PathEl::CurveTo(..))));
        assert!(quads.elements().iter().any(|el| matches!(el, PathEl::QuadTo(..))));
    }
}
