//! TrueType assembly with write-fonts.

use std::collections::HashSet;

use anyhow::{anyhow, Result};
use font_types::{FWord, Fixed, LongDateTime, Tag, UfWord};
use kurbo::{BezPath, PathEl, Point};
use log::warn;
use read_fonts::tables::glyf::CurvePoint;
use read_fonts::types::GlyphId;
use write_fonts::{
    tables::{
        cmap::Cmap,
        glyf::{Bbox, Contour, GlyfLocaBuilder, Glyph, SimpleGlyph},
        head::{Flags, Head, MacStyle},
        hhea::Hhea,
        hmtx::{Hmtx, LongMetric},
        maxp::Maxp,
        name::{Name, NameRecord},
        os2::{Os2, SelectionFlags},
        post::Post,
    },
    types::{NameId, Version16Dot16},
    FontBuilder,
};

use super::metrics::GlyphLayout;

const WINDOWS_PLATFORM: u16 = 3;
const WINDOWS_UNICODE_BMP: u16 = 1;
const WINDOWS_ENGLISH_US: u16 = 0x409;

/// Build a TrueType font. Glyph 0 is an empty `.notdef`; icons follow in order.
pub fn build_ttf(font_name: &str, layout: &GlyphLayout) -> Result<Vec<u8>> {
    let mut glyf_builder = GlyfLocaBuilder::new();
    glyf_builder.add_glyph(&Glyph::Empty)?;

    let mut h_metrics = vec![LongMetric {
        advance: layout.max_advance(),
        side_bearing: 0,
    }];
    let mut max_points = 0u16;
    let mut max_contours = 0u16;
    let mut bounds: Option<Bbox> = None;
    let mut min_rsb = i16::MAX;
    let mut x_max_extent = i16::MIN;

    for laid in &layout.glyphs {
        let side_bearing = match simple_glyph(&laid.outline) {
            Some((simple, points)) => {
                let bbox = simple.bbox.clone();
                max_points = max_points.max(points.min(usize::from(u16::MAX)) as u16);
                max_contours = max_contours.max(simple.contours.len() as u16);
                min_rsb = min_rsb.min(clamp_i16(i32::from(laid.advance) - i32::from(bbox.x_max)));
                x_max_extent = x_max_extent.max(bbox.x_max);
                bounds = Some(match bounds {
                    None => bbox.clone(),
                    Some(b) => Bbox {
                        x_min: b.x_min.min(bbox.x_min),
                        y_min: b.y_min.min(bbox.y_min),
                        x_max: b.x_max.max(bbox.x_max),
                        y_max: b.y_max.max(bbox.y_max),
                    },
                });
                glyf_builder.add_glyph(&Glyph::Simple(simple))?;
                bbox.x_min
            }
            None => {
                glyf_builder.add_glyph(&Glyph::Empty)?;
                0
            }
        };
        h_metrics.push(LongMetric {
            advance: laid.advance,
            side_bearing,
        });
    }

    let (glyf, loca, loca_format) = glyf_builder.build();
    let bounds = bounds.unwrap_or_default();
    let num_glyphs = u16::try_from(h_metrics.len())
        .map_err(|_| anyhow!("too many icons for one font ({})", h_metrics.len()))?;
    let min_lsb = h_metrics.iter().skip(1).map(|m| m.side_bearing).min().unwrap_or(0);

    let ascent = layout.ascent;
    let descent = layout.descent;

    let head = Head {
        font_revision: Fixed::from_f64(1.0),
        checksum_adjustment: 0,
        magic_number: 0x5F0F3CF5,
        flags: Flags::from_bits_truncate(0b1011),
        units_per_em: layout.units_per_em,
        created: LongDateTime::new(0),
        modified: LongDateTime::new(0),
        x_min: bounds.x_min,
        y_min: bounds.y_min,
        x_max: bounds.x_max,
        y_max: bounds.y_max,
        mac_style: MacStyle::from_bits_truncate(0),
        lowest_rec_ppem: 8,
        font_direction_hint: 2,
        index_to_loc_format: loca_format as i16,
    };

    let hhea = Hhea {
        ascender: FWord::new(ascent),
        descender: FWord::new(-descent),
        line_gap: FWord::new(0),
        advance_width_max: UfWord::new(layout.max_advance()),
        min_left_side_bearing: FWord::new(min_lsb),
        min_right_side_bearing: FWord::new(if min_rsb == i16::MAX { 0 } else { min_rsb }),
        x_max_extent: FWord::new(if x_max_extent == i16::MIN { 0 } else { x_max_extent }),
        caret_slope_rise: 1,
        caret_slope_run: 0,
        caret_offset: 0,
        number_of_h_metrics: num_glyphs,
    };

    let maxp = Maxp {
        num_glyphs,
        max_points: Some(max_points),
        max_contours: Some(max_contours),
        max_composite_points: Some(0),
        max_composite_contours: Some(0),
        max_zones: Some(2),
        max_twilight_points: Some(0),
        max_storage: Some(0),
        max_function_defs: Some(0),
        max_instruction_defs: Some(0),
        max_stack_elements: Some(0),
        max_size_of_instructions: Some(0),
        max_component_elements: Some(0),
        max_component_depth: Some(0),
    };

    let (first_char, last_char) = char_range(layout);
    let average_advance = if layout.glyphs.is_empty() {
        0
    } else {
        let total: u32 = layout.glyphs.iter().map(|g| u32::from(g.advance)).sum();
        (total / layout.glyphs.len() as u32).min(i16::MAX as u32) as i16
    };
    let em = i32::from(layout.units_per_em);
    let frac = |num: i32, den: i32| (em * num / den) as i16;

    let os2 = Os2 {
        x_avg_char_width: average_advance,
        us_weight_class: 400,
        us_width_class: 5,
        fs_type: 0,
        y_subscript_x_size: frac(13, 20),
        y_subscript_y_size: frac(7, 10),
        y_subscript_x_offset: 0,
        y_subscript_y_offset: frac(7, 50),
        y_superscript_x_size: frac(13, 20),
        y_superscript_y_size: frac(7, 10),
        y_superscript_x_offset: 0,
        y_superscript_y_offset: frac(12, 25),
        y_strikeout_size: frac(1, 20),
        y_strikeout_position: frac(13, 50),
        s_family_class: 0,
        panose_10: [0; 10],
        ul_unicode_range_1: 0,
        ul_unicode_range_2: 0,
        ul_unicode_range_3: 0,
        ul_unicode_range_4: 0,
        ach_vend_id: Tag::new(b"NONE"),
        fs_selection: SelectionFlags::from_bits_truncate(0x40),
        us_first_char_index: first_char,
        us_last_char_index: last_char,
        s_typo_ascender: ascent,
        s_typo_descender: -descent,
        s_typo_line_gap: 0,
        us_win_ascent: ascent.max(bounds.y_max).max(0) as u16,
        us_win_descent: descent.max(-bounds.y_min).max(0) as u16,
        ul_code_page_range_1: Some(1),
        ul_code_page_range_2: Some(0),
        sx_height: Some(0),
        s_cap_height: Some(0),
        us_default_char: Some(0),
        us_break_char: Some(0x20),
        us_max_context: Some(0),
        us_lower_optical_point_size: None,
        us_upper_optical_point_size: None,
    };

    let mut post = Post::new(
        Fixed::from_f64(0.0),
        FWord::new(-frac(1, 10)),
        FWord::new(frac(1, 20)),
        0,
        0,
        0,
        0,
        0,
    );
    post.version = Version16Dot16::VERSION_3_0;

    let mut builder = FontBuilder::new();
    builder.add_table(&head)?;
    builder.add_table(&hhea)?;
    builder.add_table(&maxp)?;
    builder.add_table(&os2)?;
    builder.add_table(&Hmtx::new(h_metrics, Vec::new()))?;
    builder.add_table(&cmap(layout)?)?;
    builder.add_table(&glyf)?;
    builder.add_table(&loca)?;
    builder.add_table(&name_table(font_name))?;
    builder.add_table(&post)?;
    Ok(builder.build())
}

fn cmap(layout: &GlyphLayout) -> Result<Cmap> {
    let mut seen = HashSet::new();
    let mut mappings: Vec<(char, GlyphId)> = Vec::with_capacity(layout.glyphs.len());

    for (index, glyph) in layout.glyphs.iter().enumerate() {
        let ch = char::from_u32(glyph.codepoint).ok_or_else(|| {
            anyhow!(
                "icon '{}' has codepoint {:#x}, which is not a Unicode scalar value",
                glyph.name,
                glyph.codepoint
            )
        })?;
        if !seen.insert(ch) {
            warn!(
                "icon '{}' reuses codepoint {:#x}; the font maps it to the first icon only",
                glyph.name, glyph.codepoint
            );
            continue;
        }
        mappings.push((ch, GlyphId::new(index as u32 + 1)));
    }
    mappings.sort_by_key(|(ch, _)| *ch);

    Cmap::from_mappings(mappings).map_err(|e| anyhow!("failed to build cmap: {e:?}"))
}

fn char_range(layout: &GlyphLayout) -> (u16, u16) {
    let clamp = |cp: u32| cp.min(0xFFFF) as u16;
    let first = layout.glyphs.iter().map(|g| g.codepoint).min().unwrap_or(0);
    let last = layout.glyphs.iter().map(|g| g.codepoint).max().unwrap_or(0);
    (clamp(first), clamp(last))
}

fn name_table(font_name: &str) -> Name {
    let entries = [
        (1, font_name.to_string()),
        (2, "Regular".to_string()),
        (3, format!("{font_name}:Regular:1.0")),
        (4, font_name.to_string()),
        (5, "Version 1.0".to_string()),
        (6, postscript_name(font_name)),
    ];
    let records: Vec<_> = entries
        .into_iter()
        .map(|(id, value)| {
            NameRecord::new(
                WINDOWS_PLATFORM,
                WINDOWS_UNICODE_BMP,
                WINDOWS_ENGLISH_US,
                NameId::new(id),
                value.into(),
            )
        })
        .collect();
    Name::new(records)
}

/// PostScript names are limited to printable ASCII without brackets, spaces or slashes.
fn postscript_name(font_name: &str) -> String {
    let cleaned: String = font_name
        .chars()
        .filter(|c| c.is_ascii_graphic() && !"[](){}<>/%".contains(*c))
        .take(63)
        .collect();
    if cleaned.is_empty() {
        "icons".to_string()
    } else {
        cleaned
    }
}

/// Contours from a quadratic-only outline, coordinates rounded to the grid.
///
/// Returns the glyph with its point count, or `None` when nothing is drawn.
fn simple_glyph(outline: &BezPath) -> Option<(SimpleGlyph, usize)> {
    let mut contours: Vec<Vec<CurvePoint>> = Vec::new();
    let mut current: Vec<CurvePoint> = Vec::new();

    let on = |p: Point| CurvePoint::new(round_coord(p.x), round_coord(p.y), true);
    let off = |p: Point| CurvePoint::new(round_coord(p.x), round_coord(p.y), false);

    for el in outline.elements() {
        match *el {
            PathEl::MoveTo(p) => {
                push_contour(&mut contours, std::mem::take(&mut current));
                current.push(on(p));
            }
            PathEl::LineTo(p) => current.push(on(p)),
            PathEl::QuadTo(c, p) => {
                current.push(off(c));
                current.push(on(p));
            }
            // Cubics are converted before layout; keep the end point if one slips through.
            PathEl::CurveTo(_, _, p) => current.push(on(p)),
            PathEl::ClosePath => push_contour(&mut contours, std::mem::take(&mut current)),
        }
    }
    push_contour(&mut contours, current);

    if contours.is_empty() {
        return None;
    }

    let points = contours.iter().map(Vec::len).sum();
    let mut glyph = SimpleGlyph {
        bbox: Bbox::default(),
        contours: contours.into_iter().map(Contour::from).collect(),
        instructions: Vec::new(),
    };
    glyph.recompute_bounding_box();
    Some((glyph, points))
}

fn push_contour(contours: &mut Vec<Vec<CurvePoint>>, mut points: Vec<CurvePoint>) {
    if points.len() > 1 && points.first() == points.last() {
        points.pop();
    }
    if points.len() >= 2 {
        contours.push(points);
    }
}

fn round_coord(value: f64) -> i16 {
    clamp_i16(value.round() as i32)
}

fn clamp_i16(value: i32) -> i16 {
    value.clamp(i32::from(i16::MIN), i32::from(i16::MAX)) as i16
}
