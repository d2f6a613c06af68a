use ab_glyph::{Font, PxScale, ScaleFont};

use crate::font::FontHandle;
use crate::primitives::{FontWeight, TextStyle};

#[derive(Debug, Clone, Copy)]
pub struct TextMetrics {
    pub width: f64,
    pub height: f64,
    pub ascent: f64,
}

/// Measure text width and height in points using ab_glyph.
pub fn measure_text<F: Font>(font: &F, text: &str, size_pt: f64) -> TextMetrics {
    let scaled = font.as_scaled(em_scale(font, size_pt));

    let mut width: f32 = 0.0;
    let mut prev_glyph_id = None;
    for ch in text.chars() {
        let glyph_id = font.glyph_id(ch);
        if let Some(prev) = prev_glyph_id {
            width += scaled.kern(prev, glyph_id);
        }
        width += scaled.h_advance(glyph_id);
        prev_glyph_id = Some(glyph_id);
    }

    let ascent = scaled.ascent();
    let height = ascent - scaled.descent();

    TextMetrics { width: width as f64, height: height as f64, ascent: ascent as f64 }
}

/// ab_glyph scales by ascent minus descent; SVG `font-size` is the em.
fn em_scale<F: Font>(font: &F, size_pt: f64) -> PxScale {
    let size = size_pt as f32;
    match font.units_per_em() {
        Some(upm) if upm > 0.0 => PxScale::from(size * font.height_unscaled() / upm),
        _ => PxScale::from(size),
    }
}

/// Measure text with a TextStyle, selecting the face from weight and style.
pub fn measure_styled(fonts: &FontHandle, text: &str, style: &TextStyle) -> TextMetrics {
    match fonts.select(style.weight, style.style) {
        Some(font) => measure_text(font, text, style.size),
        None => estimate_text(text, style),
    }
}

/// Average advance per character, in em, for a proportional sans-serif face.
const REGULAR_ADVANCE_EM: f64 = 0.55;
const BOLD_ADVANCE_EM: f64 = 0.6;

/// Character-count estimate for when no system face is available.
pub fn estimate_text(text: &str, style: &TextStyle) -> TextMetrics {
    let em = match style.weight {
        FontWeight::Bold => BOLD_ADVANCE_EM,
        FontWeight::Regular => REGULAR_ADVANCE_EM,
    };
    let units: f64 = text
        .chars()
        .map(|c| match c {
            'i' | 'l' | 'j' | 't' | 'f' | 'r' | '.' | ',' | ':' | ';' | '\'' | '|' | '!' | ' ' => {
                0.5
            }
            'm' | 'w' | 'M' | 'W' => 1.4,
            _ => 1.0,
        })
        .sum();
    TextMetrics {
        width: units * em * style.size,
        height: style.size * 1.2,
        ascent: style.size * 0.8,
    }
}
