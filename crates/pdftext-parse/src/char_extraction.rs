//! Char bounding box calculation from interpreter events.
//!
//! Combines the font size, text matrix, CTM and font ascent/descent into a
//! glyph box, then flips it into top-left origin page coordinates.

use pdftext_core::{BBox, Char, Ctm, Point, TextDirection};

use crate::handler::CharEvent;

/// Convert a [`CharEvent`] into a [`Char`] positioned on a page of the given
/// height.
///
/// The text rendering matrix is `[size*Th 0 0 size 0 rise] × Tm × CTM`. The
/// glyph box spans `[0, width/1000]` horizontally and
/// `[descent/1000, ascent/1000]` vertically in glyph space. PDF space has a
/// bottom-left origin, so `top = page_height - max_y`.
pub fn char_from_event(event: &CharEvent, page_height: f64) -> Char {
    let font_size = event.font_size;

    let font_matrix = Ctm::new(
        font_size * event.h_scaling,
        0.0,
        0.0,
        font_size,
        0.0,
        event.rise,
    );
    let tm = Ctm::from_array(event.text_matrix);
    let ctm = Ctm::from_array(event.ctm);
    let trm = font_matrix.concat(&tm).concat(&ctm);

    // Visual extent only; Tc/Tw move the pen but do not widen the glyph.
    let w_norm = event.displacement / 1000.0;
    let ascent_norm = event.ascent / 1000.0;
    let descent_norm = event.descent / 1000.0;

    let corners = [
        trm.transform_point(Point::new(0.0, descent_norm)),
        trm.transform_point(Point::new(w_norm, descent_norm)),
        trm.transform_point(Point::new(w_norm, ascent_norm)),
        trm.transform_point(Point::new(0.0, ascent_norm)),
    ];

    let min_x = corners.iter().map(|p| p.x).fold(f64::INFINITY, f64::min);
    let max_x = corners.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max);
    let min_y = corners.iter().map(|p| p.y).fold(f64::INFINITY, f64::min);
    let max_y = corners.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max);

    let bbox = BBox::new(min_x, page_height - max_y, max_x, page_height - min_y);

    let upright = trm.b.abs() < 1e-6 && trm.c.abs() < 1e-6;

    let direction = if trm.a.abs() >= trm.b.abs() {
        if trm.a >= 0.0 {
            TextDirection::Ltr
        } else {
            TextDirection::Rtl
        }
    } else if trm.b > 0.0 {
        TextDirection::Btt
    } else {
        TextDirection::Ttb
    };

    // unmapped codes keep their code point unless it is a control char
    let text = event.unicode.clone().unwrap_or_else(|| {
        char::from_u32(event.char_code)
            .filter(|c| !c.is_control())
            .map(|c| c.to_string())
            .unwrap_or_else(|| "\u{FFFD}".to_string())
    });

    Char {
        text,
        bbox,
        fontname: event.font_name.clone(),
        size: font_size,
        upright,
        direction,
        char_code: event.char_code,
    }
}
