//! Glyph widths and vertical metrics of PDF fonts.
//!
//! Simple fonts carry `/FirstChar` and `/Widths`; CID fonts carry `/W` and
//! `/DW` on their descendant. Ascent, descent and the missing width come
//! from `/FontDescriptor`. Standard 14 fonts without `/Widths` fall back to
//! a fixed width.

use lopdf::{Dictionary, Document, Object};

use crate::objects::{get_array, get_dict, get_number, number, numbers, resolve};

const DEFAULT_ASCENT: f64 = 750.0;
const DEFAULT_DESCENT: f64 = -250.0;
const DEFAULT_WIDTH: f64 = 600.0;
const DEFAULT_CID_WIDTH: f64 = 1000.0;

#[derive(Debug, Clone, PartialEq)]
enum WidthTable {
    Simple { first_char: u32, widths: Vec<f64> },
    /// Inclusive `(first, last, width)` ranges from a `/W` array.
    Cid(Vec<(u32, u32, f64)>),
}

/// Widths and vertical metrics of one font, in glyph space units
/// (1/1000 of text space).
#[derive(Debug, Clone, PartialEq)]
pub struct FontMetrics {
    widths: WidthTable,
    missing_width: f64,
    ascent: f64,
    descent: f64,
    /// Multiplier from the font's own width units to 1/1000 text space.
    /// Only Type3 fonts differ from 1.
    width_scale: f64,
}

impl Default for FontMetrics {
    fn default() -> Self {
        Self {
            widths: WidthTable::Simple {
                first_char: 0,
                widths: Vec::new(),
            },
            missing_width: DEFAULT_WIDTH,
            ascent: DEFAULT_ASCENT,
            descent: DEFAULT_DESCENT,
            width_scale: 1.0,
        }
    }
}

impl FontMetrics {
    pub fn simple(first_char: u32, widths: Vec<f64>, missing_width: f64) -> Self {
        Self {
            widths: WidthTable::Simple { first_char, widths },
            missing_width,
            ..Self::default()
        }
    }

    pub fn cid(ranges: Vec<(u32, u32, f64)>, default_width: f64) -> Self {
        Self {
            widths: WidthTable::Cid(ranges),
            missing_width: default_width,
            ..Self::default()
        }
    }

    pub fn with_vertical(mut self, ascent: f64, descent: f64) -> Self {
        self.ascent = ascent;
        self.descent = descent;
        self
    }

    pub fn with_width_scale(mut self, scale: f64) -> Self {
        self.width_scale = scale;
        self
    }

    /// Width of `code` in glyph space units.
    pub fn get_width(&self, code: u32) -> f64 {
        let raw = match &self.widths {
            WidthTable::Simple { first_char, widths } => code
                .checked_sub(*first_char)
                .and_then(|i| widths.get(i as usize))
                .copied(),
            WidthTable::Cid(ranges) => ranges
                .iter()
                .find(|(first, last, _)| (*first..=*last).contains(&code))
                .map(|(_, _, w)| *w),
        };
        raw.unwrap_or(self.missing_width) * self.width_scale
    }

    pub fn ascent(&self) -> f64 {
        self.ascent
    }

    pub fn descent(&self) -> f64 {
        self.descent
    }
}

/// Metrics of a simple (Type1, TrueType, Type3) font dictionary.
pub fn simple_font_metrics(doc: &Document, font_dict: &Dictionary) -> FontMetrics {
    let first_char = get_number(doc, font_dict, b"FirstChar").unwrap_or(0.0).max(0.0) as u32;
    let widths = get_array(doc, font_dict, b"Widths")
        .map(|arr| arr.iter().map(|o| number(resolve(doc, o)).unwrap_or(0.0)).collect())
        .unwrap_or_default();

    let descriptor = get_dict(doc, font_dict, b"FontDescriptor");
    let missing_width = descriptor
        .and_then(|d| get_number(doc, d, b"MissingWidth"))
        .unwrap_or(DEFAULT_WIDTH);

    let (ascent, descent) = vertical_metrics(doc, descriptor);
    FontMetrics::simple(first_char, widths, missing_width).with_vertical(ascent, descent)
}

/// Metrics of a CID font (the descendant of a Type0 font).
pub fn cid_font_metrics(doc: &Document, cid_font: &Dictionary) -> FontMetrics {
    let default_width = get_number(doc, cid_font, b"DW").unwrap_or(DEFAULT_CID_WIDTH);
    let ranges = get_array(doc, cid_font, b"W")
        .map(|w| parse_w_array(doc, w))
        .unwrap_or_default();
    let (ascent, descent) = vertical_metrics(doc, get_dict(doc, cid_font, b"FontDescriptor"));
    FontMetrics::cid(ranges, default_width).with_vertical(ascent, descent)
}

fn vertical_metrics(doc: &Document, descriptor: Option<&Dictionary>) -> (f64, f64) {
    let Some(desc) = descriptor else {
        return (DEFAULT_ASCENT, DEFAULT_DESCENT);
    };
    let ascent = get_number(doc, desc, b"Ascent")
        .filter(|a| *a != 0.0)
        .unwrap_or(DEFAULT_ASCENT);
    let descent = get_number(doc, desc, b"Descent")
        .filter(|d| *d != 0.0)
        .unwrap_or(DEFAULT_DESCENT);
    (ascent, descent)
}

/// Parse a `/W` array, which mixes two forms:
/// `c [w1 w2 …]` assigns consecutive widths starting at `c`, and
/// `c_first c_last w` assigns one width to a range.
pub fn parse_w_array(doc: &Document, items: &[Object]) -> Vec<(u32, u32, f64)> {
    let mut ranges = Vec::new();
    let mut i = 0;
    while i < items.len() {
        let Some(first) = number(resolve(doc, &items[i])) else {
            i += 1;
            continue;
        };
        let first = first.max(0.0) as u32;
        match items.get(i + 1).map(|o| resolve(doc, o)) {
            Some(Object::Array(widths)) => {
                for (offset, w) in numbers(doc, widths).into_iter().enumerate() {
                    let code = first + offset as u32;
                    ranges.push((code, code, w));
                }
                i += 2;
            }
            Some(last) => {
                let last = number(last);
                let width = items.get(i + 2).and_then(|o| number(resolve(doc, o)));
                if let (Some(last), Some(width)) = (last, width) {
                    ranges.push((first, last.max(0.0) as u32, width));
                }
                i += 3;
            }
            None => break,
        }
    }
    ranges
}
