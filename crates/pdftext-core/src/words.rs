use crate::geometry::BBox;
use crate::text::{Char, TextDirection, is_cjk_text};

/// Options for word extraction.
#[derive(Debug, Clone, PartialEq)]
pub struct WordOptions {
    /// Maximum horizontal gap between two chars of the same word.
    pub x_tolerance: f64,
    /// Maximum difference in `top` between two chars of the same line.
    pub y_tolerance: f64,
    /// Keep whitespace chars inside words instead of splitting on them.
    pub keep_blank_chars: bool,
    /// Keep content stream order instead of sorting chars spatially.
    pub use_text_flow: bool,
    /// Expand Latin ligatures (U+FB00–U+FB06) into their letters.
    pub expand_ligatures: bool,
}

impl Default for WordOptions {
    fn default() -> Self {
        Self {
            x_tolerance: 3.0,
            y_tolerance: 3.0,
            keep_blank_chars: false,
            use_text_flow: false,
            expand_ligatures: true,
        }
    }
}

/// A word extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Word {
    pub text: String,
    /// Union of the bounding boxes of the word's chars.
    pub bbox: BBox,
    pub upright: bool,
    pub direction: TextDirection,
}

/// Groups chars into words by spatial proximity.
pub struct WordExtractor;

impl WordExtractor {
    /// Extract words from `chars`.
    ///
    /// Unless `use_text_flow` is set, chars are first clustered into lines by
    /// `top` and sorted left-to-right within each line. A char starts a new
    /// word when the horizontal gap to the previous char exceeds the
    /// tolerance or its `top` moves by more than `y_tolerance`. CJK chars
    /// widen the horizontal tolerance to the previous char's width.
    pub fn extract(chars: &[Char], options: &WordOptions) -> Vec<Word> {
        if chars.is_empty() {
            return Vec::new();
        }

        let ordered: Vec<&Char> = if options.use_text_flow {
            chars.iter().collect()
        } else {
            cluster_chars_into_lines(chars, options.y_tolerance)
                .into_iter()
                .flatten()
                .collect()
        };

        let mut words = Vec::new();
        let mut current: Vec<&Char> = Vec::new();

        for ch in ordered {
            if ch.is_blank() && !options.keep_blank_chars {
                if !current.is_empty() {
                    words.push(Self::make_word(&current, options.expand_ligatures));
                    current.clear();
                }
                continue;
            }

            if let Some(last) = current.last() {
                if Self::begins_new_word(last, ch, options) {
                    words.push(Self::make_word(&current, options.expand_ligatures));
                    current.clear();
                }
            }
            current.push(ch);
        }

        if !current.is_empty() {
            words.push(Self::make_word(&current, options.expand_ligatures));
        }

        words
    }

    fn effective_x_tolerance(last: &Char, current: &Char, base: f64) -> f64 {
        if is_cjk_text(&last.text) || is_cjk_text(&current.text) {
            last.bbox.width().max(base)
        } else {
            base
        }
    }

    /// A char starts a new word when it lies entirely left of the previous
    /// char, when the x-gap between them exceeds the tolerance, or when its
    /// `top` moves by more than `y_tolerance`. The gap is zero when the two
    /// touch or overlap, so a char drawn twice for fake bold stays in one
    /// word.
    fn begins_new_word(last: &Char, current: &Char, options: &WordOptions) -> bool {
        if current.bbox.x1 < last.bbox.x0 {
            return true;
        }
        let x_gap =
            (last.bbox.x0.max(current.bbox.x0) - last.bbox.x1.min(current.bbox.x1)).max(0.0);
        let y_diff = (current.bbox.top - last.bbox.top).abs();
        let x_tol = Self::effective_x_tolerance(last, current, options.x_tolerance);
        x_gap > x_tol || y_diff > options.y_tolerance
    }

    fn make_word(chars: &[&Char], expand_ligatures: bool) -> Word {
        let raw: String = chars.iter().map(|c| c.text.as_str()).collect();
        let text = if expand_ligatures {
            expand_ligatures_in_text(&raw)
        } else {
            raw
        };
        let first = chars[0];
        let bbox = chars
            .iter()
            .skip(1)
            .fold(first.bbox, |acc, c| acc.union(&c.bbox));
        Word {
            text,
            bbox,
            upright: chars.iter().all(|c| c.upright),
            direction: first.direction,
        }
    }
}

/// Cluster chars into lines by `top`.
///
/// Chars are sorted by `top`; a new line starts whenever a char's `top`
/// exceeds the previous char's `top` by more than `tolerance`. Lines come
/// back top-to-bottom with chars sorted by `x0`.
pub fn cluster_chars_into_lines(chars: &[Char], tolerance: f64) -> Vec<Vec<&Char>> {
    let mut sorted: Vec<&Char> = chars.iter().collect();
    sorted.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));

    let mut lines: Vec<Vec<&Char>> = Vec::new();
    let mut last_top: Option<f64> = None;
    for ch in sorted {
        match (last_top, lines.last_mut()) {
            (Some(top), Some(line)) if ch.bbox.top - top <= tolerance => line.push(ch),
            _ => lines.push(vec![ch]),
        }
        last_top = Some(ch.bbox.top);
    }

    for line in &mut lines {
        line.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }
    lines
}

fn expand_ligatures_in_text(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{FB00}' => result.push_str("ff"),
            '\u{FB01}' => result.push_str("fi"),
            '\u{FB02}' => result.push_str("fl"),
            '\u{FB03}' => result.push_str("ffi"),
            '\u{FB04}' => result.push_str("ffl"),
            '\u{FB05}' => result.push_str("\u{017F}t"),
            '\u{FB06}' => result.push_str("st"),
            _ => result.push(ch),
        }
    }
    result
}
