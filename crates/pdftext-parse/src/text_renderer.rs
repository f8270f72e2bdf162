//! Text showing operators (`Tj`, `TJ`, `'`, `"`).
//!
//! Splits strings into character codes, records the text matrix each glyph
//! is drawn with, and advances the pen:
//!
//! `tx = ((w0 / 1000) * Tfs + Tc + Tw) * Th`
//!
//! where `Tw` applies only to the single-byte code 32.

use crate::text_state::TextState;

/// A glyph produced by a text showing operator, before font lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct RawChar {
    pub char_code: u32,
    /// Glyph width in glyph space (1/1000 of text space).
    pub width: f64,
    /// Text matrix at the time the glyph is drawn.
    pub text_matrix: [f64; 6],
}

/// An element of a `TJ` array.
#[derive(Debug, Clone, PartialEq)]
pub enum TjElement {
    String(Vec<u8>),
    /// Positioning adjustment in thousandths of text space; positive
    /// values move the pen left.
    Adjustment(f64),
}

/// Number of bytes per character code in a shown string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeWidth {
    #[default]
    OneByte,
    /// Type0 fonts with Identity-H/V style 2-byte encodings.
    TwoByte,
}

impl CodeWidth {
    /// Split string bytes into character codes. A trailing odd byte of a
    /// two-byte string becomes its own code.
    pub fn codes(self, bytes: &[u8]) -> Vec<u32> {
        match self {
            CodeWidth::OneByte => bytes.iter().map(|&b| u32::from(b)).collect(),
            CodeWidth::TwoByte => bytes
                .chunks(2)
                .map(|pair| match pair {
                    [hi, lo] => (u32::from(*hi) << 8) | u32::from(*lo),
                    [single] => u32::from(*single),
                    _ => 0,
                })
                .collect(),
        }
    }
}

/// `Tj`: show a string and advance the pen after each glyph.
pub fn show_string(
    text_state: &mut TextState,
    bytes: &[u8],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let codes = code_width.codes(bytes);
    let mut chars = Vec::with_capacity(codes.len());

    for char_code in codes {
        let m = text_state.text_matrix();
        let text_matrix = [m.a, m.b, m.c, m.d, m.e, m.f];

        let w0 = get_width(char_code);
        let params = &text_state.params;
        let word_spacing = if code_width == CodeWidth::OneByte && char_code == 32 {
            params.word_spacing
        } else {
            0.0
        };
        let tx = ((w0 / 1000.0) * params.font_size + params.char_spacing + word_spacing)
            * text_state.h_scaling_normalized();

        chars.push(RawChar {
            char_code,
            width: w0,
            text_matrix,
        });
        text_state.advance_text_position(tx);
    }

    chars
}

/// `TJ`: show strings interleaved with positioning adjustments.
pub fn show_positioned(
    text_state: &mut TextState,
    elements: &[TjElement],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    let mut chars = Vec::new();
    for element in elements {
        match element {
            TjElement::String(bytes) => {
                chars.extend(show_string(text_state, bytes, code_width, get_width));
            }
            TjElement::Adjustment(adj) => {
                let tx =
                    -(adj / 1000.0) * text_state.params.font_size * text_state.h_scaling_normalized();
                text_state.advance_text_position(tx);
            }
        }
    }
    chars
}

/// `'`: move to the next line, then show the string.
pub fn quote_show_string(
    text_state: &mut TextState,
    bytes: &[u8],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    text_state.move_to_next_line();
    show_string(text_state, bytes, code_width, get_width)
}

/// `"`: set word and char spacing, then behave like `'`.
pub fn double_quote_show_string(
    text_state: &mut TextState,
    word_spacing: f64,
    char_spacing: f64,
    bytes: &[u8],
    code_width: CodeWidth,
    get_width: &dyn Fn(u32) -> f64,
) -> Vec<RawChar> {
    text_state.params.word_spacing = word_spacing;
    text_state.params.char_spacing = char_spacing;
    quote_show_string(text_state, bytes, code_width, get_width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdftext_core::Ctm;

    fn constant_width(_code: u32) -> f64 {
        600.0
    }

    fn state_at(x: f64, y: f64, size: f64) -> TextState {
        let mut ts = TextState::new();
        ts.begin_text();
        ts.params.font_size = size;
        ts.set_text_matrix(Ctm::new(1.0, 0.0, 0.0, 1.0, x, y));
        ts
    }

    fn assert_approx(actual: f64, expected: f64) {
        assert!(
            (actual - expected).abs() < 1e-9,
            "expected {expected}, got {actual}"
        );
    }

    #[test]
    fn one_byte_codes() {
        assert_eq!(CodeWidth::OneByte.codes(b"AB"), vec![65, 66]);
    }

    #[test]
    fn two_byte_codes() {
        assert_eq!(
            CodeWidth::TwoByte.codes(&[0x00, 0x41, 0x4E, 0x2D, 0x07]),
            vec![0x41, 0x4E2D, 0x07]
        );
    }

    #[test]
    fn tj_advances_per_glyph() {
        let mut ts = state_at(72.0, 720.0, 12.0);
        let chars = show_string(&mut ts, b"ABC", CodeWidth::OneByte, &constant_width);
        assert_eq!(chars.len(), 3);
        assert_approx(chars[0].text_matrix[4], 72.0);
        assert_approx(chars[1].text_matrix[4], 79.2);
        assert_approx(chars[2].text_matrix[4], 86.4);
        assert_approx(ts.text_matrix().e, 93.6);
        assert_eq!(chars[0].width, 600.0);
    }

    #[test]
    fn char_and_word_spacing() {
        let mut ts = state_at(0.0, 0.0, 10.0);
        ts.params.char_spacing = 1.0;
        ts.params.word_spacing = 5.0;
        let chars = show_string(&mut ts, b"A B", CodeWidth::OneByte, &constant_width);
        // A: 6 + 1, space: 6 + 1 + 5, B starts at 19
        assert_approx(chars[1].text_matrix[4], 7.0);
        assert_approx(chars[2].text_matrix[4], 19.0);
    }

    #[test]
    fn word_spacing_ignored_for_two_byte_codes() {
        let mut ts = state_at(0.0, 0.0, 10.0);
        ts.params.word_spacing = 5.0;
        let chars = show_string(
            &mut ts,
            &[0x00, 0x20, 0x00, 0x41],
            CodeWidth::TwoByte,
            &constant_width,
        );
        assert_eq!(chars[0].char_code, 32);
        assert_approx(chars[1].text_matrix[4], 6.0);
    }

    #[test]
    fn horizontal_scaling() {
        let mut ts = state_at(0.0, 0.0, 10.0);
        ts.params.h_scaling = 50.0;
        show_string(&mut ts, b"A", CodeWidth::OneByte, &constant_width);
        assert_approx(ts.text_matrix().e, 3.0);
    }

    #[test]
    fn tj_array_adjustments() {
        let mut ts = state_at(0.0, 0.0, 12.0);
        let elements = vec![
            TjElement::String(b"AB".to_vec()),
            TjElement::Adjustment(-200.0),
            TjElement::String(b"CD".to_vec()),
        ];
        let chars = show_positioned(&mut ts, &elements, CodeWidth::OneByte, &constant_width);
        assert_eq!(chars.len(), 4);
        // AB ends at 14.4; -200 moves right by 2.4
        assert_approx(chars[2].text_matrix[4], 16.8);
    }

    #[test]
    fn positive_adjustment_moves_left() {
        let mut ts = state_at(100.0, 0.0, 10.0);
        show_positioned(
            &mut ts,
            &[TjElement::Adjustment(500.0)],
            CodeWidth::OneByte,
            &constant_width,
        );
        assert_approx(ts.text_matrix().e, 95.0);
    }

    #[test]
    fn quote_moves_to_next_line() {
        let mut ts = state_at(50.0, 700.0, 10.0);
        ts.params.leading = 14.0;
        let chars = quote_show_string(&mut ts, b"X", CodeWidth::OneByte, &constant_width);
        assert_approx(chars[0].text_matrix[4], 50.0);
        assert_approx(chars[0].text_matrix[5], 686.0);
    }

    #[test]
    fn double_quote_sets_spacing() {
        let mut ts = state_at(0.0, 100.0, 10.0);
        ts.params.leading = 10.0;
        let chars =
            double_quote_show_string(&mut ts, 3.0, 1.0, b"A B", CodeWidth::OneByte, &constant_width);
        assert_eq!(ts.params.word_spacing, 3.0);
        assert_eq!(ts.params.char_spacing, 1.0);
        assert_approx(chars[0].text_matrix[5], 90.0);
        assert_approx(chars[2].text_matrix[4], 17.0);
    }
}
