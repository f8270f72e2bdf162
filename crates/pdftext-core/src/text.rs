use crate::geometry::BBox;

/// A single character extracted from a PDF page.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Char {
    /// Unicode text of the glyph. Usually one scalar value, but ToUnicode
    /// maps may expand a single code into several (ligatures).
    pub text: String,
    /// Bounding box in top-left origin page coordinates.
    pub bbox: BBox,
    /// Font name with any subset prefix removed.
    pub fontname: String,
    /// Font size in text space units.
    pub size: f64,
    /// Whether the glyph is drawn without rotation or shear.
    pub upright: bool,
    pub direction: TextDirection,
    /// Raw character code from the content stream.
    pub char_code: u32,
}

impl Char {
    /// Returns `true` if the text is whitespace only (or empty).
    pub fn is_blank(&self) -> bool {
        self.text.chars().all(char::is_whitespace)
    }
}

/// Text flow direction of a glyph, derived from its rendering matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TextDirection {
    #[default]
    Ltr,
    Rtl,
    Ttb,
    Btt,
}

/// Returns `true` if the character is a CJK ideograph, syllable, or kana.
pub fn is_cjk(c: char) -> bool {
    matches!(c,
        '\u{4E00}'..='\u{9FFF}'
        | '\u{3400}'..='\u{4DBF}'
        | '\u{F900}'..='\u{FAFF}'
        | '\u{3040}'..='\u{309F}'
        | '\u{30A0}'..='\u{30FF}'
        | '\u{AC00}'..='\u{D7AF}'
        | '\u{1100}'..='\u{11FF}'
        | '\u{3100}'..='\u{312F}'
        | '\u{2E80}'..='\u{2EFF}'
        | '\u{2F00}'..='\u{2FDF}'
        | '\u{20000}'..='\u{2A6DF}'
    )
}

/// Returns `true` if the first character of the text is CJK.
pub fn is_cjk_text(text: &str) -> bool {
    text.chars().next().is_some_and(is_cjk)
}
