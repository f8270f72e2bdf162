//! Callback trait between the content stream interpreter and char collection.

use pdftext_core::ExtractWarning;

/// A rendered glyph with the positioning context needed to place it.
#[derive(Debug, Clone, PartialEq)]
pub struct CharEvent {
    /// Character code from the content stream.
    pub char_code: u32,
    /// Unicode text resolved through ToUnicode or the font encoding.
    pub unicode: Option<String>,
    /// Font name with any subset prefix removed.
    pub font_name: String,
    pub font_size: f64,
    /// Text matrix at the moment the glyph is drawn.
    pub text_matrix: [f64; 6],
    pub ctm: [f64; 6],
    /// Glyph width in glyph space (1/1000 of text space).
    pub displacement: f64,
    /// Horizontal scaling as a fraction (`Tz 100` is 1.0).
    pub h_scaling: f64,
    pub rise: f64,
    /// Font ascent in glyph space.
    pub ascent: f64,
    /// Font descent in glyph space (usually negative).
    pub descent: f64,
}

/// Receives events while a page is interpreted.
///
/// Both methods default to no-ops.
pub trait ContentHandler {
    /// Called once for each rendered glyph.
    fn on_char(&mut self, _event: CharEvent) {}

    /// Called when interpretation degrades without failing.
    fn on_warning(&mut self, _warning: ExtractWarning) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdftext_core::ExtractWarningCode;

    struct NoopHandler;
    impl ContentHandler for NoopHandler {}

    #[derive(Default)]
    struct CollectingHandler {
        chars: Vec<CharEvent>,
        warnings: Vec<ExtractWarning>,
    }

    impl ContentHandler for CollectingHandler {
        fn on_char(&mut self, event: CharEvent) {
            self.chars.push(event);
        }

        fn on_warning(&mut self, warning: ExtractWarning) {
            self.warnings.push(warning);
        }
    }

    fn sample_event() -> CharEvent {
        CharEvent {
            char_code: 65,
            unicode: Some("A".to_string()),
            font_name: "Helvetica".to_string(),
            font_size: 12.0,
            text_matrix: [1.0, 0.0, 0.0, 1.0, 72.0, 720.0],
            ctm: [1.0, 0.0, 0.0, 1.0, 0.0, 0.0],
            displacement: 667.0,
            h_scaling: 1.0,
            rise: 0.0,
            ascent: 718.0,
            descent: -207.0,
        }
    }

    #[test]
    fn noop_handler_accepts_events() {
        let mut handler = NoopHandler;
        handler.on_char(sample_event());
        handler.on_warning(ExtractWarning::with_code(
            ExtractWarningCode::MissingFont,
            "missing",
        ));
    }

    #[test]
    fn collecting_handler_records_in_order() {
        let mut handler = CollectingHandler::default();
        let mut second = sample_event();
        second.char_code = 66;
        handler.on_char(sample_event());
        handler.on_char(second);
        handler.on_warning(ExtractWarning::with_code(
            ExtractWarningCode::MalformedObject,
            "bad",
        ));
        assert_eq!(handler.chars.len(), 2);
        assert_eq!(handler.chars[0].char_code, 65);
        assert_eq!(handler.chars[1].char_code, 66);
        assert_eq!(handler.warnings.len(), 1);
    }

    #[test]
    fn handler_usable_as_trait_object() {
        let mut handler = CollectingHandler::default();
        let dyn_handler: &mut dyn ContentHandler = &mut handler;
        dyn_handler.on_char(sample_event());
        assert_eq!(handler.chars.len(), 1);
    }
}
