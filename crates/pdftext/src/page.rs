//! Page type for accessing extracted content from a PDF page.

use pdftext_core::{
    Char, ExtractWarning, TextLine, TextOptions, Word, WordExtractor, WordOptions,
    cluster_words_into_lines, extract_text,
};

/// A single interpreted page.
///
/// Holds the chars found in the page's content streams and any non-fatal
/// warnings raised while interpreting them.
#[derive(Debug, Clone)]
pub struct Page {
    /// Page index (0-based).
    index: usize,
    /// Page width in points.
    width: f64,
    /// Page height in points.
    height: f64,
    chars: Vec<Char>,
    warnings: Vec<ExtractWarning>,
}

impl Page {
    pub fn new(
        index: usize,
        width: f64,
        height: f64,
        chars: Vec<Char>,
        warnings: Vec<ExtractWarning>,
    ) -> Self {
        Self {
            index,
            width,
            height,
            chars,
            warnings,
        }
    }

    /// Returns the page index (0-based).
    pub fn index(&self) -> usize {
        self.index
    }

    /// Returns the 1-based page number.
    pub fn page_number(&self) -> usize {
        self.index + 1
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    /// Chars in content stream order.
    pub fn chars(&self) -> &[Char] {
        &self.chars
    }

    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Extract words from this page.
    pub fn extract_words(&self, options: &WordOptions) -> Vec<Word> {
        WordExtractor::extract(&self.chars, options)
    }

    /// Extract words and group them into lines, top to bottom.
    pub fn extract_text_lines(&self, options: &TextOptions) -> Vec<TextLine> {
        let words = self.extract_words(&options.word_options());
        cluster_words_into_lines(&words, options.y_tolerance)
    }

    /// Extract the page text: words joined by spaces, lines by newlines.
    /// Returns an empty string when the page has no text.
    pub fn extract_text(&self, options: &TextOptions) -> String {
        extract_text(&self.chars, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pdftext_core::{BBox, TextDirection};

    fn make_char(text: &str, x0: f64, top: f64) -> Char {
        Char {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x0 + 6.0, top + 10.0),
            fontname: "TestFont".to_string(),
            size: 10.0,
            upright: true,
            direction: TextDirection::Ltr,
            char_code: 0,
        }
    }

    fn hello_world_page() -> Page {
        let mut chars = Vec::new();
        for (i, c) in "Hello".chars().enumerate() {
            chars.push(make_char(&c.to_string(), 10.0 + 6.0 * i as f64, 100.0));
        }
        for (i, c) in "World".chars().enumerate() {
            chars.push(make_char(&c.to_string(), 10.0 + 6.0 * i as f64, 120.0));
        }
        Page::new(0, 612.0, 792.0, chars, Vec::new())
    }

    #[test]
    fn accessors() {
        let page = hello_world_page();
        assert_eq!(page.index(), 0);
        assert_eq!(page.page_number(), 1);
        assert_eq!(page.width(), 612.0);
        assert_eq!(page.height(), 792.0);
        assert_eq!(page.chars().len(), 10);
        assert!(page.warnings().is_empty());
    }

    #[test]
    fn text_by_lines() {
        let page = hello_world_page();
        assert_eq!(page.extract_text(&TextOptions::default()), "Hello\nWorld");
    }

    #[test]
    fn words_and_lines() {
        let page = hello_world_page();
        let words = page.extract_words(&WordOptions::default());
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "World");

        let lines = page.extract_text_lines(&TextOptions::default());
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "Hello");
    }

    #[test]
    fn empty_page_has_empty_text() {
        let page = Page::new(3, 612.0, 792.0, Vec::new(), Vec::new());
        assert_eq!(page.extract_text(&TextOptions::default()), "");
        assert!(page.extract_words(&WordOptions::default()).is_empty());
    }
}
