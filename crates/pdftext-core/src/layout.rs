use crate::geometry::BBox;
use crate::text::Char;
use crate::words::{Word, WordExtractor, WordOptions};

/// A text line: words sharing the same vertical position.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TextLine {
    /// Words in this line, sorted left-to-right.
    pub words: Vec<Word>,
    pub bbox: BBox,
}

impl TextLine {
    /// Words joined by a single space.
    pub fn text(&self) -> String {
        self.words
            .iter()
            .map(|w| w.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Options for plain text extraction from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct TextOptions {
    /// Maximum horizontal gap between chars of one word (in points).
    pub x_tolerance: f64,
    /// Vertical tolerance for grouping chars and words into lines (in points).
    pub y_tolerance: f64,
    pub keep_blank_chars: bool,
    pub use_text_flow: bool,
    pub expand_ligatures: bool,
}

impl Default for TextOptions {
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

impl TextOptions {
    /// Default options with the given horizontal tolerance.
    pub fn with_x_tolerance(x_tolerance: f64) -> Self {
        Self {
            x_tolerance,
            ..Self::default()
        }
    }

    /// The word-level subset of these options.
    pub fn word_options(&self) -> WordOptions {
        WordOptions {
            x_tolerance: self.x_tolerance,
            y_tolerance: self.y_tolerance,
            keep_blank_chars: self.keep_blank_chars,
            use_text_flow: self.use_text_flow,
            expand_ligatures: self.expand_ligatures,
        }
    }
}

/// Cluster words into text lines by `top`.
///
/// Words are sorted by `top`; a word joins the current line when its `top`
/// is within `y_tolerance` of the previous word's `top`. Words in each line
/// are then sorted left-to-right.
pub fn cluster_words_into_lines(words: &[Word], y_tolerance: f64) -> Vec<TextLine> {
    let mut sorted: Vec<&Word> = words.iter().collect();
    sorted.sort_by(|a, b| a.bbox.top.total_cmp(&b.bbox.top));

    let mut lines: Vec<TextLine> = Vec::new();
    let mut last_top: Option<f64> = None;

    for word in sorted {
        match (last_top, lines.last_mut()) {
            (Some(top), Some(line)) if word.bbox.top - top <= y_tolerance => {
                line.bbox = line.bbox.union(&word.bbox);
                line.words.push(word.clone());
            }
            _ => lines.push(TextLine {
                words: vec![word.clone()],
                bbox: word.bbox,
            }),
        }
        last_top = Some(word.bbox.top);
    }

    for line in &mut lines {
        line.words.sort_by(|a, b| a.bbox.x0.total_cmp(&b.bbox.x0));
    }

    lines
}

/// Join words into text: a space between words, a newline between lines.
pub fn words_to_text(words: &[Word], y_tolerance: f64) -> String {
    cluster_words_into_lines(words, y_tolerance)
        .iter()
        .map(TextLine::text)
        .collect::<Vec<_>>()
        .join("\n")
}

/// Words kept in content stream order, joined line by line.
///
/// A new line starts whenever a word's `top` moves by more than
/// `y_tolerance` from the previous word.
fn words_to_text_in_flow(words: &[Word], y_tolerance: f64) -> String {
    let mut out = String::new();
    let mut prev_top: Option<f64> = None;
    for word in words {
        if let Some(top) = prev_top {
            if (word.bbox.top - top).abs() > y_tolerance {
                out.push('\n');
            } else {
                out.push(' ');
            }
        }
        out.push_str(&word.text);
        prev_top = Some(word.bbox.top);
    }
    out
}

/// Extract plain text from a page's chars.
///
/// Returns an empty string when the chars produce no words.
pub fn extract_text(chars: &[Char], options: &TextOptions) -> String {
    let words = WordExtractor::extract(chars, &options.word_options());
    if options.use_text_flow {
        words_to_text_in_flow(&words, options.y_tolerance)
    } else {
        words_to_text(&words, options.y_tolerance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::TextDirection;

    fn make_word(text: &str, x0: f64, top: f64, x1: f64, bottom: f64) -> Word {
        Word {
            text: text.to_string(),
            bbox: BBox::new(x0, top, x1, bottom),
            upright: true,
            direction: TextDirection::Ltr,
        }
    }

    fn make_chars(text: &str, x0: f64, top: f64, advance: f64) -> Vec<Char> {
        text.chars()
            .enumerate()
            .map(|(i, c)| {
                let left = x0 + advance * i as f64;
                Char {
                    text: c.to_string(),
                    bbox: BBox::new(left, top, left + advance, top + 12.0),
                    fontname: "Helvetica".to_string(),
                    size: 12.0,
                    upright: true,
                    direction: TextDirection::Ltr,
                    char_code: c as u32,
                }
            })
            .collect()
    }

    #[test]
    fn test_text_options_default() {
        let opts = TextOptions::default();
        assert_eq!(opts.x_tolerance, 3.0);
        assert_eq!(opts.y_tolerance, 3.0);
        assert!(opts.expand_ligatures);
        assert!(!opts.use_text_flow);
    }

    #[test]
    fn test_word_options_mirror_text_options() {
        let opts = TextOptions {
            keep_blank_chars: true,
            ..TextOptions::with_x_tolerance(2.0)
        };
        let w = opts.word_options();
        assert_eq!(w.x_tolerance, 2.0);
        assert_eq!(w.y_tolerance, 3.0);
        assert!(w.keep_blank_chars);
    }

    #[test]
    fn test_cluster_empty_words() {
        assert!(cluster_words_into_lines(&[], 3.0).is_empty());
    }

    #[test]
    fn test_cluster_words_same_line_sorted() {
        let words = vec![
            make_word("World", 60.0, 100.5, 100.0, 112.0),
            make_word("Hello", 10.0, 100.0, 50.0, 112.0),
        ];
        let lines = cluster_words_into_lines(&words, 3.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text(), "Hello World");
        assert_eq!(lines[0].bbox, BBox::new(10.0, 100.0, 100.0, 112.0));
    }

    #[test]
    fn test_cluster_words_different_lines() {
        let words = vec![
            make_word("Second", 10.0, 120.0, 60.0, 132.0),
            make_word("First", 10.0, 100.0, 50.0, 112.0),
        ];
        let lines = cluster_words_into_lines(&words, 3.0);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text(), "First");
        assert_eq!(lines[1].text(), "Second");
    }

    #[test]
    fn test_words_to_text_multi_line() {
        let words = vec![
            make_word("Hello", 10.0, 100.0, 50.0, 112.0),
            make_word("World", 60.0, 100.0, 100.0, 112.0),
            make_word("Next", 10.0, 120.0, 40.0, 132.0),
        ];
        assert_eq!(words_to_text(&words, 3.0), "Hello World\nNext");
    }

    #[test]
    fn test_words_to_text_empty() {
        assert_eq!(words_to_text(&[], 3.0), "");
    }

    #[test]
    fn test_extract_text_from_chars() {
        let mut chars = make_chars("Hello", 10.0, 100.0, 6.0);
        chars.extend(make_chars("World", 50.0, 100.0, 6.0));
        chars.extend(make_chars("Bye", 10.0, 130.0, 6.0));
        let text = extract_text(&chars, &TextOptions::default());
        assert_eq!(text, "Hello World\nBye");
    }

    #[test]
    fn test_extract_text_no_chars_is_empty() {
        assert_eq!(extract_text(&[], &TextOptions::default()), "");
    }

    #[test]
    fn test_extract_text_only_blanks_is_empty() {
        let chars = make_chars("   ", 10.0, 100.0, 3.0);
        assert_eq!(extract_text(&chars, &TextOptions::default()), "");
    }

    #[test]
    fn test_extract_text_in_flow_order() {
        let mut chars = make_chars("Two", 10.0, 130.0, 6.0);
        chars.extend(make_chars("One", 10.0, 100.0, 6.0));
        let opts = TextOptions {
            use_text_flow: true,
            ..TextOptions::default()
        };
        assert_eq!(extract_text(&chars, &opts), "Two\nOne");
        assert_eq!(extract_text(&chars, &TextOptions::default()), "One\nTwo");
    }

    #[test]
    fn test_extract_text_in_flow_splits_backward_char() {
        let mut chars = make_chars("A", 20.0, 100.0, 5.0);
        chars.extend(make_chars("B", 14.0, 100.0, 5.0));
        let opts = TextOptions {
            x_tolerance: 2.0,
            use_text_flow: true,
            ..TextOptions::default()
        };
        assert_eq!(extract_text(&chars, &opts), "A B");
    }
}
