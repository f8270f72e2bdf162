//! Integration tests for whole-document text extraction.
//!
//! Test PDFs are created programmatically using lopdf and, where a path is
//! needed, written to temporary files.

use std::io::Write;

use pdftext::{
    ExtractError, ExtractOptions, Pdf, PdfError, TextExtractor, TextOptions,
    extract_text_with_spacing,
};

// --- Test PDF creation helpers ---

/// Create a PDF with one page per content stream. All pages share a
/// WinAnsi-encoded Courier font named F1 (every glyph 600 units wide).
fn pdf_with_contents(contents: &[&[u8]]) -> Vec<u8> {
    use lopdf::{Object, Stream, dictionary};

    let mut doc = lopdf::Document::with_version("1.5");

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
        "Encoding" => "WinAnsiEncoding",
    });

    let media_box = Object::Array(vec![
        Object::Integer(0),
        Object::Integer(0),
        Object::Integer(612),
        Object::Integer(792),
    ]);

    let mut page_ids = Vec::new();
    for content in contents {
        let stream = Stream::new(dictionary! {}, content.to_vec());
        let content_id = doc.add_object(stream);

        let resources = dictionary! {
            "Font" => dictionary! { "F1" => Object::Reference(font_id) },
        };

        let page_dict = dictionary! {
            "Type" => "Page",
            "MediaBox" => media_box.clone(),
            "Contents" => Object::Reference(content_id),
            "Resources" => resources,
        };
        page_ids.push(doc.add_object(page_dict));
    }

    let kids: Vec<Object> = page_ids.iter().map(|id| Object::Reference(*id)).collect();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => Object::Array(kids),
        "Count" => Object::Integer(contents.len() as i64),
    };
    let pages_id = doc.add_object(pages_dict);

    for &pid in &page_ids {
        if let Ok(page_obj) = doc.get_object_mut(pid) {
            if let Ok(dict) = page_obj.as_dict_mut() {
                dict.set("Parent", Object::Reference(pages_id));
            }
        }
    }

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => Object::Reference(pages_id),
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buf = Vec::new();
    doc.save_to(&mut buf).unwrap();
    buf
}

/// One line of text per page; an empty string makes an empty page.
fn pdf_with_pages(texts: &[&str]) -> Vec<u8> {
    let contents: Vec<Vec<u8>> = texts
        .iter()
        .map(|text| {
            if text.is_empty() {
                Vec::new()
            } else {
                format!("BT /F1 12 Tf 72 720 Td ({text}) Tj ET").into_bytes()
            }
        })
        .collect();
    let refs: Vec<&[u8]> = contents.iter().map(Vec::as_slice).collect();
    pdf_with_contents(&refs)
}

fn write_temp_pdf(bytes: &[u8]) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new()
        .suffix(".pdf")
        .tempfile()
        .unwrap();
    file.write_all(bytes).unwrap();
    file.flush().unwrap();
    file
}

// --- Document-level behavior ---

#[test]
fn hello_world_then_empty_page() {
    let file = write_temp_pdf(&pdf_with_pages(&["Hello World", ""]));
    let text = extract_text_with_spacing(file.path(), 2.0).unwrap();
    assert_eq!(text, "Hello World\n");
}

#[test]
fn pages_appear_in_document_order() {
    let bytes = pdf_with_pages(&["First", "Second", "Third", "Fourth"]);
    let text = TextExtractor::new(2.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "First\nSecond\nThird\nFourth\n");
}

#[test]
fn blank_pages_contribute_nothing() {
    let bytes = pdf_with_pages(&["", "Alpha", "", "", "Beta", ""]);
    let text = TextExtractor::new(2.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "Alpha\nBeta\n");
}

#[test]
fn whitespace_only_page_is_blank() {
    let bytes = pdf_with_pages(&["   ", "Text"]);
    let text = TextExtractor::new(2.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "Text\n");
}

#[test]
fn document_without_pages_yields_empty_string() {
    let bytes = pdf_with_contents(&[]);
    let pdf = Pdf::open(&bytes, None).unwrap();
    assert_eq!(pdf.page_count(), 0);
    assert_eq!(TextExtractor::new(2.0).extract_pdf(&pdf).unwrap(), "");
}

#[test]
fn all_blank_pages_yield_empty_string() {
    let bytes = pdf_with_pages(&["", "", ""]);
    assert_eq!(TextExtractor::new(2.0).extract_bytes(&bytes).unwrap(), "");
}

#[test]
fn multi_line_page_keeps_line_breaks() {
    let bytes = pdf_with_contents(&[
        b"BT /F1 12 Tf 72 720 Td (Line one) Tj 0 -20 Td (Line two) Tj ET",
    ]);
    let text = TextExtractor::new(2.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "Line one\nLine two\n");
}

#[test]
fn extraction_is_repeatable() {
    let file = write_temp_pdf(&pdf_with_pages(&["Same", "", "Output"]));
    let extractor = TextExtractor::new(2.0);
    let first = extractor.extract_path(file.path()).unwrap();
    let second = extractor.extract_path(file.path()).unwrap();
    assert_eq!(first, second);
    assert_eq!(first, "Same\nOutput\n");
}

// --- Spacing tolerance ---

/// 12pt Courier glyphs are 7.2pt wide; a -200 adjustment opens a 2.4pt gap.
const KERNED_PAIR: &[u8] = b"BT /F1 12 Tf 72 720 Td [(AB) -200 (CD)] TJ ET";

#[test]
fn gap_wider_than_tolerance_splits_words() {
    let bytes = pdf_with_contents(&[KERNED_PAIR]);
    let text = TextExtractor::new(2.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "AB CD\n");
}

#[test]
fn gap_within_tolerance_joins_words() {
    let bytes = pdf_with_contents(&[KERNED_PAIR]);
    let text = TextExtractor::new(3.0).extract_bytes(&bytes).unwrap();
    assert_eq!(text, "ABCD\n");
}

// --- Page selection ---

#[test]
fn selected_pages_follow_given_order() {
    let bytes = pdf_with_pages(&["one", "two", "three"]);
    let extractor = TextExtractor::new(2.0);
    let pdf = extractor.open_bytes(&bytes).unwrap();
    assert_eq!(extractor.extract_pages(&pdf, &[2, 0]).unwrap(), "three\none\n");

    let texts = extractor.page_texts(&pdf, &[1]).unwrap();
    assert_eq!(texts.len(), 1);
    assert_eq!(texts[0].page, 2);
    assert_eq!(texts[0].text, "two");
}

#[test]
fn out_of_range_selection_is_an_extraction_error() {
    let bytes = pdf_with_pages(&["one"]);
    let extractor = TextExtractor::new(2.0);
    let pdf = extractor.open_bytes(&bytes).unwrap();
    let err = extractor.extract_pages(&pdf, &[4]).unwrap_err();
    assert!(matches!(err, ExtractError::Extraction { page: 5, .. }));
}

// --- Failure modes ---

#[test]
fn nonexistent_path_is_document_open_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.pdf");
    let err = extract_text_with_spacing(&missing, 2.0).unwrap_err();
    match err {
        ExtractError::DocumentOpen { origin, source } => {
            assert!(origin.ends_with("missing.pdf"));
            assert!(matches!(source, PdfError::IoError(_)));
        }
        other => panic!("expected DocumentOpen, got {other:?}"),
    }
}

#[test]
fn invalid_pdf_file_is_document_open_error() {
    let file = write_temp_pdf(b"%PDF-1.4\nthis is not really a pdf");
    let err = extract_text_with_spacing(file.path(), 2.0).unwrap_err();
    assert!(matches!(err, ExtractError::DocumentOpen { .. }));
}

#[test]
fn malformed_page_stream_is_an_extraction_error() {
    let bytes = pdf_with_contents(&[
        b"BT /F1 12 Tf 72 720 Td (Fine) Tj ET",
        b"BT /F1 12 Tf (unterminated Tj ET",
    ]);
    let file = write_temp_pdf(&bytes);
    let err = extract_text_with_spacing(file.path(), 2.0).unwrap_err();
    match err {
        ExtractError::Extraction { page, source } => {
            assert_eq!(page, 2);
            assert!(matches!(source, PdfError::InterpreterError(_)));
        }
        other => panic!("expected Extraction, got {other:?}"),
    }

    // the document itself still opens
    let extractor = TextExtractor::new(2.0);
    let pdf = extractor.open_path(file.path()).unwrap();
    assert_eq!(extractor.extract_pages(&pdf, &[0]).unwrap(), "Fine\n");
}

#[test]
fn page_limit_is_reported_on_open() {
    let bytes = pdf_with_pages(&["a", "b", "c"]);
    let options = ExtractOptions {
        max_pages: Some(2),
        ..ExtractOptions::default()
    };
    let extractor = TextExtractor::with_options(TextOptions::with_x_tolerance(2.0), options);
    let err = extractor.extract_bytes(&bytes).unwrap_err();
    assert!(matches!(
        err.pdf_error(),
        PdfError::ResourceLimitExceeded { .. }
    ));
}
