use std::error::Error;

use pdftext::{ExtractOptions, Pdf, TextExtractor, TextOptions};

use crate::cli::{Cli, TextFormat};
use crate::page_range::parse_page_range;

/// Print the text of the selected pages of `cli.file`.
///
/// Errors are reported on stderr; the returned code is the exit status.
pub fn run(cli: &Cli) -> Result<(), i32> {
    let extractor = build_extractor(cli);
    let pdf = extractor.open_path(&cli.file).map_err(|e| report(&e))?;

    let indices = match cli.pages.as_deref() {
        Some(range) => Some(parse_page_range(range, pdf.page_count()).map_err(|e| {
            eprintln!("Error: {e}");
            1
        })?),
        None => None,
    };

    match cli.format {
        TextFormat::Text => {
            if cli.info {
                print_info(&pdf);
            }
            let text = match &indices {
                Some(indices) => extractor.extract_pages(&pdf, indices),
                None => extractor.extract_pdf(&pdf),
            }
            .map_err(|e| report(&e))?;
            println!("{text}");
        }
        TextFormat::Json => {
            let indices = indices.unwrap_or_else(|| (0..pdf.page_count()).collect());
            let pages = extractor
                .page_texts(&pdf, &indices)
                .map_err(|e| report(&e))?;
            let text: String = pages
                .iter()
                .filter(|p| !p.text.is_empty())
                .map(|p| format!("{}\n", p.text))
                .collect();
            let mut obj = serde_json::json!({
                "text": text,
                "pages": pages,
            });
            if cli.info {
                obj["page_count"] = serde_json::json!(pdf.page_count());
                obj["metadata"] = serde_json::json!(pdf.metadata());
            }
            let out = serde_json::to_string(&obj).map_err(|e| {
                eprintln!("Error: failed to serialize output: {e}");
                1
            })?;
            println!("{out}");
        }
    }

    Ok(())
}

fn build_extractor(cli: &Cli) -> TextExtractor {
    let text_options = TextOptions {
        x_tolerance: cli.x_tolerance,
        y_tolerance: cli.y_tolerance,
        ..TextOptions::default()
    };
    let extract_options = ExtractOptions {
        unicode_norm: cli
            .unicode_norm
            .as_ref()
            .map(|n| n.to_unicode_norm())
            .unwrap_or_default(),
        ..ExtractOptions::default()
    };
    let extractor = TextExtractor::with_options(text_options, extract_options);
    match &cli.password {
        Some(password) => extractor.with_password(password.as_bytes()),
        None => extractor,
    }
}

fn print_info(pdf: &Pdf) {
    println!("Pages: {}", pdf.page_count());
    for (key, value) in pdf.metadata().entries() {
        println!("{key}: {value}");
    }
    println!();
}

/// Print an error and its causes to stderr.
fn report(err: &dyn Error) -> i32 {
    eprintln!("Error: {err}");
    let mut source = err.source();
    while let Some(cause) = source {
        eprintln!("  caused by: {cause}");
        source = cause.source();
    }
    1
}
