use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// Print the text of every page of a PDF document.
///
/// Pages without text are skipped; every other page's text is followed by a
/// newline.
#[derive(Debug, Parser)]
#[command(name = "pdftext", about, version)]
pub struct Cli {
    /// Path to the PDF file
    #[arg(value_name = "FILE")]
    pub file: PathBuf,

    /// Horizontal gap (in points) above which chars start a new word
    #[arg(long, default_value_t = pdftext::DEFAULT_X_TOLERANCE)]
    pub x_tolerance: f64,

    /// Vertical tolerance (in points) for grouping words into lines
    #[arg(long, default_value_t = 3.0)]
    pub y_tolerance: f64,

    /// Page range (e.g. '1,3-5'). Default: all pages
    #[arg(long)]
    pub pages: Option<String>,

    /// Password for encrypted PDFs
    #[arg(long)]
    pub password: Option<String>,

    /// Apply Unicode normalization to extracted text
    #[arg(long, value_enum)]
    pub unicode_norm: Option<UnicodeNormArg>,

    /// Output format
    #[arg(long, value_enum, default_value_t = TextFormat::Text)]
    pub format: TextFormat,

    /// Print page count and document metadata before the text
    #[arg(long)]
    pub info: bool,
}

/// Output format.
#[derive(Debug, Clone, PartialEq, ValueEnum)]
pub enum TextFormat {
    /// Concatenated page text
    Text,
    /// One JSON object with per-page text
    Json,
}

/// Unicode normalization form for CLI arguments.
#[derive(Debug, Clone, ValueEnum)]
pub enum UnicodeNormArg {
    /// Canonical Decomposition, followed by Canonical Composition
    Nfc,
    /// Canonical Decomposition
    Nfd,
    /// Compatibility Decomposition, followed by Canonical Composition
    Nfkc,
    /// Compatibility Decomposition
    Nfkd,
}

impl UnicodeNormArg {
    pub fn to_unicode_norm(&self) -> pdftext::UnicodeNorm {
        match self {
            UnicodeNormArg::Nfc => pdftext::UnicodeNorm::Nfc,
            UnicodeNormArg::Nfd => pdftext::UnicodeNorm::Nfd,
            UnicodeNormArg::Nfkc => pdftext::UnicodeNorm::Nfkc,
            UnicodeNormArg::Nfkd => pdftext::UnicodeNorm::Nfkd,
        }
    }
}
