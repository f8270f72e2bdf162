//! Unicode normalization of extracted char text.

use std::fmt;
use std::str::FromStr;

use unicode_normalization::UnicodeNormalization;

use crate::text::Char;

/// Unicode normalization form applied to extracted text.
///
/// Producers disagree on composed versus decomposed accents; normalizing
/// makes the output independent of the producer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum UnicodeNorm {
    #[default]
    None,
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl UnicodeNorm {
    /// Apply this normalization form to `text`.
    pub fn normalize(&self, text: &str) -> String {
        match self {
            UnicodeNorm::None => text.to_string(),
            UnicodeNorm::Nfc => text.nfc().collect(),
            UnicodeNorm::Nfd => text.nfd().collect(),
            UnicodeNorm::Nfkc => text.nfkc().collect(),
            UnicodeNorm::Nfkd => text.nfkd().collect(),
        }
    }
}

impl fmt::Display for UnicodeNorm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            UnicodeNorm::None => "none",
            UnicodeNorm::Nfc => "nfc",
            UnicodeNorm::Nfd => "nfd",
            UnicodeNorm::Nfkc => "nfkc",
            UnicodeNorm::Nfkd => "nfkd",
        })
    }
}

impl FromStr for UnicodeNorm {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "none" => Ok(UnicodeNorm::None),
            "nfc" => Ok(UnicodeNorm::Nfc),
            "nfd" => Ok(UnicodeNorm::Nfd),
            "nfkc" => Ok(UnicodeNorm::Nfkc),
            "nfkd" => Ok(UnicodeNorm::Nfkd),
            other => Err(format!("unknown normalization form: {other}")),
        }
    }
}

/// Normalize the text of each char in place.
pub fn normalize_chars(chars: &mut [Char], norm: UnicodeNorm) {
    if norm == UnicodeNorm::None {
        return;
    }
    for ch in chars {
        ch.text = norm.normalize(&ch.text);
    }
}
