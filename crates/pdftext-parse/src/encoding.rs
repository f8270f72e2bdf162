//! Simple font encodings: base encodings plus `/Differences`.
//!
//! WinAnsi and MacRoman are decoded through `encoding_rs`. StandardEncoding
//! differs from ASCII only in a handful of positions, which are tabled here.
//! Glyph names from `/Differences` are resolved through a compact glyph list
//! covering ASCII, common punctuation, ligatures and accented Latin letters,
//! plus the `uniXXXX` and `uXXXX` conventions.

use std::collections::HashMap;

use encoding_rs::{Encoding, MACINTOSH, WINDOWS_1252};
use pdftext_core::UnicodeNorm;

/// Named base encoding of a simple font.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BaseEncoding {
    Standard,
    WinAnsi,
    MacRoman,
}

impl BaseEncoding {
    /// Look up a base encoding by its PDF name.
    pub fn from_name(name: &[u8]) -> Option<Self> {
        match name {
            b"StandardEncoding" => Some(BaseEncoding::Standard),
            b"WinAnsiEncoding" => Some(BaseEncoding::WinAnsi),
            b"MacRomanEncoding" => Some(BaseEncoding::MacRoman),
            _ => None,
        }
    }

    /// Unicode text for a single-byte code, if the encoding defines it.
    pub fn decode(self, code: u8) -> Option<String> {
        match self {
            BaseEncoding::WinAnsi => decode_single(WINDOWS_1252, code),
            BaseEncoding::MacRoman => decode_single(MACINTOSH, code),
            BaseEncoding::Standard => standard_encoding(code).map(String::from),
        }
    }
}

fn decode_single(encoding: &'static Encoding, code: u8) -> Option<String> {
    if code < 0x20 {
        return None;
    }
    let bytes = [code];
    let (text, had_errors) = encoding.decode_without_bom_handling(&bytes);
    (!had_errors).then(|| text.into_owned())
}

fn standard_encoding(code: u8) -> Option<&'static str> {
    let s = match code {
        0x27 => "\u{2019}",
        0x60 => "\u{2018}",
        0x20..=0x7E => return ASCII_PRINTABLE.get((code - 0x20) as usize..=(code - 0x20) as usize),
        0xA1 => "¡",
        0xA2 => "¢",
        0xA3 => "£",
        0xA4 => "\u{2044}",
        0xA5 => "¥",
        0xA6 => "ƒ",
        0xA7 => "§",
        0xA8 => "¤",
        0xA9 => "'",
        0xAA => "\u{201C}",
        0xAB => "«",
        0xAC => "\u{2039}",
        0xAD => "\u{203A}",
        0xAE => "\u{FB01}",
        0xAF => "\u{FB02}",
        0xB1 => "\u{2013}",
        0xB2 => "\u{2020}",
        0xB3 => "\u{2021}",
        0xB4 => "·",
        0xB6 => "¶",
        0xB7 => "\u{2022}",
        0xB8 => "\u{201A}",
        0xB9 => "\u{201E}",
        0xBA => "\u{201D}",
        0xBB => "»",
        0xBC => "\u{2026}",
        0xBD => "\u{2030}",
        0xBF => "¿",
        0xC1 => "`",
        0xC2 => "´",
        0xC3 => "\u{02C6}",
        0xC4 => "\u{02DC}",
        0xC5 => "¯",
        0xC6 => "\u{02D8}",
        0xC7 => "\u{02D9}",
        0xC8 => "¨",
        0xCA => "\u{02DA}",
        0xCB => "¸",
        0xCD => "\u{02DD}",
        0xCE => "\u{02DB}",
        0xCF => "\u{02C7}",
        0xD0 => "\u{2014}",
        0xE1 => "Æ",
        0xE3 => "ª",
        0xE8 => "Ł",
        0xE9 => "Ø",
        0xEA => "Œ",
        0xEB => "º",
        0xF1 => "æ",
        0xF5 => "ı",
        0xF8 => "ł",
        0xF9 => "ø",
        0xFA => "œ",
        0xFB => "ß",
        _ => return None,
    };
    Some(s)
}

const ASCII_PRINTABLE: &str =
    " !\"#$%&'()*+,-./0123456789:;<=>?@ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`abcdefghijklmnopqrstuvwxyz{|}~";

/// Encoding of a simple font: an optional base plus per-code overrides.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimpleEncoding {
    base: Option<BaseEncoding>,
    differences: HashMap<u8, String>,
}

impl SimpleEncoding {
    pub fn new(base: Option<BaseEncoding>) -> Self {
        Self {
            base,
            differences: HashMap::new(),
        }
    }

    /// Apply a `/Differences` array: a code followed by the glyph names
    /// assigned to consecutive codes. Unknown glyph names are skipped but
    /// still consume a code.
    pub fn apply_differences<'a>(&mut self, entries: impl IntoIterator<Item = DifferenceEntry<'a>>) {
        let mut code: u32 = 0;
        for entry in entries {
            match entry {
                DifferenceEntry::Code(c) => code = c,
                DifferenceEntry::Name(name) => {
                    if let (Ok(byte), Some(text)) = (u8::try_from(code), glyph_name_to_unicode(name))
                    {
                        self.differences.insert(byte, text);
                    }
                    code += 1;
                }
            }
        }
    }

    /// Unicode text for a code, or `None` when neither the differences nor
    /// the base encoding define it.
    pub fn decode(&self, code: u32) -> Option<String> {
        let byte = u8::try_from(code).ok()?;
        if let Some(text) = self.differences.get(&byte) {
            return Some(text.clone());
        }
        self.base.and_then(|b| b.decode(byte))
    }
}

/// One element of a `/Differences` array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DifferenceEntry<'a> {
    Code(u32),
    Name(&'a str),
}

/// Map a glyph name to Unicode text.
pub fn glyph_name_to_unicode(name: &str) -> Option<String> {
    // suffixes such as "a.sc" or "f_i.alt" name variants of the same glyph
    let name = name.split('.').next().unwrap_or(name);
    if name.is_empty() {
        return None;
    }

    if name.contains('_') {
        let parts: Option<String> = name.split('_').map(glyph_name_to_unicode).collect();
        return parts;
    }

    if let Some(hex) = name.strip_prefix("uni") {
        if hex.len() >= 4 && hex.len() % 4 == 0 {
            let units: Option<Vec<u16>> = hex
                .as_bytes()
                .chunks(4)
                .map(|c| {
                    std::str::from_utf8(c)
                        .ok()
                        .and_then(|s| u16::from_str_radix(s, 16).ok())
                })
                .collect();
            if let Some(units) = units {
                return String::from_utf16(&units).ok();
            }
        }
    }
    if let Some(hex) = name.strip_prefix('u') {
        if (4..=6).contains(&hex.len()) && hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return u32::from_str_radix(hex, 16)
                .ok()
                .and_then(char::from_u32)
                .map(String::from);
        }
    }

    if name.len() == 1 && name.as_bytes()[0].is_ascii_alphabetic() {
        return Some(name.to_string());
    }

    if let Some(s) = named_glyph(name) {
        return Some(s.to_string());
    }

    accented_letter(name)
}

fn named_glyph(name: &str) -> Option<&'static str> {
    let s = match name {
        "space" | "nbspace" | "nonbreakingspace" => " ",
        "exclam" => "!",
        "quotedbl" => "\"",
        "numbersign" => "#",
        "dollar" => "$",
        "percent" => "%",
        "ampersand" => "&",
        "quotesingle" => "'",
        "quoteright" => "\u{2019}",
        "quoteleft" => "\u{2018}",
        "parenleft" => "(",
        "parenright" => ")",
        "asterisk" => "*",
        "plus" => "+",
        "comma" => ",",
        "hyphen" | "sfthyphen" | "softhyphen" => "-",
        "period" => ".",
        "slash" => "/",
        "zero" => "0",
        "one" => "1",
        "two" => "2",
        "three" => "3",
        "four" => "4",
        "five" => "5",
        "six" => "6",
        "seven" => "7",
        "eight" => "8",
        "nine" => "9",
        "colon" => ":",
        "semicolon" => ";",
        "less" => "<",
        "equal" => "=",
        "greater" => ">",
        "question" => "?",
        "at" => "@",
        "bracketleft" => "[",
        "backslash" => "\\",
        "bracketright" => "]",
        "asciicircum" => "^",
        "underscore" => "_",
        "grave" => "`",
        "braceleft" => "{",
        "bar" => "|",
        "braceright" => "}",
        "asciitilde" => "~",
        "bullet" => "\u{2022}",
        "endash" => "\u{2013}",
        "emdash" => "\u{2014}",
        "ellipsis" => "\u{2026}",
        "quotedblleft" => "\u{201C}",
        "quotedblright" => "\u{201D}",
        "quotesinglbase" => "\u{201A}",
        "quotedblbase" => "\u{201E}",
        "guillemotleft" | "guillemetleft" => "«",
        "guillemotright" | "guillemetright" => "»",
        "guilsinglleft" => "\u{2039}",
        "guilsinglright" => "\u{203A}",
        "dagger" => "\u{2020}",
        "daggerdbl" => "\u{2021}",
        "trademark" => "\u{2122}",
        "copyright" => "©",
        "registered" => "®",
        "degree" => "°",
        "section" => "§",
        "paragraph" => "¶",
        "periodcentered" | "middot" => "·",
        "fi" => "\u{FB01}",
        "fl" => "\u{FB02}",
        "ff" => "\u{FB00}",
        "ffi" => "\u{FB03}",
        "ffl" => "\u{FB04}",
        "cent" => "¢",
        "sterling" => "£",
        "yen" => "¥",
        "Euro" | "euro" => "\u{20AC}",
        "currency" => "¤",
        "florin" => "ƒ",
        "exclamdown" => "¡",
        "questiondown" => "¿",
        "germandbls" => "ß",
        "ae" => "æ",
        "AE" => "Æ",
        "oe" => "œ",
        "OE" => "Œ",
        "oslash" => "ø",
        "Oslash" => "Ø",
        "lslash" => "ł",
        "Lslash" => "Ł",
        "dotlessi" => "ı",
        "eth" => "ð",
        "Eth" => "Ð",
        "thorn" => "þ",
        "Thorn" => "Þ",
        "minus" => "\u{2212}",
        "multiply" => "×",
        "divide" => "÷",
        "plusminus" => "±",
        "onehalf" => "½",
        "onequarter" => "¼",
        "threequarters" => "¾",
        "onesuperior" => "¹",
        "twosuperior" => "²",
        "threesuperior" => "³",
        "mu" => "µ",
        "ordfeminine" => "ª",
        "ordmasculine" => "º",
        "fraction" => "\u{2044}",
        "perthousand" => "\u{2030}",
        "brokenbar" => "¦",
        "logicalnot" => "¬",
        "macron" => "¯",
        "acute" => "´",
        "dieresis" => "¨",
        "cedilla" => "¸",
        "circumflex" => "\u{02C6}",
        "tilde" => "\u{02DC}",
        "ring" => "\u{02DA}",
        "caron" => "\u{02C7}",
        "breve" => "\u{02D8}",
        "dotaccent" => "\u{02D9}",
        "ogonek" => "\u{02DB}",
        "hungarumlaut" => "\u{02DD}",
        _ => return None,
    };
    Some(s)
}

/// Names such as `eacute` or `Ccedilla`: one ASCII letter and an accent.
fn accented_letter(name: &str) -> Option<String> {
    const ACCENTS: &[(&str, char)] = &[
        ("acute", '\u{0301}'),
        ("grave", '\u{0300}'),
        ("circumflex", '\u{0302}'),
        ("dieresis", '\u{0308}'),
        ("tilde", '\u{0303}'),
        ("ring", '\u{030A}'),
        ("cedilla", '\u{0327}'),
        ("caron", '\u{030C}'),
        ("macron", '\u{0304}'),
        ("breve", '\u{0306}'),
        ("ogonek", '\u{0328}'),
        ("dotaccent", '\u{0307}'),
        ("hungarumlaut", '\u{030B}'),
    ];
    let mut chars = name.chars();
    let base = chars.next().filter(char::is_ascii_alphabetic)?;
    let rest = chars.as_str();
    let (_, mark) = ACCENTS.iter().find(|(suffix, _)| *suffix == rest)?;
    Some(UnicodeNorm::Nfc.normalize(&format!("{base}{mark}")))
}
