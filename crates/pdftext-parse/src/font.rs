//! Font loading for the interpreter.
//!
//! A [`LoadedFont`] bundles what text showing needs from a font dictionary:
//! how many bytes make a code, glyph widths, and how codes map to Unicode.

use lopdf::{Dictionary, Document, Object};
use pdftext_core::{ExtractWarning, ExtractWarningCode};

use crate::cmap::CMap;
use crate::encoding::{BaseEncoding, DifferenceEntry, SimpleEncoding};
use crate::font_metrics::{FontMetrics, cid_font_metrics, simple_font_metrics};
use crate::objects::{get, get_array, get_dict, get_name, numbers, resolve, stream_bytes};
use crate::text_renderer::CodeWidth;

/// A font resource ready for text showing.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedFont {
    /// PostScript name without the subset tag.
    pub name: String,
    pub code_width: CodeWidth,
    pub metrics: FontMetrics,
    to_unicode: Option<CMap>,
    encoding: Option<SimpleEncoding>,
}

impl LoadedFont {
    /// Font used when `Tf` names a resource that does not exist.
    pub fn fallback(resource_name: &str) -> Self {
        Self {
            name: resource_name.to_string(),
            code_width: CodeWidth::OneByte,
            metrics: FontMetrics::default(),
            to_unicode: None,
            encoding: None,
        }
    }

    /// Load a font dictionary. Problems that still leave a usable font are
    /// returned as warnings.
    pub fn load(
        doc: &Document,
        dict: &Dictionary,
        resource_name: &str,
    ) -> (Self, Vec<ExtractWarning>) {
        let mut warnings = Vec::new();
        let subtype = get_name(doc, dict, b"Subtype").unwrap_or(b"");

        let name = get_name(doc, dict, b"BaseFont")
            .map(|n| strip_subset_prefix(&String::from_utf8_lossy(n)).to_string())
            .unwrap_or_else(|| resource_name.to_string());

        let to_unicode = match load_to_unicode(doc, dict) {
            Ok(cmap) => cmap,
            Err(reason) => {
                tracing::warn!(font = %name, %reason, "ignoring ToUnicode CMap");
                warnings.push(ExtractWarning::with_code(
                    ExtractWarningCode::EncodingFallback,
                    format!("font {name}: {reason}"),
                ));
                None
            }
        };

        let font = if subtype == b"Type0" {
            let metrics = match descendant_font(doc, dict) {
                Some(cid_font) => cid_font_metrics(doc, cid_font),
                None => {
                    warnings.push(ExtractWarning::with_code(
                        ExtractWarningCode::MalformedObject,
                        format!("font {name}: Type0 font without /DescendantFonts"),
                    ));
                    FontMetrics::cid(Vec::new(), 1000.0)
                }
            };
            Self {
                name,
                code_width: CodeWidth::TwoByte,
                metrics,
                to_unicode,
                encoding: None,
            }
        } else {
            let mut metrics = simple_font_metrics(doc, dict);
            if subtype == b"Type3" {
                let scale = get_array(doc, dict, b"FontMatrix")
                    .and_then(|m| numbers(doc, m).first().copied())
                    .unwrap_or(0.001);
                metrics = metrics.with_width_scale(scale * 1000.0);
            }
            let implicit_standard = matches!(subtype, b"Type1" | b"MMType1" | b"Type3");
            Self {
                name,
                code_width: CodeWidth::OneByte,
                metrics,
                to_unicode,
                encoding: simple_encoding(doc, dict, implicit_standard),
            }
        };
        (font, warnings)
    }

    /// Unicode text for a code: ToUnicode first, then the font encoding.
    pub fn unicode(&self, code: u32) -> Option<String> {
        if let Some(text) = self.to_unicode.as_ref().and_then(|c| c.lookup(code)) {
            return Some(text.to_string());
        }
        self.encoding.as_ref().and_then(|e| e.decode(code))
    }

    /// Glyph width of `code` in glyph space units.
    pub fn width(&self, code: u32) -> f64 {
        self.metrics.get_width(code)
    }
}

/// Remove a subset tag such as `ABCDEF+` from a font name.
pub fn strip_subset_prefix(name: &str) -> &str {
    match name.split_once('+') {
        Some((tag, rest)) if tag.len() == 6 && tag.bytes().all(|b| b.is_ascii_uppercase()) => rest,
        _ => name,
    }
}

fn load_to_unicode(doc: &Document, dict: &Dictionary) -> Result<Option<CMap>, String> {
    let Some(obj) = get(doc, dict, b"ToUnicode") else {
        return Ok(None);
    };
    // `/ToUnicode /Identity-H` and similar names carry no mapping
    let Ok(stream) = obj.as_stream() else {
        return Ok(None);
    };
    let data = stream_bytes(stream).map_err(|e| e.to_string())?;
    CMap::parse(&data).map(Some).map_err(|e| e.to_string())
}

fn descendant_font<'a>(doc: &'a Document, dict: &'a Dictionary) -> Option<&'a Dictionary> {
    get_array(doc, dict, b"DescendantFonts")?
        .first()
        .and_then(|o| resolve(doc, o).as_dict().ok())
}

fn simple_encoding(
    doc: &Document,
    dict: &Dictionary,
    implicit_standard: bool,
) -> Option<SimpleEncoding> {
    let default_base = implicit_standard.then_some(BaseEncoding::Standard);
    match get(doc, dict, b"Encoding") {
        Some(Object::Name(name)) => Some(SimpleEncoding::new(
            BaseEncoding::from_name(name).or(default_base),
        )),
        Some(Object::Dictionary(enc)) => {
            let base = get_name(doc, enc, b"BaseEncoding")
                .and_then(BaseEncoding::from_name)
                .or(default_base);
            let mut encoding = SimpleEncoding::new(base);
            if let Some(differences) = get_array(doc, enc, b"Differences") {
                encoding.apply_differences(differences.iter().filter_map(|o| {
                    match resolve(doc, o) {
                        Object::Integer(code) => {
                            u32::try_from(*code).ok().map(DifferenceEntry::Code)
                        }
                        Object::Name(name) => {
                            std::str::from_utf8(name).ok().map(DifferenceEntry::Name)
                        }
                        _ => None,
                    }
                }));
            }
            Some(encoding)
        }
        _ => default_base.map(|b| SimpleEncoding::new(Some(b))),
    }
}

/// Look up `/Resources/Font/<name>`.
pub fn font_dictionary<'a>(
    doc: &'a Document,
    resources: &'a Dictionary,
    name: &str,
) -> Option<&'a Dictionary> {
    get_dict(doc, resources, b"Font")
        .and_then(|fonts| get(doc, fonts, name.as_bytes()))
        .and_then(|o| o.as_dict().ok())
}
