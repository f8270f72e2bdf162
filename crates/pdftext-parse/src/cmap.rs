//! ToUnicode CMap parsing.
//!
//! A ToUnicode stream is PostScript-like, so it is run through the content
//! stream tokenizer and the `bfchar`/`bfrange` operators are read from the
//! resulting operator list. Destination strings are UTF-16BE.

use std::collections::HashMap;

use crate::error::BackendError;
use crate::tokenizer::{Operand, tokenize};

/// Largest source range accepted from a single `bfrange` entry.
const MAX_RANGE_SPAN: u32 = 0xFFFF;

/// Mapping from character codes to Unicode text.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CMap {
    mappings: HashMap<u32, String>,
}

impl CMap {
    /// Parse a ToUnicode CMap stream.
    ///
    /// # Errors
    ///
    /// Returns [`BackendError::Font`] when the stream cannot be tokenized.
    pub fn parse(data: &[u8]) -> Result<Self, BackendError> {
        let ops = tokenize(data)
            .map_err(|e| BackendError::Font(format!("unparsable ToUnicode CMap: {e}")))?;

        let mut cmap = CMap::default();
        for op in &ops {
            match op.name.as_str() {
                "endbfchar" => {
                    for pair in op.operands.chunks_exact(2) {
                        if let (Some(src), Some(dst)) = (pair[0].as_bytes(), pair[1].as_bytes()) {
                            cmap.mappings.insert(code_from_bytes(src), decode_utf16be(dst));
                        }
                    }
                }
                "endbfrange" => {
                    for triple in op.operands.chunks_exact(3) {
                        cmap.insert_range(&triple[0], &triple[1], &triple[2]);
                    }
                }
                _ => {}
            }
        }
        Ok(cmap)
    }

    fn insert_range(&mut self, low: &Operand, high: &Operand, dst: &Operand) {
        let (Some(low), Some(high)) = (low.as_bytes(), high.as_bytes()) else {
            return;
        };
        let low = code_from_bytes(low);
        let high = code_from_bytes(high);
        if high < low {
            return;
        }
        let span = (high - low).min(MAX_RANGE_SPAN);

        match dst {
            Operand::Array(items) => {
                for (offset, item) in (0..=span).zip(items) {
                    if let Some(bytes) = item.as_bytes() {
                        self.mappings.insert(low + offset, decode_utf16be(bytes));
                    }
                }
            }
            other => {
                let Some(bytes) = other.as_bytes() else {
                    return;
                };
                let mut units = utf16_units(bytes);
                let Some(base) = units.last().copied() else {
                    return;
                };
                for offset in 0..=span {
                    if let Some(last) = units.last_mut() {
                        *last = base.wrapping_add(offset as u16);
                    }
                    self.mappings
                        .insert(low + offset, String::from_utf16_lossy(&units));
                }
            }
        }
    }

    pub fn lookup(&self, code: u32) -> Option<&str> {
        self.mappings.get(&code).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.mappings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mappings.is_empty()
    }
}

fn code_from_bytes(bytes: &[u8]) -> u32 {
    bytes
        .iter()
        .take(4)
        .fold(0u32, |acc, &b| (acc << 8) | u32::from(b))
}

fn utf16_units(bytes: &[u8]) -> Vec<u16> {
    match bytes {
        // single byte destinations appear in the wild; treat as one code unit
        [single] => vec![u16::from(*single)],
        _ => bytes
            .chunks(2)
            .map(|pair| match pair {
                [hi, lo] => u16::from_be_bytes([*hi, *lo]),
                [hi] => u16::from(*hi) << 8,
                _ => 0,
            })
            .collect(),
    }
}

/// Decode UTF-16BE bytes, replacing unpaired surrogates.
pub fn decode_utf16be(bytes: &[u8]) -> String {
    String::from_utf16_lossy(&utf16_units(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &[u8] = b"/CIDInit /ProcSet findresource begin
12 dict begin
begincmap
/CIDSystemInfo << /Registry (Adobe) /Ordering (UCS) /Supplement 0 >> def
/CMapName /Adobe-Identity-UCS def
/CMapType 2 def
1 begincodespacerange
<0000> <FFFF>
endcodespacerange
3 beginbfchar
<0003> <0020>
<0024> <0041>
<0050> <00660069>
endbfchar
2 beginbfrange
<0044> <0046> <0061>
<0060> <0062> [<0058> <0059> <005A>]
endbfrange
endcmap
CMapName currentdict /CMap defineresource pop
end
end";

    #[test]
    fn parses_bfchar() {
        let cmap = CMap::parse(SAMPLE).unwrap();
        assert_eq!(cmap.lookup(0x0003), Some(" "));
        assert_eq!(cmap.lookup(0x0024), Some("A"));
    }

    #[test]
    fn multi_char_destination() {
        let cmap = CMap::parse(SAMPLE).unwrap();
        assert_eq!(cmap.lookup(0x0050), Some("fi"));
    }

    #[test]
    fn bfrange_increments_destination() {
        let cmap = CMap::parse(SAMPLE).unwrap();
        assert_eq!(cmap.lookup(0x0044), Some("a"));
        assert_eq!(cmap.lookup(0x0045), Some("b"));
        assert_eq!(cmap.lookup(0x0046), Some("c"));
        assert_eq!(cmap.lookup(0x0047), None);
    }

    #[test]
    fn bfrange_with_array() {
        let cmap = CMap::parse(SAMPLE).unwrap();
        assert_eq!(cmap.lookup(0x0060), Some("X"));
        assert_eq!(cmap.lookup(0x0062), Some("Z"));
        assert_eq!(cmap.len(), 9);
    }

    #[test]
    fn single_byte_codes() {
        let cmap = CMap::parse(b"1 beginbfchar <41> <0042> endbfchar").unwrap();
        assert_eq!(cmap.lookup(0x41), Some("B"));
    }

    #[test]
    fn surrogate_pair_destination() {
        let cmap = CMap::parse(b"1 beginbfchar <01> <D83DDE00> endbfchar").unwrap();
        assert_eq!(cmap.lookup(1), Some("\u{1F600}"));
    }

    #[test]
    fn empty_cmap() {
        let cmap = CMap::parse(b"begincmap endcmap").unwrap();
        assert!(cmap.is_empty());
    }

    #[test]
    fn garbage_is_an_error() {
        assert!(CMap::parse(b"1 beginbfchar <01> (unterminated").is_err());
    }

    #[test]
    fn decode_utf16be_lossy() {
        assert_eq!(decode_utf16be(&[0x00, 0x48, 0x00, 0x69]), "Hi");
        assert_eq!(decode_utf16be(&[0xD8, 0x00]), "\u{FFFD}");
    }
}
