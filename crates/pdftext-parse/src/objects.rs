//! Small helpers for reading lopdf objects.

use lopdf::{Dictionary, Document, Object, Stream};

use crate::error::BackendError;

/// Follow a reference to its target. Dangling references resolve to the
/// reference object itself.
pub(crate) fn resolve<'a>(doc: &'a Document, obj: &'a Object) -> &'a Object {
    match obj {
        Object::Reference(id) => doc.get_object(*id).unwrap_or(obj),
        _ => obj,
    }
}

/// Numeric value of an integer or real object.
pub(crate) fn number(obj: &Object) -> Option<f64> {
    match obj {
        Object::Integer(i) => Some(*i as f64),
        Object::Real(r) => Some(f64::from(*r)),
        _ => None,
    }
}

/// Resolved value of `key` in `dict`.
pub(crate) fn get<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a Object> {
    dict.get(key).ok().map(|obj| resolve(doc, obj))
}

pub(crate) fn get_number(doc: &Document, dict: &Dictionary, key: &[u8]) -> Option<f64> {
    get(doc, dict, key).and_then(number)
}

pub(crate) fn get_dict<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Dictionary> {
    get(doc, dict, key).and_then(|o| o.as_dict().ok())
}

pub(crate) fn get_array<'a>(
    doc: &'a Document,
    dict: &'a Dictionary,
    key: &[u8],
) -> Option<&'a Vec<Object>> {
    get(doc, dict, key).and_then(|o| o.as_array().ok())
}

pub(crate) fn get_name<'a>(doc: &'a Document, dict: &'a Dictionary, key: &[u8]) -> Option<&'a [u8]> {
    get(doc, dict, key).and_then(|o| o.as_name().ok())
}

/// Numbers of an array, resolving indirect elements. Non-numeric
/// elements are dropped.
pub(crate) fn numbers(doc: &Document, items: &[Object]) -> Vec<f64> {
    items
        .iter()
        .filter_map(|o| number(resolve(doc, o)))
        .collect()
}

/// Stream content with its filters applied.
pub(crate) fn stream_bytes(stream: &Stream) -> Result<Vec<u8>, BackendError> {
    if stream.dict.get(b"Filter").is_err() {
        return Ok(stream.content.clone());
    }
    stream
        .decompressed_content()
        .map_err(|e| BackendError::Parse(format!("failed to decompress stream: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::dictionary;

    #[test]
    fn resolves_references() {
        let mut doc = Document::with_version("1.5");
        let id = doc.add_object(Object::Integer(42));
        let reference = Object::Reference(id);
        assert_eq!(number(resolve(&doc, &reference)), Some(42.0));

        let dangling = Object::Reference((999, 0));
        assert!(matches!(resolve(&doc, &dangling), Object::Reference(_)));
    }

    #[test]
    fn dictionary_lookups() {
        let mut doc = Document::with_version("1.5");
        let arr_id = doc.add_object(Object::Array(vec![
            Object::Integer(1),
            Object::Real(2.5),
            Object::Name(b"x".to_vec()),
        ]));
        let dict = dictionary! {
            "Size" => Object::Integer(12),
            "Kind" => "Type1",
            "Items" => Object::Reference(arr_id),
            "Inner" => dictionary! { "A" => Object::Integer(1) },
        };
        assert_eq!(get_number(&doc, &dict, b"Size"), Some(12.0));
        assert_eq!(get_name(&doc, &dict, b"Kind"), Some(&b"Type1"[..]));
        let items = get_array(&doc, &dict, b"Items").unwrap();
        assert_eq!(numbers(&doc, items), vec![1.0, 2.5]);
        assert!(get_dict(&doc, &dict, b"Inner").is_some());
        assert!(get(&doc, &dict, b"Missing").is_none());
    }

    #[test]
    fn uncompressed_stream_bytes() {
        let stream = Stream::new(Dictionary::new(), b"BT ET".to_vec());
        assert_eq!(stream_bytes(&stream).unwrap(), b"BT ET");
    }

    #[test]
    fn compressed_stream_bytes() {
        let mut stream = Stream::new(Dictionary::new(), b"BT (compressed) Tj ET".to_vec());
        stream.compress().unwrap();
        assert!(stream.dict.get(b"Filter").is_ok());
        assert_eq!(stream_bytes(&stream).unwrap(), b"BT (compressed) Tj ET");
    }
}
