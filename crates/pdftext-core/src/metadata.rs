//! Document-level metadata from the PDF `/Info` dictionary.

/// Fields of the `/Info` dictionary. All are optional because producers may
/// omit the dictionary or any entry of it.
///
/// Dates are kept as the raw PDF date strings (`D:YYYYMMDDHHmmSSOHH'mm'`).
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub subject: Option<String>,
    pub keywords: Option<String>,
    /// Application that created the original document.
    pub creator: Option<String>,
    /// Application that produced the PDF.
    pub producer: Option<String>,
    pub creation_date: Option<String>,
    pub mod_date: Option<String>,
}

impl DocumentMetadata {
    /// Returns `true` if every field is `None`.
    pub fn is_empty(&self) -> bool {
        self.entries().next().is_none()
    }

    /// Present fields as `(key, value)` pairs, keyed by their `/Info` names.
    pub fn entries(&self) -> impl Iterator<Item = (&'static str, &str)> {
        [
            ("Title", &self.title),
            ("Author", &self.author),
            ("Subject", &self.subject),
            ("Keywords", &self.keywords),
            ("Creator", &self.creator),
            ("Producer", &self.producer),
            ("CreationDate", &self.creation_date),
            ("ModDate", &self.mod_date),
        ]
        .into_iter()
        .filter_map(|(key, value)| value.as_deref().map(|v| (key, v)))
    }
}
