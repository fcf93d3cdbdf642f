//! BibTeX entry data structures

use std::fmt;
use std::str::FromStr;

/// BibTeX entry type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BibTeXEntryType {
    Article,
    Book,
    Booklet,
    InBook,
    InCollection,
    InProceedings,
    Manual,
    MastersThesis,
    Misc,
    PhdThesis,
    Proceedings,
    TechReport,
    Unpublished,
    Online,
    Software,
    Dataset,
    Unknown,
}

impl BibTeXEntryType {
    /// Canonical lowercase name, as written after the `@`
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Book => "book",
            Self::Booklet => "booklet",
            Self::InBook => "inbook",
            Self::InCollection => "incollection",
            Self::InProceedings => "inproceedings",
            Self::Manual => "manual",
            Self::MastersThesis => "mastersthesis",
            Self::Misc => "misc",
            Self::PhdThesis => "phdthesis",
            Self::Proceedings => "proceedings",
            Self::TechReport => "techreport",
            Self::Unpublished => "unpublished",
            Self::Online => "online",
            Self::Software => "software",
            Self::Dataset => "dataset",
            Self::Unknown => "misc",
        }
    }
}

impl FromStr for BibTeXEntryType {
    type Err = std::convert::Infallible;

    /// Case-insensitive; unrecognised names map to `Unknown`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "article" => Self::Article,
            "book" => Self::Book,
            "booklet" => Self::Booklet,
            "inbook" => Self::InBook,
            "incollection" => Self::InCollection,
            "inproceedings" | "conference" => Self::InProceedings,
            "manual" => Self::Manual,
            "mastersthesis" => Self::MastersThesis,
            "misc" => Self::Misc,
            "phdthesis" => Self::PhdThesis,
            "proceedings" => Self::Proceedings,
            "techreport" => Self::TechReport,
            "unpublished" => Self::Unpublished,
            "online" | "electronic" | "www" => Self::Online,
            "software" => Self::Software,
            "dataset" => Self::Dataset,
            _ => Self::Unknown,
        })
    }
}

impl fmt::Display for BibTeXEntryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single BibTeX field (key-value pair)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXField {
    pub key: String,
    pub value: String,
}

/// A parsed BibTeX entry.
///
/// The cite key and entry type are always present; every other field is
/// optional and looked up by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BibTeXEntry {
    pub cite_key: String,
    pub entry_type: BibTeXEntryType,
    pub fields: Vec<BibTeXField>,
}

impl BibTeXEntry {
    pub fn new(cite_key: impl Into<String>, entry_type: BibTeXEntryType) -> Self {
        Self {
            cite_key: cite_key.into(),
            entry_type,
            fields: Vec::new(),
        }
    }

    /// Add a field to the entry
    pub fn add_field(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.fields.push(BibTeXField {
            key: key.into(),
            value: value.into(),
        });
    }

    /// Builder-style variant of [`add_field`](Self::add_field)
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.add_field(key, value);
        self
    }

    /// Get a field value by key (case-insensitive). The first occurrence wins
    /// when a key is repeated.
    pub fn get_field(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|f| f.key.eq_ignore_ascii_case(key))
            .map(|f| f.value.as_str())
    }

    pub fn is_article(&self) -> bool {
        self.entry_type == BibTeXEntryType::Article
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("article", BibTeXEntryType::Article)]
    #[case("ARTICLE", BibTeXEntryType::Article)]
    #[case("Article", BibTeXEntryType::Article)]
    #[case("inproceedings", BibTeXEntryType::InProceedings)]
    #[case("conference", BibTeXEntryType::InProceedings)]
    #[case("unknown_type", BibTeXEntryType::Unknown)]
    fn test_entry_type_parsing(#[case] input: &str, #[case] expected: BibTeXEntryType) {
        assert_eq!(input.parse::<BibTeXEntryType>().unwrap(), expected);
    }

    #[test]
    fn test_entry_type_display() {
        assert_eq!(BibTeXEntryType::InProceedings.to_string(), "inproceedings");
        assert_eq!(BibTeXEntryType::Unknown.to_string(), "misc");
    }

    #[test]
    fn test_entry_field_access() {
        let entry = BibTeXEntry::new("Smith2024", BibTeXEntryType::Article)
            .with_field("title", "A Great Paper")
            .with_field("Author", "John Smith")
            .with_field("YEAR", "2024");

        assert_eq!(entry.get_field("title"), Some("A Great Paper"));
        assert_eq!(entry.get_field("author"), Some("John Smith"));
        assert_eq!(entry.get_field("year"), Some("2024"));
        assert_eq!(entry.get_field("doi"), None);
        assert!(entry.is_article());
    }

    #[test]
    fn test_repeated_field_keeps_first() {
        let entry = BibTeXEntry::new("Dup", BibTeXEntryType::Misc)
            .with_field("note", "first")
            .with_field("note", "second");
        assert_eq!(entry.get_field("note"), Some("first"));
    }
}
