//! BibTeX reading for bibfront
//!
//! Turns a `.bib` source into a sequence of entries, each carrying its cite
//! key, entry type and fields in source order. Also provides the
//! LaTeX-to-Unicode decoder used when normalizing author lists.
//!
//! Features:
//! - Nom-based parser with `@string` expansion and `#` concatenation
//! - Per-entry error recovery
//! - LaTeX special character decoding

mod entry;
mod latex_decoder;
pub mod parser;

pub use entry::{BibTeXEntry, BibTeXEntryType, BibTeXField};
pub use latex_decoder::decode_latex;
pub use parser::{parse, parse_entry, BibTeXParseError, BibTeXParseResult, ParseError};
