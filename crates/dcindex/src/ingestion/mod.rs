//! Document ingestion: plain text and Dublin Core XML into uniform records

mod normalizer;
pub mod timestamp;
pub mod xml;

pub use normalizer::{join_text_lines, DocumentNormalizer, FolderIngest};
pub use xml::{ExtractedXml, MetadataField};

/// Lines of `text`, treating `\r\n`, `\r` and `\n` all as line breaks.
/// A `\r\n` pair yields an extra empty segment, which every caller drops.
pub(crate) fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(['\r', '\n'])
}
