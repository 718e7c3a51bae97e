//! Normalized document record and source kinds

use serde::{Deserialize, Serialize};

/// Kind of source file, detected from its name
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// Plain text file (.txt)
    PlainText,
    /// XML with Dublin Core style metadata (.xml)
    Xml,
}

impl SourceKind {
    /// Detect the source kind from a file name. The suffix match is
    /// case-sensitive; anything else is not ingested.
    pub fn from_file_name(file_name: &str) -> Option<Self> {
        if file_name.ends_with(".xml") {
            Some(Self::Xml)
        } else if file_name.ends_with(".txt") {
            Some(Self::PlainText)
        } else {
            None
        }
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::PlainText => "Text File",
            Self::Xml => "XML Document",
        }
    }
}

/// One source file normalized into the uniform field set consumed by indexers.
///
/// Every text field is always present; metadata that the source does not
/// carry is the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentRecord {
    /// Source file name, unique within one ingestion batch
    pub path: String,
    /// Full text flattened to a single whitespace-joined line
    pub content: String,
    /// `title` elements
    pub title: String,
    /// `type` elements (kind of work)
    pub work_type: String,
    /// `creator` elements
    pub author_names: String,
    /// `contributor` elements (directors, advisors)
    pub contributor_names: String,
    /// `subject` elements
    pub subjects: String,
    /// `description` elements
    pub description: String,
    /// `date` elements
    pub date: String,
    /// `publisher` elements (publisher or department)
    pub publisher_or_department: String,
    /// `identifier` elements
    pub identifier: String,
    /// Source modification time, `Www, DD Mon YYYY HH:MM:SS +0000`
    pub modified_timestamp: String,
}

impl DocumentRecord {
    /// Create a record with no metadata, as produced for plain text sources
    pub fn plain(path: String, content: String, modified_timestamp: String) -> Self {
        Self {
            path,
            content,
            modified_timestamp,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_kind_from_file_name() {
        assert_eq!(SourceKind::from_file_name("thesis.xml"), Some(SourceKind::Xml));
        assert_eq!(SourceKind::from_file_name("notes.txt"), Some(SourceKind::PlainText));
        assert_eq!(SourceKind::from_file_name("notes.TXT"), None);
        assert_eq!(SourceKind::from_file_name("image.png"), None);
        assert_eq!(SourceKind::from_file_name("xml"), None);
    }

    #[test]
    fn test_serialized_field_names() {
        let record = DocumentRecord::plain(
            "a.txt".to_string(),
            "hello world".to_string(),
            "Mon, 01 Jan 2024 10:00:00 +0000".to_string(),
        );
        let json = serde_json::to_value(&record).unwrap();
        let object = json.as_object().unwrap();

        for key in [
            "path",
            "content",
            "title",
            "workType",
            "authorNames",
            "contributorNames",
            "subjects",
            "description",
            "date",
            "publisherOrDepartment",
            "identifier",
            "modifiedTimestamp",
        ] {
            assert!(object.contains_key(key), "missing {}", key);
        }
        assert_eq!(object.len(), 12);
        assert_eq!(json["title"], "");
        assert_eq!(json["content"], "hello world");
    }
}
