//! Index schema: one field per `DocumentRecord` field

use tantivy::schema::{
    Field, IndexRecordOption, Schema, TextFieldIndexing, TextOptions, STORED, STRING,
};
use tantivy::TantivyDocument;

use crate::analysis::DC_TEXT_ANALYZER;
use crate::error::{Error, Result};
use crate::types::DocumentRecord;

pub const PATH: &str = "path";
pub const CONTENT: &str = "content";
pub const TITLE: &str = "title";
pub const WORK_TYPE: &str = "work_type";
pub const AUTHOR_NAMES: &str = "author_names";
pub const CONTRIBUTOR_NAMES: &str = "contributor_names";
pub const SUBJECTS: &str = "subjects";
pub const DESCRIPTION: &str = "description";
pub const DATE: &str = "date";
pub const PUBLISHER_OR_DEPARTMENT: &str = "publisher_or_department";
pub const IDENTIFIER: &str = "identifier";
pub const MODIFIED: &str = "modified";

/// Resolved field handles
#[derive(Debug, Clone, Copy)]
pub struct IndexFields {
    pub path: Field,
    pub content: Field,
    pub title: Field,
    pub work_type: Field,
    pub author_names: Field,
    pub contributor_names: Field,
    pub subjects: Field,
    pub description: Field,
    pub date: Field,
    pub publisher_or_department: Field,
    pub identifier: Field,
    pub modified: Field,
}

impl IndexFields {
    /// Build the schema. Identifiers and dates are indexed verbatim, free
    /// text goes through the `dc_text` analyzer; everything is stored.
    pub fn build_schema() -> (Schema, Self) {
        let text = TextOptions::default()
            .set_indexing_options(
                TextFieldIndexing::default()
                    .set_tokenizer(DC_TEXT_ANALYZER)
                    .set_index_option(IndexRecordOption::WithFreqsAndPositions),
            )
            .set_stored();

        let mut builder = Schema::builder();
        let fields = Self {
            path: builder.add_text_field(PATH, STRING | STORED),
            content: builder.add_text_field(CONTENT, text.clone()),
            title: builder.add_text_field(TITLE, text.clone()),
            work_type: builder.add_text_field(WORK_TYPE, text.clone()),
            author_names: builder.add_text_field(AUTHOR_NAMES, text.clone()),
            contributor_names: builder.add_text_field(CONTRIBUTOR_NAMES, text.clone()),
            subjects: builder.add_text_field(SUBJECTS, text.clone()),
            description: builder.add_text_field(DESCRIPTION, text.clone()),
            date: builder.add_text_field(DATE, STRING | STORED),
            publisher_or_department: builder.add_text_field(PUBLISHER_OR_DEPARTMENT, text),
            identifier: builder.add_text_field(IDENTIFIER, STRING | STORED),
            modified: builder.add_text_field(MODIFIED, STORED),
        };
        (builder.build(), fields)
    }

    /// Resolve handles from an existing index's schema
    pub fn from_schema(schema: &Schema) -> Result<Self> {
        let field = |name: &str| {
            schema
                .get_field(name)
                .map_err(|_| Error::index(format!("index schema has no '{}' field", name)))
        };
        Ok(Self {
            path: field(PATH)?,
            content: field(CONTENT)?,
            title: field(TITLE)?,
            work_type: field(WORK_TYPE)?,
            author_names: field(AUTHOR_NAMES)?,
            contributor_names: field(CONTRIBUTOR_NAMES)?,
            subjects: field(SUBJECTS)?,
            description: field(DESCRIPTION)?,
            date: field(DATE)?,
            publisher_or_department: field(PUBLISHER_OR_DEPARTMENT)?,
            identifier: field(IDENTIFIER)?,
            modified: field(MODIFIED)?,
        })
    }

    /// Map a record onto an index document
    pub fn to_document(&self, record: &DocumentRecord) -> TantivyDocument {
        let mut doc = TantivyDocument::default();
        doc.add_text(self.path, &record.path);
        doc.add_text(self.content, &record.content);
        doc.add_text(self.title, &record.title);
        doc.add_text(self.work_type, &record.work_type);
        doc.add_text(self.author_names, &record.author_names);
        doc.add_text(self.contributor_names, &record.contributor_names);
        doc.add_text(self.subjects, &record.subjects);
        doc.add_text(self.description, &record.description);
        doc.add_text(self.date, &record.date);
        doc.add_text(self.publisher_or_department, &record.publisher_or_department);
        doc.add_text(self.identifier, &record.identifier);
        doc.add_text(self.modified, &record.modified_timestamp);
        doc
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tantivy::schema::Value;

    #[test]
    fn test_schema_round_trips_handles() {
        let (schema, fields) = IndexFields::build_schema();
        let resolved = IndexFields::from_schema(&schema).unwrap();
        assert_eq!(resolved.identifier, fields.identifier);
        assert_eq!(resolved.modified, fields.modified);
        assert_eq!(schema.fields().count(), 12);
    }

    #[test]
    fn test_missing_field_rejected() {
        let mut builder = Schema::builder();
        builder.add_text_field(PATH, STRING | STORED);
        let err = IndexFields::from_schema(&builder.build()).unwrap_err();
        assert!(err.to_string().contains("content"));
    }

    #[test]
    fn test_to_document() {
        let (_, fields) = IndexFields::build_schema();
        let record = DocumentRecord {
            path: "a.xml".to_string(),
            title: "Foo Bar".to_string(),
            ..DocumentRecord::default()
        };
        let doc = fields.to_document(&record);
        assert_eq!(
            doc.get_first(fields.title).and_then(|v| v.as_str()),
            Some("Foo Bar")
        );
        assert_eq!(doc.get_first(fields.path).and_then(|v| v.as_str()), Some("a.xml"));
    }
}
