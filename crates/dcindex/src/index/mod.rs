//! Full-text index over normalized records, backed by tantivy

pub mod schema;

use std::path::{Path, PathBuf};

use serde::Serialize;
use tantivy::directory::MmapDirectory;
use tantivy::{Index, IndexWriter, TantivyDocument};

use crate::analysis::{build_text_analyzer, DC_TEXT_ANALYZER};
use crate::config::{AnalysisConfig, IndexConfig, IngestionConfig};
use crate::error::{Error, Result};
use crate::ingestion::DocumentNormalizer;
use crate::types::DocumentRecord;

pub use schema::IndexFields;

/// Outcome of an index build
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct IndexSummary {
    /// Records committed to the index
    pub documents_indexed: usize,
    /// Index directory
    pub index_path: PathBuf,
}

/// Handle to an on-disk index
pub struct SearchIndex {
    index: Index,
    fields: IndexFields,
    path: PathBuf,
    writer_memory_bytes: usize,
}

impl SearchIndex {
    /// Open the index in `config.path`, creating the directory and an empty
    /// index when none exists yet.
    pub fn create(config: &IndexConfig, analysis: &AnalysisConfig) -> Result<Self> {
        std::fs::create_dir_all(&config.path)?;
        let (schema, _) = IndexFields::build_schema();
        let directory = MmapDirectory::open(&config.path)?;
        let index = Index::open_or_create(directory, schema)?;
        tracing::info!("Index ready at {:?}", config.path);
        Self::from_index(index, &config.path, config.writer_memory_bytes, analysis)
    }

    /// Open an existing index
    pub fn open(path: impl AsRef<Path>, analysis: &AnalysisConfig) -> Result<Self> {
        let path = path.as_ref();
        if !path.is_dir() {
            return Err(Error::index(format!("no index found at {:?}", path)));
        }
        let index = Index::open_in_dir(path)?;
        Self::from_index(index, path, IndexConfig::default().writer_memory_bytes, analysis)
    }

    fn from_index(
        index: Index,
        path: &Path,
        writer_memory_bytes: usize,
        analysis: &AnalysisConfig,
    ) -> Result<Self> {
        index
            .tokenizers()
            .register(DC_TEXT_ANALYZER, build_text_analyzer(analysis));
        let fields = IndexFields::from_schema(&index.schema())?;
        Ok(Self {
            index,
            fields,
            path: path.to_path_buf(),
            writer_memory_bytes,
        })
    }

    /// Underlying tantivy index
    pub fn index(&self) -> &Index {
        &self.index
    }

    /// Field handles
    pub fn fields(&self) -> &IndexFields {
        &self.fields
    }

    /// Replace the index contents with `records`, committing once at the end.
    /// The first `Err` aborts the build and leaves the previous commit intact.
    pub fn index_records<I>(&self, records: I) -> Result<IndexSummary>
    where
        I: IntoIterator<Item = Result<DocumentRecord>>,
    {
        let mut writer: IndexWriter<TantivyDocument> = self.index.writer(self.writer_memory_bytes)?;
        writer.delete_all_documents()?;

        let mut documents_indexed = 0usize;
        for record in records {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    writer.rollback()?;
                    return Err(e);
                }
            };
            writer.add_document(self.fields.to_document(&record))?;
            documents_indexed += 1;
        }

        writer.commit()?;
        tracing::info!("Indexed {} documents into {:?}", documents_indexed, self.path);

        Ok(IndexSummary {
            documents_indexed,
            index_path: self.path.clone(),
        })
    }

    /// Ingest `folder` and index every record it yields
    pub fn index_folder(
        &self,
        folder: impl AsRef<Path>,
        ingestion: &IngestionConfig,
    ) -> Result<IndexSummary> {
        self.index_records(DocumentNormalizer::ingest_folder(folder, ingestion))
    }

    /// Number of documents visible in the last commit
    pub fn num_docs(&self) -> Result<u64> {
        let reader = self.index.reader()?;
        Ok(reader.searcher().num_docs())
    }
}
