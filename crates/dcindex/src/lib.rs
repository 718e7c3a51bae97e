//! dcindex: document normalization and full-text search for small academic collections
//!
//! Source folders hold plain text files and XML files carrying Dublin Core
//! style metadata. The normalizer turns each file into a uniform
//! [`DocumentRecord`]; the index and retrieval modules hand those records to
//! tantivy and run free-text queries against them, the analysis module
//! produces bag-of-words term sequences, and the vector module ranks them
//! with TF-IDF or BM25 weighted document vectors.

pub mod analysis;
pub mod config;
pub mod error;
pub mod index;
pub mod ingestion;
pub mod retrieval;
pub mod types;
pub mod vector;

pub use analysis::{Language, TermCorpus};
pub use config::{
    AnalysisConfig, DcIndexConfig, IndexConfig, IngestionConfig, RankingModel, SearchConfig,
    VectorConfig,
};
pub use error::{Error, Result};
pub use index::{IndexSummary, SearchIndex};
pub use ingestion::{DocumentNormalizer, FolderIngest};
pub use retrieval::{DocumentSearcher, SearchHit};
pub use types::{DocumentRecord, SourceKind};
pub use vector::{VectorHit, VectorIndex};
