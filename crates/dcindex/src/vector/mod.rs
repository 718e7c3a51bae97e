//! Vector-space index over bag-of-words terms
//!
//! Documents become sparse vectors over a pruned term dictionary, weighted
//! with TF-IDF or Okapi BM25. Queries are ranked by their similarity to
//! every document vector. Document numbers are positions in the sorted
//! ingestion order.

pub mod dictionary;
pub mod weights;

use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::analysis::terms::DocumentTerms;
use crate::analysis::{generate_terms, normalize_punctuation, TermCorpus};
use crate::config::{AnalysisConfig, IngestionConfig, RankingModel, VectorConfig};
use crate::error::{Error, Result};

pub use dictionary::{BagOfWords, TermDictionary};
pub use weights::{sparse_dot, SparseVector, TermWeights};

/// File name of the saved index inside its directory
pub const VECTOR_INDEX_FILE: &str = "vector_index.json";

#[derive(Debug, Clone, Serialize, Deserialize)]
struct VectorDocument {
    path: String,
    vector: SparseVector,
}

/// A document ranked against a query
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct VectorHit {
    /// 1-based position in the result list
    pub rank: usize,
    /// 0-based document number
    pub document: usize,
    /// Source file name
    pub path: String,
    /// Similarity to the query
    pub score: f32,
}

/// Dictionary, fitted weights and document vectors
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorIndex {
    analysis: AnalysisConfig,
    dictionary: TermDictionary,
    weights: TermWeights,
    documents: Vec<VectorDocument>,
}

impl VectorIndex {
    /// Build from per-document terms; the first `Err` aborts the build
    pub fn build<I>(
        corpus: I,
        model: RankingModel,
        prune_singletons: bool,
        analysis: AnalysisConfig,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = Result<DocumentTerms>>,
    {
        let corpus = corpus.into_iter().collect::<Result<Vec<_>>>()?;
        let dictionary = TermDictionary::build(
            corpus.iter().map(|doc| doc.terms.as_slice()),
            prune_singletons,
        );
        let bows: Vec<BagOfWords> = corpus
            .iter()
            .map(|doc| dictionary.doc2bow(&doc.terms))
            .collect();
        let weights = TermWeights::fit(model, &dictionary, &bows);

        let documents = corpus
            .into_iter()
            .zip(&bows)
            .map(|(doc, bow)| VectorDocument {
                path: doc.path,
                vector: weights.document_vector(bow),
            })
            .collect::<Vec<_>>();

        tracing::info!(
            "Built {} vector index: {} documents, {} terms",
            model,
            documents.len(),
            dictionary.len()
        );
        Ok(Self {
            analysis,
            dictionary,
            weights,
            documents,
        })
    }

    /// Ingest `folder` and build an index with the configured model
    pub fn build_folder(
        folder: impl AsRef<Path>,
        ingestion: &IngestionConfig,
        config: &VectorConfig,
        analysis: &AnalysisConfig,
    ) -> Result<Self> {
        let analysis = config.term_analysis(analysis);
        let corpus = TermCorpus::new(folder, ingestion, analysis.clone());
        Self::build(corpus, config.model, config.prune_singletons, analysis)
    }

    /// Write the index to `dir`, creating it if needed. Returns the file path.
    pub fn save(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(VECTOR_INDEX_FILE);

        let mut writer = BufWriter::new(File::create(&path)?);
        serde_json::to_writer(&mut writer, self)?;
        writer.flush()?;

        tracing::info!("Saved vector index to {:?}", path);
        Ok(path)
    }

    /// Load an index saved with [`VectorIndex::save`]
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let path = dir.as_ref().join(VECTOR_INDEX_FILE);
        if !path.is_file() {
            return Err(Error::index(format!("no vector index found at {:?}", path)));
        }
        let file = File::open(&path).map_err(|e| Error::file_read(&path, e))?;
        let mut index: Self = serde_json::from_reader(BufReader::new(file))?;
        index.dictionary.rebuild_ids();
        Ok(index)
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    pub fn model(&self) -> RankingModel {
        self.weights.model()
    }

    pub fn dictionary(&self) -> &TermDictionary {
        &self.dictionary
    }

    /// Query terms, analyzed like the indexed documents
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        generate_terms(&normalize_punctuation(query), &self.analysis)
    }

    /// Rank documents with a positive similarity to `query`, best first.
    /// Ties keep document order.
    pub fn search(&self, query: &str, limit: Option<usize>) -> Vec<VectorHit> {
        let bow = self.dictionary.doc2bow(&self.query_terms(query));
        let query_vector = self.weights.query_vector(&bow);
        if query_vector.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(usize, f32)> = self
            .documents
            .iter()
            .enumerate()
            .map(|(number, doc)| (number, sparse_dot(&doc.vector, &query_vector)))
            .filter(|(_, score)| *score > 0.0)
            .collect();
        scored.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        if let Some(limit) = limit {
            scored.truncate(limit);
        }

        scored
            .into_iter()
            .enumerate()
            .map(|(position, (document, score))| VectorHit {
                rank: position + 1,
                document,
                path: self.documents[document].path.clone(),
                score,
            })
            .collect()
    }
}

/// Render vector hits as a numbered listing
pub fn format_vector_hits(hits: &[VectorHit]) -> String {
    let mut out = String::from("Returned documents:\n");
    for hit in hits {
        out.push_str(&format!(
            "{} - Document {} ({}), Similarity score: {}\n",
            hit.rank, hit.document, hit.path, hit.score
        ));
    }
    out
}
