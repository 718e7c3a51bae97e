//! Configuration for ingestion, analysis, indexing and search

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::analysis::Language;
use crate::error::{Error, Result};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DcIndexConfig {
    /// Document ingestion configuration
    #[serde(default)]
    pub ingestion: IngestionConfig,
    /// Text analysis configuration (language, stop words, stemming)
    #[serde(default)]
    pub analysis: AnalysisConfig,
    /// Full-text index configuration
    #[serde(default)]
    pub index: IndexConfig,
    /// Search configuration
    #[serde(default)]
    pub search: SearchConfig,
    /// Vector-space (bag-of-words) index configuration
    #[serde(default)]
    pub vector: VectorConfig,
}

impl DcIndexConfig {
    /// Parse configuration from a TOML string; missing sections take defaults
    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Load configuration from a TOML file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&text)
    }
}

/// Ingestion configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IngestionConfig {
    /// Skip (and log) files that fail to read or parse instead of aborting
    /// the whole batch. Off by default: the first failure aborts ingestion.
    #[serde(default)]
    pub skip_failed: bool,
}

/// Text analysis configuration, passed explicitly to every analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Document language
    #[serde(default)]
    pub language: Language,
    /// Remove the language's stop words
    #[serde(default = "default_stop_words")]
    pub stop_words: bool,
    /// Apply the Snowball stemmer for the language
    #[serde(default)]
    pub stemming: bool,
}

fn default_stop_words() -> bool { true }

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            language: Language::default(),
            stop_words: true,
            stemming: false,
        }
    }
}

/// Full-text index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Index directory
    #[serde(default = "default_index_path")]
    pub path: PathBuf,
    /// Memory budget for the index writer in bytes (default: 50MB)
    #[serde(default = "default_writer_memory")]
    pub writer_memory_bytes: usize,
}

fn default_index_path() -> PathBuf { PathBuf::from("index") }
fn default_writer_memory() -> usize { 50_000_000 }

impl Default for IndexConfig {
    fn default() -> Self {
        Self {
            path: default_index_path(),
            writer_memory_bytes: default_writer_memory(),
        }
    }
}

/// Document ranking model
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RankingModel {
    /// Vector-space model, `tf * idf`
    #[default]
    Tfidf,
    /// Okapi BM25
    #[serde(alias = "okapi")]
    Bm25,
}

impl RankingModel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tfidf => "tfidf",
            Self::Bm25 => "bm25",
        }
    }
}

impl fmt::Display for RankingModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RankingModel {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "tfidf" | "tf-idf" => Ok(Self::Tfidf),
            "bm25" | "okapi" => Ok(Self::Bm25),
            other => Err(Error::config(format!(
                "unknown ranking model '{}', expected tfidf or bm25",
                other
            ))),
        }
    }
}

/// Search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    /// Ranking model applied to full-text matches
    #[serde(default)]
    pub model: RankingModel,
    /// Fields a free-text query is matched against (OR semantics)
    #[serde(default = "default_search_fields")]
    pub fields: Vec<String>,
    /// Maximum hits for interactive search (None: every match)
    #[serde(default)]
    pub limit: Option<usize>,
    /// Maximum hits per query in information-needs batches
    #[serde(default = "default_batch_limit")]
    pub batch_limit: usize,
}

fn default_search_fields() -> Vec<String> {
    [
        "author_names",
        "contributor_names",
        "publisher_or_department",
        "title",
        "description",
        "subjects",
        "date",
        "content",
    ]
    .iter()
    .map(|f| f.to_string())
    .collect()
}

fn default_batch_limit() -> usize { 100 }

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            model: RankingModel::default(),
            fields: default_search_fields(),
            limit: None,
            batch_limit: default_batch_limit(),
        }
    }
}

/// Vector-space index configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VectorConfig {
    /// Directory holding the saved vector index
    #[serde(default = "default_vector_path")]
    pub path: PathBuf,
    /// Term weighting model
    #[serde(default)]
    pub model: RankingModel,
    /// Drop terms that occur in a single document from the dictionary
    #[serde(default = "default_prune_singletons")]
    pub prune_singletons: bool,
    /// Stem terms. On by default for bag-of-words terms, unlike the
    /// full-text analyzer.
    #[serde(default = "default_term_stemming")]
    pub stemming: bool,
}

fn default_vector_path() -> PathBuf { PathBuf::from("vector_index") }
fn default_prune_singletons() -> bool { true }
fn default_term_stemming() -> bool { true }

impl Default for VectorConfig {
    fn default() -> Self {
        Self {
            path: default_vector_path(),
            model: RankingModel::default(),
            prune_singletons: default_prune_singletons(),
            stemming: default_term_stemming(),
        }
    }
}

impl VectorConfig {
    /// Analysis settings for term generation: the shared language and stop
    /// list with this section's stemming switch
    pub fn term_analysis(&self, analysis: &AnalysisConfig) -> AnalysisConfig {
        AnalysisConfig {
            stemming: self.stemming,
            ..analysis.clone()
        }
    }
}
