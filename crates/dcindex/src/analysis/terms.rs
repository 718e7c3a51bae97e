//! Bag-of-words term generation for vector-space tools

use rust_stemmers::Stemmer;
use serde::Serialize;
use std::path::Path;

use crate::config::{AnalysisConfig, IngestionConfig};
use crate::error::Result;
use crate::ingestion::{DocumentNormalizer, FolderIngest};
use crate::types::DocumentRecord;

/// Characters replaced by a space before splitting into terms
const PUNCTUATION: &str = ",;:.-/\\(){}[]¿?¡!\"#&'+*%$_";

/// Replace punctuation with spaces and trim the result
pub fn normalize_punctuation(text: &str) -> String {
    text.chars()
        .map(|c| if PUNCTUATION.contains(c) { ' ' } else { c })
        .collect::<String>()
        .trim()
        .to_string()
}

/// Lowercase, split on whitespace, drop stop words, optionally stem
pub fn generate_terms(text: &str, config: &AnalysisConfig) -> Vec<String> {
    let stop_words = config.language.stop_words();
    let words = text
        .to_lowercase()
        .split_whitespace()
        .filter(|word| !config.stop_words || !stop_words.iter().any(|stop| stop == word))
        .map(str::to_string)
        .collect::<Vec<_>>();

    if !config.stemming {
        return words;
    }

    let stemmer = Stemmer::create(config.language.stemmer_algorithm());
    words
        .iter()
        .map(|word| stemmer.stem(word).into_owned())
        .collect()
}

/// Terms for a normalized record's content
pub fn record_terms(record: &DocumentRecord, config: &AnalysisConfig) -> Vec<String> {
    generate_terms(&normalize_punctuation(&record.content), config)
}

/// One document's terms, keyed by its source file name
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocumentTerms {
    pub path: String,
    pub terms: Vec<String>,
}

/// Lazy term sequences over a documents folder. Position in the sequence is
/// stable across runs and usable as a document number.
pub struct TermCorpus {
    records: FolderIngest,
    analysis: AnalysisConfig,
}

impl TermCorpus {
    pub fn new(
        folder: impl AsRef<Path>,
        ingestion: &IngestionConfig,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            records: DocumentNormalizer::ingest_folder(folder, ingestion),
            analysis,
        }
    }
}

impl Iterator for TermCorpus {
    type Item = Result<DocumentTerms>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(record.map(|record| DocumentTerms {
            terms: record_terms(&record, &self.analysis),
            path: record.path,
        }))
    }
}
