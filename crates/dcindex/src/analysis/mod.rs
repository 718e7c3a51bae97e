//! Text analysis: language settings, term generation and the index analyzer

pub mod terms;
pub mod tokenizer;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::Error;

pub use terms::{generate_terms, normalize_punctuation, record_terms, TermCorpus};
pub use tokenizer::{build_text_analyzer, DC_TEXT_ANALYZER};

/// Supported document languages
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    English,
    #[default]
    Spanish,
}

impl Language {
    /// Short stop list used for term generation
    pub fn stop_words(&self) -> &'static [&'static str] {
        match self {
            Self::English => &["for", "a", "of", "the", "and", "to", "in"],
            Self::Spanish => &[
                "para", "un", "una", "unos", "unas", "de", "el", "la", "lo", "los", "las", "y",
                "a", "en",
            ],
        }
    }

    /// Snowball stemming algorithm
    pub fn stemmer_algorithm(&self) -> rust_stemmers::Algorithm {
        match self {
            Self::English => rust_stemmers::Algorithm::English,
            Self::Spanish => rust_stemmers::Algorithm::Spanish,
        }
    }

    /// Language as understood by the index analyzer filters
    pub fn tantivy_language(&self) -> tantivy::tokenizer::Language {
        match self {
            Self::English => tantivy::tokenizer::Language::English,
            Self::Spanish => tantivy::tokenizer::Language::Spanish,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Spanish => "spanish",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "english" | "en" => Ok(Self::English),
            "spanish" | "es" => Ok(Self::Spanish),
            other => Err(Error::config(format!(
                "unsupported language '{}', expected english or spanish",
                other
            ))),
        }
    }
}
