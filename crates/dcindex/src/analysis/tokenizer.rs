//! Analyzer registered with the full-text index

use tantivy::tokenizer::{
    LowerCaser, RemoveLongFilter, SimpleTokenizer, Stemmer, StopWordFilter, TextAnalyzer,
};

use crate::config::AnalysisConfig;

/// Name the text fields' analyzer is registered under
pub const DC_TEXT_ANALYZER: &str = "dc_text";

/// Tokens longer than this are dropped before indexing
const MAX_TOKEN_LEN: usize = 40;

/// Build the analyzer for text fields: word tokens, lowercased, then the
/// language's stop-word and stemming filters when enabled.
pub fn build_text_analyzer(config: &AnalysisConfig) -> TextAnalyzer {
    let language = config.language.tantivy_language();
    let mut builder = TextAnalyzer::builder(SimpleTokenizer::default())
        .filter(RemoveLongFilter::limit(MAX_TOKEN_LEN))
        .filter(LowerCaser)
        .dynamic();

    if config.stop_words {
        match StopWordFilter::new(language) {
            Some(filter) => builder = builder.filter_dynamic(filter),
            None => tracing::warn!("No stop-word list for {}, keeping all tokens", config.language),
        }
    }
    if config.stemming {
        builder = builder.filter_dynamic(Stemmer::new(language));
    }

    builder.build()
}
