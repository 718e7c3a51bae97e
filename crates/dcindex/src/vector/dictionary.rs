//! Term dictionary: token ids and document frequencies

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Sparse bag of words: `(token id, count)` sorted by id
pub type BagOfWords = Vec<(u32, u32)>;

/// Maps terms to dense ids and records how many documents contain each
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermDictionary {
    tokens: Vec<String>,
    doc_freqs: Vec<u32>,
    num_docs: u32,
    #[serde(skip)]
    ids: HashMap<String, u32>,
}

impl TermDictionary {
    /// Build a dictionary over tokenized documents. Ids follow first
    /// occurrence. With `prune_singletons`, terms found in only one document
    /// are dropped and the remaining ids compacted.
    pub fn build<'a, I>(documents: I, prune_singletons: bool) -> Self
    where
        I: IntoIterator<Item = &'a [String]>,
    {
        let mut tokens: Vec<String> = Vec::new();
        let mut doc_freqs: Vec<u32> = Vec::new();
        let mut ids: HashMap<String, u32> = HashMap::new();
        let mut num_docs = 0u32;

        for terms in documents {
            num_docs += 1;
            let mut seen = HashSet::new();
            for term in terms {
                let id = *ids.entry(term.clone()).or_insert_with(|| {
                    tokens.push(term.clone());
                    doc_freqs.push(0);
                    (tokens.len() - 1) as u32
                });
                if seen.insert(id) {
                    doc_freqs[id as usize] += 1;
                }
            }
        }

        let mut dictionary = Self {
            tokens,
            doc_freqs,
            num_docs,
            ids,
        };
        if prune_singletons {
            dictionary.prune_singletons();
        }
        dictionary
    }

    fn prune_singletons(&mut self) {
        let before = self.tokens.len();
        let (tokens, doc_freqs): (Vec<String>, Vec<u32>) = std::mem::take(&mut self.tokens)
            .into_iter()
            .zip(std::mem::take(&mut self.doc_freqs))
            .filter(|(_, doc_freq)| *doc_freq > 1)
            .unzip();
        self.tokens = tokens;
        self.doc_freqs = doc_freqs;
        self.rebuild_ids();
        tracing::debug!("Pruned {} single-document terms", before - self.tokens.len());
    }

    /// Restore the term lookup table; needed after deserializing
    pub fn rebuild_ids(&mut self) {
        self.ids = self
            .tokens
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as u32))
            .collect();
    }

    /// Number of distinct terms
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Documents the dictionary was built from
    pub fn num_docs(&self) -> u32 {
        self.num_docs
    }

    pub fn token_id(&self, token: &str) -> Option<u32> {
        self.ids.get(token).copied()
    }

    pub fn token(&self, id: u32) -> Option<&str> {
        self.tokens.get(id as usize).map(String::as_str)
    }

    pub fn doc_freq(&self, id: u32) -> u32 {
        self.doc_freqs.get(id as usize).copied().unwrap_or(0)
    }

    /// Count known terms; unknown terms are ignored
    pub fn doc2bow(&self, terms: &[String]) -> BagOfWords {
        let mut counts: BTreeMap<u32, u32> = BTreeMap::new();
        for term in terms {
            if let Some(id) = self.token_id(term) {
                *counts.entry(id).or_insert(0) += 1;
            }
        }
        counts.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(texts: &[&str]) -> Vec<Vec<String>> {
        texts
            .iter()
            .map(|t| t.split_whitespace().map(str::to_string).collect())
            .collect()
    }

    #[test]
    fn test_build_assigns_ids_in_first_occurrence_order() {
        let corpus = docs(&["human interface", "interface system", "system human"]);
        let dictionary = TermDictionary::build(corpus.iter().map(Vec::as_slice), false);

        assert_eq!(dictionary.len(), 3);
        assert_eq!(dictionary.num_docs(), 3);
        assert_eq!(dictionary.token_id("human"), Some(0));
        assert_eq!(dictionary.token(2), Some("system"));
        assert_eq!(dictionary.doc_freq(1), 2);
    }

    #[test]
    fn test_prune_singletons_compacts_ids() {
        let corpus = docs(&["graph minors trees", "graph trees", "survey"]);
        let dictionary = TermDictionary::build(corpus.iter().map(Vec::as_slice), true);

        assert_eq!(dictionary.len(), 2);
        assert_eq!(dictionary.token_id("graph"), Some(0));
        assert_eq!(dictionary.token_id("trees"), Some(1));
        assert_eq!(dictionary.token_id("minors"), None);
        assert_eq!(dictionary.token_id("survey"), None);
    }

    #[test]
    fn test_repeated_term_counts_once_per_document() {
        let corpus = docs(&["system system", "system"]);
        let dictionary = TermDictionary::build(corpus.iter().map(Vec::as_slice), true);
        assert_eq!(dictionary.doc_freq(0), 2);
    }

    #[test]
    fn test_doc2bow() {
        let corpus = docs(&["system minors", "minors system"]);
        let dictionary = TermDictionary::build(corpus.iter().map(Vec::as_slice), false);
        let query = docs(&["system system minors unknown"]).remove(0);
        assert_eq!(dictionary.doc2bow(&query), vec![(0, 2), (1, 1)]);
    }

    #[test]
    fn test_lookup_survives_serialization() {
        let corpus = docs(&["a b", "b a"]);
        let dictionary = TermDictionary::build(corpus.iter().map(Vec::as_slice), false);
        let json = serde_json::to_string(&dictionary).unwrap();

        let mut restored: TermDictionary = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.token_id("b"), None);
        restored.rebuild_ids();
        assert_eq!(restored.token_id("b"), Some(1));
    }
}
