//! Term weighting for bag-of-words vectors

use serde::{Deserialize, Serialize};

use super::dictionary::{BagOfWords, TermDictionary};
use crate::config::RankingModel;

/// Sparse weighted vector: `(token id, weight)` sorted by id
pub type SparseVector = Vec<(u32, f32)>;

/// Okapi BM25 term-frequency saturation
const BM25_K1: f32 = 1.5;
/// Okapi BM25 length normalization
const BM25_B: f32 = 0.75;
/// Fraction of the mean idf that replaces negative BM25 idf values
const BM25_EPSILON: f32 = 0.25;

/// Collection statistics fitted for one model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TermWeights {
    model: RankingModel,
    idf: Vec<f32>,
    avg_doc_len: f32,
}

impl TermWeights {
    /// Fit idf values and the mean document length over `corpus`
    pub fn fit(model: RankingModel, dictionary: &TermDictionary, corpus: &[BagOfWords]) -> Self {
        let num_docs = dictionary.num_docs() as f32;
        let doc_freqs = (0..dictionary.len() as u32).map(|id| dictionary.doc_freq(id) as f32);

        let idf: Vec<f32> = match model {
            RankingModel::Tfidf => doc_freqs.map(|df| (num_docs / df).log2()).collect(),
            RankingModel::Bm25 => {
                let raw: Vec<f32> = doc_freqs
                    .map(|df| (num_docs - df + 0.5).ln() - (df + 0.5).ln())
                    .collect();
                let mean = if raw.is_empty() {
                    0.0
                } else {
                    raw.iter().sum::<f32>() / raw.len() as f32
                };
                raw.into_iter()
                    .map(|idf| if idf < 0.0 { BM25_EPSILON * mean } else { idf })
                    .collect()
            }
        };

        let avg_doc_len = if corpus.is_empty() {
            0.0
        } else {
            corpus.iter().map(|bow| bow_len(bow)).sum::<f32>() / corpus.len() as f32
        };

        Self {
            model,
            idf,
            avg_doc_len,
        }
    }

    pub fn model(&self) -> RankingModel {
        self.model
    }

    /// Weighted document vector.
    ///
    /// TF-IDF uses `(1 + log2 tf) * idf` scaled to unit length; BM25 uses the
    /// saturated, length-normalized term frequency times idf.
    pub fn document_vector(&self, bow: &BagOfWords) -> SparseVector {
        match self.model {
            RankingModel::Tfidf => self.tfidf_vector(bow),
            RankingModel::Bm25 => {
                let doc_len = bow_len(bow);
                let length_norm = if self.avg_doc_len > 0.0 {
                    1.0 - BM25_B + BM25_B * doc_len / self.avg_doc_len
                } else {
                    1.0
                };
                bow.iter()
                    .map(|&(id, tf)| {
                        let tf = tf as f32;
                        let saturated = tf * (BM25_K1 + 1.0) / (tf + BM25_K1 * length_norm);
                        (id, self.idf(id) * saturated)
                    })
                    .filter(|(_, weight)| *weight != 0.0)
                    .collect()
            }
        }
    }

    /// Weighted query vector: TF-IDF weighs queries like documents, BM25
    /// queries are binary.
    pub fn query_vector(&self, bow: &BagOfWords) -> SparseVector {
        match self.model {
            RankingModel::Tfidf => self.tfidf_vector(bow),
            RankingModel::Bm25 => bow.iter().map(|&(id, _)| (id, 1.0)).collect(),
        }
    }

    fn tfidf_vector(&self, bow: &BagOfWords) -> SparseVector {
        let weighted: SparseVector = bow
            .iter()
            .map(|&(id, tf)| (id, (1.0 + (tf as f32).log2()) * self.idf(id)))
            .filter(|(_, weight)| *weight != 0.0)
            .collect();
        let norm = weighted.iter().map(|(_, w)| w * w).sum::<f32>().sqrt();
        if norm == 0.0 {
            return weighted;
        }
        weighted.into_iter().map(|(id, w)| (id, w / norm)).collect()
    }

    fn idf(&self, id: u32) -> f32 {
        self.idf.get(id as usize).copied().unwrap_or(0.0)
    }
}

fn bow_len(bow: &BagOfWords) -> f32 {
    bow.iter().map(|&(_, tf)| tf as f32).sum()
}

/// Dot product of two id-sorted sparse vectors
pub fn sparse_dot(a: &SparseVector, b: &SparseVector) -> f32 {
    let (mut i, mut j) = (0, 0);
    let mut total = 0.0;
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                total += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    total
}
