//! Vector-space (TF-IDF) ranking over the full-text index
//!
//! The query still selects the matching documents; only their scores are
//! replaced. A document scores `tf * idf` summed over the query terms it
//! contains, with `idf = ln(N / (df + 1)) + 1`.

use tantivy::collector::{ScoreSegmentTweaker, ScoreTweaker};
use tantivy::postings::SegmentPostings;
use tantivy::query::Query;
use tantivy::schema::IndexRecordOption;
use tantivy::{DocId, DocSet, Postings, Score, Searcher, SegmentReader, Term};

use crate::error::Result;

/// Inverse document frequency of a term found in `doc_freq` of `num_docs` documents
pub fn idf(num_docs: u64, doc_freq: u64) -> Score {
    (num_docs as Score / (doc_freq as Score + 1.0)).ln() + 1.0
}

/// Per-query TF-IDF weights, one entry per distinct (field, term) pair
pub struct TfIdfWeighting {
    terms: Vec<(Term, Score)>,
}

impl TfIdfWeighting {
    /// Collect the query's terms and their collection-wide idf
    pub fn for_query(searcher: &Searcher, query: &dyn Query) -> Result<Self> {
        let mut terms: Vec<Term> = Vec::new();
        query.query_terms(&mut |term, _| terms.push(term.clone()));
        terms.sort();
        terms.dedup();

        let num_docs = searcher.num_docs();
        let mut weighted = Vec::with_capacity(terms.len());
        for term in terms {
            let doc_freq = searcher.doc_freq(&term)?;
            weighted.push((term, idf(num_docs, doc_freq)));
        }
        Ok(Self { terms: weighted })
    }
}

impl ScoreTweaker<Score> for TfIdfWeighting {
    type Child = TfIdfSegmentWeighting;

    fn segment_tweaker(&self, segment_reader: &SegmentReader) -> tantivy::Result<Self::Child> {
        let mut postings = Vec::with_capacity(self.terms.len());
        for (term, idf) in &self.terms {
            let inverted_index = segment_reader.inverted_index(term.field())?;
            if let Some(term_postings) =
                inverted_index.read_postings(term, IndexRecordOption::WithFreqs)?
            {
                postings.push((term_postings, *idf));
            }
        }
        Ok(TfIdfSegmentWeighting { postings })
    }
}

/// Segment-local postings cursors. Documents arrive in increasing id order.
pub struct TfIdfSegmentWeighting {
    postings: Vec<(SegmentPostings, Score)>,
}

impl ScoreSegmentTweaker<Score> for TfIdfSegmentWeighting {
    fn score(&mut self, doc: DocId, _bm25: Score) -> Score {
        let mut total = 0.0;
        for (postings, idf) in &mut self.postings {
            if postings.doc() < doc {
                postings.seek(doc);
            }
            if postings.doc() == doc {
                total += postings.term_freq() as Score * *idf;
            }
        }
        total
    }
}
