//! Free-text, multi-field search over the index

use serde::Serialize;
use tantivy::collector::TopDocs;
use tantivy::query::QueryParser;
use tantivy::schema::{Field, Value};
use tantivy::{IndexReader, ReloadPolicy, TantivyDocument};

use super::weighting::TfIdfWeighting;
use crate::config::{RankingModel, SearchConfig};
use crate::error::{Error, Result};
use crate::index::{IndexFields, SearchIndex};

/// A ranked match
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SearchHit {
    /// 1-based position in the result list
    pub rank: usize,
    /// Source file name
    pub path: String,
    /// Document identifier (empty for plain text sources)
    pub identifier: String,
    /// Document title
    pub title: String,
    /// Stored modification timestamp
    pub modified: String,
    /// Relevance score assigned by the index
    pub score: f32,
}

/// Runs free-text queries against a `SearchIndex`.
///
/// Query terms are OR-ed across every configured field and matches are
/// ranked with the configured model.
pub struct DocumentSearcher {
    reader: IndexReader,
    parser: QueryParser,
    fields: IndexFields,
    model: RankingModel,
}

impl DocumentSearcher {
    /// Create a searcher over the configured fields
    pub fn new(index: &SearchIndex, config: &SearchConfig) -> Result<Self> {
        if config.fields.is_empty() {
            return Err(Error::config("search.fields must name at least one field"));
        }

        let schema = index.index().schema();
        let default_fields = config
            .fields
            .iter()
            .map(|name| {
                schema
                    .get_field(name)
                    .map_err(|_| Error::config(format!("unknown search field '{}'", name)))
            })
            .collect::<Result<Vec<Field>>>()?;

        let reader: IndexReader = index
            .index()
            .reader_builder()
            .reload_policy(ReloadPolicy::Manual)
            .try_into()?;
        let parser = QueryParser::for_index(index.index(), default_fields);

        Ok(Self {
            reader,
            parser,
            fields: *index.fields(),
            model: config.model,
        })
    }

    pub fn model(&self) -> RankingModel {
        self.model
    }

    /// Search `query`, returning at most `limit` hits (every match when `None`)
    pub fn search(&self, query: &str, limit: Option<usize>) -> Result<Vec<SearchHit>> {
        if query.trim().is_empty() {
            return Ok(Vec::new());
        }

        let (parsed, problems) = self.parser.parse_query_lenient(query);
        for problem in &problems {
            tracing::warn!("Query {:?}: {}", query, problem);
        }

        let searcher = self.reader.searcher();
        let limit = match limit {
            Some(0) => return Ok(Vec::new()),
            Some(limit) => limit,
            None => (searcher.num_docs() as usize).max(1),
        };
        let collector = TopDocs::with_limit(limit);
        let top_docs = match self.model {
            RankingModel::Bm25 => searcher.search(&parsed, &collector)?,
            RankingModel::Tfidf => {
                let weighting = TfIdfWeighting::for_query(&searcher, parsed.as_ref())?;
                searcher.search(&parsed, &collector.tweak_score(weighting))?
            }
        };

        let mut hits = Vec::with_capacity(top_docs.len());
        for (position, (score, address)) in top_docs.into_iter().enumerate() {
            let doc: TantivyDocument = searcher.doc(address)?;
            hits.push(SearchHit {
                rank: position + 1,
                path: stored_text(&doc, self.fields.path),
                identifier: stored_text(&doc, self.fields.identifier),
                title: stored_text(&doc, self.fields.title),
                modified: stored_text(&doc, self.fields.modified),
                score,
            });
        }

        tracing::debug!("Query {:?} returned {} hits", query, hits.len());
        Ok(hits)
    }
}

fn stored_text(doc: &TantivyDocument, field: Field) -> String {
    doc.get_first(field)
        .and_then(|v| v.as_str())
        .unwrap_or("")
        .to_string()
}

/// Render hits as a numbered listing, optionally with modification times
pub fn format_hits(hits: &[SearchHit], show_modified: bool) -> String {
    let mut out = String::from("Returned documents:\n");
    for hit in hits {
        out.push_str(&format!(
            "{} - File path: {}, Similarity score: {}\n",
            hit.rank, hit.path, hit.score
        ));
        if show_modified {
            out.push_str(&format!("\t Modified : {}\n", hit.modified));
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(rank: usize, path: &str) -> SearchHit {
        SearchHit {
            rank,
            path: path.to_string(),
            identifier: String::new(),
            title: String::new(),
            modified: "Sat, 07 Sep 2024 08:05:03 +0000".to_string(),
            score: 1.5,
        }
    }

    #[test]
    fn test_format_hits() {
        let hits = vec![hit(1, "a.xml"), hit(2, "b.txt")];
        let plain = format_hits(&hits, false);
        assert_eq!(
            plain,
            "Returned documents:\n\
             1 - File path: a.xml, Similarity score: 1.5\n\
             2 - File path: b.txt, Similarity score: 1.5\n"
        );

        let detailed = format_hits(&hits[..1], true);
        assert!(detailed.ends_with("\t Modified : Sat, 07 Sep 2024 08:05:03 +0000\n"));
    }

    #[test]
    fn test_format_no_hits() {
        assert_eq!(format_hits(&[], true), "Returned documents:\n");
    }
}
