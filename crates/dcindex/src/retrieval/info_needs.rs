//! Batch evaluation of information needs
//!
//! Each non-blank line of the queries file is one information need, numbered
//! from 1. The output has one `<qid>\t<identifier>` line per returned document.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use super::search::DocumentSearcher;
use crate::error::{Error, Result};

/// Read queries, one per trimmed non-blank line
pub fn read_queries(path: &Path) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| Error::file_read(path, e))?;
    let mut queries = Vec::new();
    for line in BufReader::new(file).lines() {
        let line = line.map_err(|e| Error::file_read(path, e))?;
        let query = line.trim();
        if !query.is_empty() {
            queries.push(query.to_string());
        }
    }
    Ok(queries)
}

/// Run every query and write the results. Returns the number of queries run.
pub fn run_info_needs(
    searcher: &DocumentSearcher,
    queries: &[String],
    output: &mut impl Write,
    limit: usize,
) -> Result<usize> {
    for (position, query) in queries.iter().enumerate() {
        let qid = position + 1;
        let hits = searcher.search(query, Some(limit))?;
        tracing::debug!("Information need {} matched {} documents", qid, hits.len());
        for hit in hits {
            writeln!(output, "{}\t{}", qid, hit.identifier)?;
        }
    }
    Ok(queries.len())
}

/// File-to-file form of [`run_info_needs`]
pub fn run_info_needs_file(
    searcher: &DocumentSearcher,
    queries_path: &Path,
    output_path: &Path,
    limit: usize,
) -> Result<usize> {
    let queries = read_queries(queries_path)?;
    if queries.is_empty() {
        return Err(Error::query(format!("no queries found in {:?}", queries_path)));
    }

    let mut output = BufWriter::new(File::create(output_path)?);
    let count = run_info_needs(searcher, &queries, &mut output, limit)?;
    output.flush()?;

    tracing::info!("Ran {} information needs, results in {:?}", count, output_path);
    Ok(count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_queries_skips_blank_lines() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("needs.txt");
        std::fs::write(&path, "  sistemas de información \n\n\t\nredes\n").unwrap();

        let queries = read_queries(&path).unwrap();
        assert_eq!(queries, vec!["sistemas de información", "redes"]);
    }

    #[test]
    fn test_read_queries_missing_file() {
        let err = read_queries(Path::new("/no/such/needs.txt")).unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }
}
