//! Query-time retrieval over the full-text index

pub mod info_needs;
mod search;
pub mod weighting;

pub use info_needs::{read_queries, run_info_needs, run_info_needs_file};
pub use search::{format_hits, DocumentSearcher, SearchHit};
