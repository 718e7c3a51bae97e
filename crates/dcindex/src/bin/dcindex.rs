//! dcindex command line
//!
//! Run with: cargo run -p dcindex -- <command>

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dcindex::analysis::{terms::DocumentTerms, TermCorpus};
use dcindex::retrieval::{format_hits, run_info_needs_file};
use dcindex::vector::format_vector_hits;
use dcindex::{
    DcIndexConfig, DocumentNormalizer, DocumentSearcher, Language, RankingModel, SearchIndex,
    VectorIndex,
};

#[derive(Debug, Parser)]
#[command(
    name = "dcindex",
    version,
    about = "Normalize, index and search plain-text and Dublin Core XML documents"
)]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print one JSON record per ingested document
    Ingest {
        /// Documents folder
        #[arg(long, default_value = "docs")]
        docs: PathBuf,
        /// Skip files that fail to read or parse instead of aborting
        #[arg(long)]
        skip_failed: bool,
    },
    /// Print the bag-of-words terms of each document as JSON lines
    Terms {
        #[arg(long, default_value = "docs")]
        docs: PathBuf,
        /// english or spanish
        #[arg(long)]
        language: Option<Language>,
        /// Keep terms unstemmed
        #[arg(long)]
        no_stemming: bool,
    },
    /// Build (or rebuild) the full-text index from a documents folder
    Index {
        /// Index directory
        #[arg(long)]
        index: Option<PathBuf>,
        #[arg(long, default_value = "docs")]
        docs: PathBuf,
        #[arg(long)]
        skip_failed: bool,
    },
    /// Search the index interactively, or run a batch of information needs
    Search {
        #[arg(long)]
        index: Option<PathBuf>,
        /// Show modification times
        #[arg(long)]
        info: bool,
        /// File with one query per line
        #[arg(long, requires = "output")]
        info_needs: Option<PathBuf>,
        /// Where batch results are written
        #[arg(long, requires = "info_needs")]
        output: Option<PathBuf>,
        /// Maximum hits per query
        #[arg(long)]
        limit: Option<usize>,
        /// tfidf or bm25
        #[arg(long)]
        model: Option<RankingModel>,
    },
    /// Build a vector-space index over the documents' bag-of-words terms
    VectorIndex {
        #[arg(long, default_value = "docs")]
        docs: PathBuf,
        /// Vector index directory
        #[arg(long)]
        path: Option<PathBuf>,
        /// tfidf or bm25
        #[arg(long)]
        model: Option<RankingModel>,
        #[arg(long)]
        no_stemming: bool,
    },
    /// Rank documents against queries read from stdin with a vector index
    VectorSearch {
        #[arg(long)]
        path: Option<PathBuf>,
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dcindex=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => DcIndexConfig::from_toml_file(path)
            .with_context(|| format!("loading configuration from {:?}", path))?,
        None => DcIndexConfig::default(),
    };

    match cli.command {
        Command::Ingest { docs, skip_failed } => {
            config.ingestion.skip_failed |= skip_failed;
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for record in DocumentNormalizer::ingest_folder(&docs, &config.ingestion) {
                serde_json::to_writer(&mut out, &record?)?;
                writeln!(out)?;
            }
        }
        Command::Terms { docs, language, no_stemming } => {
            if let Some(language) = language {
                config.analysis.language = language;
            }
            config.vector.stemming &= !no_stemming;
            let analysis = config.vector.term_analysis(&config.analysis);
            let stdout = io::stdout();
            let mut out = stdout.lock();
            for terms in TermCorpus::new(&docs, &config.ingestion, analysis) {
                let terms: DocumentTerms = terms?;
                serde_json::to_writer(&mut out, &terms)?;
                writeln!(out)?;
            }
        }
        Command::Index { index, docs, skip_failed } => {
            if let Some(index) = index {
                config.index.path = index;
            }
            config.ingestion.skip_failed |= skip_failed;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Indexing {}", docs.display()));

            let search_index = SearchIndex::create(&config.index, &config.analysis)?;
            let summary = search_index.index_folder(&docs, &config.ingestion);
            spinner.finish_and_clear();

            let summary = summary.with_context(|| format!("indexing {:?}", docs))?;
            println!(
                "Indexed {} documents into {}",
                summary.documents_indexed,
                summary.index_path.display()
            );
        }
        Command::Search { index, info, info_needs, output, limit, model } => {
            if let Some(index) = index {
                config.index.path = index;
            }
            if let Some(model) = model {
                config.search.model = model;
            }
            let search_index = SearchIndex::open(&config.index.path, &config.analysis)?;
            let searcher = DocumentSearcher::new(&search_index, &config.search)?;
            tracing::info!("Ranking with {}", searcher.model());

            match (info_needs, output) {
                (Some(info_needs), Some(output)) => {
                    let limit = limit.unwrap_or(config.search.batch_limit);
                    let count = run_info_needs_file(&searcher, &info_needs, &output, limit)?;
                    println!("Ran {} queries, results written to {}", count, output.display());
                }
                _ => {
                    let limit = limit.or(config.search.limit);
                    read_queries(|query| {
                        let hits = searcher.search(query, limit)?;
                        print!("{}", format_hits(&hits, info));
                        Ok(())
                    })?
                }
            }
        }
        Command::VectorIndex { docs, path, model, no_stemming } => {
            if let Some(path) = path {
                config.vector.path = path;
            }
            if let Some(model) = model {
                config.vector.model = model;
            }
            config.vector.stemming &= !no_stemming;

            let spinner = ProgressBar::new_spinner();
            spinner.set_style(ProgressStyle::with_template("{spinner} {msg}")?);
            spinner.enable_steady_tick(Duration::from_millis(100));
            spinner.set_message(format!("Weighting terms of {}", docs.display()));

            let index = VectorIndex::build_folder(
                &docs,
                &config.ingestion,
                &config.vector,
                &config.analysis,
            );
            spinner.finish_and_clear();

            let index = index.with_context(|| format!("building vector index of {:?}", docs))?;
            let saved = index.save(&config.vector.path)?;
            println!(
                "Weighted {} documents with {} into {}",
                index.len(),
                index.model(),
                saved.display()
            );
        }
        Command::VectorSearch { path, limit } => {
            let path = path.unwrap_or(config.vector.path);
            let index = VectorIndex::load(&path)
                .with_context(|| format!("loading vector index from {:?}", path))?;
            tracing::info!("Ranking with {} over {} documents", index.model(), index.len());
            read_queries(|query| {
                print!("{}", format_vector_hits(&index.search(query, limit)));
                Ok(())
            })?
        }
    }

    Ok(())
}

/// Prompt for queries on stdin until EOF or `q`
fn read_queries<F>(mut run: F) -> anyhow::Result<()>
where
    F: FnMut(&str) -> dcindex::Result<()>,
{
    print!("Introduce a query: ");
    io::stdout().flush()?;
    for line in io::stdin().lock().lines() {
        let query = line?;
        if query.trim() == "q" {
            break;
        }
        run(&query)?;
        print!("Introduce a query ('q' for exit): ");
        io::stdout().flush()?;
    }
    Ok(())
}
