//! Folder ingestion: one `DocumentRecord` per recognized source file

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use super::timestamp::modified_timestamp;
use super::xml::{self, MetadataField};
use crate::config::IngestionConfig;
use crate::error::{Error, Result};
use crate::types::{DocumentRecord, SourceKind};

/// Converts source files into `DocumentRecord`s
pub struct DocumentNormalizer;

impl DocumentNormalizer {
    /// Lazily ingest every `.txt` and `.xml` file directly inside `folder`,
    /// in lexicographic file-name order.
    ///
    /// A folder that does not exist yields nothing. Unless
    /// `config.skip_failed` is set, the first failing file is yielded as an
    /// error and ends the iteration.
    pub fn ingest_folder(folder: impl AsRef<Path>, config: &IngestionConfig) -> FolderIngest {
        let folder = folder.as_ref().to_path_buf();

        let entries = if folder.is_dir() {
            Some(
                WalkDir::new(&folder)
                    .min_depth(1)
                    .max_depth(1)
                    .follow_links(true)
                    .sort_by_file_name()
                    .into_iter(),
            )
        } else {
            tracing::warn!("Documents folder {:?} not found, nothing to ingest", folder);
            None
        };

        FolderIngest {
            folder,
            entries,
            skip_failed: config.skip_failed,
            finished: false,
        }
    }

    /// Ingest a whole folder, stopping at the first error
    pub fn ingest_folder_all(
        folder: impl AsRef<Path>,
        config: &IngestionConfig,
    ) -> Result<Vec<DocumentRecord>> {
        let records = Self::ingest_folder(folder, config).collect::<Result<Vec<_>>>()?;
        tracing::info!("Ingested {} documents", records.len());
        Ok(records)
    }

    /// Ingest one file, dispatching on its name. Returns `None` for names
    /// that are neither `.txt` nor `.xml`.
    pub fn ingest_file(folder: &Path, file_name: &str) -> Result<Option<DocumentRecord>> {
        let Some(kind) = SourceKind::from_file_name(file_name) else {
            return Ok(None);
        };
        tracing::trace!("Reading {} as {}", file_name, kind.display_name());
        match kind {
            SourceKind::Xml => Self::ingest_xml(folder, file_name).map(Some),
            SourceKind::PlainText => Self::ingest_plain_text(folder, file_name).map(Some),
        }
    }

    /// Plain text carries no metadata: only `content` and the timestamp are set
    pub fn ingest_plain_text(folder: &Path, file_name: &str) -> Result<DocumentRecord> {
        let path = folder.join(file_name);
        let text = std::fs::read_to_string(&path).map_err(|e| Error::file_read(&path, e))?;
        let modified = modified_timestamp(&path)?;

        tracing::debug!("Ingested text file {}", file_name);
        Ok(DocumentRecord::plain(
            file_name.to_string(),
            join_text_lines(&text),
            modified,
        ))
    }

    /// Parse an XML file and map its Dublin Core elements onto the record
    pub fn ingest_xml(folder: &Path, file_name: &str) -> Result<DocumentRecord> {
        let path = folder.join(file_name);
        let bytes = std::fs::read(&path).map_err(|e| Error::file_read(&path, e))?;
        let text = String::from_utf8(bytes)
            .map_err(|e| Error::malformed(file_name, format!("not valid UTF-8: {}", e)))?;

        let extracted = xml::extract(file_name, &text)?;
        let modified = modified_timestamp(&path)?;

        tracing::debug!("Ingested XML file {}", file_name);
        Ok(DocumentRecord {
            path: file_name.to_string(),
            content: extracted.flattened_text(),
            title: extracted.joined(MetadataField::Title),
            work_type: extracted.joined(MetadataField::Type),
            author_names: extracted.joined(MetadataField::Creator),
            contributor_names: extracted.joined(MetadataField::Contributor),
            subjects: extracted.joined(MetadataField::Subject),
            description: extracted.joined(MetadataField::Description),
            date: extracted.joined(MetadataField::Date),
            publisher_or_department: extracted.joined(MetadataField::Publisher),
            identifier: extracted.joined(MetadataField::Identifier),
            modified_timestamp: modified,
        })
    }
}

/// Join non-blank lines with single spaces, keeping each line as written
pub fn join_text_lines(text: &str) -> String {
    super::split_lines(text)
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Lazy, sorted, single-pass ingestion of one folder
pub struct FolderIngest {
    folder: PathBuf,
    entries: Option<walkdir::IntoIter>,
    skip_failed: bool,
    finished: bool,
}

impl FolderIngest {
    fn fail(&mut self, err: Error) -> Option<Result<DocumentRecord>> {
        self.finished = true;
        Some(Err(err))
    }
}

impl Iterator for FolderIngest {
    type Item = Result<DocumentRecord>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        loop {
            let entry = match self.entries.as_mut()?.next()? {
                Ok(entry) => entry,
                Err(e) => return self.fail(Error::Walk(e)),
            };

            if entry.file_type().is_dir() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            match DocumentNormalizer::ingest_file(&self.folder, &file_name) {
                Ok(Some(record)) => return Some(Ok(record)),
                Ok(None) => {
                    tracing::trace!("Skipping {}: not a .txt or .xml file", file_name);
                }
                Err(e) if self.skip_failed && e.is_per_file() => {
                    tracing::warn!("Skipping {}: {}", file_name, e);
                }
                Err(e) => {
                    tracing::error!(
                        "Aborting ingestion of {:?} at {}: {}",
                        self.folder,
                        file_name,
                        e
                    );
                    return self.fail(e);
                }
            }
        }
    }
}
