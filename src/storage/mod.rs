//! Corpus files on disk
//!
//! Each category is written to its own tab-separated partition next to the
//! merged corpus: `data/corpus.tsv` gets `data/LABARAI_corpus.tsv`,
//! `data/MOST_POPULAR_corpus.tsv` and so on. Partitions are merged once every
//! category has finished.

pub mod merge;

pub use merge::{merge_files, merge_partitions, remove_partitions, MergeReport};

use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::path::{Path, PathBuf};

use crate::utils::clean_string;
use crate::utils::error::StorageError;

/// Column names of every corpus file
pub const HEADER: [&str; 4] = ["headline", "text", "category", "url"];

/// One corpus line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusRow {
    pub headline: Option<String>,
    pub text: String,
    pub category: String,
    pub url: String,
}

/// Locations of the merged corpus and its per-category partitions
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorpusPaths {
    dir: PathBuf,
    file_name: String,
}

impl CorpusPaths {
    /// Split the merged output path into directory and file name
    ///
    /// # Errors
    ///
    /// Returns `StorageError::InvalidPath` when the path has no file name
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use tafiti::storage::CorpusPaths;
    ///
    /// let paths = CorpusPaths::new(Path::new("data/bbc_pidgin_corpus.tsv")).unwrap();
    /// assert_eq!(
    ///     paths.category_path("MOST POPULAR"),
    ///     Path::new("data/MOST_POPULAR_bbc_pidgin_corpus.tsv")
    /// );
    /// ```
    pub fn new(output_file: &Path) -> Result<Self, StorageError> {
        let file_name = output_file
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| StorageError::InvalidPath(output_file.display().to_string()))?
            .to_string();

        let dir = match output_file.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Ok(Self { dir, file_name })
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Partition file of a category
    #[must_use]
    pub fn category_path(&self, category: &str) -> PathBuf {
        self.dir
            .join(format!("{}_{}", clean_string(category), self.file_name))
    }

    /// Merged corpus file
    #[must_use]
    pub fn merged_path(&self) -> PathBuf {
        self.dir.join(&self.file_name)
    }

    /// Existing partition files (`*_{file_name}`), sorted by path
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` when the directory cannot be listed
    pub fn partition_files(&self) -> Result<Vec<PathBuf>, StorageError> {
        let suffix = format!("_{}", self.file_name);
        let entries = fs::read_dir(&self.dir).map_err(|e| StorageError::io(&self.dir, e))?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| StorageError::io(&self.dir, e))?;
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            if name.starts_with('.') || !name.ends_with(&suffix) {
                continue;
            }
            if entry.path().is_file() {
                files.push(entry.path());
            }
        }

        files.sort();
        Ok(files)
    }
}

/// Open a tab-separated writer that always starts with [`HEADER`]
pub(crate) fn tsv_writer(path: &Path) -> Result<csv::Writer<File>, StorageError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| StorageError::io(parent, e))?;
    }

    let file = File::create(path).map_err(|e| StorageError::io(path, e))?;
    let mut writer = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(false)
        .from_writer(file);
    writer.write_record(HEADER)?;
    Ok(writer)
}

/// Open a tab-separated reader over a corpus file
pub(crate) fn tsv_reader(path: &Path) -> Result<csv::Reader<File>, StorageError> {
    let file = File::open(path).map_err(|e| StorageError::io(path, e))?;
    Ok(csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .terminator(csv::Terminator::Any(b'\n'))
        .has_headers(true)
        .from_reader(file))
}

/// Writer of one category partition
pub struct CategoryWriter {
    writer: csv::Writer<File>,
    path: PathBuf,
    rows: usize,
}

impl CategoryWriter {
    /// Create (truncate) the partition and write the header
    ///
    /// # Errors
    ///
    /// Returns an error when the file or its directory cannot be created
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        Ok(Self {
            writer: tsv_writer(path)?,
            path: path.to_path_buf(),
            rows: 0,
        })
    }

    /// Append one row
    ///
    /// # Errors
    ///
    /// Returns an error when the row cannot be written
    pub fn write(&mut self, row: &CorpusRow) -> Result<(), StorageError> {
        self.writer.serialize(row)?;
        self.rows += 1;
        Ok(())
    }

    /// Rows written so far
    #[must_use]
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush and close; returns the number of rows written
    ///
    /// # Errors
    ///
    /// Returns an error when buffered rows cannot be flushed
    pub fn finish(mut self) -> Result<usize, StorageError> {
        self.writer
            .flush()
            .map_err(|e| StorageError::io(&self.path, e))?;
        Ok(self.rows)
    }
}
