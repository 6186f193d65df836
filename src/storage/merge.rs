//! Merging category partitions into the final corpus

use serde::Serialize;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use super::{tsv_reader, tsv_writer, CorpusPaths, CorpusRow};
use crate::utils::error::StorageError;

/// Outcome of a merge
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeReport {
    /// Partitions read, in merge order
    pub files: Vec<PathBuf>,
    pub rows_read: usize,
    pub rows_written: usize,
    /// Rows dropped because a later row had the same URL
    pub duplicates: usize,
    pub output: PathBuf,
}

/// Concatenate every partition found next to the corpus and write the merged corpus
///
/// # Errors
///
/// Returns an error when the output directory cannot be listed, a partition
/// cannot be read or the corpus cannot be written
pub fn merge_partitions(paths: &CorpusPaths) -> Result<MergeReport, StorageError> {
    merge_files(paths, paths.partition_files()?)
}

/// Concatenate the given partitions and write the merged corpus
///
/// Partitions are read in path order. Rows sharing a URL collapse to the last
/// one read, which keeps its position in the concatenation.
///
/// # Errors
///
/// Returns an error when a partition cannot be read or the corpus cannot be written
pub fn merge_files(
    paths: &CorpusPaths,
    mut files: Vec<PathBuf>,
) -> Result<MergeReport, StorageError> {
    files.sort();
    files.dedup();

    let mut rows: Vec<CorpusRow> = Vec::new();
    for file in &files {
        let mut reader = tsv_reader(file)?;
        let before = rows.len();
        for row in reader.deserialize() {
            rows.push(row?);
        }
        tracing::debug!(file = %file.display(), rows = rows.len() - before, "Read partition");
    }

    let rows_read = rows.len();
    let merged = keep_last_by_url(rows);

    let output = paths.merged_path();
    let mut writer = tsv_writer(&output)?;
    for row in &merged {
        writer.serialize(row)?;
    }
    writer.flush().map_err(|e| StorageError::io(&output, e))?;

    tracing::info!(
        files = files.len(),
        rows_read,
        rows_written = merged.len(),
        output = %output.display(),
        "Merged corpus written"
    );

    Ok(MergeReport {
        files,
        rows_read,
        rows_written: merged.len(),
        duplicates: rows_read - merged.len(),
        output,
    })
}

/// Delete merged partitions
///
/// # Errors
///
/// Returns the first file that cannot be removed
pub fn remove_partitions(files: &[PathBuf]) -> Result<(), StorageError> {
    for file in files {
        fs::remove_file(file).map_err(|e| StorageError::io(file, e))?;
        tracing::debug!(file = %file.display(), "Removed partition");
    }
    Ok(())
}

fn keep_last_by_url(rows: Vec<CorpusRow>) -> Vec<CorpusRow> {
    let last: HashMap<&str, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| (row.url.as_str(), i))
        .collect();
    let keep: Vec<bool> = rows
        .iter()
        .enumerate()
        .map(|(i, row)| last.get(row.url.as_str()) == Some(&i))
        .collect();

    rows.into_iter()
        .zip(keep)
        .filter_map(|(row, keep)| keep.then_some(row))
        .collect()
}
