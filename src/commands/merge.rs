use anyhow::{Context, Result};
use std::path::PathBuf;

use tafiti::config::Config;
use tafiti::storage::{merge_partitions, remove_partitions, CorpusPaths};

/// Merge existing category files into the corpus
pub fn merge(config: Config, output_file_name: Option<PathBuf>, cleanup: bool) -> Result<()> {
    let output = output_file_name.unwrap_or(config.output.output_file_name);
    let paths = CorpusPaths::new(&output)?;

    let report = merge_partitions(&paths).context("Failed to merge category files")?;
    if report.files.is_empty() {
        tracing::warn!(dir = %paths.dir().display(), "No category files found");
    }

    println!("Merged {} category files", report.files.len());
    println!("  Rows read: {}", report.rows_read);
    println!("  Duplicate URLs dropped: {}", report.duplicates);
    println!("  Rows written: {}", report.rows_written);
    println!("  Corpus: {}", report.output.display());

    if cleanup || config.output.cleanup {
        remove_partitions(&report.files).context("Failed to remove category files")?;
        println!("  Removed {} category files", report.files.len());
    }

    Ok(())
}
