use anyhow::{Context, Result};
use chrono::Utc;
use std::path::PathBuf;
use std::sync::Arc;

use tafiti::config::{Config, EditionConfig};
use tafiti::crawler::{
    BbcFetcher, CategoryPipeline, Pacing, PageFetcher, TopicDiscovery, UrlClassifier,
};
use tafiti::models::{CategoryStatus, CrawlSummary, Quota};
use tafiti::parser::ArticleParser;
use tafiti::storage::{merge_files, remove_partitions, CorpusPaths};
use tafiti::utils::truncate_str;

/// Arguments of the `crawl` command
#[derive(Debug, Clone)]
pub struct CrawlParams {
    pub language: String,
    /// Merged corpus path; falls back to the configured one
    pub output_file_name: Option<PathBuf>,
    /// Total article budget, `-1` for unbounded
    pub no_of_articles: i64,
    /// `all` or comma-separated category names
    pub categories: String,
    pub no_time_delay: bool,
    pub spread: bool,
    pub cleanup: bool,
}

pub async fn crawl(config: Config, params: CrawlParams) -> Result<CrawlSummary> {
    let started_at = Utc::now();
    let edition = config.edition(&params.language)?.clone();

    println!("Starting BBC {} crawl", edition.name);
    println!("========================");

    let output = params
        .output_file_name
        .clone()
        .unwrap_or_else(|| config.output.output_file_name.clone());
    let paths = CorpusPaths::new(&output)?;
    let pacing = Pacing::from_flag(config.page_delay(), params.no_time_delay);

    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        BbcFetcher::new(&config.crawler, &edition).context("Failed to create fetcher")?,
    );
    let classifier = UrlClassifier::new(&edition);
    let parser = ArticleParser::new(&config.selectors).context("Invalid selector configuration")?;

    let mut categories = edition.select_categories(&params.categories)?;
    if EditionConfig::selects_all(&params.categories) {
        let discovery =
            TopicDiscovery::new(Arc::clone(&fetcher), classifier.clone(), parser.selectors());
        match discovery.discover(&categories).await {
            Ok(topics) => categories.extend(topics),
            Err(e) => {
                tracing::warn!(error = %e, "Topic discovery failed, crawling configured categories only");
            }
        }
    }

    let quota = Quota::per_category(params.no_of_articles, params.spread, &categories);
    if params.spread && quota.limit().is_some() {
        tracing::info!(%quota, categories = categories.len(), "Spreading articles across categories");
    }

    println!("Edition: {} ({})", edition.name, edition.code);
    println!("Categories: {}", categories.len());
    println!("Articles per category: {quota}");
    println!("Output: {}", paths.merged_path().display());

    let pipeline = Arc::new(CategoryPipeline::new(
        fetcher,
        classifier,
        parser,
        paths.clone(),
        pacing,
    ));

    let reports = pipeline.run_all(&categories, quota).await;

    let written: Vec<PathBuf> = reports.iter().filter_map(|r| r.partition.clone()).collect();
    let merge = merge_files(&paths, written).context("Failed to merge category files")?;
    if params.cleanup || config.output.cleanup {
        remove_partitions(&merge.files).context("Failed to remove category files")?;
    }

    let summary = CrawlSummary {
        edition: edition.code.clone(),
        quota_per_category: quota,
        categories: reports,
        merged_rows: merge.rows_written,
        started_at,
        finished_at: Utc::now(),
    };

    print_summary(&summary, &merge.output);
    Ok(summary)
}

fn print_summary(summary: &CrawlSummary, output: &std::path::Path) {
    println!("\nCrawl Summary");
    println!("=============");
    for report in &summary.categories {
        let status = match &report.status {
            CategoryStatus::Complete => "complete".to_string(),
            CategoryStatus::Partial { page, .. } => format!("partial (stopped at page {page})"),
            CategoryStatus::Failed { reason } => format!("failed: {}", truncate_str(reason, 80)),
        };
        println!(
            "  {:<24} urls: {:>5}  rows: {:>5}  {status}",
            report.category, report.urls_found, report.rows_written
        );
    }
    println!();
    println!("Rows written: {}", summary.total_rows());
    println!("Merged rows: {}", summary.merged_rows);
    println!("Failed categories: {}", summary.failed_categories());
    println!("Elapsed: {}s", summary.duration_secs());
    println!("Corpus: {}", output.display());
}
