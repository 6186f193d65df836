//! Per-category crawl pipeline
//!
//! ```text
//! ┌─────────────┐     ┌─────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Category   │     │   Article   │     │   Article   │     │  Category   │
//! │  Collector  │────▶│   Fetcher   │────▶│   Parser    │────▶│   Writer    │
//! └─────────────┘     └─────────────┘     └─────────────┘     └─────────────┘
//!   listing pages       paced, one          headline +          TSV partition
//!   -> UrlSet           at a time           story text
//! ```
//!
//! One pipeline run handles one category, strictly sequentially. Categories
//! run in parallel as separate tasks sharing one [`CategoryPipeline`].

use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::crawler::list::CategoryCollector;
use crate::crawler::url::UrlClassifier;
use crate::crawler::{Pacing, PageFetcher};
use crate::models::{Category, CategoryReport, CategoryStatus, Quota, UrlSet};
use crate::parser::ArticleParser;
use crate::storage::{CategoryWriter, CorpusPaths, CorpusRow};
use crate::utils::error::CrawlerError;

// ============================================================================
// Pipeline
// ============================================================================

/// Collects, fetches, parses and writes one category at a time
pub struct CategoryPipeline {
    collector: CategoryCollector,
    fetcher: Arc<dyn PageFetcher>,
    parser: ArticleParser,
    paths: CorpusPaths,
    pacing: Pacing,
}

impl CategoryPipeline {
    /// Create a pipeline
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page fetcher, used for listings and articles
    /// * `classifier` - Article link classifier of the edition
    /// * `parser` - Article parser; its selectors also drive pagination
    /// * `paths` - Where partitions are written
    /// * `pacing` - Wait between listing pages and between articles
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: UrlClassifier,
        parser: ArticleParser,
        paths: CorpusPaths,
        pacing: Pacing,
    ) -> Self {
        let collector =
            CategoryCollector::new(Arc::clone(&fetcher), classifier, parser.selectors(), pacing);
        Self {
            collector,
            fetcher,
            parser,
            paths,
            pacing,
        }
    }

    #[must_use]
    pub fn paths(&self) -> &CorpusPaths {
        &self.paths
    }

    /// Crawl one category into its partition
    ///
    /// Rows are written only for articles with story text, and writing stops
    /// once `quota` rows exist. Articles that fail to load are skipped.
    ///
    /// # Errors
    ///
    /// - `CrawlerError::FirstPage` when the first listing page fails
    /// - `CrawlerError::Storage` when the partition cannot be written
    pub async fn run(
        &self,
        category: &Category,
        quota: Quota,
    ) -> Result<CategoryReport, CrawlerError> {
        tracing::info!(category = %category, url = %category.url, "Getting stories");

        let urls = self.collector.collect(category, quota).await?;

        tracing::info!(
            category = %category,
            found = urls.len(),
            pages = urls.pages_fetched(),
            "Stories found"
        );

        let (partition, rows_written, articles_skipped) =
            self.write_articles(category, &urls, quota).await?;

        let status = match urls.partial() {
            Some(failure) => CategoryStatus::Partial {
                page: failure.page,
                reason: failure.reason.clone(),
            },
            None => CategoryStatus::Complete,
        };

        tracing::info!(
            category = %category,
            rows_written,
            articles_skipped,
            "Scraping done"
        );

        Ok(CategoryReport {
            category: category.name.clone(),
            urls_found: urls.len(),
            pages_fetched: urls.pages_fetched(),
            rows_written,
            articles_skipped,
            status,
            partition: Some(partition),
        })
    }

    /// Run every category as its own task
    ///
    /// A failing or panicking category yields a failed report and never stops
    /// the others. Reports come back in the order of `categories`.
    pub async fn run_all(self: Arc<Self>, categories: &[Category], quota: Quota) -> Vec<CategoryReport> {
        let mut tasks = JoinSet::new();
        for (position, category) in categories.iter().cloned().enumerate() {
            let pipeline = Arc::clone(&self);
            tasks.spawn(async move {
                let report = match pipeline.run(&category, quota).await {
                    Ok(report) => report,
                    Err(e) => {
                        tracing::error!(category = %category, error = %e, "Category failed");
                        CategoryReport::failed(category.name.clone(), e.to_string())
                    }
                };
                (position, report)
            });
        }

        let mut reports: Vec<Option<CategoryReport>> = vec![None; categories.len()];
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((position, report)) => reports[position] = Some(report),
                Err(e) => tracing::error!(error = %e, "Category task aborted"),
            }
        }

        reports
            .into_iter()
            .zip(categories)
            .map(|(report, category)| {
                report.unwrap_or_else(|| {
                    tracing::error!(category = %category, "Category task panicked");
                    CategoryReport::failed(category.name.clone(), "category task panicked")
                })
            })
            .collect()
    }

    /// Fetch and write articles; returns `(partition, written, skipped)`
    async fn write_articles(
        &self,
        category: &Category,
        urls: &UrlSet,
        quota: Quota,
    ) -> Result<(PathBuf, usize, usize), CrawlerError> {
        let path = self.paths.category_path(&category.name);
        let mut writer = CategoryWriter::create(&path)?;
        let mut skipped = 0;

        tracing::debug!(category = %category, path = %path.display(), "Writing articles");

        for (index, url) in urls.iter().enumerate() {
            if quota.is_satisfied_by(writer.rows()) {
                tracing::info!(category = %category, %quota, "Requested number of articles reached");
                break;
            }
            if index > 0 {
                self.pacing.wait().await;
            }

            let html = match self.fetcher.fetch(url).await {
                Ok(html) => html,
                Err(e) => {
                    tracing::warn!(category = %category, url = %url, error = %e, "Skipping article");
                    skipped += 1;
                    continue;
                }
            };

            let article = self.parser.parse(&html, url);
            let Some(text) = article.text else {
                tracing::debug!(url = %url, "No story text, skipping");
                skipped += 1;
                continue;
            };

            writer.write(&CorpusRow {
                headline: article.headline,
                text,
                category: category.name.clone(),
                url: article.url,
            })?;
            tracing::debug!(category = %category, story = writer.rows(), "Wrote story");
        }

        let written = writer.finish()?;
        Ok((path, written, skipped))
    }
}
