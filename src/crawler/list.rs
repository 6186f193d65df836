//! Category listing crawler with pagination support
//!
//! Walks the numbered pages of one category listing, classifying every
//! anchor, until the quota is met or the announced page count is exhausted.

use scraper::{Html, Selector};
use std::sync::Arc;

use crate::crawler::url::UrlClassifier;
use crate::crawler::{Pacing, PageFetcher};
use crate::models::{Category, PartialFailure, Quota, UrlSet};
use crate::parser::{anchor_hrefs, page_count, PageSelectors};
use crate::utils::error::CrawlerError;

/// Paginated collector of article URLs for one edition
pub struct CategoryCollector {
    fetcher: Arc<dyn PageFetcher>,
    classifier: UrlClassifier,
    pagination_list: Selector,
    pacing: Pacing,
}

impl CategoryCollector {
    /// Create a collector
    ///
    /// # Arguments
    ///
    /// * `fetcher` - Shared page fetcher
    /// * `classifier` - Article link classifier of the edition
    /// * `selectors` - Compiled page selectors (pagination list is used)
    /// * `pacing` - Wait between consecutive listing pages
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: UrlClassifier,
        selectors: &PageSelectors,
        pacing: Pacing,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            pagination_list: selectors.pagination_list.clone(),
            pacing,
        }
    }

    /// Collect article URLs of a category
    ///
    /// Page 1 is always fetched. When it alone satisfies the quota the set is
    /// returned whole, without looking at the page count. Otherwise pages
    /// `2..=count` are fetched in order and the quota is re-checked after
    /// each. A failing later page ends the walk with a partial result.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::FirstPage` when page 1 cannot be fetched
    pub async fn collect(&self, category: &Category, quota: Quota) -> Result<UrlSet, CrawlerError> {
        let mut urls = UrlSet::new();

        tracing::debug!(category = %category, url = %category.url, "Fetching listing page 1");

        let body = self
            .fetcher
            .fetch(&category.url)
            .await
            .map_err(|source| CrawlerError::FirstPage {
                category: category.name.clone(),
                url: category.url.clone(),
                source,
            })?;

        let total_pages = {
            let document = Html::parse_document(&body);
            self.accumulate(&document, &mut urls);
            page_count(&document, &self.pagination_list)
        };
        urls.record_page();
        urls.set_total_pages(total_pages);

        tracing::debug!(
            category = %category,
            total_pages,
            found = urls.len(),
            "Processed listing page 1"
        );

        if quota.is_satisfied_by(urls.len()) {
            tracing::debug!(category = %category, %quota, "Quota met on first page");
            return Ok(urls);
        }

        for page in 2..=total_pages {
            self.pacing.wait().await;

            let url = page_url(&category.url, page);
            let body = match self.fetcher.fetch(&url).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(
                        category = %category,
                        page,
                        url = %url,
                        error = %e,
                        kept = urls.len(),
                        "Listing page failed, keeping URLs collected so far"
                    );
                    urls.mark_partial(PartialFailure {
                        page,
                        url,
                        reason: e.to_string(),
                    });
                    break;
                }
            };

            let added = {
                let document = Html::parse_document(&body);
                self.accumulate(&document, &mut urls)
            };
            urls.record_page();

            tracing::debug!(
                category = %category,
                page,
                added,
                total = urls.len(),
                "Processed listing page"
            );

            if quota.is_satisfied_by(urls.len()) {
                tracing::debug!(category = %category, page, %quota, "Quota met");
                break;
            }
        }

        Ok(urls)
    }

    /// Classify the anchors of a listing page into `urls`; returns how many were new
    fn accumulate(&self, document: &Html, urls: &mut UrlSet) -> usize {
        urls.extend(self.classifier.article_urls(anchor_hrefs(document)))
    }
}

/// URL of listing page `page` for a category seed
///
/// # Examples
///
/// ```
/// use tafiti::crawler::list::page_url;
///
/// assert_eq!(
///     page_url("https://www.bbc.com/hausa/topics/c1", 3),
///     "https://www.bbc.com/hausa/topics/c1?page=3"
/// );
/// assert_eq!(
///     page_url("https://www.bbc.com/hausa/popular/read?lang=ha", 2),
///     "https://www.bbc.com/hausa/popular/read?lang=ha&page=2"
/// );
/// ```
#[must_use]
pub fn page_url(seed: &str, page: u32) -> String {
    let separator = if seed.contains('?') { '&' } else { '?' };
    format!("{seed}{separator}page={page}")
}
