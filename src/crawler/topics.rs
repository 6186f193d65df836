//! Topic discovery from article pages
//!
//! The homepage of an edition links to current articles, and each article
//! page carries a short list of topics. Topics not configured for the edition
//! become extra categories when every category is crawled.

use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;

use crate::crawler::url::UrlClassifier;
use crate::crawler::PageFetcher;
use crate::models::{Category, CategorySource, UrlSet};
use crate::parser::{anchor_hrefs, topic_links, PageSelectors};
use crate::utils::error::CrawlerError;

/// Finds topic categories linked from homepage articles
pub struct TopicDiscovery {
    fetcher: Arc<dyn PageFetcher>,
    classifier: UrlClassifier,
    topic_items: Vec<Selector>,
}

impl TopicDiscovery {
    #[must_use]
    pub fn new(
        fetcher: Arc<dyn PageFetcher>,
        classifier: UrlClassifier,
        selectors: &PageSelectors,
    ) -> Self {
        Self {
            fetcher,
            classifier,
            topic_items: selectors.topic_items.clone(),
        }
    }

    /// Discover topics not already in `known`
    ///
    /// A topic is new when neither its URL nor its name is known; the first
    /// occurrence wins. Article pages that fail to load are skipped.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::Homepage` when the edition homepage cannot be fetched
    pub async fn discover(&self, known: &[Category]) -> Result<Vec<Category>, CrawlerError> {
        let edition = self.classifier.edition();
        let homepage = edition.homepage();

        let body = self
            .fetcher
            .fetch(&homepage)
            .await
            .map_err(|source| CrawlerError::Homepage {
                url: homepage.clone(),
                source,
            })?;

        let mut articles = UrlSet::new();
        {
            let document = Html::parse_document(&body);
            articles.extend(self.classifier.article_urls(anchor_hrefs(&document)));
        }

        tracing::info!(
            edition = %edition.code,
            articles = articles.len(),
            "Scanning homepage articles for topics"
        );

        let mut known_urls: HashSet<String> = known.iter().map(|c| c.url.clone()).collect();
        let mut known_names: HashSet<String> = known.iter().map(|c| c.name.clone()).collect();
        let mut discovered = Vec::new();

        for article in articles.iter() {
            let body = match self.fetcher.fetch(article).await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(url = %article, error = %e, "Skipping article during topic discovery");
                    continue;
                }
            };

            let links = {
                let document = Html::parse_document(&body);
                topic_links(&document, &self.topic_items)
            };

            for link in links {
                let url = edition.resolve(&link.href);
                if link.name.is_empty() || known_urls.contains(&url) || known_names.contains(&link.name)
                {
                    continue;
                }

                tracing::debug!(topic = %link.name, url = %url, "Discovered topic");
                known_urls.insert(url.clone());
                known_names.insert(link.name.clone());
                discovered.push(Category::new(link.name, url, CategorySource::Discovered));
            }
        }

        tracing::info!(
            edition = %edition.code,
            topics = discovered.len(),
            "Topic discovery finished"
        );

        Ok(discovered)
    }
}
