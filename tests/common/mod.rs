//! Common test utilities

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use tafiti::config::{Config, EditionConfig};
use tafiti::crawler::{BbcFetcher, PageFetcher};
use tafiti::parser::{ArticleParser, PageSelectors};

/// Built-in edition with its origin pointed at a mock server
pub fn mock_edition(code: &str, origin: &str) -> EditionConfig {
    let mut edition = Config::default()
        .edition(code)
        .expect("built-in edition")
        .clone();
    edition.origin = origin.trim_end_matches('/').to_string();
    edition
}

/// Fast fetcher for mock servers
pub fn mock_fetcher(edition: &EditionConfig) -> Arc<dyn PageFetcher> {
    Arc::new(
        BbcFetcher::with_rate(1000, Duration::from_secs(5), false, edition)
            .expect("fetcher")
            .with_user_agent(Some("tafiti-test/0.1".to_string())),
    )
}

pub fn default_selectors() -> PageSelectors {
    PageSelectors::from_config(&Config::default().selectors).expect("default selectors")
}

pub fn default_parser() -> ArticleParser {
    ArticleParser::new(&Config::default().selectors).expect("default parser")
}

/// Listing page with the given anchors and an optional pagination list
pub fn listing_html(links: &[&str], pages: Option<u32>) -> String {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<li><a href="{href}">Labari</a></li>"#))
        .collect();
    let pagination = pages
        .map(|n| {
            let items: String = (1..=n)
                .map(|i| format!(r#"<li><a href="?page={i}">{i}</a></li>"#))
                .collect();
            format!(r#"<nav><ul class="bbc-1hz4f7k e1mvc6ub0">{items}</ul></nav>"#)
        })
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html><html><head><title>BBC</title></head>
<body><main><ul>{anchors}</ul>{pagination}</main></body></html>"#
    )
}

/// Article page with a headline, story paragraphs and topic entries
pub fn article_html(headline: &str, paragraphs: &[&str], topics: &[(&str, &str)]) -> String {
    let story: String = paragraphs.iter().map(|p| format!("<p>{p}</p>")).collect();
    let topic_items: String = topics
        .iter()
        .map(|(name, href)| format!(r#"<li class="bbc-1rvqdin"><a href="{href}">{name}</a></li>"#))
        .collect();
    format!(
        r#"<!DOCTYPE html><html><head><title>{headline}</title></head>
<body><main>
<h1 class="bbc-1tk77pb e1p3vdyi0">{headline}</h1>
<div class="bbc-19j92fr ebmt73l0">{story}</div>
<aside><ul>{topic_items}</ul></aside>
</main></body></html>"#
    )
}
