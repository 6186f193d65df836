//! HTML parsing and data extraction
//!
//! Listing pages yield anchor hrefs and a page count; article pages yield a
//! headline, the story text and the topic links used for discovery.

pub mod selectors;

pub use selectors::PageSelectors;

use scraper::{ElementRef, Html, Selector};

use crate::config::SelectorConfig;
use crate::models::ParsedArticle;
use crate::utils::error::ParseError;
use selectors::{ANCHORS, LIST_ITEMS};

/// Every anchor `href` of a document, in document order
pub fn anchor_hrefs(document: &Html) -> Vec<&str> {
    document
        .select(&ANCHORS)
        .filter_map(|a| a.value().attr("href"))
        .collect()
}

/// Highest page number announced by the pagination list
///
/// Reads the text of the last `li` of the first matching list. A missing
/// list, an empty list or non-numeric text all mean a single page.
pub fn page_count(document: &Html, pagination_list: &Selector) -> u32 {
    document
        .select(pagination_list)
        .next()
        .and_then(|list| list.select(&LIST_ITEMS).last())
        .and_then(|item| element_text(item).parse::<u32>().ok())
        .filter(|&n| n >= 1)
        .unwrap_or(1)
}

/// A topic entry found on an article page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TopicLink {
    pub name: String,
    /// `href` as found in the page
    pub href: String,
}

/// Topic links of an article page
///
/// Uses the first configured topic-list class that matches anything; entries
/// without an anchor `href` are skipped.
pub fn topic_links(document: &Html, topic_items: &[Selector]) -> Vec<TopicLink> {
    let Some(items) = topic_items
        .iter()
        .map(|selector| document.select(selector).collect::<Vec<_>>())
        .find(|items| !items.is_empty())
    else {
        return Vec::new();
    };

    items
        .into_iter()
        .filter_map(|item| {
            let anchor = item.select(&ANCHORS).next()?;
            let href = anchor.value().attr("href")?.trim();
            if href.is_empty() {
                return None;
            }
            Some(TopicLink {
                name: crate::utils::normalize_whitespace(&element_text(anchor)),
                href: href.to_string(),
            })
        })
        .collect()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts headline and story text from article pages
#[derive(Debug, Clone)]
pub struct ArticleParser {
    selectors: PageSelectors,
}

impl ArticleParser {
    /// Create a parser from configured classes
    ///
    /// # Errors
    ///
    /// Returns an error when a configured class does not compile
    pub fn new(config: &SelectorConfig) -> Result<Self, ParseError> {
        Ok(Self::with_selectors(PageSelectors::from_config(config)?))
    }

    #[must_use]
    pub fn with_selectors(selectors: PageSelectors) -> Self {
        Self { selectors }
    }

    #[must_use]
    pub fn selectors(&self) -> &PageSelectors {
        &self.selectors
    }

    /// Parse an article page
    ///
    /// Paragraphs are trimmed, carriage returns dropped and newlines written as
    /// a literal `\n` so one article stays on one TSV line.
    pub fn parse(&self, html: &str, url: &str) -> ParsedArticle {
        let document = Html::parse_document(html);
        self.parse_document(&document, url)
    }

    pub fn parse_document(&self, document: &Html, url: &str) -> ParsedArticle {
        ParsedArticle {
            headline: self.headline(document),
            text: self.story_text(document),
            url: url.to_string(),
        }
    }

    fn headline(&self, document: &Html) -> Option<String> {
        self.selectors
            .headlines
            .iter()
            .chain(&self.selectors.headline_fallbacks)
            .find_map(|selector| document.select(selector).next())
            .map(element_text)
            .filter(|text| !text.is_empty())
    }

    fn story_text(&self, document: &Html) -> Option<String> {
        let text = document
            .select(&self.selectors.story_paragraphs)
            .map(|p| element_text(p).replace('\r', "").replace('\n', "\\n"))
            .collect::<Vec<_>>()
            .join(" ");

        let text = text.trim();
        (!text.is_empty()).then(|| text.to_string())
    }
}
