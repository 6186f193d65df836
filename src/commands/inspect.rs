use anyhow::{Context, Result};
use serde::Serialize;
use std::io::Write;
use std::sync::Arc;

use tafiti::config::{Config, EditionConfig};
use tafiti::crawler::url::{Rejection, Verdict};
use tafiti::crawler::{BbcFetcher, CategoryCollector, Pacing, PageFetcher, UrlClassifier};
use tafiti::models::Quota;
use tafiti::parser::PageSelectors;

/// One collected URL, printed as a JSON line
#[derive(Debug, Serialize)]
struct UrlLine<'a> {
    category: &'a str,
    url: &'a str,
}

/// Collect and print article URLs without fetching the articles
pub async fn urls(
    config: Config,
    language: String,
    categories: String,
    no_of_articles: i64,
    no_time_delay: bool,
) -> Result<()> {
    let edition = config.edition(&language)?.clone();
    let selected = edition.select_categories(&categories)?;
    let quota = Quota::from_arg(no_of_articles);

    let fetcher: Arc<dyn PageFetcher> = Arc::new(
        BbcFetcher::new(&config.crawler, &edition).context("Failed to create fetcher")?,
    );
    let selectors =
        PageSelectors::from_config(&config.selectors).context("Invalid selector configuration")?;
    let collector = CategoryCollector::new(
        fetcher,
        UrlClassifier::new(&edition),
        &selectors,
        Pacing::from_flag(config.page_delay(), no_time_delay),
    );

    let stdout = std::io::stdout();
    for category in &selected {
        let urls = match collector.collect(category, quota).await {
            Ok(urls) => urls,
            Err(e) => {
                tracing::error!(category = %category, error = %e, "Category failed");
                continue;
            }
        };

        let mut out = stdout.lock();
        for url in urls.iter() {
            let line = serde_json::to_string(&UrlLine {
                category: &category.name,
                url,
            })?;
            writeln!(out, "{line}")?;
        }

        tracing::info!(
            category = %category,
            urls = urls.len(),
            pages = urls.pages_fetched(),
            partial = urls.partial().is_some(),
            "Collected"
        );
    }

    Ok(())
}

/// Classify links given on the command line
pub fn classify(config: Config, language: String, links: Vec<String>) -> Result<()> {
    let edition = config.edition(&language)?;
    let classifier = UrlClassifier::new(edition);

    for link in links {
        let verdict = match classifier.verdict(&link) {
            Verdict::ArticlePath => "article (articles prefix)",
            Verdict::NumberedSection => "article (numbered section page)",
            Verdict::Rejected(Rejection::Empty) => "rejected (empty)",
            Verdict::Rejected(Rejection::NoNumericSuffix) => "rejected (no numeric suffix)",
            Verdict::Rejected(Rejection::OutsideSections) => "rejected (outside sections)",
            Verdict::Rejected(Rejection::Excluded) => "rejected (excluded prefix)",
        };
        println!("{link}\t{verdict}");
    }

    Ok(())
}

/// List configured editions and their categories
pub fn editions(config: Config) -> Result<()> {
    println!("Configured editions");
    println!("===================");
    for edition in &config.editions {
        print_edition(edition);
    }
    Ok(())
}

fn print_edition(edition: &EditionConfig) {
    let aliases = if edition.aliases.is_empty() {
        String::new()
    } else {
        format!(" ({})", edition.aliases.join(", "))
    };
    println!("\n{}{aliases} - {}", edition.code, edition.name);
    println!("  Homepage: {}", edition.homepage());
    for (name, url) in &edition.categories {
        println!("  {name:<16} {}", edition.resolve(url));
    }
}
