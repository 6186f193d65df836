//! Article link classification for BBC language editions
//!
//! A single classifier is parameterised by an [`EditionConfig`] prefix table.
//! It decides whether an anchor `href` points at a real article (as opposed
//! to a topic index, radio section or navigation link) and normalises
//! accepted links to absolute URLs on the edition origin.

use crate::config::{DigitCheck, EditionConfig};

/// Why a link was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Empty or whitespace-only href
    Empty,
    /// Path does not end in a decimal digit
    NoNumericSuffix,
    /// Path is outside every section of the edition
    OutsideSections,
    /// Path matches an exclusion prefix (topics, radio, ...)
    Excluded,
}

/// Classification result with the rule that decided it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Path starts with an articles prefix
    ArticlePath,
    /// Numbered page inside a section
    NumberedSection,
    Rejected(Rejection),
}

impl Verdict {
    #[must_use]
    pub fn is_article(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }
}

/// Article link classifier for one edition
///
/// Pure: the verdict depends only on the href and the edition table.
#[derive(Debug, Clone)]
pub struct UrlClassifier {
    edition: EditionConfig,
}

impl UrlClassifier {
    #[must_use]
    pub fn new(edition: &EditionConfig) -> Self {
        Self {
            edition: edition.clone(),
        }
    }

    #[must_use]
    pub fn edition(&self) -> &EditionConfig {
        &self.edition
    }

    /// Root-relative path of a link, with the edition origin stripped
    ///
    /// # Examples
    ///
    /// ```
    /// use tafiti::config::Config;
    /// use tafiti::crawler::url::UrlClassifier;
    ///
    /// let config = Config::default();
    /// let classifier = UrlClassifier::new(config.edition("hau").unwrap());
    /// assert_eq!(
    ///     classifier.path_of("https://www.bbc.com/hausa/labarai-123"),
    ///     "/hausa/labarai-123"
    /// );
    /// ```
    #[must_use]
    pub fn path_of<'a>(&self, raw: &'a str) -> &'a str {
        link_path(&self.edition, raw)
    }

    /// Classify a link and report the deciding rule
    #[must_use]
    pub fn verdict(&self, raw: &str) -> Verdict {
        verdict(&self.edition, raw)
    }

    /// Whether `raw` is an article link of this edition
    ///
    /// # Examples
    ///
    /// ```
    /// use tafiti::config::Config;
    /// use tafiti::crawler::url::UrlClassifier;
    ///
    /// let config = Config::default();
    /// let afrique = UrlClassifier::new(config.edition("afr").unwrap());
    /// assert!(afrique.is_article("/afrique/articles/c123abc"));
    /// assert!(!afrique.is_article("/afrique/topics/c456"));
    /// assert!(!afrique.is_article(""));
    /// ```
    #[must_use]
    pub fn is_article(&self, raw: &str) -> bool {
        self.verdict(raw).is_article()
    }

    /// Absolute article URL for `raw`, or `None` when it is not an article
    ///
    /// Accepted links always start with the edition origin.
    #[must_use]
    pub fn classify_link(&self, raw: &str) -> Option<String> {
        if !self.is_article(raw) {
            return None;
        }
        Some(format!("{}{}", self.edition.origin, self.path_of(raw)))
    }

    /// Article URLs among `hrefs`, in input order, duplicates included
    pub fn article_urls<'a, I>(&'a self, hrefs: I) -> impl Iterator<Item = String> + 'a
    where
        I: IntoIterator<Item = &'a str>,
        I::IntoIter: 'a,
    {
        hrefs.into_iter().filter_map(|href| self.classify_link(href))
    }
}

/// Classify one link against an edition table
#[must_use]
pub fn classify(edition: &EditionConfig, raw: &str) -> bool {
    verdict(edition, raw).is_article()
}

/// Classify a link against an edition table and report the deciding rule
#[must_use]
pub fn verdict(edition: &EditionConfig, raw: &str) -> Verdict {
    let path = link_path(edition, raw);
    if path.is_empty() {
        return Verdict::Rejected(Rejection::Empty);
    }

    if starts_with_any(path, &edition.article_prefixes) {
        return Verdict::ArticlePath;
    }

    let numbered = path.chars().last().is_some_and(|c| c.is_ascii_digit());
    let in_section = starts_with_any(path, &edition.section_prefixes);
    let excluded = starts_with_any(path, &edition.exclusion_prefixes);

    let rejection = match edition.digit_check {
        DigitCheck::WithSections => {
            if !numbered {
                Some(Rejection::NoNumericSuffix)
            } else if !in_section {
                Some(Rejection::OutsideSections)
            } else if excluded {
                Some(Rejection::Excluded)
            } else {
                None
            }
        }
        DigitCheck::AfterExclusions => {
            if !in_section {
                Some(Rejection::OutsideSections)
            } else if excluded {
                Some(Rejection::Excluded)
            } else if !numbered {
                Some(Rejection::NoNumericSuffix)
            } else {
                None
            }
        }
    };

    rejection.map_or(Verdict::NumberedSection, Verdict::Rejected)
}

/// Trimmed link with the edition origin stripped
fn link_path<'a>(edition: &EditionConfig, raw: &'a str) -> &'a str {
    let trimmed = raw.trim();
    trimmed
        .strip_prefix(edition.origin.as_str())
        .unwrap_or(trimmed)
}

fn starts_with_any(path: &str, prefixes: &[String]) -> bool {
    prefixes.iter().any(|prefix| path.starts_with(prefix.as_str()))
}
