//! Built-in prefix tables for the BBC World Service language editions
//!
//! Every edition is described by data only: the classifier in
//! [`crate::crawler::url`] is shared by all of them.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::models::{Category, CategorySource};
use crate::utils::error::CrawlerError;

/// Canonical origin shared by all editions
pub const BBC_ORIGIN: &str = "https://www.bbc.com";

/// Where the numeric-suffix test sits relative to the prefix tests
///
/// All editions except Swahili test for a trailing digit together with the
/// section prefixes. Swahili only looks at the trailing digit once the path
/// is known to be inside a section and outside every exclusion. For any
/// non-empty path both orders give the same verdict; they differ in which
/// rejection reason is reported first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitCheck {
    #[default]
    WithSections,
    AfterExclusions,
}

/// One language edition: identity, URL prefix tables and static categories
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditionConfig {
    /// Primary code (e.g. "hau")
    pub code: String,

    /// Alternative codes accepted on the command line
    #[serde(default)]
    pub aliases: Vec<String>,

    /// Human readable name
    pub name: String,

    /// BCP-47 tag sent as the preferred Accept-Language
    pub language_tag: String,

    /// Site origin, without trailing slash
    #[serde(default = "default_origin")]
    pub origin: String,

    /// Root path of the edition (e.g. "/hausa")
    pub prefix: String,

    /// Paths accepted unconditionally
    pub article_prefixes: Vec<String>,

    /// Paths accepted when they end in a digit
    pub section_prefixes: Vec<String>,

    /// Paths rejected even when they end in a digit
    #[serde(default)]
    pub exclusion_prefixes: Vec<String>,

    #[serde(default)]
    pub digit_check: DigitCheck,

    /// Category name to seed URL (absolute or root-relative)
    #[serde(default)]
    pub categories: BTreeMap<String, String>,
}

fn default_origin() -> String {
    BBC_ORIGIN.to_string()
}

impl EditionConfig {
    /// Edition homepage, used as the entry point for topic discovery
    #[must_use]
    pub fn homepage(&self) -> String {
        format!("{}{}", self.origin, self.prefix)
    }

    /// Resolve a configured or scraped link against the edition origin
    #[must_use]
    pub fn resolve(&self, link: &str) -> String {
        if link.starts_with("http://") || link.starts_with("https://") {
            link.to_string()
        } else if link.starts_with('/') {
            format!("{}{link}", self.origin)
        } else {
            format!("{}/{link}", self.origin)
        }
    }

    /// Whether `code` names this edition (primary code, alias or path name)
    #[must_use]
    pub fn matches(&self, code: &str) -> bool {
        let code = code.trim();
        self.code.eq_ignore_ascii_case(code)
            || self.aliases.iter().any(|a| a.eq_ignore_ascii_case(code))
            || self.prefix.trim_start_matches('/').eq_ignore_ascii_case(code)
    }

    /// Whether a category selection asks for every category plus discovered topics
    #[must_use]
    pub fn selects_all(selection: &str) -> bool {
        selection.trim().eq_ignore_ascii_case("all")
    }

    /// Configured categories named by `selection`
    ///
    /// `all` selects every configured category. Otherwise names are comma
    /// separated and matched upper-cased; repeats are ignored.
    ///
    /// # Errors
    ///
    /// Returns `CrawlerError::UnknownCategory` for a name not configured here
    pub fn select_categories(&self, selection: &str) -> Result<Vec<Category>, CrawlerError> {
        let to_category = |(name, url): (&String, &String)| {
            Category::new(name.clone(), self.resolve(url), CategorySource::Static)
        };

        if Self::selects_all(selection) {
            return Ok(self.categories.iter().map(to_category).collect());
        }

        let mut seen = HashSet::new();
        let mut selected = Vec::new();
        for name in selection.split(',').map(|n| n.trim().to_uppercase()) {
            if name.is_empty() || !seen.insert(name.clone()) {
                continue;
            }
            let entry = self
                .categories
                .get_key_value(&name)
                .ok_or_else(|| CrawlerError::UnknownCategory {
                    name: name.clone(),
                    edition: self.code.clone(),
                    valid: self.categories.keys().cloned().collect::<Vec<_>>().join(", "),
                })?;
            selected.push(to_category(entry));
        }

        Ok(selected)
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}

fn categories(items: &[(&str, &str)]) -> BTreeMap<String, String> {
    items
        .iter()
        .map(|(name, url)| ((*name).to_string(), (*url).to_string()))
        .collect()
}

/// The eleven editions shipped with the crawler
#[must_use]
pub fn default_editions() -> Vec<EditionConfig> {
    vec![
        EditionConfig {
            code: "afr".into(),
            aliases: strings(&["af"]),
            name: "BBC Afrique".into(),
            language_tag: "fr".into(),
            origin: default_origin(),
            prefix: "/afrique".into(),
            article_prefixes: strings(&["/afrique/articles/", "/afrique/region/"]),
            section_prefixes: strings(&[
                "/afrique/monde-",
                "/afrique/region-",
                "/afrique/media-",
                "/afrique",
            ]),
            exclusion_prefixes: strings(&["/afrique/topics", "/afrique/bbc_afrique_radio"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/afrique/popular/read"),
                ("MONDE", "/afrique/monde"),
                ("REGION", "/afrique/region"),
                ("MEDIA", "/afrique/media"),
            ]),
        },
        EditionConfig {
            code: "amh".into(),
            aliases: strings(&["am"]),
            name: "BBC News Amharic".into(),
            language_tag: "am".into(),
            origin: default_origin(),
            prefix: "/amharic".into(),
            article_prefixes: strings(&["/amharic/articles/"]),
            section_prefixes: strings(&["/amharic/news-", "/amharic"]),
            exclusion_prefixes: strings(&["/amharic/topics", "/amharic/bbc_amharic_radio"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/amharic/popular/read"),
                ("NEWS", "/amharic/news"),
            ]),
        },
        EditionConfig {
            code: "gah".into(),
            aliases: strings(&["ga"]),
            name: "BBC Gahuza".into(),
            language_tag: "rw".into(),
            origin: default_origin(),
            prefix: "/gahuza".into(),
            article_prefixes: strings(&["/gahuza/articles/"]),
            section_prefixes: strings(&["/gahuza/amakuru-", "/gahuza"]),
            exclusion_prefixes: strings(&["/gahuza/topics"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/gahuza/popular/read"),
                ("AMAKURU", "/gahuza/amakuru"),
            ]),
        },
        EditionConfig {
            code: "hau".into(),
            aliases: strings(&["ha"]),
            name: "BBC News Hausa".into(),
            language_tag: "ha".into(),
            origin: default_origin(),
            prefix: "/hausa".into(),
            article_prefixes: strings(&["/hausa/articles/"]),
            section_prefixes: strings(&["/hausa/wasanni", "/hausa/labarai", "/hausa/media", "/hausa"]),
            exclusion_prefixes: strings(&["/hausa/topics", "/hausa/bbc_hausa_radio/"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/hausa/popular/read"),
                ("LABARAI", "/hausa/labarai"),
                ("WASANNI", "/hausa/wasanni"),
                ("MEDIA", "/hausa/media"),
            ]),
        },
        EditionConfig {
            code: "ibo".into(),
            aliases: strings(&["ig"]),
            name: "BBC News Igbo".into(),
            language_tag: "ig".into(),
            origin: default_origin(),
            prefix: "/igbo".into(),
            article_prefixes: strings(&["/igbo/articles/"]),
            section_prefixes: strings(&["/igbo/afirika-", "/igbo/media-", "/igbo/egwuregwu-", "/igbo/"]),
            exclusion_prefixes: strings(&["/igbo/topics"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/igbo/popular/read"),
                ("AFIRIKA", "/igbo/afirika"),
                ("EGWUREGWU", "/igbo/egwuregwu"),
                ("MEDIA", "/igbo/media"),
            ]),
        },
        EditionConfig {
            code: "orm".into(),
            aliases: strings(&["om"]),
            name: "BBC News Afaan Oromoo".into(),
            language_tag: "om".into(),
            origin: default_origin(),
            prefix: "/afaanoromoo".into(),
            article_prefixes: strings(&["/afaanoromoo/articles/"]),
            section_prefixes: strings(&["/afaanoromoo/oduu", "/afaanoromoo"]),
            exclusion_prefixes: strings(&["/afaanoromoo/topics"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/afaanoromoo/popular/read"),
                ("ODUU", "/afaanoromoo/oduu"),
            ]),
        },
        EditionConfig {
            code: "som".into(),
            aliases: strings(&["so"]),
            name: "BBC News Somali".into(),
            language_tag: "so".into(),
            origin: default_origin(),
            prefix: "/somali".into(),
            article_prefixes: strings(&["/somali/articles/"]),
            section_prefixes: strings(&["/somali/cayaaraha", "/somali/war", "/somali/"]),
            exclusion_prefixes: strings(&["/somali/topics", "/somali/bbc_somali_radio/"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/somali/popular/read"),
                ("WAR", "/somali/war"),
                ("CAYAARAHA", "/somali/cayaaraha"),
            ]),
        },
        EditionConfig {
            code: "swa".into(),
            aliases: strings(&["sw"]),
            name: "BBC News Swahili".into(),
            language_tag: "sw".into(),
            origin: default_origin(),
            prefix: "/swahili".into(),
            article_prefixes: strings(&["/swahili/articles/"]),
            section_prefixes: strings(&["/swahili/habari-", "/swahili/"]),
            exclusion_prefixes: strings(&[
                "/swahili/topics",
                "/swahili/michezo",
                "/swahili/bbc_swahili_radio",
                "/swahili/dira-tv",
                "/swahili/media",
                "/swahili/taasisi",
            ]),
            digit_check: DigitCheck::AfterExclusions,
            categories: categories(&[
                ("MOST_POPULAR", "/swahili/popular/read"),
                ("HABARI", "/swahili/habari"),
            ]),
        },
        EditionConfig {
            code: "tir".into(),
            aliases: strings(&["ti"]),
            name: "BBC News Tigrinya".into(),
            language_tag: "ti".into(),
            origin: default_origin(),
            prefix: "/tigrinya".into(),
            article_prefixes: strings(&["/tigrinya/articles/"]),
            section_prefixes: strings(&["/tigrinya/news-", "/tigrinya/"]),
            exclusion_prefixes: strings(&["/tigrinya/topics"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/tigrinya/popular/read"),
                ("NEWS", "/tigrinya/news"),
            ]),
        },
        EditionConfig {
            code: "yor".into(),
            aliases: strings(&["yo"]),
            name: "BBC News Yoruba".into(),
            language_tag: "yo".into(),
            origin: default_origin(),
            prefix: "/yoruba".into(),
            article_prefixes: strings(&["/yoruba/articles/"]),
            section_prefixes: strings(&["/yoruba/afrika", "/yoruba"]),
            exclusion_prefixes: strings(&["/yoruba/topics"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/yoruba/popular/read"),
                ("AFRIKA", "/yoruba/afrika"),
            ]),
        },
        EditionConfig {
            code: "pcm".into(),
            aliases: Vec::new(),
            name: "BBC News Pidgin".into(),
            language_tag: "pcm".into(),
            origin: default_origin(),
            prefix: "/pidgin".into(),
            article_prefixes: strings(&["/pidgin/articles/"]),
            section_prefixes: strings(&[
                "/pidgin/world-",
                "/pidgin/sport-",
                "/pidgin/media-",
                "/pidgin",
            ]),
            exclusion_prefixes: strings(&["/pidgin/topics", "/pidgin/bbc_pidgin_radio"]),
            digit_check: DigitCheck::WithSections,
            categories: categories(&[
                ("MOST_POPULAR", "/pidgin/popular/read"),
                ("WORLD", "/pidgin/world"),
                ("SPORT", "/pidgin/sport"),
                ("MEDIA", "/pidgin/media"),
            ]),
        },
    ]
}
