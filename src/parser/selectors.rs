//! CSS selectors for BBC listing and article pages
//!
//! BBC markup is identified by generated class names that change over time,
//! so only structural selectors are compiled in. Everything class-based is
//! built from [`SelectorConfig`] at startup.

use scraper::Selector;
use std::sync::LazyLock;

use crate::config::SelectorConfig;
use crate::utils::error::ParseError;

// Helper macro for selectors that are known to be valid
macro_rules! parse_selector {
    ($s:expr) => {
        Selector::parse($s).expect(concat!("Invalid CSS selector: ", $s))
    };
}

/// Anchors carrying an `href`
pub static ANCHORS: LazyLock<Selector> = LazyLock::new(|| parse_selector!("a[href]"));

/// List items, used inside the pagination list
pub static LIST_ITEMS: LazyLock<Selector> = LazyLock::new(|| parse_selector!("li"));

/// Build `tag.class1.class2` from a space-separated class attribute value
///
/// # Errors
///
/// - `ParseError::MissingClass` when `classes` is blank
/// - `ParseError::InvalidSelector` when a class name is not a valid CSS identifier
///
/// # Examples
///
/// ```
/// use tafiti::parser::selectors::class_selector;
///
/// let selector = class_selector("ul", "bbc-1hz4f7k e1mvc6ub0", "pagination list").unwrap();
/// let html = scraper::Html::parse_fragment(r#"<ul class="e1mvc6ub0 bbc-1hz4f7k x"></ul>"#);
/// assert_eq!(html.select(&selector).count(), 1);
/// ```
pub fn class_selector(
    tag: &str,
    classes: &str,
    what: &'static str,
) -> Result<Selector, ParseError> {
    compile(class_css(tag, classes, what)?)
}

fn class_css(tag: &str, classes: &str, what: &'static str) -> Result<String, ParseError> {
    let classes: Vec<&str> = classes.split_whitespace().collect();
    if classes.is_empty() {
        return Err(ParseError::MissingClass(what));
    }
    Ok(format!("{tag}.{}", classes.join(".")))
}

fn compile(css: String) -> Result<Selector, ParseError> {
    Selector::parse(&css).map_err(|e| ParseError::InvalidSelector {
        reason: format!("{e:?}"),
        selector: css.clone(),
    })
}

fn class_selectors(
    tag: &str,
    classes: &[String],
    what: &'static str,
) -> Result<Vec<Selector>, ParseError> {
    classes
        .iter()
        .map(|class| class_selector(tag, class, what))
        .collect()
}

/// Compiled selectors for one crawl
#[derive(Debug, Clone)]
pub struct PageSelectors {
    /// `ul` holding the pagination links of a listing
    pub pagination_list: Selector,

    /// `li` topic entries on article pages, in preference order
    pub topic_items: Vec<Selector>,

    /// `h1` headlines, in preference order
    pub headlines: Vec<Selector>,

    /// `strong` headlines used when no `h1` matches
    pub headline_fallbacks: Vec<Selector>,

    /// Direct `p` children of the story `div`s
    pub story_paragraphs: Selector,
}

impl PageSelectors {
    /// Compile every configured class
    ///
    /// # Errors
    ///
    /// Returns the first selector that fails to compile
    pub fn from_config(config: &SelectorConfig) -> Result<Self, ParseError> {
        let story_div = class_css("div", &config.story_div_class, "story div")?;
        let story_paragraphs = compile(format!("{story_div} > p"))?;

        Ok(Self {
            pagination_list: class_selector(
                "ul",
                &config.pagination_list_class,
                "pagination list",
            )?,
            topic_items: class_selectors("li", &config.topic_list_classes, "topic list")?,
            headlines: class_selectors("h1", &config.headline_classes, "headline")?,
            headline_fallbacks: class_selectors(
                "strong",
                &config.headline_fallback_classes,
                "fallback headline",
            )?,
            story_paragraphs,
        })
    }
}
