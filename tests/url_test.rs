//! Integration tests for article link classification
//!
//! Properties hold for every built-in edition; the literal cases pin the
//! behaviour of individual prefix tables.

use proptest::prelude::*;
use tafiti::config::{default_editions, EditionConfig, BBC_ORIGIN};
use tafiti::crawler::url::{classify, Rejection, UrlClassifier, Verdict};

fn edition(code: &str) -> EditionConfig {
    default_editions()
        .into_iter()
        .find(|e| e.code == code)
        .unwrap()
}

#[test]
fn test_documented_examples() {
    assert!(classify(&edition("afr"), "/afrique/articles/c123abc"));
    assert!(!classify(&edition("afr"), "/afrique/topics/c456"));
    assert!(classify(&edition("afr"), "/afrique/region-45"));
    assert!(!classify(&edition("swa"), "/swahili/michezo23"));
}

#[test]
fn test_empty_is_rejected_for_every_edition() {
    for edition in default_editions() {
        assert!(!classify(&edition, ""), "{}", edition.code);
        assert!(!classify(&edition, " \t\n"), "{}", edition.code);
    }
}

#[test]
fn test_articles_prefix_accepts_any_suffix() {
    for edition in default_editions() {
        for prefix in &edition.article_prefixes {
            for tail in ["c0abc", "123", "", "x/y"] {
                let link = format!("{prefix}{tail}");
                assert!(classify(&edition, &link), "{} rejected {link}", edition.code);
            }
        }
    }
}

#[test]
fn test_absolute_and_relative_links_agree() {
    for edition in default_editions() {
        for path in [
            format!("{}/articles/c1", edition.prefix),
            format!("{}/topics/c1", edition.prefix),
            format!("{}/1", edition.prefix),
            format!("{}/x", edition.prefix),
        ] {
            let absolute = format!("{BBC_ORIGIN}{path}");
            assert_eq!(
                classify(&edition, &path),
                classify(&edition, &absolute),
                "{} {path}",
                edition.code
            );
        }
    }
}

#[test]
fn test_classified_links_start_with_origin() {
    let classifier = UrlClassifier::new(&edition("yor"));
    let url = classifier.classify_link("/yoruba/articles/c9").unwrap();
    assert!(url.starts_with(BBC_ORIGIN));
    assert_eq!(classifier.classify_link("/yoruba/topics/c9"), None);
}

#[test]
fn test_per_edition_samples() {
    let cases = [
        ("amh", "/amharic/news-53000000", true),
        ("amh", "/amharic/topics/c1", false),
        ("gah", "/gahuza/amakuru-1", true),
        ("hau", "/hausa/bbc_hausa_radio/1", false),
        ("ibo", "/igbo/afirika-2", true),
        ("orm", "/afaanoromoo/oduu-3", true),
        ("som", "/somali/bbc_somali_radio/4", false),
        ("swa", "/swahili/habari-5", true),
        ("swa", "/swahili/dira-tv-6", false),
        ("tir", "/tigrinya/news-7", true),
        ("yor", "/yoruba/afrika-8", true),
        ("pcm", "/pidgin/bbc_pidgin_radio/9", false),
        ("pcm", "/pidgin/tori-10", true),
        ("pcm", "/news/world-11", false),
    ];
    for (code, link, expected) in cases {
        assert_eq!(classify(&edition(code), link), expected, "{code} {link}");
    }
}

#[test]
fn test_swahili_reports_exclusion_before_digit() {
    let classifier = UrlClassifier::new(&edition("swa"));
    assert_eq!(
        classifier.verdict("/swahili/media/video"),
        Verdict::Rejected(Rejection::Excluded)
    );
    let classifier = UrlClassifier::new(&edition("pcm"));
    assert_eq!(
        classifier.verdict("/pidgin/topics/video"),
        Verdict::Rejected(Rejection::NoNumericSuffix)
    );
}

fn any_edition() -> impl Strategy<Value = EditionConfig> {
    (0..default_editions().len()).prop_map(|i| default_editions()[i].clone())
}

proptest! {
    #[test]
    fn prop_classification_is_total_and_pure(edition in any_edition(), link in ".*") {
        let first = classify(&edition, &link);
        let second = classify(&edition, &link);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_no_trailing_digit_means_rejected_outside_articles(
        edition in any_edition(),
        tail in "[a-z/_-]{0,20}",
    ) {
        let link = format!("{}/{}", edition.prefix, tail);
        prop_assume!(!edition.article_prefixes.iter().any(|p| link.starts_with(p.as_str())));
        prop_assert!(!classify(&edition, &link));
    }

    #[test]
    fn prop_exclusions_win_over_digits(
        edition in any_edition(),
        index in 0usize..8,
        middle in "[a-z0-9/-]{0,12}",
        digits in "[0-9]{1,6}",
    ) {
        prop_assume!(!edition.exclusion_prefixes.is_empty());
        let prefix = &edition.exclusion_prefixes[index % edition.exclusion_prefixes.len()];
        let link = format!("{prefix}{middle}{digits}");
        prop_assume!(!edition.article_prefixes.iter().any(|p| link.starts_with(p.as_str())));
        prop_assert!(!classify(&edition, &link));
    }

    #[test]
    fn prop_accepted_links_normalise_to_origin(edition in any_edition(), link in "/[a-z0-9/_-]{0,30}") {
        let classifier = UrlClassifier::new(&edition);
        if let Some(url) = classifier.classify_link(&link) {
            prop_assert!(url.starts_with(BBC_ORIGIN));
            prop_assert!(url.ends_with(link.as_str()));
        }
    }
}
