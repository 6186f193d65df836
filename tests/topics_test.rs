//! Integration tests for topic discovery

mod common;

use tafiti::crawler::{TopicDiscovery, UrlClassifier};
use tafiti::models::CategorySource;
use tafiti::utils::error::CrawlerError;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(1)
        .mount(server)
        .await;
}

fn discovery(server: &MockServer) -> (TopicDiscovery, Vec<tafiti::Category>) {
    let edition = common::mock_edition("hau", &server.uri());
    let known = edition.select_categories("all").unwrap();
    let discovery = TopicDiscovery::new(
        common::mock_fetcher(&edition),
        UrlClassifier::new(&edition),
        &common::default_selectors(),
    );
    (discovery, known)
}

/// New topics are collected once by URL and by name, first one wins
#[tokio::test]
async fn test_discovers_new_topics() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/hausa",
        common::listing_html(
            &["/hausa/labarai-1", "/hausa/articles/c2", "/hausa/topics/c9", "/hausa/labarai-1"],
            None,
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-1",
        common::article_html(
            "Labari",
            &["Sakin layi"],
            &[("Najeriya", "/hausa/topics/c1"), ("Labarai", "/hausa/labarai")],
        ),
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/articles/c2",
        common::article_html(
            "Wani labari",
            &["Sakin layi"],
            &[
                ("Najeriya", "/hausa/topics/c1"),
                ("  Wasanni \n  Afirka ", "/hausa/topics/c3"),
                ("Najeriya", "/hausa/topics/c4"),
            ],
        ),
    )
    .await;

    let (discovery, known) = discovery(&mock_server);
    let topics = discovery.discover(&known).await.unwrap();

    let found: Vec<(String, String)> = topics
        .iter()
        .map(|c| (c.name.clone(), c.url.clone()))
        .collect();
    assert_eq!(
        found,
        vec![
            ("Najeriya".to_string(), format!("{}/hausa/topics/c1", mock_server.uri())),
            ("Wasanni Afirka".to_string(), format!("{}/hausa/topics/c3", mock_server.uri())),
        ]
    );
    assert!(topics.iter().all(|c| c.source == CategorySource::Discovered));
}

/// A failing article page is skipped
#[tokio::test]
async fn test_failing_article_skipped() {
    let mock_server = MockServer::start().await;

    mount_html(
        &mock_server,
        "/hausa",
        common::listing_html(&["/hausa/labarai-1", "/hausa/labarai-2"], None),
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hausa/labarai-1"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-2",
        common::article_html("Labari", &["Sakin layi"], &[("Kiwon lafiya", "/hausa/topics/c7")]),
    )
    .await;

    let (discovery, known) = discovery(&mock_server);
    let topics = discovery.discover(&known).await.unwrap();

    assert_eq!(topics.len(), 1);
    assert_eq!(topics[0].name, "Kiwon lafiya");
}

/// An unreachable homepage is reported to the caller
#[tokio::test]
async fn test_homepage_failure() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/hausa"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (discovery, known) = discovery(&mock_server);
    let err = discovery.discover(&known).await.unwrap_err();

    assert!(matches!(err, CrawlerError::Homepage { ref url, .. } if url.ends_with("/hausa")));
}
