//! End-to-end pipeline tests
//!
//! Listing and article pages are served by wiremock; partitions and the
//! merged corpus are written to a temporary directory.

mod common;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use tafiti::crawler::{CategoryPipeline, Pacing, UrlClassifier};
use tafiti::models::{CategorySource, CategoryStatus};
use tafiti::storage::{merge_files, merge_partitions, CategoryWriter, CorpusPaths, CorpusRow};
use tafiti::{Category, Quota};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_html(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

fn pipeline(server: &MockServer, output: &Path) -> CategoryPipeline {
    paced_pipeline(server, output, Pacing::disabled())
}

fn paced_pipeline(server: &MockServer, output: &Path, pacing: Pacing) -> CategoryPipeline {
    let edition = common::mock_edition("hau", &server.uri());
    CategoryPipeline::new(
        common::mock_fetcher(&edition),
        UrlClassifier::new(&edition),
        common::default_parser(),
        CorpusPaths::new(output).unwrap(),
        pacing,
    )
}

fn category(server: &MockServer, name: &str, route: &str) -> Category {
    Category::new(name, format!("{}{route}", server.uri()), CategorySource::Static)
}

fn read_rows(path: &Path) -> Vec<CorpusRow> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .from_path(path)
        .unwrap();
    reader.deserialize().map(Result::unwrap).collect()
}

/// Only articles with story text become rows
#[tokio::test]
async fn test_run_skips_articles_without_text() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");

    mount_html(
        &mock_server,
        "/hausa/labarai",
        common::listing_html(
            &["/hausa/labarai-1", "/hausa/labarai-2", "/hausa/labarai-3", "/hausa/labarai-4"],
            None,
        ),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-1",
        common::article_html("Kanun labari", &["  Na farko. ", "Na biyu."], &[]),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-2",
        common::article_html("Babu labari", &[], &[]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hausa/labarai-3"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-4",
        common::article_html("", &["Ba kanu."], &[]),
        1,
    )
    .await;

    let pipeline = pipeline(&mock_server, &output);
    let report = pipeline
        .run(&category(&mock_server, "LABARAI", "/hausa/labarai"), Quota::unbounded())
        .await
        .unwrap();

    assert_eq!(report.urls_found, 4);
    assert_eq!(report.rows_written, 2);
    assert_eq!(report.articles_skipped, 2);
    assert_eq!(report.status, CategoryStatus::Complete);

    let rows = read_rows(&temp_dir.path().join("LABARAI_corpus.tsv"));
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].headline.as_deref(), Some("Kanun labari"));
    assert_eq!(rows[0].text, "Na farko. Na biyu.");
    assert_eq!(rows[0].category, "LABARAI");
    assert_eq!(rows[0].url, format!("{}/hausa/labarai-1", mock_server.uri()));
    assert_eq!(rows[1].headline, None);
    assert_eq!(rows[1].text, "Ba kanu.");
}

/// Writing stops once the quota is reached
#[tokio::test]
async fn test_run_stops_at_quota() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");

    mount_html(
        &mock_server,
        "/hausa/wasanni",
        common::listing_html(&["/hausa/wasanni-1", "/hausa/wasanni-2", "/hausa/wasanni-3"], Some(9)),
        1,
    )
    .await;
    for (route, expected) in [("/hausa/wasanni-1", 1), ("/hausa/wasanni-2", 1), ("/hausa/wasanni-3", 0)] {
        mount_html(
            &mock_server,
            route,
            common::article_html("Wasanni", &["Kwallon kafa."], &[]),
            expected,
        )
        .await;
    }

    let report = pipeline(&mock_server, &output)
        .run(&category(&mock_server, "WASANNI", "/hausa/wasanni"), Quota::at_most(2))
        .await
        .unwrap();

    assert_eq!(report.urls_found, 3);
    assert_eq!(report.pages_fetched, 1);
    assert_eq!(report.rows_written, 2);
}

/// A failing category never stops the others
#[tokio::test]
async fn test_run_all_isolates_failures() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");

    mount_html(
        &mock_server,
        "/hausa/labarai",
        common::listing_html(&["/hausa/labarai-1"], None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-1",
        common::article_html("Labari", &["Rubutu."], &[]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hausa/wasanni"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let categories = vec![
        category(&mock_server, "WASANNI", "/hausa/wasanni"),
        category(&mock_server, "LABARAI", "/hausa/labarai"),
    ];
    let pipeline = Arc::new(pipeline(&mock_server, &output));
    let reports = Arc::clone(&pipeline)
        .run_all(&categories, Quota::unbounded())
        .await;

    assert_eq!(reports.len(), 2);
    assert_eq!(reports[0].category, "WASANNI");
    assert!(reports[0].is_failed());
    assert_eq!(reports[1].category, "LABARAI");
    assert_eq!(reports[1].rows_written, 1);

    let merged = merge_partitions(pipeline.paths()).unwrap();
    assert_eq!(merged.files.len(), 1);
    assert_eq!(merged.rows_written, 1);
    assert_eq!(read_rows(&output).len(), 1);
}

/// A partition left by an earlier run is not merged when its category fails now
#[tokio::test]
async fn test_run_all_ignores_stale_partition_of_failed_category() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");

    let stale = temp_dir.path().join("WASANNI_corpus.tsv");
    let mut writer = CategoryWriter::create(&stale).unwrap();
    writer
        .write(&CorpusRow {
            headline: Some("Tsohon labari".to_string()),
            text: "stale row from an earlier run".to_string(),
            category: "WASANNI".to_string(),
            url: format!("{}/hausa/wasanni-9", mock_server.uri()),
        })
        .unwrap();
    writer.finish().unwrap();

    mount_html(
        &mock_server,
        "/hausa/labarai",
        common::listing_html(&["/hausa/labarai-1"], None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-1",
        common::article_html("Labari", &["Rubutu."], &[]),
        1,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/hausa/wasanni"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    let categories = vec![
        category(&mock_server, "WASANNI", "/hausa/wasanni"),
        category(&mock_server, "LABARAI", "/hausa/labarai"),
    ];
    let pipeline = Arc::new(pipeline(&mock_server, &output));
    let reports = Arc::clone(&pipeline)
        .run_all(&categories, Quota::unbounded())
        .await;
    assert!(reports[0].is_failed());

    let written: Vec<PathBuf> = reports.iter().filter_map(|r| r.partition.clone()).collect();
    assert_eq!(written, vec![temp_dir.path().join("LABARAI_corpus.tsv")]);

    let merged = merge_files(pipeline.paths(), written).unwrap();
    assert_eq!(merged.rows_written, 1);

    let rows = read_rows(&output);
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].category, "LABARAI");
    assert!(rows.iter().all(|r| !r.text.contains("stale")));
    assert!(stale.exists());
}

/// Consecutive article fetches are spaced by the pacing delay
#[tokio::test]
async fn test_run_waits_between_articles() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");
    let delay = Duration::from_millis(100);

    let links = ["/hausa/labarai-1", "/hausa/labarai-2", "/hausa/labarai-3"];
    mount_html(&mock_server, "/hausa/labarai", common::listing_html(&links, None), 1).await;
    for link in links {
        mount_html(
            &mock_server,
            link,
            common::article_html("Labari", &["Rubutu."], &[]),
            1,
        )
        .await;
    }

    let started = Instant::now();
    let report = paced_pipeline(&mock_server, &output, Pacing::fixed(delay))
        .run(&category(&mock_server, "LABARAI", "/hausa/labarai"), Quota::unbounded())
        .await
        .unwrap();
    let elapsed = started.elapsed();

    assert_eq!(report.rows_written, 3);
    assert!(
        elapsed >= delay * 2,
        "three articles took {elapsed:?}, expected at least {:?}",
        delay * 2
    );
}

/// An article listed by two categories is kept once in the merged corpus
#[tokio::test]
async fn test_merge_keeps_last_category_for_shared_article() {
    let mock_server = MockServer::start().await;
    let temp_dir = TempDir::new().unwrap();
    let output = temp_dir.path().join("corpus.tsv");

    mount_html(
        &mock_server,
        "/hausa/labarai",
        common::listing_html(&["/hausa/labarai-1", "/hausa/labarai-2"], None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/popular/read",
        common::listing_html(&["/hausa/labarai-1"], None),
        1,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-1",
        common::article_html("Shahararre", &["Rubutu daya."], &[]),
        2,
    )
    .await;
    mount_html(
        &mock_server,
        "/hausa/labarai-2",
        common::article_html("Na biyu", &["Rubutu biyu."], &[]),
        1,
    )
    .await;

    let categories = vec![
        category(&mock_server, "MOST_POPULAR", "/hausa/popular/read"),
        category(&mock_server, "LABARAI", "/hausa/labarai"),
    ];
    let pipeline = Arc::new(pipeline(&mock_server, &output));
    let reports = Arc::clone(&pipeline)
        .run_all(&categories, Quota::unbounded())
        .await;
    assert!(reports.iter().all(|r| !r.is_failed()));

    let merged = merge_partitions(pipeline.paths()).unwrap();
    assert_eq!(merged.rows_read, 3);
    assert_eq!(merged.duplicates, 1);

    let rows = read_rows(&output);
    let summary: Vec<(&str, &str)> = rows
        .iter()
        .map(|r| (r.category.as_str(), r.url.trim_start_matches(mock_server.uri().as_str())))
        .collect();
    assert_eq!(
        summary,
        vec![("LABARAI", "/hausa/labarai-2"), ("MOST_POPULAR", "/hausa/labarai-1")]
    );
}
