//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end, writing into temporary directories.

use site_scraper::config::CrawlConfig;
use site_scraper::crawler::CrawlController;
use site_scraper::output::{PageErrorKind, SkipReason};
use site_scraper::ScraperError;
use std::collections::HashSet;
use std::fs;
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration pointing at the mock server
fn create_test_config(base_url: &str, output: &TempDir, max_pages: usize) -> CrawlConfig {
    let mut config = CrawlConfig::new(base_url);
    config.output_dir = output.path().to_path_buf();
    config.delay_seconds = 0.0; // No pacing in tests
    config.max_pages = max_pages;
    config.user_agent = "TestBot/1.0".to_string();
    config.request_timeout_secs = 5;
    config
}

/// HTML response with the right content type
fn html_page(body: impl Into<String>) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.into(), "text/html")
}

async fn mount_page(server: &MockServer, route: &str, body: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html_page(body))
        .mount(server)
        .await;
}

async fn mount_robots(server: &MockServer, body: &str) {
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_raw(body.to_string(), "text/plain"))
        .mount(server)
        .await;
}

fn saved_files(dir: &TempDir) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir.path())
        .expect("Failed to read output dir")
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

#[tokio::test]
async fn test_single_page_crawl() {
    // Start a mock server; no robots.txt is mounted so it returns 404
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head>
        <body><nav>Menu</nav><p>Welcome to the site.</p></body></html>"#
            .to_string(),
    )
    .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_saved, 1);
    assert!(summary.errors.is_empty());
    assert!(!summary.robots_available);
    assert_eq!(saved_files(&output), vec!["home.txt"]);

    let content = fs::read_to_string(output.path().join("home.txt")).unwrap();
    let expected_header = format!("URL: {}/\nTitle: Home\n{}\n\n", base_url, "=".repeat(80));
    assert!(
        content.starts_with(&expected_header),
        "Unexpected header: {}",
        content
    );
    assert!(content.contains("Welcome to the site."));
    assert!(!content.contains("Menu"));
}

#[tokio::test]
async fn test_filtered_links_never_fetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{0}/report.pdf">Report</a>
            <a href="https://elsewhere.example.org/page">Elsewhere</a>
            <a href="/wp-admin/options">Options</a>
            <a href="{0}/about">About</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/about",
        r#"<html><head><title>About</title></head><body>About us</body></html>"#.to_string(),
    )
    .await;

    // Neither of these should ever be requested
    Mock::given(method("GET"))
        .and(path("/report.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/wp-admin/options"))
        .respond_with(html_page("<html></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_saved, 2);
    assert_eq!(summary.pages_skipped, 3);
    assert!(summary.errors.is_empty());
    assert!(matches!(
        summary.skip_reason(&format!("{}/report.pdf", base_url)),
        Some(SkipReason::Filtered(_))
    ));
    assert!(summary
        .skip_reason("https://elsewhere.example.org/page")
        .is_some());

    // Wiremock verifies the expect(0) mocks when mock_server drops
}

#[tokio::test]
async fn test_robots_txt_respect() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: *\nDisallow: /private").await;

    mount_page(
        &mock_server,
        "/",
        format!(
            r#"<html><head><title>Home</title></head><body>
            <a href="{0}/allowed">Allowed Page</a>
            <a href="{0}/private/panel">Private Page</a>
            </body></html>"#,
            base_url
        ),
    )
    .await;

    mount_page(
        &mock_server,
        "/allowed",
        r#"<html><head><title>Allowed</title></head><body>Allowed content</body></html>"#
            .to_string(),
    )
    .await;

    // Private page (should never be called)
    Mock::given(method("GET"))
        .and(path("/private/panel"))
        .respond_with(html_page("<html><body>Secret</body></html>"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    let private_url = format!("{}/private/panel", base_url);
    assert!(summary.robots_available);
    assert_eq!(summary.pages_saved, 2);
    assert_eq!(
        summary.skip_reason(&private_url),
        Some(&SkipReason::RobotsDisallowed {
            rule: "/private".to_string()
        })
    );
    // A robots.txt refusal is a policy skip, not an error
    assert!(!summary.has_error(&private_url));
}

#[tokio::test]
async fn test_same_title_pages_get_distinct_files() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/?lang=de">Deutsch</a>
        <a href="/Home">Home again</a>
        <a href="/home">home again</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    for route in ["/Home", "/home"] {
        mount_page(
            &mock_server,
            route,
            r#"<html><head><title>Home</title></head><body>Same title</body></html>"#.to_string(),
        )
        .await;
    }

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    // "/" and "/?lang=de" are served by the same mock
    assert_eq!(summary.pages_saved, 4);

    let files = saved_files(&output);
    assert_eq!(files.len(), 4);
    let lowercased: HashSet<String> = files.iter().map(|f| f.to_lowercase()).collect();
    assert_eq!(lowercased.len(), 4, "Names collide: {:?}", files);
    assert!(files.contains(&"home.txt".to_string()));
    assert!(files.contains(&"home_1.txt".to_string()));

    let paths: HashSet<_> = summary.saved.iter().map(|s| s.path.clone()).collect();
    assert_eq!(paths.len(), summary.saved.len());
}

#[tokio::test]
async fn test_max_pages_limit() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    let links: String = (1..=10)
        .map(|i| format!(r#"<a href="/page{}">Page {}</a>"#, i, i))
        .collect();
    mount_page(
        &mock_server,
        "/",
        format!(
            "<html><head><title>Root</title></head><body>{}</body></html>",
            links
        ),
    )
    .await;

    // No linked page may be fetched once the limit is hit
    for i in 1..=10 {
        Mock::given(method("GET"))
            .and(path(format!("/page{}", i)))
            .respond_with(html_page("<html><body>Page</body></html>"))
            .expect(0)
            .mount(&mock_server)
            .await;
    }

    let config = create_test_config(&base_url, &output, 1);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_saved, 1);
    assert_eq!(saved_files(&output).len(), 1);
}

#[tokio::test]
async fn test_http_errors_do_not_abort() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/missing">Missing</a>
        <a href="/broken">Broken</a>
        <a href="/fine">Fine</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_page(
        &mock_server,
        "/fine",
        r#"<html><head><title>Fine</title></head><body>Fine</body></html>"#.to_string(),
    )
    .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_saved, 2);
    assert_eq!(summary.errors.len(), 2);

    let kinds: Vec<PageErrorKind> = summary.errors.iter().map(|e| e.kind).collect();
    assert!(kinds.contains(&PageErrorKind::HttpStatus(404)));
    assert!(kinds.contains(&PageErrorKind::HttpStatus(500)));
    assert!(summary.has_error(&format!("{}/missing", base_url)));
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_page(
        &mock_server,
        "/",
        r#"<html><head><title>Home</title></head><body>
        <a href="/data">Data</a>
        </body></html>"#
            .to_string(),
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(r#"{"key": "value"}"#, "application/json"),
        )
        .mount(&mock_server)
        .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");
    let summary = controller.run().await.expect("Crawl failed");

    assert_eq!(summary.pages_saved, 1);
    assert!(summary.errors.is_empty());
    assert!(matches!(
        summary.skip_reason(&format!("{}/data", base_url)),
        Some(SkipReason::NotHtml { .. })
    ));
}

#[tokio::test]
async fn test_crawl_delay_from_robots_spaces_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let output = TempDir::new().unwrap();

    mount_robots(&mock_server, "User-agent: TestBot\nCrawl-delay: 0.3\n").await;
    mount_page(
        &mock_server,
        "/",
        r#"<html><body><a href="/next">Next</a></body></html>"#.to_string(),
    )
    .await;
    mount_page(
        &mock_server,
        "/next",
        r#"<html><body>Next</body></html>"#.to_string(),
    )
    .await;

    let config = create_test_config(&base_url, &output, 100);
    let controller = CrawlController::new(config).expect("Failed to create controller");

    let started = std::time::Instant::now();
    let summary = controller.run().await.expect("Crawl failed");

    // robots.txt, "/" and "/next" are each at least 0.3s apart
    assert_eq!(summary.pages_saved, 2);
    assert!(started.elapsed() >= std::time::Duration::from_millis(600));
}

#[tokio::test]
async fn test_uncreatable_output_dir_is_fatal() {
    let mock_server = MockServer::start().await;
    let output = TempDir::new().unwrap();
    let blocker = output.path().join("not-a-dir");
    fs::write(&blocker, "file").unwrap();

    let mut config = create_test_config(&mock_server.uri(), &output, 10);
    config.output_dir = blocker.join("pages");

    let controller = CrawlController::new(config).expect("Failed to create controller");
    let result = controller.run().await;

    assert!(matches!(result, Err(ScraperError::OutputDir { .. })));
}

#[test]
fn test_invalid_base_url_is_fatal() {
    let output = TempDir::new().unwrap();
    let config = create_test_config("ftp://example.com/", &output, 10);
    assert!(CrawlController::new(config).is_err());
}
