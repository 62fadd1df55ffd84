//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end through the HTTP fetcher.

use ripple_crawl::config::{load_config, Config, HttpConfig, UserAgentConfig};
use ripple_crawl::crawler::{crawl, run_crawl, Coordinator, Fetcher, HttpFetcher};
use ripple_crawl::output::generate_markdown_summary;
use ripple_crawl::state::VisitState;
use ripple_crawl::CrawlError;
use std::io::Write;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration crawling to the given depth
fn create_test_config(max_depth: u32) -> Config {
    let mut config = Config::default();
    config.crawler.max_depth = max_depth;
    config.user_agent = UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
        contact_url: Some("https://example.com/contact".to_string()),
    };
    config.http = HttpConfig {
        request_timeout_secs: 5,
        connect_timeout_secs: 2,
    };
    config
}

fn test_fetcher() -> HttpFetcher {
    let config = create_test_config(0);
    HttpFetcher::from_config(&config.user_agent, &config.http).expect("Failed to build client")
}

/// HTML page whose body is a list of links
fn html_page(links: &[&str]) -> ResponseTemplate {
    let anchors: String = links
        .iter()
        .map(|href| format!(r#"<a href="{}">{}</a>"#, href, href))
        .collect();
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><body>{}</body></html>", anchors),
        "text/html",
    )
}

/// Mounts a GET mock for `route` that must be hit exactly `times` times
async fn mount_page(server: &MockServer, route: &str, response: ResponseTemplate, times: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(times)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_example_graph_over_http_depth_two() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // seed -> [a, b], a -> [b, c], b -> [], c -> [a]
    mount_page(&mock_server, "/seed", html_page(&["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", html_page(&["/b", "/c"]), 1).await;
    mount_page(&mock_server, "/b", html_page(&[]), 1).await;
    mount_page(&mock_server, "/c", html_page(&["/a"]), 0).await;

    let config = create_test_config(2);
    let summary = run_crawl(&config, &format!("{}/seed", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.failed, 0);
    assert_eq!(summary.in_progress, 0);
    assert_eq!(
        summary.outcome(&format!("{}/a", base_url)),
        Some(&VisitState::Success)
    );
    assert_eq!(summary.outcome(&format!("{}/c", base_url)), None);

    // Wiremock verifies the per-page hit counts when mock_server drops
}

#[tokio::test]
async fn test_example_graph_over_http_depth_three() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/seed", html_page(&["/a", "/b"]), 1).await;
    mount_page(&mock_server, "/a", html_page(&["/b", "/c"]), 1).await;
    mount_page(&mock_server, "/b", html_page(&[]), 1).await;
    mount_page(&mock_server, "/c", html_page(&["/a"]), 1).await;

    let config = create_test_config(3);
    let summary = run_crawl(&config, &format!("{}/seed", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.fetched, 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_cycle_fetches_each_page_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/a", html_page(&["/b", "/a", "/b"]), 1).await;
    mount_page(&mock_server, "/b", html_page(&["/a", "/b"]), 1).await;

    let visits = crawl(&format!("{}/a", base_url), 10, test_fetcher()).await;

    assert_eq!(visits.len(), 2);
    assert_eq!(
        visits.get(&format!("{}/b", base_url)),
        Some(VisitState::Success)
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_failed_sibling_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(&["/missing", "/broken", "/ok"]),
        1,
    )
    .await;
    mount_page(&mock_server, "/missing", ResponseTemplate::new(404), 1).await;
    mount_page(&mock_server, "/broken", ResponseTemplate::new(500), 1).await;
    mount_page(&mock_server, "/ok", html_page(&["/deeper"]), 1).await;
    mount_page(&mock_server, "/deeper", html_page(&[]), 1).await;

    let config = create_test_config(3);
    let summary = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl should succeed despite failed pages");

    assert_eq!(summary.fetched, 3);
    assert_eq!(summary.failed, 2);
    assert_eq!(
        summary.outcome(&format!("{}/missing", base_url)),
        Some(&VisitState::Failure("not found (HTTP 404)".to_string()))
    );
    assert_eq!(
        summary.outcome(&format!("{}/broken", base_url)),
        Some(&VisitState::Failure("HTTP 500".to_string()))
    );
    assert_eq!(
        summary.outcome(&format!("{}/deeper", base_url)),
        Some(&VisitState::Success)
    );
}

#[tokio::test]
async fn test_non_html_page_has_no_links() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page(&["/report.pdf"]), 1).await;
    mount_page(
        &mock_server,
        "/report.pdf",
        ResponseTemplate::new(200)
            .set_body_raw(r#"<a href="/hidden">not really html</a>"#, "application/pdf"),
        2,
    )
    .await;
    mount_page(&mock_server, "/hidden", html_page(&[]), 0).await;

    let fetcher = test_fetcher();
    let links = fetcher
        .fetch(&format!("{}/report.pdf", base_url))
        .await
        .expect("Non-HTML page should still count as fetched");
    assert!(links.is_empty());

    // The coordinator has its own visit map; the pdf above does not count there
    let coordinator = Coordinator::new(fetcher);
    coordinator.crawl(&format!("{}/", base_url), 5).await;
    assert_eq!(coordinator.visits().len(), 2);
}

#[tokio::test]
async fn test_fetcher_returns_links_in_page_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        html_page(&["/z", "https://other.test/x", "/a", "/z", "mailto:me@x.test"]),
        1,
    )
    .await;

    let links = test_fetcher()
        .fetch(&format!("{}/", base_url))
        .await
        .expect("Fetch failed");

    assert_eq!(
        links,
        vec![
            format!("{}/z", base_url),
            "https://other.test/x".to_string(),
            format!("{}/a", base_url),
            format!("{}/z", base_url),
        ]
    );
}

#[tokio::test]
async fn test_unreachable_host_is_recorded_as_failure() {
    // Nothing listens on port 1
    let dead_url = "http://127.0.0.1:1/".to_string();

    let visits = crawl(&dead_url, 1, test_fetcher()).await;

    let state = visits.get(&dead_url).expect("URL should be recorded");
    assert!(state.is_failure(), "expected failure, got {}", state);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrency_limit_from_config() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let children: Vec<String> = (0..10).map(|i| format!("/child{}", i)).collect();
    let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();
    mount_page(&mock_server, "/", html_page(&child_refs), 1).await;
    for child in &children {
        mount_page(&mock_server, child, html_page(&["/"]), 1).await;
    }

    let mut config = create_test_config(3);
    config.crawler.max_concurrent_fetches = 2;
    let summary = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.fetched, 11);
}

#[tokio::test]
async fn test_invalid_start_url() {
    let config = create_test_config(3);
    let result = run_crawl(&config, "not a url").await;
    assert!(matches!(result, Err(CrawlError::InvalidStartUrl { .. })));
}

#[tokio::test]
async fn test_invalid_config_is_rejected() {
    let mut config = create_test_config(3);
    config.http.request_timeout_secs = 0;
    let result = run_crawl(&config, "https://example.com/").await;
    assert!(matches!(result, Err(CrawlError::Config(_))));
}

#[tokio::test]
async fn test_depth_zero_makes_no_requests() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page(&["/a"]), 0).await;

    let config = create_test_config(0);
    let summary = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    assert_eq!(summary.total(), 0);
}

#[tokio::test]
async fn test_config_file_and_markdown_report() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", html_page(&["/a", "/gone"]), 1).await;
    mount_page(&mock_server, "/a", html_page(&[]), 1).await;
    mount_page(&mock_server, "/gone", ResponseTemplate::new(404), 1).await;

    let dir = tempfile::TempDir::new().expect("Failed to create temp dir");
    let summary_path = dir.path().join("summary.md");

    let mut config_file = tempfile::NamedTempFile::new().expect("Failed to create config");
    write!(
        config_file,
        r#"
[crawler]
max-depth = 2

[user-agent]
crawler-name = "TestBot"

[output]
summary-path = "{}"
"#,
        summary_path.display()
    )
    .expect("Failed to write config");
    config_file.flush().expect("Failed to flush config");

    let config = load_config(config_file.path()).expect("Failed to load config");
    let summary = run_crawl(&config, &format!("{}/", base_url))
        .await
        .expect("Crawl failed");

    let output_path = config.output.summary_path.as_deref().expect("summary path");
    generate_markdown_summary(&summary, std::path::Path::new(output_path))
        .expect("Failed to write summary");

    let markdown = std::fs::read_to_string(&summary_path).expect("Failed to read summary");
    assert!(markdown.contains("| Fetched | 2 |"));
    assert!(markdown.contains("| Failed | 1 |"));
    assert!(markdown.contains(&format!("| {}/gone | failed: not found (HTTP 404) |", base_url)));
}
