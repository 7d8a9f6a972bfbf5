//! Integration tests for the crawler
//!
//! These tests use wiremock to serve thread pages and run the full
//! fetch/extract/follow cycle end-to-end.

use threadwalk::config::{Config, CrawlerConfig, OutputConfig, UserAgentConfig};
use threadwalk::crawler::{run_crawl, Coordinator};
use threadwalk::output::MemorySink;
use threadwalk::PostRecord;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration starting at the given seed
fn create_test_config(seed: String, max_pages: u32, output_path: &str) -> Config {
    Config {
        crawler: CrawlerConfig {
            seeds: vec![seed],
            max_pages,
            request_delay: 0,
            request_timeout: 5,
        },
        user_agent: UserAgentConfig {
            crawler_name: "TestBot".to_string(),
            crawler_version: "1.0.0".to_string(),
            contact_url: "https://example.com/contact".to_string(),
            contact_email: "test@example.com".to_string(),
        },
        output: OutputConfig {
            path: output_path.to_string(),
        },
    }
}

fn post_row(body: &str, author: Option<(&str, &str)>, time: &str) -> String {
    let poster_info = match author {
        Some((activity, merit)) => format!(
            r#"<td class="poster_info"><b>poster</b><div class="smalltext">Full Member<br>
<span class="smalltext"> Offline</span><br>Posts: 120<br>Activity: {}<br>Merit: {}</div></td>"#,
            activity, merit
        ),
        None => r#"<td class="poster_info"><b>poster</b></td>"#.to_string(),
    };
    format!(
        r#"<tr class="post_row1">{}<td class="td_headerandpost"><div class="smalltext">{}</div><div class="post">{}</div></td></tr>"#,
        poster_info, time, body
    )
}

fn thread_page(rows: &[String], prev_next: &[&str]) -> String {
    let groups: Vec<String> = prev_next
        .iter()
        .map(|href| format!(r#"<span class="prevnext"><a href="{}">&#187;</a></span>"#, href))
        .collect();
    let (top, bottom) = groups.split_at(groups.len().min(1));
    format!(
        r#"<html><head><title>Test Thread</title></head><body>{}<form name="quickModForm"><table>{}</table></form>{}</body></html>"#,
        top.concat(),
        rows.concat(),
        bottom.concat()
    )
}

fn html_response(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=UTF-8")
}

async fn mount_page(server: &MockServer, topic: &str, body: String, expected_hits: u64) {
    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("topic", topic))
        .respond_with(html_response(body))
        .expect(expected_hits)
        .mount(server)
        .await;
}

fn seed(server: &MockServer) -> String {
    format!("{}/index.php?topic=3809457.00", server.uri())
}

fn bodies(records: &[PostRecord]) -> Vec<String> {
    records.iter().map(|r| r.text.concat()).collect()
}

#[tokio::test]
async fn test_two_page_thread() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        thread_page(
            &[
                post_row("first", Some(("42", "7")), "April 01"),
                post_row("second", None, "April 02"),
                post_row("third", Some(("5", "0")), "April 03"),
            ],
            &["?topic=3809457.00", "?topic=3809457.05"],
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "3809457.05",
        thread_page(
            &[post_row("fourth", Some(("9", "1")), "April 04")],
            &["?topic=3809457.00"],
        ),
        1,
    )
    .await;

    let config = create_test_config(seed(&mock_server), 0, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_processed, 2);
    assert_eq!(stats.pages_failed, 0);
    assert_eq!(stats.records_emitted, 4);
    assert_eq!(stats.records_degraded, 1);

    let records = coordinator.into_sink().records;
    assert_eq!(bodies(&records), vec!["first", "second", "third", "fourth"]);

    assert_eq!(records[0].author_activity.as_deref(), Some("42"));
    assert_eq!(records[0].author_merit.as_deref(), Some("7"));
    assert_eq!(records[1].activity_or_sentinel(), "NA");
    assert_eq!(records[1].merit_or_sentinel(), "NA");
    assert_eq!(records[1].time, vec!["April 02".to_string()]);
    assert_eq!(records[1].topic, "Test Thread");
    assert_eq!(records[2].author_activity.as_deref(), Some("5"));
    assert_eq!(records[2].author_merit.as_deref(), Some("0"));
}

#[tokio::test]
async fn test_pagination_cycle_is_not_refetched() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        thread_page(
            &[post_row("a", Some(("1", "1")), "t")],
            &["?topic=3809457.00", "?topic=3809457.05"],
        ),
        1,
    )
    .await;

    // Second page points back at the first
    mount_page(
        &mock_server,
        "3809457.05",
        thread_page(
            &[post_row("b", Some(("1", "1")), "t")],
            &["?topic=3809457.05", "?topic=3809457.00"],
        ),
        1,
    )
    .await;

    let config = create_test_config(seed(&mock_server), 0, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_processed, 2);
    assert_eq!(bodies(&coordinator.into_sink().records), vec!["a", "b"]);
}

#[tokio::test]
async fn test_malformed_page_is_skipped_and_traversal_continues() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        r#"<html><head><title>Busy</title></head><body><span class="prevnext"></span><p>The database is busy</p><span class="prevnext"><a href="?topic=3809457.05">next</a></span></body></html>"#.to_string(),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "3809457.05",
        thread_page(&[post_row("survivor", Some(("3", "2")), "t")], &["?topic=3809457.00"]),
        1,
    )
    .await;

    let config = create_test_config(seed(&mock_server), 0, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.pages_processed, 1);
    assert_eq!(bodies(&coordinator.into_sink().records), vec!["survivor"]);
}

#[tokio::test]
async fn test_page_limit_stops_crawl() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        thread_page(
            &[post_row("a", Some(("1", "1")), "t")],
            &["?topic=3809457.00", "?topic=3809457.05"],
        ),
        1,
    )
    .await;

    mount_page(
        &mock_server,
        "3809457.05",
        thread_page(&[post_row("b", Some(("1", "1")), "t")], &["?topic=3809457.00"]),
        0,
    )
    .await;

    let config = create_test_config(seed(&mock_server), 1, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_processed, 1);
    assert_eq!(stats.records_emitted, 1);
}

#[tokio::test]
async fn test_http_error_is_counted_not_fatal() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        thread_page(
            &[post_row("a", Some(("1", "1")), "t")],
            &["?topic=3809457.00", "?topic=3809457.05"],
        ),
        1,
    )
    .await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .and(query_param("topic", "3809457.05"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(seed(&mock_server), 0, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_processed, 1);
    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.records_emitted, 1);
}

#[tokio::test]
async fn test_non_html_response_is_rejected() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/index.php"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("{}", "application/json"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = create_test_config(seed(&mock_server), 0, "-");
    let mut coordinator =
        Coordinator::new(&config, MemorySink::new()).expect("Failed to create coordinator");
    let stats = coordinator.run().await.expect("Crawl failed");

    assert_eq!(stats.pages_failed, 1);
    assert_eq!(stats.records_emitted, 0);
}

#[tokio::test]
async fn test_run_crawl_writes_json_lines() {
    let mock_server = MockServer::start().await;

    mount_page(
        &mock_server,
        "3809457.00",
        thread_page(
            &[
                post_row("hello", Some(("42", "7")), "April 01"),
                post_row("anon", None, "April 02"),
            ],
            &["?topic=3809457.00"],
        ),
        1,
    )
    .await;

    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let output_path = dir.path().join("posts.jsonl");
    let config = create_test_config(
        seed(&mock_server),
        0,
        output_path.to_str().expect("Non UTF-8 temp path"),
    );

    let stats = run_crawl(config).await.expect("Crawl failed");
    assert_eq!(stats.records_emitted, 2);

    let content = std::fs::read_to_string(&output_path).expect("Failed to read output");
    let lines: Vec<serde_json::Value> = content
        .lines()
        .map(|line| serde_json::from_str(line).expect("Invalid JSON line"))
        .collect();

    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["text"], serde_json::json!(["hello"]));
    assert_eq!(lines[0]["author_activity"], "42");
    assert_eq!(lines[0]["author_merit"], "7");
    assert_eq!(lines[0]["time"], serde_json::json!(["April 01"]));
    assert_eq!(lines[0]["topic"], "Test Thread");
    assert_eq!(lines[1]["author_activity"], "NA");
    assert_eq!(lines[1]["author_merit"], "NA");
    assert_eq!(lines[1]["time"], serde_json::json!(["April 02"]));
}
