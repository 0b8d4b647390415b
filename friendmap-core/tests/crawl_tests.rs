// Tests for crawl functionality

use friendmap_core::config::Config;
use friendmap_core::crawl::{CrawlOptions, build_crawler, build_graph, execute_crawl, normalize_profile_url};
use friendmap_core::CoreError;
use friendmap_scanner::{ScanError, Selectors};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

// ============================================================================
// Profile URL Normalisation Tests
// ============================================================================

#[test]
fn test_normalize_profile_url_with_scheme() {
    assert_eq!(
        normalize_profile_url("https://steamcommunity.com/id/gaben/"),
        Some("https://steamcommunity.com/id/gaben/".to_string())
    );
}

#[test]
fn test_normalize_profile_url_without_scheme() {
    assert_eq!(
        normalize_profile_url("steamcommunity.com/profiles/765/"),
        Some("https://steamcommunity.com/profiles/765/".to_string())
    );
}

#[test]
fn test_normalize_profile_url_trims_whitespace() {
    assert_eq!(
        normalize_profile_url("  https://steamcommunity.com/id/x/\n"),
        Some("https://steamcommunity.com/id/x/".to_string())
    );
}

#[test]
fn test_normalize_profile_url_invalid() {
    assert_eq!(normalize_profile_url(""), None);
    assert_eq!(normalize_profile_url("not a valid url!!!"), None);
}

// ============================================================================
// Crawler Construction Tests
// ============================================================================

#[test]
fn test_build_crawler_rejects_bad_selector() {
    let config = Config {
        selectors: Selectors {
            connection_block: "div[".to_string(),
            ..Selectors::default()
        },
        ..Config::default()
    };

    let err = build_crawler(&config).err().unwrap();
    assert!(matches!(err, CoreError::Scan(ScanError::Selector { .. })));
}

#[test]
fn test_build_crawler_rejects_bad_base_url() {
    let config = Config {
        base_url: "::nope::".to_string(),
        ..Config::default()
    };
    assert!(build_crawler(&config).is_err());
}

// ============================================================================
// End-to-end Tests
// ============================================================================

async fn mount(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn profile(id: &str, name: &str) -> String {
    format!(
        r#"<script>g_rgProfileData = {{"steamid":"{}"}};</script>
        <span class="actual_persona_name">{}</span>
        <div class="profile_friend_links"></div>"#,
        id, name
    )
}

fn friends(list: &[(&str, &str)]) -> String {
    list.iter()
        .map(|(id, name)| {
            format!(
                r#"<div class="friend_block_v2" data-steamid="{}"><div class="friend_block_content">{}</div></div>"#,
                id, name
            )
        })
        .collect()
}

#[tokio::test]
async fn test_execute_crawl_and_build_graph() {
    let server = MockServer::start().await;
    mount(&server, "/profiles/1/", &profile("1", "Root")).await;
    mount(&server, "/profiles/1/friends/", &friends(&[("2", "A"), ("3", "B"), ("4", "C")])).await;
    mount(&server, "/profiles/2/", &profile("2", "A")).await;
    mount(&server, "/profiles/2/friends/", &friends(&[("1", "Root"), ("3", "B"), ("8", "X")])).await;
    mount(&server, "/profiles/3/", r#"<div class="profile_private_info"></div>"#).await;
    mount(&server, "/profiles/4/", &profile("4", "C")).await;
    mount(&server, "/profiles/4/friends/", &friends(&[("1", "Root")])).await;

    let messages: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let messages_clone = messages.clone();

    let options = CrawlOptions {
        root_url: format!("{}/profiles/1/", server.uri()),
        config: Config {
            base_url: server.uri(),
            concurrency: Some(2),
            ..Config::default()
        },
        show_progress_bars: false,
    };

    let outcome = execute_crawl(
        options,
        Some(Arc::new(move |msg: String| {
            messages_clone.lock().unwrap().push(msg);
        })),
    )
    .await
    .unwrap();

    assert_eq!(outcome.private, vec!["3".to_string()]);
    assert_eq!(outcome.results.len(), 2);

    let (graph, _) = build_graph(&outcome, false);
    assert_eq!(graph.node_count(), 4);
    assert_eq!(
        graph.edges(),
        vec![("1", "2"), ("1", "3"), ("1", "4"), ("2", "3")]
    );

    let (pruned_graph, pruned) = build_graph(&outcome, true);
    assert_eq!(pruned, vec!["4".to_string()]);
    assert_eq!(pruned_graph.node_count(), 3);

    let messages = messages.lock().unwrap();
    assert!(messages[0].starts_with("Crawling "));
    assert!(messages.iter().any(|m| m.contains("1 friend lists private")));
}

async fn mount_delayed(server: &MockServer, route: &str, body: &str, delay: Duration) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(body)
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

/// Root 1 with friends 2..=5; friend 2 answers slowest, friend 5 fastest
/// when `stagger` is set.
async fn circle_server(stagger: bool) -> MockServer {
    let server = MockServer::start().await;
    mount(&server, "/profiles/1/", &profile("1", "Root")).await;
    mount(
        &server,
        "/profiles/1/friends/",
        &friends(&[("2", "A"), ("3", "B"), ("4", "C"), ("5", "D")]),
    )
    .await;

    let lists: [(&str, &str, &[(&str, &str)]); 4] = [
        ("2", "A", &[("1", "Root"), ("3", "B"), ("9", "X")]),
        ("3", "B", &[("2", "A"), ("5", "D")]),
        ("4", "C", &[("1", "Root")]),
        ("5", "D", &[("3", "B"), ("4", "C")]),
    ];
    for (i, (id, name, list)) in lists.iter().enumerate() {
        let delay = if stagger {
            Duration::from_millis(40 * (lists.len() - i) as u64)
        } else {
            Duration::ZERO
        };
        mount_delayed(&server, &format!("/profiles/{}/", id), &profile(id, name), delay).await;
        mount(&server, &format!("/profiles/{}/friends/", id), &friends(list)).await;
    }
    server
}

async fn crawl_circle(stagger: bool) -> friendmap_scanner::CrawlOutcome {
    let server = circle_server(stagger).await;
    let options = CrawlOptions {
        root_url: format!("{}/profiles/1/", server.uri()),
        config: Config {
            base_url: server.uri(),
            ..Config::default()
        },
        show_progress_bars: false,
    };
    execute_crawl(options, None).await.unwrap()
}

#[tokio::test]
async fn test_completion_order_does_not_change_graph() {
    let in_order = crawl_circle(false).await;
    let staggered = crawl_circle(true).await;

    assert_eq!(in_order.results, staggered.results);

    let (expected, _) = build_graph(&in_order, false);
    let (graph, _) = build_graph(&staggered, false);
    assert_eq!(graph.edges(), expected.edges());
    assert_eq!(
        graph.edges(),
        vec![
            ("1", "2"),
            ("1", "3"),
            ("1", "4"),
            ("1", "5"),
            ("2", "3"),
            ("3", "5"),
            ("4", "5"),
        ]
    );
}

#[tokio::test]
async fn test_execute_crawl_private_root() {
    let server = MockServer::start().await;
    mount(&server, "/profiles/1/", r#"<div class="profile_private_info"></div>"#).await;

    let options = CrawlOptions {
        root_url: format!("{}/profiles/1/", server.uri()),
        config: Config {
            base_url: server.uri(),
            ..Config::default()
        },
        show_progress_bars: false,
    };

    let err = execute_crawl(options, None).await.unwrap_err();
    assert!(matches!(err, CoreError::Scan(ScanError::RootPrivate(_))));
}
