//! Integration tests for the robots.txt client
//!
//! These tests use wiremock to serve robots.txt files and check the
//! full query path: canonicalization, fetch, cache, and rule evaluation.

mod common;

use common::{mount_redirect_chain, mount_robots_txt};
use sumi_robots::config::parse_config;
use sumi_robots::{RobotsClient, RobotsError};
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client() -> RobotsClient {
    RobotsClient::new("TestBot/1.0").expect("Failed to create client")
}

#[tokio::test]
async fn test_disallow_respected() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots_txt(&mock_server, "User-agent: *\nDisallow: /private").await;

    let robots = client();
    assert!(!robots.allowed(format!("{}/private/x", base_url)).await.unwrap());
    assert!(robots.disallowed(format!("{}/private", base_url)).await.unwrap());
    assert!(robots.allowed(format!("{}/public", base_url)).await.unwrap());
}

#[tokio::test]
async fn test_site_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /admin"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let robots = client();
    for page in ["/", "/admin", "/about?lang=en", "/admin/users"] {
        robots.allowed(format!("{}{}", base_url, page)).await.unwrap();
    }
    robots.options(base_url.as_str()).await.unwrap();
    robots.sitemaps(base_url.as_str()).await.unwrap();

    assert_eq!(robots.cached_sites(), 1);
    // Wiremock verifies the single GET when mock_server drops
}

#[tokio::test]
async fn test_agent_specific_group() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots_txt(
        &mock_server,
        "User-agent: TestBot\nDisallow: /drafts\n\nUser-agent: *\nDisallow: /",
    )
    .await;

    let robots = client();
    assert!(robots.allowed(format!("{}/articles", base_url)).await.unwrap());
    assert!(!robots.allowed(format!("{}/drafts/1", base_url)).await.unwrap());

    let other = RobotsClient::new("OtherBot/3.0").unwrap();
    assert!(!other.allowed(format!("{}/articles", base_url)).await.unwrap());
}

#[tokio::test]
async fn test_robots_txt_itself_always_allowed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /"))
        .expect(0)
        .mount(&mock_server)
        .await;

    let robots = client();
    assert!(robots.allowed(format!("{}/robots.txt", base_url)).await.unwrap());
    assert_eq!(robots.cached_sites(), 0);
}

#[tokio::test]
async fn test_not_found_allows_everything() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&mock_server)
        .await;

    let robots = client();
    assert!(robots.allowed(format!("{}/", base_url)).await.unwrap());
    assert!(robots.allowed(format!("{}/admin/secret", base_url)).await.unwrap());
    assert!(robots.sitemaps(base_url.as_str()).await.unwrap().is_empty());
    assert_eq!(robots.cached_sites(), 1);
}

#[tokio::test]
async fn test_server_error_propagates_then_recovers() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .expect(1)
        .mount(&mock_server)
        .await;

    mount_robots_txt(&mock_server, "User-agent: *\nDisallow: /private").await;

    let robots = client();
    let err = robots
        .allowed(format!("{}/private", base_url))
        .await
        .unwrap_err();
    assert!(
        matches!(err, RobotsError::FetchFailed { .. }),
        "expected FetchFailed, got {:?}",
        err
    );
    assert_eq!(robots.cached_sites(), 0);

    // The failure was not cached, so the next query fetches again
    assert!(!robots.allowed(format!("{}/private", base_url)).await.unwrap());
    assert!(robots.allowed(format!("{}/public", base_url)).await.unwrap());
    assert_eq!(robots.cached_sites(), 1);
}

#[tokio::test]
async fn test_too_many_redirects() {
    let mock_server = MockServer::start().await;
    mount_redirect_chain(&mock_server, 10, "User-agent: *\nDisallow: /").await;

    let robots = client();
    let err = robots.allowed(mock_server.uri()).await.unwrap_err();
    assert!(err.is_too_many_redirects(), "expected TooManyRedirects, got {:?}", err);
}

#[tokio::test]
async fn test_nine_redirects_resolve() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();
    mount_redirect_chain(&mock_server, 9, "User-agent: *\nDisallow: /private").await;

    let robots = client();
    assert!(!robots.allowed(format!("{}/private", base_url)).await.unwrap());
    assert!(robots.allowed(format!("{}/open", base_url)).await.unwrap());
}

#[tokio::test]
async fn test_options_crawl_delay() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots_txt(
        &mock_server,
        "User-agent: *\nCrawl-delay: 60\n\nUser-agent: testbot\nCrawl-Delay: 5\nDisallow: /tmp",
    )
    .await;

    let robots = client();
    let options = robots.options(format!("{}/any", base_url)).await.unwrap();
    assert_eq!(options.get("crawl-delay").map(String::as_str), Some("5"));
    assert_eq!(
        robots.option(base_url.as_str(), "CRAWL-DELAY").await.unwrap(),
        Some("5".to_string())
    );
    assert_eq!(robots.crawl_delay(base_url.as_str()).await.unwrap(), Some(5.0));
}

#[tokio::test]
async fn test_sitemaps_in_document_order() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_robots_txt(
        &mock_server,
        "Sitemap: https://example.com/sitemap-b.xml\n\
         User-agent: *\n\
         Disallow: /search\n\
         Sitemap: https://example.com/sitemap-a.xml\n\
         Sitemap: https://example.com/sitemap-b.xml\n",
    )
    .await;

    let robots = client();
    assert_eq!(
        robots.sitemaps(format!("{}/page", base_url)).await.unwrap(),
        vec![
            "https://example.com/sitemap-b.xml".to_string(),
            "https://example.com/sitemap-a.xml".to_string(),
            "https://example.com/sitemap-b.xml".to_string(),
        ]
    );
}

#[tokio::test]
async fn test_config_user_agent_sent() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .and(header(
            "user-agent",
            "ConfigBot/2.0 (+https://example.com/bot; bot@example.com)",
        ))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: ConfigBot\nDisallow: /"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = parse_config(
        r#"
[user-agent]
crawler-name = "ConfigBot"
crawler-version = "2.0"
contact-url = "https://example.com/bot"
contact-email = "bot@example.com"

[fetch]
timeout-secs = 5
connect-timeout-secs = 2
"#,
    )
    .unwrap();

    let robots = RobotsClient::from_config(&config).unwrap();
    assert!(!robots.allowed(format!("{}/page", base_url)).await.unwrap());
}

#[tokio::test]
async fn test_invalid_inputs_rejected_without_fetch() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let robots = client();
    assert!(matches!(
        robots.allowed("robots.txt").await,
        Err(RobotsError::NotAbsolute(_))
    ));
    assert!(matches!(
        robots.allowed("http://").await,
        Err(RobotsError::NotAbsolute(_))
    ));
    assert!(matches!(
        robots.allowed("ftp://127.0.0.1/file").await,
        Err(RobotsError::UnsupportedScheme(_))
    ));
    assert!(matches!(
        robots.allowed("http://[::1").await,
        Err(RobotsError::InvalidUri(_))
    ));
}
