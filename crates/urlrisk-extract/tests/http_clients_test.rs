use std::time::Duration;
use urlrisk_extract::content::content_features;
use urlrisk_extract::{ExtractError, HttpFetcher, PageFetcher, RankClient, TrafficRank};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn fetcher() -> HttpFetcher {
    HttpFetcher::new(Duration::from_secs(5), 30, "urlrisk-test").expect("build fetcher")
}

#[tokio::test]
async fn test_fetch_follows_and_records_redirects() {
    let server = MockServer::start().await;

    for (from, to) in [("/a", "/b"), ("/b", "/c"), ("/c", "/landing")] {
        Mock::given(method("GET"))
            .and(path(from))
            .respond_with(ResponseTemplate::new(302).insert_header("Location", to))
            .mount(&server)
            .await;
    }
    Mock::given(method("GET"))
        .and(path("/landing"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<p>landed</p>"))
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch(&format!("{}/a", server.uri()))
        .await
        .expect("fetch succeeds");

    assert_eq!(page.status, 200);
    assert_eq!(page.body, "<p>landed</p>");
    assert_eq!(page.history.len(), 3);
    assert_eq!(page.history[0].status, 302);
    assert!(page.history[0].url.ends_with("/a"));
    assert_eq!(content_features(&page), [1, 0, 1, 1]);
}

#[tokio::test]
async fn test_fetch_error_status_is_not_a_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_string("<iframe></iframe> not here"),
        )
        .mount(&server)
        .await;

    let page = fetcher()
        .fetch(&format!("{}/missing", server.uri()))
        .await
        .expect("404 still yields a page");

    assert_eq!(page.status, 404);
    assert!(page.history.is_empty());
    assert_eq!(content_features(&page), [0, 0, 1, 0]);
}

#[tokio::test]
async fn test_fetch_redirect_loop_fails() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/loop"))
        .respond_with(ResponseTemplate::new(301).insert_header("Location", "/loop"))
        .mount(&server)
        .await;

    let fetcher = HttpFetcher::new(Duration::from_secs(5), 5, "urlrisk-test").expect("build");
    let err = fetcher
        .fetch(&format!("{}/loop", server.uri()))
        .await
        .expect_err("redirect loop");

    assert!(matches!(err, ExtractError::TooManyRedirects { max: 5, .. }));
}

#[tokio::test]
async fn test_fetch_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(3)))
        .mount(&server)
        .await;

    let fetcher =
        HttpFetcher::new(Duration::from_millis(200), 30, "urlrisk-test").expect("build fetcher");
    let err = fetcher
        .fetch(&format!("{}/slow", server.uri()))
        .await
        .expect_err("timeout");

    assert!(matches!(err, ExtractError::Http(ref e) if e.is_timeout()));
}

#[tokio::test]
async fn test_fetch_rejects_relative_urls() {
    let err = fetcher()
        .fetch("bit.ly/xyz")
        .await
        .expect_err("no scheme");
    assert!(matches!(err, ExtractError::InvalidUrl { .. }));
}

#[tokio::test]
async fn test_rank_client_reads_reach_rank() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .and(query_param("cli", "10"))
        .and(query_param("dat", "s"))
        .and(query_param("url", "https://example.com/login"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            r#"<?xml version="1.0"?><ALEXA><SD><REACH RANK="5321"/></SD></ALEXA>"#,
        ))
        .mount(&server)
        .await;

    let client = RankClient::new(format!("{}/data", server.uri()), Duration::from_secs(5))
        .expect("build rank client");
    let rank = client
        .rank("https://example.com/login")
        .await
        .expect("rank available");

    assert_eq!(rank, 5321);
}

#[tokio::test]
async fn test_rank_client_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let client = RankClient::new(format!("{}/data", server.uri()), Duration::from_secs(5))
        .expect("build rank client");

    assert!(client.rank("https://example.com").await.is_err());
}
