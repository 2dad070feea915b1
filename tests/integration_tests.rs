//! Integration tests for the dairy cooperative site service
//!
//! These tests run the news loader against a mocked content store and drive
//! the HTTP server end to end over a real socket.

use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use wiremock::{
    matchers::{method, path},
    Mock, MockServer, ResponseTemplate,
};

use dairy_coop_site::{
    config::Config,
    contact::{ContactTransport, HttpTransport, SimulatedTransport},
    news::{ContentError, ContentSource},
    retry::RetryConfig,
    server::{build_router, AppState},
};

// ==================== Test Helpers ====================

fn create_test_config(listing_url: &str) -> Config {
    Config {
        environment: "test".to_string(),
        port: 0,
        news_listing_url: listing_url.to_string(),
        news_limit: 6,
        news_excerpt_length: 150,
        news_request_timeout: Duration::from_secs(5),
        contact_endpoint: None,
        simulated_send_delay: Duration::from_millis(1),
        rate_limit_max_submissions: 3,
        rate_limit_window: Duration::from_secs(300),
        preferences_file: "unused.json".to_string(),
    }
}

fn content_source(listing_url: &str) -> ContentSource {
    ContentSource::new(listing_url, Duration::from_secs(5))
        .expect("Failed to build content source")
        .with_retry(RetryConfig::once(), RetryConfig::once())
}

fn news_document(day: u32) -> Value {
    json!({
        "title_en": format!("Collection update {}", day),
        "title_si": format!("එකතු කිරීමේ යාවත්කාලීනය {}", day),
        "body_en": "Milk collection starts at 6am. ".repeat(10),
        "body_si": "කිරි එකතු කිරීම උදේ 6ට ආරම්භ වේ. ".repeat(10),
        "image": format!("/images/news-{}.jpg", day),
        "category": "announcement",
        "date": format!("2024-03-{:02}T06:00:00Z", day)
    })
}

/// Mount a listing of `days` items at `/news` and one document per item.
async fn mount_content_store(server: &MockServer, days: u32) {
    let listing: Vec<Value> = (1..=days)
        .map(|day| {
            json!({
                "name": format!("2024-03-{:02}-update.json", day),
                "download_url": format!("{}/files/{}.json", server.uri(), day),
                "type": "file"
            })
        })
        .collect();

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(server)
        .await;

    for day in 1..=days {
        Mock::given(method("GET"))
            .and(path(format!("/files/{}.json", day)))
            .respond_with(ResponseTemplate::new(200).set_body_json(news_document(day)))
            .mount(server)
            .await;
    }
}

/// Serve the app on an ephemeral port and return its base URL.
async fn start_server(config: Config, transport: ContactTransport) -> String {
    let content = content_source(&config.news_listing_url);
    let state = Arc::new(AppState::new(config, content, transport));
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind test listener");
    let addr = listener.local_addr().unwrap();

    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    format!("http://{}", addr)
}

fn simulated() -> ContactTransport {
    ContactTransport::Simulated(SimulatedTransport::new(Duration::from_millis(1)))
}

async fn new_session(client: &reqwest::Client, base: &str) -> String {
    let body: Value = client
        .post(format!("{}/api/session", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    body["csrf_token"].as_str().unwrap().to_string()
}

fn valid_submission(token: &str) -> Value {
    json!({
        "csrf_token": token,
        "fields": [
            {"name": "name", "value": "Sunil Perera", "required": true},
            {"name": "email", "value": "sunil@example.lk", "required": true},
            {"name": "phone", "value": "+94 77 123 4567", "required": false},
            {"name": "message", "value": "When is the next farmer meeting?", "required": true}
        ]
    })
}

// ==================== Content Loader Tests ====================

#[tokio::test]
async fn test_load_recent_returns_newest_six_in_order() {
    let server = MockServer::start().await;
    mount_content_store(&server, 10).await;

    let source = content_source(&format!("{}/news", server.uri()));
    let entries = source.load_recent(6).await.unwrap();

    let dates: Vec<_> = entries.iter().map(|e| e.date.as_str()).collect();
    assert_eq!(
        dates,
        vec![
            "2024-03-10T06:00:00Z",
            "2024-03-09T06:00:00Z",
            "2024-03-08T06:00:00Z",
            "2024-03-07T06:00:00Z",
            "2024-03-06T06:00:00Z",
            "2024-03-05T06:00:00Z",
        ]
    );
}

#[tokio::test]
async fn test_load_recent_skips_failing_item() {
    let server = MockServer::start().await;

    let listing = json!([
        {"name": "2024-03-02-b.json", "download_url": format!("{}/files/b.json", server.uri())},
        {"name": "2024-03-01-a.json", "download_url": format!("{}/files/a.json", server.uri())}
    ]);
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(200).set_body_json(listing))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/b.json"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/files/a.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(news_document(1)))
        .mount(&server)
        .await;

    let source = content_source(&format!("{}/news", server.uri()));
    let entries = source.load_recent(6).await.unwrap();

    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].title_en, "Collection update 1");
}

#[tokio::test]
async fn test_load_recent_listing_failure_is_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let source = content_source(&format!("{}/news", server.uri()));
    let err = source.load_recent(6).await.unwrap_err();

    assert!(matches!(err, ContentError::Status { status: 404, .. }));
}

#[tokio::test]
async fn test_load_recent_retries_listing_server_error() {
    let server = MockServer::start().await;
    mount_content_store(&server, 2).await;

    // Higher priority mock answering the first listing request with 503
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    let source = ContentSource::new(format!("{}/news", server.uri()), Duration::from_secs(5))
        .unwrap()
        .with_retry(
            RetryConfig::new(2, Duration::from_millis(1)),
            RetryConfig::once(),
        );

    let entries = source.load_recent(6).await.unwrap();
    assert_eq!(entries.len(), 2);
}

// ==================== Server Tests ====================

#[tokio::test]
async fn test_health_endpoint() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;

    let response = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(response.status(), 200);
    assert_eq!(response.text().await.unwrap(), "OK");
}

#[tokio::test]
async fn test_session_issues_hex_token() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;
    let client = reqwest::Client::new();

    let first = new_session(&client, &base).await;
    let second = new_session(&client, &base).await;

    assert_eq!(first.len(), 64);
    assert!(first
        .chars()
        .all(|c| c.is_ascii_digit() || ('a'..='f').contains(&c)));
    assert_ne!(first, second);
}

#[tokio::test]
async fn test_contact_rejects_unknown_token() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;
    let client = reqwest::Client::new();
    let token = new_session(&client, &base).await;

    let last = if token.ends_with('0') { '1' } else { '0' };
    let forged = format!("{}{}", &token[..63], last);
    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&forged))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 403);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "Your session has expired. Please reload the page."
    );
}

#[tokio::test]
async fn test_contact_rate_limited_after_three_submissions() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;
    let client = reqwest::Client::new();
    let token = new_session(&client, &base).await;

    for _ in 0..3 {
        let response = client
            .post(format!("{}/api/contact", base))
            .json(&valid_submission(&token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["outcome"], "accepted");
    }

    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "rejected_rate_limited");
    assert_eq!(
        body["message"],
        "Too many submissions. Please try again later."
    );

    // A fresh session has its own budget
    let other = new_session(&client, &base).await;
    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&other))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);
}

#[tokio::test]
async fn test_contact_conflict_while_sending_keeps_budget() {
    let slow = ContactTransport::Simulated(SimulatedTransport::new(Duration::from_millis(500)));
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), slow).await;
    let client = reqwest::Client::new();
    let token = new_session(&client, &base).await;

    let first = {
        let client = client.clone();
        let url = format!("{}/api/contact", base);
        let body = valid_submission(&token);
        tokio::spawn(async move { client.post(url).json(&body).send().await.unwrap() })
    };

    // Let the first submission reach its transport
    tokio::time::sleep(Duration::from_millis(150)).await;

    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 409);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "rejected_in_progress");
    assert_eq!(body["message"], "Your message is already being sent.");

    assert_eq!(first.await.unwrap().status(), 200);

    // The refused attempt spent nothing: two more fit before the limit
    for _ in 0..2 {
        let response = client
            .post(format!("{}/api/contact", base))
            .json(&valid_submission(&token))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), 200);
    }

    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&token))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 429);
}

#[tokio::test]
async fn test_contact_validation_errors_localized() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;
    let client = reqwest::Client::new();
    let token = new_session(&client, &base).await;

    let submission = json!({
        "csrf_token": token,
        "fields": [
            {"name": "name", "value": "   ", "required": true},
            {"name": "phone", "value": "12345", "required": false}
        ]
    });

    let response = client
        .post(format!("{}/api/contact", base))
        .header("Cookie", "preferredLanguage=si")
        .json(&submission)
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 422);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "rejected_validation");
    assert!(body.get("message").is_none());
    assert_eq!(body["fields"][0]["name"], "name");
    assert_eq!(body["fields"][0]["valid"], false);
    assert_eq!(body["fields"][0]["message"], "මෙම ක්ෂේත්‍රය අවශ්‍ය වේ");
    assert_eq!(body["fields"][1]["valid"], false);
}

#[tokio::test]
async fn test_contact_transport_failure_is_bad_gateway() {
    let backend = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/contact"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&backend)
        .await;

    let transport = ContactTransport::Http(
        HttpTransport::new(format!("{}/contact", backend.uri()), Duration::from_secs(5)).unwrap(),
    );
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), transport).await;
    let client = reqwest::Client::new();
    let token = new_session(&client, &base).await;

    let response = client
        .post(format!("{}/api/contact", base))
        .json(&valid_submission(&token))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["outcome"], "rejected_transport");
}

#[tokio::test]
async fn test_language_toggle_sets_cookie() {
    let base = start_server(create_test_config("http://127.0.0.1:9/news"), simulated()).await;
    let client = reqwest::Client::new();

    let current: Value = client
        .get(format!("{}/api/language", base))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(current["language"], "en");
    assert_eq!(current["chrome"]["html_lang"], "en");

    let response = client
        .post(format!("{}/api/language/toggle", base))
        .header("Cookie", "preferredLanguage=en")
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let cookie = response
        .headers()
        .get("set-cookie")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(cookie.starts_with("preferredLanguage=si"));

    let body: Value = response.json().await.unwrap();
    assert_eq!(body["language"], "si");
    assert_eq!(body["chrome"]["toggle_current"], "සිං");
    assert_eq!(body["chrome"]["toggle_alternate"], "EN");
}

#[tokio::test]
async fn test_news_endpoint_renders_cards_in_sinhala() {
    let server = MockServer::start().await;
    mount_content_store(&server, 8).await;

    let base = start_server(
        create_test_config(&format!("{}/news", server.uri())),
        simulated(),
    )
    .await;
    let client = reqwest::Client::new();

    let body: Value = client
        .get(format!("{}/api/news", base))
        .header("Cookie", "preferredLanguage=si")
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(body["language"], "si");
    let cards = body["cards"].as_array().unwrap();
    assert_eq!(cards.len(), 6);
    assert_eq!(cards[0]["title"], "එකතු කිරීමේ යාවත්කාලීනය 8");
    assert_eq!(cards[0]["date"], "2024-03-08");
    assert_eq!(cards[0]["read_more"], "තව කියවන්න →");
    assert!(cards[0]["excerpt"].as_str().unwrap().ends_with("..."));
}

#[tokio::test]
async fn test_news_endpoint_listing_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/news"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let base = start_server(
        create_test_config(&format!("{}/news", server.uri())),
        simulated(),
    )
    .await;

    let response = reqwest::get(format!("{}/api/news", base)).await.unwrap();
    assert_eq!(response.status(), 502);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body["error"],
        "News is unavailable right now. Please try again later."
    );
}
