use anyhow::{Context, Result};
use std::time::Duration;

/// Placeholder listing of the CMS-managed news folder; override with
/// NEWS_LISTING_URL in every real deployment.
pub const DEFAULT_NEWS_LISTING_URL: &str =
    "https://api.github.com/repos/bandarawela-dairy/website/contents/content/news";

#[derive(Debug, Clone)]
pub struct Config {
    // Environment
    pub environment: String,

    // Server
    pub port: u16,

    // News
    pub news_listing_url: String,
    pub news_limit: usize,
    pub news_excerpt_length: usize,
    pub news_request_timeout: Duration,

    // Contact form
    pub contact_endpoint: Option<String>,
    pub simulated_send_delay: Duration,
    pub rate_limit_max_submissions: usize,
    pub rate_limit_window: Duration,

    // Preferences (command-line tools)
    pub preferences_file: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            port: match std::env::var("PORT") {
                Ok(v) => v.parse().context("PORT must be a valid port number")?,
                Err(_) => 8080,
            },

            news_listing_url: std::env::var("NEWS_LISTING_URL")
                .unwrap_or_else(|_| DEFAULT_NEWS_LISTING_URL.to_string()),
            news_limit: parse_or("NEWS_LIMIT", 6),
            news_excerpt_length: parse_or("NEWS_EXCERPT_LENGTH", 150),
            news_request_timeout: Duration::from_secs(parse_or("NEWS_REQUEST_TIMEOUT_SECS", 10)),

            contact_endpoint: std::env::var("CONTACT_ENDPOINT")
                .ok()
                .filter(|v| !v.trim().is_empty()),
            simulated_send_delay: Duration::from_millis(parse_or("SIMULATED_SEND_DELAY_MS", 1500)),
            rate_limit_max_submissions: parse_or("RATE_LIMIT_MAX_SUBMISSIONS", 3),
            rate_limit_window: Duration::from_secs(parse_or("RATE_LIMIT_WINDOW_SECS", 300)),

            preferences_file: std::env::var("PREFERENCES_FILE")
                .unwrap_or_else(|_| "data/preferences.json".to_string()),
        })
    }

    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }
}

/// Read an optional numeric variable, keeping the default on absence or
/// parse failure.
fn parse_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}
