//! Loading the newest news entries from the remote content store.
//!
//! The store exposes a directory listing whose item names are date-prefixed,
//! so reverse lexicographic order is newest first. Each listed item is then
//! fetched individually.

use crate::news::{ListingItem, NewsEntry};
use crate::retry::{with_retry_if, RetryConfig};
use futures::future::join_all;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, warn};

const USER_AGENT: &str = concat!("dairy-coop-site/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status { url: String, status: u16 },

    #[error("{url} returned malformed JSON: {source}")]
    Decode {
        url: String,
        #[source]
        source: reqwest::Error,
    },
}

impl ContentError {
    /// Network failures and server errors may clear up; client errors and
    /// malformed documents will not.
    pub fn is_retryable(&self) -> bool {
        match self {
            ContentError::Request { .. } => true,
            ContentError::Status { status, .. } => *status >= 500 || *status == 429,
            ContentError::Decode { .. } => false,
        }
    }
}

/// Client for the remote content store.
#[derive(Debug, Clone)]
pub struct ContentSource {
    client: reqwest::Client,
    listing_url: String,
    listing_retry: RetryConfig,
    item_retry: RetryConfig,
}

impl ContentSource {
    pub fn new(listing_url: impl Into<String>, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()?;

        Ok(Self {
            client,
            listing_url: listing_url.into(),
            listing_retry: RetryConfig::content_listing(),
            item_retry: RetryConfig::content_item(),
        })
    }

    pub fn with_retry(mut self, listing: RetryConfig, item: RetryConfig) -> Self {
        self.listing_retry = listing;
        self.item_retry = item;
        self
    }

    pub fn listing_url(&self) -> &str {
        &self.listing_url
    }

    /// The `n` newest entries, newest first.
    ///
    /// A failed listing fetch is an error. A failed item fetch only drops
    /// that item, so the result may hold fewer than `n` entries.
    pub async fn load_recent(&self, n: usize) -> Result<Vec<NewsEntry>, ContentError> {
        let listing = self.fetch_listing().await?;
        let selected = select_recent(listing, n);
        debug!("Fetching {} news documents", selected.len());

        let results = join_all(selected.iter().map(|item| self.fetch_entry(item))).await;

        let mut entries = Vec::with_capacity(results.len());
        for (item, result) in selected.iter().zip(results) {
            match result {
                Ok(entry) => entries.push(entry),
                Err(e) => warn!("Skipping news item {}: {}", item.name, e),
            }
        }

        info!("Loaded {}/{} news entries", entries.len(), selected.len());
        Ok(entries)
    }

    pub async fn fetch_listing(&self) -> Result<Vec<ListingItem>, ContentError> {
        with_retry_if(
            &self.listing_retry,
            "News listing",
            || self.get_json(&self.listing_url),
            ContentError::is_retryable,
        )
        .await
    }

    async fn fetch_entry(&self, item: &ListingItem) -> Result<NewsEntry, ContentError> {
        // select_recent only keeps items with a download URL
        let url = item.download_url.as_deref().unwrap_or_default();
        with_retry_if(
            &self.item_retry,
            &format!("News item {}", item.name),
            || self.get_json(url),
            ContentError::is_retryable,
        )
        .await
    }

    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, ContentError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| ContentError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(ContentError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.json().await.map_err(|source| ContentError::Decode {
            url: url.to_string(),
            source,
        })
    }
}

/// Keep downloadable items, order them newest first by name and keep `n`.
pub fn select_recent(mut listing: Vec<ListingItem>, n: usize) -> Vec<ListingItem> {
    listing.retain(|item| item.download_url.is_some());
    listing.sort_by(|a, b| b.name.cmp(&a.name));
    listing.truncate(n);
    listing
}
