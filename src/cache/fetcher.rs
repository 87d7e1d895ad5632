//! Cache-coordinating fetcher for API responses
//!
//! Provides a `CachedFetcher` that serves the freshest acceptable payload for
//! a logical resource URL: it derives a versioned cache key, answers from the
//! `CacheStore` on a fresh HIT, and otherwise fetches over HTTP and writes the
//! response back. The HTTP side sits behind the `Transport` trait so tests can
//! substitute a recording fake.

use chrono::{DateTime, Duration, Utc};
use log::debug;
use reqwest::Client;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;

use crate::cache::store::{CacheEntry, CacheStore, StoreError};

/// Cache-format version appended to every request URL
///
/// Bumping this changes every derived cache key, making all previously stored
/// entries unreachable without deleting them.
pub const CACHE_VERSION: u32 = 1;

/// Errors that can occur while fetching a resource
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with a non-success status code
    #[error("HTTP error: status {0}")]
    Status(u16),

    /// The HTTP request itself failed
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The response body was not valid JSON
    #[error("Failed to parse response body: {0}")]
    Parse(#[from] serde_json::Error),

    /// Reading or writing the cache store failed
    #[error("Cache store error: {0}")]
    Store(#[from] StoreError),
}

/// A raw HTTP response: status code plus unparsed body
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Response body text
    pub body: String,
}

/// Minimal HTTP GET seam used by the fetcher
pub trait Transport {
    /// Performs a GET against `url` and returns the status plus raw body
    fn get(&self, url: &str) -> impl Future<Output = Result<HttpResponse, FetchError>> + Send;
}

/// Production transport backed by reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client
    pub fn new() -> Self {
        Self {
            client: Client::new(),
        }
    }
}

impl Transport for HttpTransport {
    async fn get(&self, url: &str) -> Result<HttpResponse, FetchError> {
        let response = self.client.get(url).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }
}

/// Read-through cache in front of an HTTP data API
///
/// Stateless across calls except via the store: each fetch is a linear
/// lookup / HIT-or-MISS / repopulate sequence. Two concurrent misses for the
/// same key may both fetch and both write; the payloads are equivalent and
/// the last write wins.
#[derive(Debug, Clone)]
pub struct CachedFetcher<T = HttpTransport> {
    transport: T,
    store: CacheStore,
    /// Cache-format version used for key derivation; explicit per instance so
    /// independent fetchers can run with different versions
    cache_version: u32,
}

impl CachedFetcher<HttpTransport> {
    /// Creates a fetcher over the real HTTP transport
    pub fn new(store: CacheStore) -> Self {
        Self::with_transport(store, HttpTransport::new())
    }
}

impl<T: Transport> CachedFetcher<T> {
    /// Creates a fetcher with a custom transport
    pub fn with_transport(store: CacheStore, transport: T) -> Self {
        Self {
            transport,
            store,
            cache_version: CACHE_VERSION,
        }
    }

    /// Overrides the cache-format version
    pub fn with_cache_version(mut self, cache_version: u32) -> Self {
        self.cache_version = cache_version;
        self
    }

    /// Derives the cache key for a logical resource URL
    ///
    /// Appends `v=<version>` as a query parameter, joined with `?` or `&`
    /// depending on whether the URL already carries a query string. Stable for
    /// identical (url, version) pairs.
    pub fn versioned_url(&self, url: &str) -> String {
        let separator = if url.contains('?') { '&' } else { '?' };
        format!("{}{}v={}", url, separator, self.cache_version)
    }

    /// Fetches a resource, serving from cache when a fresh entry exists
    ///
    /// On a HIT (entry younger than `ttl`) the stored payload is returned with
    /// no network access. Otherwise the versioned URL is fetched, a non-2xx
    /// status fails with [`FetchError::Status`] (a stale entry is never used
    /// to paper over a backend failure), and a successful response is written
    /// back to the store before being returned.
    pub async fn fetch_with_policy(&self, url: &str, ttl: Duration) -> Result<Value, FetchError> {
        let key = self.versioned_url(url);

        if let Some(entry) = self.store.get(&key)? {
            if is_fresh(&entry, ttl, Utc::now()) {
                debug!("cache hit for {}", key);
                return Ok(entry.payload);
            }
        }

        debug!("cache miss for {}, fetching from network", key);

        // The versioned URL goes over the wire so the backend sees the tag.
        let response = self.transport.get(&key).await?;
        if !(200..300).contains(&response.status) {
            return Err(FetchError::Status(response.status));
        }

        let payload: Value = serde_json::from_str(&response.body)?;
        let entry = CacheEntry::new(key, payload);
        self.store.put(&entry)?;
        Ok(entry.payload)
    }
}

/// Whether an entry is still fresh at `now` under the given TTL
fn is_fresh(entry: &CacheEntry, ttl: Duration, now: DateTime<Utc>) -> bool {
    now - entry.written_at < ttl
}
