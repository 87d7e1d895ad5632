//! Client-side caching for API responses
//!
//! This module provides the persistent cache store and the read-through
//! fetcher that coordinates it. Responses are stored keyed by their versioned
//! request URL with a write timestamp; freshness is decided per request by a
//! TTL policy, and the store document carries its own schema version with
//! migrations that can wipe stale payload shapes wholesale.

mod fetcher;
mod store;

pub use fetcher::{CachedFetcher, FetchError, HttpResponse, HttpTransport, Transport, CACHE_VERSION};
pub use store::{CacheEntry, CacheStore, StoreError, SCHEMA_VERSION};
