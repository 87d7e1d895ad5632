//! Motorsport data API client
//!
//! Thin endpoint helpers over the cache-coordinating fetcher. Each helper
//! builds the resource URL, picks the TTL for its request class, and defers
//! to [`CachedFetcher::fetch_with_policy`]. Helpers with identifying
//! parameters short-circuit to a neutral default when any are missing,
//! without touching the cache or the network.

use chrono::{Datelike, Duration, Local};
use serde_json::{json, Value};

use crate::cache::{CacheStore, CachedFetcher, FetchError, HttpTransport, Transport};

/// Default base URL for the data API
pub const DEFAULT_BASE_URL: &str = "/api";

/// Environment variable overriding the API base URL
pub const BASE_URL_ENV: &str = "PITWALL_API_BASE";

/// Cache duration in hours for current-season data
const CACHE_DURATION_HOURS: i64 = 24;

/// A very long duration, in hours, for static historical data
const ETERNAL_CACHE_HOURS: i64 = 99_999;

/// TTL for data that can still change during the season
pub fn default_ttl() -> Duration {
    Duration::hours(CACHE_DURATION_HOURS)
}

/// TTL for data that never changes once the session has run
pub fn eternal_ttl() -> Duration {
    Duration::hours(ETERNAL_CACHE_HOURS)
}

/// Selects the TTL for a season-parameterized endpoint
///
/// Seasons strictly before the current calendar year are over and their data
/// is immutable; the current and future seasons get the short default.
pub fn ttl_for_year(year: i32) -> Duration {
    ttl_for_year_relative(year, Local::now().year())
}

fn ttl_for_year_relative(year: i32, current_year: i32) -> Duration {
    if year < current_year {
        eternal_ttl()
    } else {
        default_ttl()
    }
}

/// Resolves the API base URL from the environment, falling back to `/api`
pub fn base_url_from_env() -> String {
    std::env::var(BASE_URL_ENV).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string())
}

/// Client for the motorsport session/telemetry data API
#[derive(Debug, Clone)]
pub struct ApiClient<T = HttpTransport> {
    fetcher: CachedFetcher<T>,
    base_url: String,
}

impl ApiClient<HttpTransport> {
    /// Creates a client over the real HTTP transport
    pub fn new(store: CacheStore) -> Self {
        Self::with_fetcher(CachedFetcher::new(store))
    }
}

impl<T: Transport> ApiClient<T> {
    /// Creates a client around an existing fetcher
    ///
    /// The base URL comes from [`BASE_URL_ENV`] when set, `/api` otherwise.
    pub fn with_fetcher(fetcher: CachedFetcher<T>) -> Self {
        Self {
            fetcher,
            base_url: base_url_from_env(),
        }
    }

    /// Overrides the API base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Season schedule for a year. Past seasons cache indefinitely.
    pub async fn events(&self, year: i32) -> Result<Value, FetchError> {
        let url = format!("{}/events?year={}", self.base_url, year);
        self.fetcher.fetch_with_policy(&url, ttl_for_year(year)).await
    }

    /// Sessions of one event. Past seasons cache indefinitely.
    pub async fn sessions(
        &self,
        year: Option<i32>,
        event_key: Option<&str>,
    ) -> Result<Value, FetchError> {
        let (Some(year), Some(event_key)) = (year, event_key) else {
            return Ok(json!({ "sessions": [] }));
        };
        let url = format!(
            "{}/sessions?year={}&event_key={}",
            self.base_url, year, event_key
        );
        self.fetcher.fetch_with_policy(&url, ttl_for_year(year)).await
    }

    /// Drivers who took part in a session. Past seasons cache indefinitely.
    pub async fn drivers(
        &self,
        year: Option<i32>,
        event_key: Option<&str>,
        session_name: Option<&str>,
    ) -> Result<Value, FetchError> {
        let (Some(year), Some(event_key), Some(session_name)) = (year, event_key, session_name)
        else {
            return Ok(json!({ "drivers": [] }));
        };
        let url = format!(
            "{}/drivers?year={}&event_key={}&session_name={}",
            self.base_url,
            year,
            event_key,
            urlencoded(session_name)
        );
        self.fetcher.fetch_with_policy(&url, ttl_for_year(year)).await
    }

    /// Lap-by-lap comparison of two drivers in an already-run session
    ///
    /// This data is static once the session exists and is cached indefinitely
    /// regardless of year.
    pub async fn race_comparison(
        &self,
        year: Option<i32>,
        event_key: Option<&str>,
        session_name: Option<&str>,
        driver1: Option<u32>,
        driver2: Option<u32>,
    ) -> Result<Value, FetchError> {
        let (Some(year), Some(event_key), Some(session_name), Some(driver1), Some(driver2)) =
            (year, event_key, session_name, driver1, driver2)
        else {
            return Ok(Value::Null);
        };
        let url = format!(
            "{}/race-comparison?year={}&event_key={}&session_name={}&driver1_number={}&driver2_number={}",
            self.base_url,
            year,
            event_key,
            urlencoded(session_name),
            driver1,
            driver2
        );
        self.fetcher.fetch_with_policy(&url, eternal_ttl()).await
    }

    /// Telemetry for one lap of each of two drivers. Cached indefinitely.
    #[allow(clippy::too_many_arguments)]
    pub async fn lap_telemetry(
        &self,
        year: Option<i32>,
        event_key: Option<&str>,
        session_name: Option<&str>,
        driver1: Option<u32>,
        driver2: Option<u32>,
        lap1: Option<u32>,
        lap2: Option<u32>,
    ) -> Result<Value, FetchError> {
        let (
            Some(year),
            Some(event_key),
            Some(session_name),
            Some(driver1),
            Some(driver2),
            Some(lap1),
            Some(lap2),
        ) = (year, event_key, session_name, driver1, driver2, lap1, lap2)
        else {
            return Ok(Value::Null);
        };
        let url = format!(
            "{}/lap-telemetry?year={}&event_key={}&session_name={}&driver1_number={}&driver2_number={}&lap1_number={}&lap2_number={}",
            self.base_url,
            year,
            event_key,
            urlencoded(session_name),
            driver1,
            driver2,
            lap1,
            lap2
        );
        self.fetcher.fetch_with_policy(&url, eternal_ttl()).await
    }

    /// Race summary with standings and tyre stints. Past seasons cache indefinitely.
    pub async fn race_summary(
        &self,
        year: Option<i32>,
        event_key: Option<&str>,
        session_name: Option<&str>,
    ) -> Result<Value, FetchError> {
        let (Some(year), Some(event_key), Some(session_name)) = (year, event_key, session_name)
        else {
            return Ok(Value::Null);
        };
        let url = format!(
            "{}/race-summary?year={}&event_key={}&session_name={}",
            self.base_url,
            year,
            event_key,
            urlencoded(session_name)
        );
        self.fetcher.fetch_with_policy(&url, ttl_for_year(year)).await
    }
}

/// URL-encodes a string for use in query parameters
fn urlencoded(s: &str) -> String {
    s.replace(' ', "%20").replace('\'', "%27")
}
