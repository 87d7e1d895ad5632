//! Endpoint helpers for the motorsport data API
//!
//! This module contains the caller-facing client: URL builders for the
//! session/telemetry endpoints, the per-request-class cache policy, and the
//! missing-parameter short circuits.

pub mod client;

pub use client::{
    base_url_from_env, default_ttl, eternal_ttl, ttl_for_year, ApiClient, BASE_URL_ENV,
    DEFAULT_BASE_URL,
};
