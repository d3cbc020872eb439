//! HTTP client module
//!
//! Provides the HTTP client with retry and backoff used by the
//! control-plane client.
//!
//! # Features
//!
//! - **Automatic Retries**: Configurable retry logic with backoff
//! - **Backoff**: Exponential, capped, with `Retry-After` honoured on 429
//! - **Authentication**: Session token applied as cookie or bearer header

mod client;

pub use client::{HttpClient, HttpClientConfig, HttpClientConfigBuilder, RequestConfig};
