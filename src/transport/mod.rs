//! Transport Module
//!
//! A transport performs exactly one network exchange. The client composes it
//! with the cache and the auth layer; it never retries or caches on its own.

mod http;

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde_json::{Map, Value};

use crate::error::TransportError;

pub use http::HttpTransport;

/// Everything a transport needs for one exchange.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: Method,
    /// Relative (`/loans`) or absolute URL
    pub url: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
    pub timeout: Duration,
    /// Options the client does not interpret itself
    pub options: Map<String, Value>,
}

/// Executes a single request.
///
/// Returns the decoded payload on a 2xx response, otherwise a
/// `TransportError` that says whether any response was received.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError>;
}
