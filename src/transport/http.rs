//! reqwest-backed transport

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::{Transport, TransportRequest};
use crate::error::TransportError;

/// Pass-through options this transport understands.
const QUERY_OPTION: &str = "params";
const HEADERS_OPTION: &str = "headers";

/// HTTP transport resolving relative URLs against a base URL.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Creates a transport with a default reqwest client.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url)
    }

    /// Creates a transport with a custom HTTP client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        Self {
            client,
            base_url: base_url.into(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Absolute URLs are used as-is, anything else is appended to the base URL.
    pub fn resolve_url(&self, url: &str) -> String {
        if url.starts_with("http://") || url.starts_with("https://") {
            return url.to_string();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            url.trim_start_matches('/')
        )
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        let url = self.resolve_url(&request.url);
        let mut headers = request.headers;
        let mut query = Vec::new();

        for (key, value) in &request.options {
            match key.as_str() {
                QUERY_OPTION => query.extend(query_pairs(value)),
                HEADERS_OPTION => merge_headers(&mut headers, value),
                other => debug!("Ignoring unsupported transport option '{}'", other),
            }
        }

        let mut builder = self
            .client
            .request(request.method.clone(), &url)
            .headers(headers)
            .timeout(request.timeout);
        if !query.is_empty() {
            builder = builder.query(&query);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(classify)?;
        let status = response.status();
        let payload = match response.text().await {
            Ok(text) => decode_payload(&text),
            Err(err) if status.is_success() => return Err(classify(err)),
            // The status line already arrived, so keep it even without a body
            Err(err) => {
                warn!("Failed to read {} body from {}: {}", status, url, err);
                Value::Null
            }
        };

        if status.is_success() {
            Ok(payload)
        } else {
            Err(TransportError::Status {
                status: status.as_u16(),
                body: payload,
            })
        }
    }
}

/// Splits reqwest failures into timeout vs. any other missing response.
fn classify(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

/// Empty bodies decode to `null`, non-JSON bodies to a JSON string.
fn decode_payload(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}

/// Flattens a `params` object into query pairs. Arrays repeat the key, nulls are dropped.
fn query_pairs(params: &Value) -> Vec<(String, String)> {
    let Value::Object(map) = params else {
        return Vec::new();
    };

    let mut pairs = Vec::new();
    for (key, value) in map {
        match value {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    pairs.push((key.clone(), scalar_to_string(item)));
                }
            }
            other => pairs.push((key.clone(), scalar_to_string(other))),
        }
    }
    pairs
}

fn scalar_to_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Option headers replace same-named defaults instead of being sent twice.
fn merge_headers(headers: &mut HeaderMap, option: &Value) {
    let Value::Object(extra) = option else {
        warn!("Ignoring '{}' option that is not an object", HEADERS_OPTION);
        return;
    };
    for (name, value) in extra {
        match header_pair(name, value) {
            Some((name, value)) => {
                headers.insert(name, value);
            }
            None => warn!("Skipping invalid header option '{}'", name),
        }
    }
}

fn header_pair(name: &str, value: &Value) -> Option<(HeaderName, HeaderValue)> {
    let name = HeaderName::from_bytes(name.as_bytes()).ok()?;
    let value = HeaderValue::from_str(&scalar_to_string(value)).ok()?;
    Some((name, value))
}
