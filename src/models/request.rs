//! Request descriptors
//!
//! A `RequestDescriptor` is one call into the client: method, endpoint,
//! optional JSON body and per-request options.

use std::time::Duration;

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Per-request options.
///
/// `cacheTTL` and `timeout` are consumed by the client (milliseconds on the
/// wire). Every other field is forwarded untouched to the transport.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RequestConfig {
    /// Overrides the default cache lifetime; only used for GET responses
    #[serde(
        rename = "cacheTTL",
        default,
        with = "millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub cache_ttl: Option<Duration>,
    /// Overrides the default request timeout
    #[serde(default, with = "millis", skip_serializing_if = "Option::is_none")]
    pub timeout: Option<Duration>,
    /// Pass-through transport options
    #[serde(flatten)]
    pub options: Map<String, Value>,
}

impl RequestConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cache_ttl(mut self, ttl: Duration) -> Self {
        self.cache_ttl = Some(ttl);
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Adds a pass-through option, e.g. `params` or `headers`.
    pub fn option(mut self, key: impl Into<String>, value: Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// One request handed to the client.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestDescriptor {
    pub method: Method,
    /// Normalized endpoint, always starting with `/`
    pub url: String,
    pub body: Option<Value>,
    pub config: RequestConfig,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: &str) -> Self {
        Self {
            method,
            url: normalize_endpoint(endpoint),
            body: None,
            config: RequestConfig::default(),
        }
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }

    pub fn with_config(mut self, config: RequestConfig) -> Self {
        self.config = config;
        self
    }

    pub fn cache_key(&self) -> String {
        cache_key(&self.method, &self.url)
    }

    /// Reads are cached; everything else invalidates the cache.
    pub fn is_read(&self) -> bool {
        self.method == Method::GET
    }
}

/// Prefixes `/` when the endpoint does not already start with one.
pub fn normalize_endpoint(endpoint: &str) -> String {
    if endpoint.starts_with('/') {
        endpoint.to_string()
    } else {
        format!("/{}", endpoint)
    }
}

/// Cache key for a request: `METHOD:url`. The body is not part of the key.
pub fn cache_key(method: &Method, url: &str) -> String {
    format!("{}:{}", method, url)
}

mod millis {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Option<Duration>, s: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(duration) => s.serialize_some(&(duration.as_millis() as u64)),
            None => s.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Option<Duration>, D::Error> {
        Ok(Option::<u64>::deserialize(d)?.map(Duration::from_millis))
    }
}
