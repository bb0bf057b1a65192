//! API client
//!
//! Request lifecycle: a GET is answered from the cache when a fresh entry
//! exists. Otherwise the transport is called under the request timeout. A
//! successful GET is cached; any other successful method wipes the whole
//! cache. Failures are classified, logged, and a 401 additionally ends the
//! session.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::auth::{
    AuthTokenProvider, FileTokenStore, MemoryTokenStore, Navigator, TracingNavigator, LOGIN_PATH,
};
use crate::cache::{self, CacheStats, CacheStore, SharedCache};
use crate::config::{Config, DEFAULT_TIMEOUT_MS};
use crate::error::{
    ApiError, Result, TransportError, SERVER_ERROR_MESSAGE, VALIDATION_MESSAGE,
};
use crate::models::{RequestConfig, RequestDescriptor};
use crate::transport::{HttpTransport, Transport, TransportRequest};

/// Request orchestrator shared by every caller of the back-office API.
///
/// Cloning is cheap and clones share the same cache, token store and transport.
#[derive(Clone)]
pub struct ApiClient {
    transport: Arc<dyn Transport>,
    cache: SharedCache,
    tokens: Arc<dyn AuthTokenProvider>,
    navigator: Arc<dyn Navigator>,
    default_timeout: Duration,
}

impl ApiClient {
    /// Creates a client from its collaborators, with the default 10s timeout.
    pub fn new(
        transport: Arc<dyn Transport>,
        cache: SharedCache,
        tokens: Arc<dyn AuthTokenProvider>,
        navigator: Arc<dyn Navigator>,
    ) -> Self {
        Self {
            transport,
            cache,
            tokens,
            navigator,
            default_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
        }
    }

    /// Creates a client from configuration.
    ///
    /// Uses the reqwest transport, a file-backed token when a token path is
    /// known (in-memory otherwise), and logs forced logouts.
    pub fn from_config(config: &Config) -> Self {
        let transport = Arc::new(HttpTransport::new(config.base_url.clone()));
        let cache = cache::shared(CacheStore::new(config.cache_ttl()));
        let tokens: Arc<dyn AuthTokenProvider> = match &config.auth_token_path {
            Some(path) => Arc::new(FileTokenStore::new(path)),
            None => Arc::new(MemoryTokenStore::new()),
        };

        Self::new(transport, cache, tokens, Arc::new(TracingNavigator))
            .with_timeout(config.timeout())
    }

    /// Overrides the timeout used when a request does not set one.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = timeout;
        self
    }

    /// Handle to the shared cache, e.g. for the expiry sweeper.
    pub fn cache(&self) -> SharedCache {
        self.cache.clone()
    }

    pub async fn cache_stats(&self) -> CacheStats {
        self.cache.read().await.stats()
    }

    /// Drops every cached response. Returns how many entries were removed.
    pub async fn clear_cache(&self) -> usize {
        self.cache.write().await.invalidate_all()
    }

    // == Typed Entry Points ==
    /// Sends a request and decodes the JSON payload into `T`.
    pub async fn api_request<T: DeserializeOwned>(
        &self,
        method: Method,
        endpoint: &str,
        data: Option<Value>,
        config: RequestConfig,
    ) -> Result<T> {
        let mut request = RequestDescriptor::new(method, endpoint).with_config(config);
        request.body = data;
        let (method, url) = (request.method.clone(), request.url.clone());

        let payload = self.execute(request).await?;
        decode(&method, &url, payload)
    }

    pub async fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.api_request(Method::GET, endpoint, None, RequestConfig::default())
            .await
    }

    pub async fn get_with<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        config: RequestConfig,
    ) -> Result<T> {
        self.api_request(Method::GET, endpoint, None, config).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(&Method::POST, endpoint, body)?;
        self.api_request(Method::POST, endpoint, Some(body), RequestConfig::default())
            .await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(&Method::PUT, endpoint, body)?;
        self.api_request(Method::PUT, endpoint, Some(body), RequestConfig::default())
            .await
    }

    pub async fn patch<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<T> {
        let body = encode(&Method::PATCH, endpoint, body)?;
        self.api_request(Method::PATCH, endpoint, Some(body), RequestConfig::default())
            .await
    }

    pub async fn delete<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T> {
        self.api_request(Method::DELETE, endpoint, None, RequestConfig::default())
            .await
    }

    // == Execute ==
    /// Runs one request through cache, transport and classification.
    pub async fn execute(&self, request: RequestDescriptor) -> Result<Value> {
        let key = request.cache_key();
        let is_read = request.is_read();

        if is_read {
            let cached = self.cache.write().await.get(&key);
            if let Some(value) = cached {
                debug!("Cache hit for {}", key);
                return Ok(value);
            }
            debug!("Cache miss for {}", key);
        }

        let RequestDescriptor {
            method,
            url,
            body,
            config,
        } = request;
        let RequestConfig {
            cache_ttl,
            timeout,
            options,
        } = config;
        let timeout = timeout.unwrap_or(self.default_timeout);

        let transport_request = TransportRequest {
            method: method.clone(),
            url: url.clone(),
            headers: self.build_headers(),
            body,
            timeout,
            options,
        };

        let outcome = tokio::time::timeout(timeout, self.transport.send(transport_request))
            .await
            .unwrap_or(Err(TransportError::Timeout));

        match outcome {
            Ok(payload) => {
                if is_read {
                    self.cache.write().await.set(key.clone(), payload.clone(), cache_ttl);
                    debug!("Cached response for {}", key);
                } else {
                    let dropped = self.cache.write().await.invalidate_all();
                    info!("{} {} succeeded, invalidated {} cached responses", method, url, dropped);
                }
                Ok(payload)
            }
            Err(err) => Err(self.classify_failure(&method, &url, err)),
        }
    }

    /// Accept/Content-Type always, Authorization only when a token is stored.
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = self.tokens.get() {
            match HeaderValue::from_str(&format!("Bearer {}", token)) {
                Ok(mut value) => {
                    value.set_sensitive(true);
                    headers.insert(AUTHORIZATION, value);
                }
                Err(_) => warn!("Stored auth token is not a valid header value, sending unauthenticated"),
            }
        }

        headers
    }

    fn classify_failure(&self, method: &Method, url: &str, err: TransportError) -> ApiError {
        let api_error = ApiError::from(err);
        error!(
            status = api_error.status_code,
            method = %method,
            url = %url,
            body = ?api_error.error,
            "API request failed: {}",
            api_error.message
        );

        if api_error.is_unauthorized() {
            warn!("Received 401 for {} {}, clearing session", method, url);
            self.tokens.clear();
            self.navigator.navigate(LOGIN_PATH);
        }

        api_error
    }
}

/// A payload that does not match the expected shape is a server contract failure.
fn decode<T: DeserializeOwned>(method: &Method, url: &str, payload: Value) -> Result<T> {
    match T::deserialize(&payload) {
        Ok(value) => Ok(value),
        Err(e) => {
            error!(method = %method, url = %url, "Unexpected response shape: {}", e);
            Err(ApiError {
                status_code: 500,
                message: SERVER_ERROR_MESSAGE.to_string(),
                error: Some(payload),
            })
        }
    }
}

/// Serializes a request body up front, so nothing is sent if it cannot be encoded.
fn encode<B: Serialize + ?Sized>(method: &Method, endpoint: &str, body: &B) -> Result<Value> {
    serde_json::to_value(body).map_err(|e| {
        error!(method = %method, url = %endpoint, "Request body could not be encoded: {}", e);
        ApiError {
            status_code: 400,
            message: VALIDATION_MESSAGE.to_string(),
            error: Some(Value::String(e.to_string())),
        }
    })
}
