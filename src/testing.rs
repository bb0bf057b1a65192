//! Scripted collaborators for unit tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{MemoryTokenStore, Navigator};
use crate::cache::{self, CacheStore, SharedCache};
use crate::client::ApiClient;
use crate::error::TransportError;
use crate::transport::{Transport, TransportRequest};

struct Reply {
    delay: Duration,
    result: Result<Value, TransportError>,
}

/// Transport that answers from a queue and records every request it sees.
#[derive(Default)]
pub struct MockTransport {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<TransportRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_ok(&self, value: Value) {
        self.push_delayed(Duration::ZERO, Ok(value));
    }

    pub fn push_err(&self, err: TransportError) {
        self.push_delayed(Duration::ZERO, Err(err));
    }

    pub fn push_status(&self, status: u16, body: Value) {
        self.push_err(TransportError::Status { status, body });
    }

    pub fn push_delayed(&self, delay: Duration, result: Result<Value, TransportError>) {
        self.replies.lock().unwrap().push_back(Reply { delay, result });
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<TransportRequest> {
        self.calls.lock().unwrap().clone()
    }

    pub fn last_call(&self) -> TransportRequest {
        self.calls.lock().unwrap().last().cloned().expect("no transport call recorded")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: TransportRequest) -> Result<Value, TransportError> {
        self.calls.lock().unwrap().push(request);
        let reply = self.replies.lock().unwrap().pop_front();

        match reply {
            Some(reply) => {
                if !reply.delay.is_zero() {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.result
            }
            None => Err(TransportError::Connection("no scripted reply".to_string())),
        }
    }
}

/// Navigator that remembers every requested path.
#[derive(Default)]
pub struct RecordingNavigator {
    paths: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, path: &str) {
        self.paths.lock().unwrap().push(path.to_string());
    }
}

/// A client wired to scripted collaborators, with handles kept for assertions.
pub struct Harness {
    pub client: ApiClient,
    pub transport: Arc<MockTransport>,
    pub tokens: Arc<MemoryTokenStore>,
    pub navigator: Arc<RecordingNavigator>,
    pub cache: SharedCache,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_token(None)
    }

    pub fn with_token(token: Option<&str>) -> Self {
        let transport = Arc::new(MockTransport::new());
        let tokens = Arc::new(match token {
            Some(token) => MemoryTokenStore::with_token(token),
            None => MemoryTokenStore::new(),
        });
        let navigator = Arc::new(RecordingNavigator::default());
        let cache = cache::shared(CacheStore::new(Duration::from_secs(30)));

        let client = ApiClient::new(
            transport.clone(),
            cache.clone(),
            tokens.clone(),
            navigator.clone(),
        );

        Self {
            client,
            transport,
            tokens,
            navigator,
            cache,
        }
    }
}
