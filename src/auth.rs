//! Auth Module
//!
//! The persisted auth token and the forced-login redirect are host
//! capabilities injected into the client. The token is read fresh on every
//! request and only cleared when a response is classified as 401.

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

/// Route the host is sent to after a 401.
pub const LOGIN_PATH: &str = "/login";

/// Source of the bearer token attached to outgoing requests.
pub trait AuthTokenProvider: Send + Sync {
    /// Current token, None when the user is logged out.
    fn get(&self) -> Option<String>;
    /// Forgets the token.
    fn clear(&self);
}

/// Host hook for hard navigation, e.g. a UI shell redirecting to the login page.
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

// == Memory Token Store ==
/// Token kept in process memory. Useful for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: impl Into<String>) -> Self {
        Self {
            token: RwLock::new(Some(token.into())),
        }
    }

    pub fn set(&self, token: impl Into<String>) {
        if let Ok(mut guard) = self.token.write() {
            *guard = Some(token.into());
        }
    }
}

impl AuthTokenProvider for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|guard| guard.clone())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

// == File Token Store ==
/// Token persisted in a single file, surviving process restarts.
#[derive(Debug, Clone)]
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Persists a token, creating parent directories as needed.
    pub fn store(&self, token: &str) -> std::io::Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, token.trim())
    }
}

impl AuthTokenProvider for FileTokenStore {
    fn get(&self) -> Option<String> {
        match fs::read_to_string(&self.path) {
            Ok(content) => {
                let token = content.trim();
                (!token.is_empty()).then(|| token.to_string())
            }
            Err(e) if e.kind() == ErrorKind::NotFound => None,
            Err(e) => {
                warn!("Failed to read auth token from {}: {}", self.path.display(), e);
                None
            }
        }
    }

    fn clear(&self) {
        match fs::remove_file(&self.path) {
            Ok(()) => debug!("Removed auth token at {}", self.path.display()),
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => warn!("Failed to remove auth token at {}: {}", self.path.display(), e),
        }
    }
}

// == Tracing Navigator ==
/// Navigator for hosts without a UI: records the redirect in the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingNavigator;

impl Navigator for TracingNavigator {
    fn navigate(&self, path: &str) {
        warn!("Session ended, navigation to {} requested", path);
    }
}
