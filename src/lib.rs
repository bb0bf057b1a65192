//! Back-office API client
//!
//! The request and cache layer every back-office screen goes through: auth
//! header injection, TTL caching of GET responses, invalidation on writes and
//! a fixed error taxonomy.

pub mod auth;
pub mod cache;
pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod models;
pub mod tasks;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::ApiClient;
pub use config::Config;
pub use error::{ApiError, ErrorKind};
pub use format::{format_error_for_component, ErrorInput};
pub use models::RequestConfig;
pub use tasks::spawn_cleanup_task;
