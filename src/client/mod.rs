//! Client Module
//!
//! The single entry point every API call goes through: cache lookup for
//! reads, auth header injection, transport call, invalidation on writes and
//! classification of every failure into an `ApiError`.

mod api_client;

pub use api_client::ApiClient;
