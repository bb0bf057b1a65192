//! Request and response models for the API client
//!
//! Defines what a caller hands to the client and the shape of the error
//! payloads the back-office server sends back.

pub mod request;
pub mod response;

// Re-export commonly used types
pub use request::{cache_key, normalize_endpoint, RequestConfig, RequestDescriptor};
pub use response::ServerErrorBody;
