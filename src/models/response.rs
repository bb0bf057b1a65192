//! Response models
//!
//! The back-office server reports failures as a JSON object with an optional
//! `message` field; anything else is kept as an opaque body.

use serde::Deserialize;
use serde_json::Value;

/// Error payload sent by the server on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerErrorBody {
    /// Server-provided message, if any
    #[serde(default)]
    pub message: Option<String>,
}

impl ServerErrorBody {
    /// Extracts a non-empty server message from an arbitrary response body.
    pub fn message_from(body: &Value) -> Option<String> {
        serde_json::from_value::<ServerErrorBody>(body.clone())
            .ok()
            .and_then(|parsed| parsed.message)
            .filter(|message| !message.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_message_from_object() {
        let body = json!({"message": "client already exists", "code": "DUP"});
        assert_eq!(
            ServerErrorBody::message_from(&body).as_deref(),
            Some("client already exists")
        );
    }

    #[test]
    fn test_message_from_non_object() {
        assert!(ServerErrorBody::message_from(&json!("Bad Gateway")).is_none());
        assert!(ServerErrorBody::message_from(&Value::Null).is_none());
        assert!(ServerErrorBody::message_from(&json!({"message": 42})).is_none());
    }

    #[test]
    fn test_blank_message_is_ignored() {
        assert!(ServerErrorBody::message_from(&json!({"message": "  "})).is_none());
    }
}
