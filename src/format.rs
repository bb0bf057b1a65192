//! User-facing error text
//!
//! Callers catch all sorts of failures. `ErrorInput` closes them into three
//! shapes so `format_error_for_component` can handle each one explicitly.

use serde_json::Value;

use crate::error::{
    default_message, ApiError, ErrorKind, NETWORK_MESSAGE, NOT_FOUND_MESSAGE,
    SERVER_ERROR_MESSAGE, TIMEOUT_MESSAGE, UNAUTHORIZED_MESSAGE,
};

/// Shown when nothing better can be said.
pub const FALLBACK_MESSAGE: &str = "An unexpected error occurred, please try again";

/// Anything a caller may want to show to a user.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorInput {
    /// A ready-made message
    Text(String),
    /// A classified client failure
    Api(ApiError),
    /// Any other failure, with its message when it has one
    Unknown { message: Option<String> },
}

impl ErrorInput {
    /// Maps a loosely shaped JSON error (as produced by scripting hosts) onto the union.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::String(text) => ErrorInput::Text(text.clone()),
            Value::Object(map) => {
                let message = map
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string);
                let status = map
                    .get("statusCode")
                    .and_then(Value::as_u64)
                    .and_then(|code| u16::try_from(code).ok());

                match status {
                    Some(status_code) => ErrorInput::Api(ApiError {
                        status_code,
                        message: message.unwrap_or_default(),
                        error: map.get("error").cloned(),
                    }),
                    None => ErrorInput::Unknown { message },
                }
            }
            _ => ErrorInput::Unknown { message: None },
        }
    }
}

impl From<ApiError> for ErrorInput {
    fn from(err: ApiError) -> Self {
        ErrorInput::Api(err)
    }
}

impl From<String> for ErrorInput {
    fn from(text: String) -> Self {
        ErrorInput::Text(text)
    }
}

impl From<&str> for ErrorInput {
    fn from(text: &str) -> Self {
        ErrorInput::Text(text.to_string())
    }
}

impl From<&anyhow::Error> for ErrorInput {
    fn from(err: &anyhow::Error) -> Self {
        match err.downcast_ref::<ApiError>() {
            Some(api_error) => ErrorInput::Api(api_error.clone()),
            None => ErrorInput::Unknown {
                message: Some(err.to_string()),
            },
        }
    }
}

/// Turns any caught failure into a sentence for the UI. Never fails.
///
/// Known statuses map to fixed sentences whatever message the error carries.
/// A 400 keeps the server's validation message, and unlisted statuses keep
/// their message when it is not empty.
pub fn format_error_for_component(input: &ErrorInput) -> String {
    match input {
        ErrorInput::Text(text) => text.clone(),
        ErrorInput::Api(err) => match err.kind() {
            ErrorKind::Timeout => TIMEOUT_MESSAGE.to_string(),
            ErrorKind::Network => NETWORK_MESSAGE.to_string(),
            ErrorKind::Unauthorized => UNAUTHORIZED_MESSAGE.to_string(),
            ErrorKind::NotFound => NOT_FOUND_MESSAGE.to_string(),
            ErrorKind::Server => SERVER_ERROR_MESSAGE.to_string(),
            ErrorKind::Validation | ErrorKind::Http => non_empty(&err.message)
                .unwrap_or_else(|| default_message(err.status_code)),
        },
        ErrorInput::Unknown { message } => message
            .as_deref()
            .and_then(non_empty)
            .unwrap_or_else(|| FALLBACK_MESSAGE.to_string()),
    }
}

/// Blank messages count as absent, anything else is returned as written.
fn non_empty(text: &str) -> Option<String> {
    (!text.trim().is_empty()).then(|| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VALIDATION_MESSAGE;
    use serde_json::json;

    #[test]
    fn test_strings_pass_through() {
        assert_eq!(format_error_for_component(&"boom".into()), "boom");
        assert_eq!(
            format_error_for_component(&ErrorInput::Text(String::new())),
            ""
        );
    }

    #[test]
    fn test_status_wins_over_message() {
        let err = ApiError::new(404, "loan 12 does not exist");
        assert_eq!(format_error_for_component(&err.into()), NOT_FOUND_MESSAGE);

        let from_json = ErrorInput::from_json(&json!({"statusCode": 404, "message": "whatever"}));
        assert_eq!(format_error_for_component(&from_json), NOT_FOUND_MESSAGE);
    }

    #[test]
    fn test_taxonomy_sentences() {
        let cases = [
            (0, NETWORK_MESSAGE),
            (408, TIMEOUT_MESSAGE),
            (401, UNAUTHORIZED_MESSAGE),
            (500, SERVER_ERROR_MESSAGE),
        ];
        for (status, expected) in cases {
            let input = ErrorInput::Api(ApiError::new(status, "ignored"));
            assert_eq!(format_error_for_component(&input), expected);
        }
    }

    #[test]
    fn test_validation_keeps_server_message() {
        let input = ErrorInput::Api(ApiError::new(400, "DNI already registered"));
        assert_eq!(format_error_for_component(&input), "DNI already registered");

        let blank = ErrorInput::Api(ApiError::new(400, ""));
        assert_eq!(format_error_for_component(&blank), VALIDATION_MESSAGE);
    }

    #[test]
    fn test_other_status() {
        let with_message = ErrorInput::Api(ApiError::new(409, "Cash register already closed"));
        assert_eq!(
            format_error_for_component(&with_message),
            "Cash register already closed"
        );

        let bare = ErrorInput::from_json(&json!({"statusCode": 502}));
        assert_eq!(format_error_for_component(&bare), "Error 502");
    }

    #[test]
    fn test_unknown_inputs() {
        let with_message = ErrorInput::from_json(&json!({"message": "disk full"}));
        assert_eq!(format_error_for_component(&with_message), "disk full");

        let padded = ErrorInput::Unknown {
            message: Some("  printer offline\n".to_string()),
        };
        assert_eq!(format_error_for_component(&padded), "  printer offline\n");

        let blank = ErrorInput::Unknown {
            message: Some("   ".to_string()),
        };
        assert_eq!(format_error_for_component(&blank), FALLBACK_MESSAGE);

        for value in [json!(null), json!(42), json!([1, 2]), json!({"code": 7})] {
            let input = ErrorInput::from_json(&value);
            assert_eq!(format_error_for_component(&input), FALLBACK_MESSAGE);
        }
    }

    #[test]
    fn test_from_anyhow() {
        let api: anyhow::Error = ApiError::timeout().into();
        assert_eq!(format_error_for_component(&(&api).into()), TIMEOUT_MESSAGE);

        let other = anyhow::anyhow!("config file missing");
        assert_eq!(
            format_error_for_component(&(&other).into()),
            "config file missing"
        );
    }
}
