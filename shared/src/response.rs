//! API response types
//!
//! The backend answers successful calls with the bare entity JSON and failed
//! calls with an error body:
//! ```json
//! {
//!     "statusCode": 400,
//!     "message": "Store slug already exists",
//!     "error": "Bad Request"
//! }
//! ```
//! `message` is a list when several request fields fail validation.

use serde::{Deserialize, Serialize};

/// Error body returned by the backend on non-2xx responses
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiErrorBody {
    pub message: ErrorMessage,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub status_code: Option<u16>,
}

/// Single message or list of field messages
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ErrorMessage {
    Single(String),
    List(Vec<String>),
}

impl ApiErrorBody {
    /// Human-readable message, list entries joined with `; `
    pub fn message_text(&self) -> String {
        match &self.message {
            ErrorMessage::Single(m) => m.clone(),
            ErrorMessage::List(items) => items.join("; "),
        }
    }
}

/// Generic `{ "message": ... }` acknowledgement
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_single_message() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"statusCode":404,"message":"Store not found","error":"Not Found"}"#)
                .unwrap();
        assert_eq!(body.message_text(), "Store not found");
        assert_eq!(body.status_code, Some(404));
    }

    #[test]
    fn test_error_body_message_list() {
        let body: ApiErrorBody =
            serde_json::from_str(r#"{"message":["name too short","email invalid"]}"#).unwrap();
        assert_eq!(body.message_text(), "name too short; email invalid");
        assert!(body.error.is_none());
    }
}
