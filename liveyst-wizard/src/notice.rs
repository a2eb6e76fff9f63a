//! User-visible notifications

use liveyst_client::ClientError;
use serde::Serialize;

/// Shown when the backend supplied no message
pub const GENERIC_ERROR: &str = "Something went wrong. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeVariant {
    Default,
    Warning,
    Destructive,
}

/// Toast-style message for the UI layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub title: String,
    pub description: Option<String>,
    pub variant: NoticeVariant,
}

impl Notice {
    pub fn success(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            variant: NoticeVariant::Default,
        }
    }

    pub fn warning(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: NoticeVariant::Warning,
        }
    }

    /// Backend message when present, else the generic one
    pub fn from_client_error(title: impl Into<String>, err: &ClientError) -> Self {
        Self {
            title: title.into(),
            description: Some(err.backend_message().unwrap_or(GENERIC_ERROR).to_string()),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn error(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: Some(description.into()),
            variant: NoticeVariant::Destructive,
        }
    }

    pub fn is_error(&self) -> bool {
        self.variant == NoticeVariant::Destructive
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_notice() {
        let err = ClientError::Api {
            status: 409,
            message: "Store slug already exists".into(),
        };
        let notice = Notice::from_client_error("Create store error:", &err);
        assert_eq!(notice.description.as_deref(), Some("Store slug already exists"));
        assert!(notice.is_error());

        let err = ClientError::InvalidResponse("eof".into());
        let notice = Notice::from_client_error("Create store error:", &err);
        assert_eq!(notice.description.as_deref(), Some(GENERIC_ERROR));
    }
}
