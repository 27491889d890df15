use thiserror::Error;

/// Failure talking to the expense backend, remote or local.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("server returned {status}: {}", .detail.as_deref().unwrap_or("no detail"))]
    Status { status: u16, detail: Option<String> },

    #[error("could not decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0} not found")]
    NotFound(String),

    #[error("{0}")]
    Rejected(String),

    #[error("{0}")]
    Unsupported(&'static str),
}

impl ApiError {
    /// Message meant for the user, when the backend supplied one.
    pub fn detail(&self) -> Option<&str> {
        match self {
            ApiError::Status { detail, .. } => detail.as_deref(),
            ApiError::Rejected(message) => Some(message.as_str()),
            ApiError::Unsupported(message) => Some(*message),
            _ => None,
        }
    }

    /// Server detail text, falling back to a generic message.
    pub fn user_message(&self, fallback: &str) -> String {
        self.detail()
            .map(str::to_string)
            .unwrap_or_else(|| fallback.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_detail_is_user_facing() {
        let err = ApiError::Status {
            status: 400,
            detail: Some("Category already exists".to_string()),
        };
        assert_eq!(err.user_message("fallback"), "Category already exists");
        assert_eq!(err.to_string(), "server returned 400: Category already exists");
    }

    #[test]
    fn transport_style_errors_fall_back() {
        let err = ApiError::NotFound("category 3".to_string());
        assert_eq!(err.user_message("Failed to delete category."), "Failed to delete category.");
        let err = ApiError::Status {
            status: 500,
            detail: None,
        };
        assert_eq!(err.user_message("generic"), "generic");
    }
}
