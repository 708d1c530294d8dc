//! API error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed with HTTP {status}")]
    Status { status: u16, message: Option<String> },

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl ApiError {
    /// The non-empty `message` the server put in its error body, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } if !message.trim().is_empty() => Some(message.as_str()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_message() {
        let err = ApiError::Status {
            status: 400,
            message: Some("Invalid credentials".to_string()),
        };
        assert_eq!(err.server_message(), Some("Invalid credentials"));

        let blank = ApiError::Status {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(blank.server_message(), None);

        assert_eq!(ApiError::InvalidUrl("x".to_string()).server_message(), None);
    }
}
