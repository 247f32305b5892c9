use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Rejected with status {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected {
        status: reqwest::StatusCode,
        message: Option<String>,
    },
}

/// Maximum length for response bodies quoted in error messages
const MAX_ERROR_BODY_LENGTH: usize = 200;

impl ApiError {
    /// Build an `InvalidResponse` that quotes a bounded prefix of the body
    pub fn invalid_body(reason: impl std::fmt::Display, body: &[u8]) -> Self {
        let text = String::from_utf8_lossy(body);
        let quoted: String = text.chars().take(MAX_ERROR_BODY_LENGTH).collect();
        if quoted.len() < text.len() {
            ApiError::InvalidResponse(format!(
                "{} (body: {}... truncated, {} total bytes)",
                reason,
                quoted,
                body.len()
            ))
        } else {
            ApiError::InvalidResponse(format!("{} (body: {})", reason, quoted))
        }
    }

    /// Server-supplied message for a rejected request, if any
    pub fn server_message(&self) -> Option<&str> {
        match self {
            ApiError::Rejected { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}
